use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Prescription record as served by the portal backend. Field names follow
/// the wire vocabulary; the date and time stay wire strings until the
/// schedule boundary converts them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PrescriptionRecord {
    pub id: Uuid,
    #[serde(rename = "nomeMedicamento")]
    pub nome_medicamento: String,
    /// Hours between doses on an active day. Positive on the happy path;
    /// zero or negative values survive parsing so the resolver can report
    /// them as an invalid schedule instead of the decoder rejecting the
    /// whole record.
    #[serde(rename = "frequenciaHoras")]
    pub frequencia_horas: i32,
    /// Weekday labels from the fixed Sunday-first vocabulary.
    pub dias: Vec<String>,
    #[serde(rename = "numeroDiasTratamento")]
    pub numero_dias_tratamento: i32,
    /// `YYYY-MM-DD`
    #[serde(rename = "dataInicio")]
    pub data_inicio: String,
    /// `HH:MM` or `HH:MM:SS`
    #[serde(rename = "horaInicio")]
    pub hora_inicio: String,
    pub status: PrescriptionStatus,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum PrescriptionStatus {
    #[serde(rename = "Ativo")]
    Active,
    #[serde(rename = "Inativo")]
    Inactive,
}

impl fmt::Display for PrescriptionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PrescriptionStatus::Active => write!(f, "Ativo"),
            PrescriptionStatus::Inactive => write!(f, "Inativo"),
        }
    }
}

/// Consultation record. A single `(data, hora)` pair, no recurrence.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppointmentRecord {
    pub id: Uuid,
    pub especialidade: String,
    pub medico: String,
    /// `DD/MM/YYYY`
    pub data: String,
    /// `HH:MM`
    pub hora: String,
    pub status: AppointmentStatus,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum AppointmentStatus {
    #[serde(rename = "Agendada")]
    Scheduled,
    #[serde(rename = "Concluída")]
    Done,
}

impl fmt::Display for AppointmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppointmentStatus::Scheduled => write!(f, "Agendada"),
            AppointmentStatus::Done => write!(f, "Concluída"),
        }
    }
}

/// The latest known records, published to the reminder engine as one unit.
/// The host replaces the whole snapshot on every data refresh; nothing
/// mutates it in place.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScheduleSnapshot {
    #[serde(default)]
    pub prescriptions: Vec<PrescriptionRecord>,
    #[serde(default)]
    pub appointments: Vec<AppointmentRecord>,
}
