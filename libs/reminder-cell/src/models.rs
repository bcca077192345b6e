use serde::Serialize;
use uuid::Uuid;

use shared_models::records::{AppointmentRecord, PrescriptionRecord};

/// Channel tag carried by every reminder, so the platform can coalesce and
/// attribute them to the portal.
pub const REMINDER_TAG: &str = "portal-paciente-lembrete";

/// A rendered reminder: the two strings the platform notification call
/// takes, plus correlation fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notification {
    pub title: String,
    pub body: String,
    pub tag: &'static str,
    /// Id of the prescription or appointment that produced this reminder.
    pub source_id: Uuid,
}

impl Notification {
    pub fn for_dose(record: &PrescriptionRecord) -> Self {
        Self {
            title: "Hora do medicamento".to_string(),
            body: format!("Está na hora de tomar {}.", record.nome_medicamento),
            tag: REMINDER_TAG,
            source_id: record.id,
        }
    }

    pub fn for_appointment(record: &AppointmentRecord) -> Self {
        Self {
            title: "Lembrete de consulta".to_string(),
            body: format!(
                "Sua consulta de {} com {} é agora.",
                record.especialidade, record.medico
            ),
            tag: REMINDER_TAG,
            source_id: record.id,
        }
    }
}
