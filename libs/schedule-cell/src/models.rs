use chrono::{NaiveDate, NaiveDateTime, NaiveTime, Timelike, Weekday};
use serde::Serialize;
use thiserror::Error;

use shared_models::records::{AppointmentRecord, AppointmentStatus, PrescriptionRecord};
use shared_models::weekdays;

/// A recurring-medication timing rule, re-derived from its prescription
/// record on every query. Zero/negative frequency and an empty weekday set
/// are representable on purpose: the resolver reports them as `Invalid`
/// instead of construction rejecting them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DoseSchedule {
    pub start_date: NaiveDate,
    pub start_time: NaiveTime,
    pub frequency_hours: i32,
    pub allowed_weekdays: Vec<Weekday>,
    pub duration_days: i32,
}

/// Vocabulary failure at the record boundary. Distinct from an `Invalid`
/// resolution: these records cannot be interpreted at all.
#[derive(Debug, Error)]
pub enum ScheduleError {
    #[error("unparseable date `{0}`")]
    BadDate(String),
    #[error("unparseable time `{0}`")]
    BadTime(String),
    #[error("unknown weekday label `{0}`")]
    UnknownWeekday(String),
}

impl TryFrom<&PrescriptionRecord> for DoseSchedule {
    type Error = ScheduleError;

    fn try_from(record: &PrescriptionRecord) -> Result<Self, Self::Error> {
        let start_date = NaiveDate::parse_from_str(&record.data_inicio, "%Y-%m-%d")
            .map_err(|_| ScheduleError::BadDate(record.data_inicio.clone()))?;
        let start_time = parse_wire_time(&record.hora_inicio)?;
        let allowed_weekdays = record
            .dias
            .iter()
            .map(|label| {
                weekdays::weekday_from_label(label)
                    .ok_or_else(|| ScheduleError::UnknownWeekday(label.clone()))
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            start_date,
            start_time,
            frequency_hours: record.frequencia_horas,
            allowed_weekdays,
            duration_days: record.numero_dias_tratamento,
        })
    }
}

/// Accepts `HH:MM` and `HH:MM:SS`; seconds are dropped so dose instants
/// always sit on the minute grid the poller compares against.
fn parse_wire_time(raw: &str) -> Result<NaiveTime, ScheduleError> {
    let parsed = NaiveTime::parse_from_str(raw, "%H:%M:%S")
        .or_else(|_| NaiveTime::parse_from_str(raw, "%H:%M"))
        .map_err(|_| ScheduleError::BadTime(raw.to_string()))?;
    Ok(parsed.with_second(0).unwrap_or(parsed))
}

/// Outcome of a next-dose query. Exceptional input is a variant, never an
/// error: the display layer renders each case directly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "camelCase")]
pub enum ScheduleResolution {
    /// The treatment has not begun; the first dose is the start instant.
    NotStarted { due_at: NaiveDateTime },
    /// The treatment window has elapsed.
    Completed,
    /// The next valid dose instant.
    Due { at: NaiveDateTime },
    Invalid { reason: InvalidScheduleReason },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum InvalidScheduleReason {
    Frequency,
    Weekdays,
}

impl ScheduleResolution {
    /// Display labels for a `Due` resolution: `DD/MM/YYYY` and `HH:MM`,
    /// the portal's wire formats.
    pub fn due_labels(&self) -> Option<(String, String)> {
        match self {
            ScheduleResolution::Due { at } => Some((
                at.format("%d/%m/%Y").to_string(),
                at.format("%H:%M").to_string(),
            )),
            _ => None,
        }
    }
}

/// One consultation instant plus its lifecycle status.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppointmentSchedule {
    pub date: NaiveDate,
    pub time: NaiveTime,
    pub status: AppointmentStatus,
}

impl TryFrom<&AppointmentRecord> for AppointmentSchedule {
    type Error = ScheduleError;

    fn try_from(record: &AppointmentRecord) -> Result<Self, Self::Error> {
        let date = NaiveDate::parse_from_str(&record.data, "%d/%m/%Y")
            .map_err(|_| ScheduleError::BadDate(record.data.clone()))?;
        let time = NaiveTime::parse_from_str(&record.hora, "%H:%M")
            .map_err(|_| ScheduleError::BadTime(record.hora.clone()))?;

        Ok(Self {
            date,
            time,
            status: record.status,
        })
    }
}
