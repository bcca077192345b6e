//! Next-dose resolution. Pure date arithmetic over naive local instants;
//! callers supply `now` and decide how to render the outcome.

use chrono::{Datelike, Duration, NaiveDateTime, NaiveTime, Timelike};

use shared_models::records::AppointmentStatus;

use crate::models::{
    AppointmentSchedule, DoseSchedule, InvalidScheduleReason, ScheduleResolution,
};

/// Resolve the next dose of `schedule` relative to `now`.
///
/// Deterministic and re-entrant: no I/O, no clock reads, bounded by a
/// seven-day scan (the weekday mask repeats weekly, so a week without a
/// candidate means no later week can produce one).
pub fn resolve_next_dose(schedule: &DoseSchedule, now: NaiveDateTime) -> ScheduleResolution {
    let start = schedule.start_date.and_time(schedule.start_time);
    // The treatment ends a calendar-day count after the start date;
    // time-of-day plays no part in the boundary.
    let end = (schedule.start_date + Duration::days(schedule.duration_days as i64))
        .and_time(NaiveTime::MIN);

    if now >= end {
        return ScheduleResolution::Completed;
    }
    if now < start {
        return ScheduleResolution::NotStarted { due_at: start };
    }
    if schedule.frequency_hours <= 0 {
        return ScheduleResolution::Invalid {
            reason: InvalidScheduleReason::Frequency,
        };
    }
    if schedule.allowed_weekdays.is_empty() {
        return ScheduleResolution::Invalid {
            reason: InvalidScheduleReason::Weekdays,
        };
    }

    let step = Duration::hours(schedule.frequency_hours as i64);
    let mut day = now.date();
    for _ in 0..7 {
        if schedule.allowed_weekdays.contains(&day.weekday()) {
            let mut candidate = day.and_time(schedule.start_time);
            while candidate <= now {
                candidate += step;
                if candidate >= end {
                    break;
                }
            }
            if candidate > now && candidate < end {
                return ScheduleResolution::Due { at: candidate };
            }
        }
        day += Duration::days(1);
    }

    ScheduleResolution::Completed
}

/// Whether a consultation is due at minute granularity: status still
/// `Agendada`, same calendar day, same hour and minute. No tolerance
/// window on either side.
pub fn is_appointment_due(appointment: &AppointmentSchedule, now: NaiveDateTime) -> bool {
    appointment.status == AppointmentStatus::Scheduled
        && appointment.date == now.date()
        && appointment.time.hour() == now.hour()
        && appointment.time.minute() == now.minute()
}

/// Whether a dose lands exactly on the minute containing `minute`.
///
/// The resolver steps past a candidate once `candidate <= now`, so a query
/// made at the dose's own instant already reports the following dose. The
/// probe therefore runs from one second before the minute boundary; a
/// resolution landing on the boundary is due during that minute. The first
/// dose of a not-yet-started treatment counts too, provided its weekday is
/// actually allowed.
pub fn dose_due_at_minute(schedule: &DoseSchedule, minute: NaiveDateTime) -> bool {
    let minute = minute
        .with_second(0)
        .and_then(|m| m.with_nanosecond(0))
        .unwrap_or(minute);
    let probe = minute - Duration::seconds(1);

    match resolve_next_dose(schedule, probe) {
        ScheduleResolution::Due { at } => at == minute,
        ScheduleResolution::NotStarted { due_at } => {
            due_at == minute && schedule.allowed_weekdays.contains(&minute.date().weekday())
        }
        _ => false,
    }
}
