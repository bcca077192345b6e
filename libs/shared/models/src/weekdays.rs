//! The fixed weekday vocabulary shared with the portal backend.

use chrono::Weekday;

/// Sunday-first labels, indexed by `Weekday::num_days_from_sunday`.
pub const WEEKDAY_LABELS: [&str; 7] = [
    "Domingo", "Segunda", "Terça", "Quarta", "Quinta", "Sexta", "Sábado",
];

pub fn weekday_from_label(label: &str) -> Option<Weekday> {
    match WEEKDAY_LABELS.iter().position(|known| *known == label)? {
        0 => Some(Weekday::Sun),
        1 => Some(Weekday::Mon),
        2 => Some(Weekday::Tue),
        3 => Some(Weekday::Wed),
        4 => Some(Weekday::Thu),
        5 => Some(Weekday::Fri),
        6 => Some(Weekday::Sat),
        _ => None,
    }
}

pub fn weekday_label(day: Weekday) -> &'static str {
    WEEKDAY_LABELS[day.num_days_from_sunday() as usize]
}

/// Sort selected-day labels Monday-first. Display-only ordering; every
/// index lookup stays Sunday-first. Unknown labels sink to the end.
pub fn sort_labels_for_display(labels: &mut [String]) {
    labels.sort_by_key(|label| {
        weekday_from_label(label)
            .map(|day| day.num_days_from_monday())
            .unwrap_or(7)
    });
}
