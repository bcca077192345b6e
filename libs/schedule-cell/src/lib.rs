pub mod models;
pub mod services;

pub use models::*;
pub use services::resolver::{dose_due_at_minute, is_appointment_due, resolve_next_dose};
