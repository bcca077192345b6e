pub mod error;
pub mod models;
pub mod services;

pub use error::*;
pub use models::*;
pub use services::engine::{due_notifications, EngineConfig, ReminderEngine};
pub use services::notifier::{NotificationSink, TracingSink};
