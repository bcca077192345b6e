use async_trait::async_trait;
use tracing::info;

use crate::error::ReminderError;
use crate::models::Notification;

/// The platform notification facility, consumed as an opaque side effect.
/// The engine only defines the strings it hands over; transport belongs to
/// the host platform.
#[async_trait]
pub trait NotificationSink: Send + Sync {
    /// Whether the platform currently allows notifications. Re-checked on
    /// every tick; a permission revoked mid-session degrades the tick to a
    /// no-op instead of erroring.
    fn is_permitted(&self) -> bool;

    /// Fire-and-forget dispatch. The engine logs failures and never
    /// retries.
    async fn dispatch(&self, notification: &Notification) -> Result<(), ReminderError>;
}

/// Sink that emits reminders to the log, standing in for the platform
/// notification call.
pub struct TracingSink;

#[async_trait]
impl NotificationSink for TracingSink {
    fn is_permitted(&self) -> bool {
        true
    }

    async fn dispatch(&self, notification: &Notification) -> Result<(), ReminderError> {
        info!(
            tag = notification.tag,
            source_id = %notification.source_id,
            title = %notification.title,
            "{}",
            notification.body
        );
        Ok(())
    }
}
