//! The reminder poller: one recurring due-check over the current record
//! snapshot, dispatching at most one notification per schedule per
//! observed minute.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use chrono::{Local, NaiveDateTime, Timelike};
use tokio::sync::{Mutex, RwLock};
use tokio::task::JoinHandle;
use tokio::time::{interval, Duration, MissedTickBehavior};
use tracing::{debug, info, warn};

use schedule_cell::models::{AppointmentSchedule, DoseSchedule};
use schedule_cell::{dose_due_at_minute, is_appointment_due};
use shared_models::records::{PrescriptionStatus, ScheduleSnapshot};

use crate::models::Notification;
use crate::services::notifier::NotificationSink;

#[derive(Debug, Clone)]
pub struct EngineConfig {
    pub tick_interval: Duration,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            tick_interval: Duration::from_secs(60),
        }
    }
}

/// Owns the single poll task and the enabled flag for one session. The
/// host publishes record snapshots; the engine only ever reads them.
pub struct ReminderEngine {
    config: EngineConfig,
    enabled: AtomicBool,
    sink: Arc<dyn NotificationSink>,
    // Published whole: the host swaps the inner Arc, so a tick in progress
    // keeps reading the snapshot it started with.
    snapshot: RwLock<Arc<ScheduleSnapshot>>,
    poll_task: Mutex<Option<JoinHandle<()>>>,
}

impl ReminderEngine {
    pub fn new(sink: Arc<dyn NotificationSink>, config: EngineConfig) -> Arc<Self> {
        Arc::new(Self {
            config,
            enabled: AtomicBool::new(false),
            sink,
            snapshot: RwLock::new(Arc::new(ScheduleSnapshot::default())),
            poll_task: Mutex::new(None),
        })
    }

    /// Replace the record snapshot the poller evaluates. Single writer:
    /// the host calls this on every data refresh.
    pub async fn publish_snapshot(&self, snapshot: ScheduleSnapshot) {
        let mut current = self.snapshot.write().await;
        *current = Arc::new(snapshot);
    }

    pub fn set_enabled(&self, enabled: bool) {
        self.enabled.store(enabled, Ordering::Relaxed);
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled.load(Ordering::Relaxed)
    }

    pub async fn is_running(&self) -> bool {
        self.poll_task.lock().await.is_some()
    }

    /// Begin polling. Calling while the poll task is alive is a no-op.
    pub async fn start(self: &Arc<Self>) {
        let mut task = self.poll_task.lock().await;
        if task.is_some() {
            debug!("reminder engine already running, start ignored");
            return;
        }

        let engine = Arc::clone(self);
        let tick_interval = self.config.tick_interval;
        *task = Some(tokio::spawn(async move {
            let mut ticker = interval(tick_interval);
            // A late tick re-evaluates the minute it lands in; missed
            // minutes are not replayed.
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
            loop {
                ticker.tick().await;
                engine.tick(Local::now().naive_local()).await;
            }
        }));
        info!(
            interval_secs = tick_interval.as_secs(),
            "reminder engine started"
        );
    }

    /// Cancel the recurring due-check. Safe to call when not running.
    pub async fn stop(&self) {
        let mut task = self.poll_task.lock().await;
        if let Some(handle) = task.take() {
            handle.abort();
            info!("reminder engine stopped");
        }
    }

    /// One due-check pass at `now`. Silent no-op while disabled or while
    /// the platform denies notifications; dispatch failures are logged and
    /// swallowed.
    pub async fn tick(&self, now: NaiveDateTime) {
        if !self.is_enabled() || !self.sink.is_permitted() {
            return;
        }

        let snapshot = { self.snapshot.read().await.clone() };
        let due = due_notifications(&snapshot, now);
        debug!(
            prescriptions = snapshot.prescriptions.len(),
            appointments = snapshot.appointments.len(),
            due = due.len(),
            "reminder tick"
        );

        for notification in due {
            if let Err(e) = self.sink.dispatch(&notification).await {
                warn!(
                    source_id = %notification.source_id,
                    "notification dispatch failed: {e}"
                );
            }
        }
    }
}

/// Every reminder due in the minute containing `now`: doses of active
/// prescriptions landing on that minute, plus scheduled consultations at
/// that exact minute. A record that cannot be interpreted is skipped so it
/// never suppresses the rest of the snapshot.
pub fn due_notifications(snapshot: &ScheduleSnapshot, now: NaiveDateTime) -> Vec<Notification> {
    let minute = minute_floor(now);
    let mut due = Vec::new();

    for record in &snapshot.prescriptions {
        if record.status != PrescriptionStatus::Active {
            continue;
        }
        let schedule = match DoseSchedule::try_from(record) {
            Ok(schedule) => schedule,
            Err(e) => {
                warn!(id = %record.id, "skipping prescription with malformed schedule: {e}");
                continue;
            }
        };
        if dose_due_at_minute(&schedule, minute) {
            due.push(Notification::for_dose(record));
        }
    }

    for record in &snapshot.appointments {
        let appointment = match AppointmentSchedule::try_from(record) {
            Ok(appointment) => appointment,
            Err(e) => {
                warn!(id = %record.id, "skipping appointment with malformed schedule: {e}");
                continue;
            }
        };
        if is_appointment_due(&appointment, minute) {
            due.push(Notification::for_appointment(record));
        }
    }

    due
}

fn minute_floor(now: NaiveDateTime) -> NaiveDateTime {
    now.with_second(0)
        .and_then(|truncated| truncated.with_nanosecond(0))
        .unwrap_or(now)
}
