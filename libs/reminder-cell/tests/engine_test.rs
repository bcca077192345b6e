use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{NaiveDate, NaiveDateTime};
use uuid::Uuid;

use reminder_cell::{
    due_notifications, EngineConfig, Notification, NotificationSink, ReminderEngine, ReminderError,
};
use shared_models::records::{
    AppointmentRecord, AppointmentStatus, PrescriptionRecord, PrescriptionStatus, ScheduleSnapshot,
};

struct RecordingSink {
    permitted: AtomicBool,
    sent: Mutex<Vec<Notification>>,
}

impl RecordingSink {
    fn new() -> Arc<Self> {
        Self::with_permission(true)
    }

    fn with_permission(permitted: bool) -> Arc<Self> {
        Arc::new(Self {
            permitted: AtomicBool::new(permitted),
            sent: Mutex::new(Vec::new()),
        })
    }

    fn sent(&self) -> Vec<Notification> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl NotificationSink for RecordingSink {
    fn is_permitted(&self) -> bool {
        self.permitted.load(Ordering::Relaxed)
    }

    async fn dispatch(&self, notification: &Notification) -> Result<(), ReminderError> {
        self.sent.lock().unwrap().push(notification.clone());
        Ok(())
    }
}

fn dt(year: i32, month: u32, day: u32, hour: u32, minute: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(year, month, day)
        .unwrap()
        .and_hms_opt(hour, minute, 0)
        .unwrap()
}

/// Mondays only from Monday 2025-01-06, anchored 08:00, every 8 hours:
/// doses at 08:00 and 16:00 on active days.
fn dose_prescription() -> PrescriptionRecord {
    PrescriptionRecord {
        id: Uuid::new_v4(),
        nome_medicamento: "Amoxicilina".to_string(),
        frequencia_horas: 8,
        dias: vec!["Segunda".to_string()],
        numero_dias_tratamento: 7,
        data_inicio: "2025-01-06".to_string(),
        hora_inicio: "08:00".to_string(),
        status: PrescriptionStatus::Active,
    }
}

fn consultation(status: AppointmentStatus) -> AppointmentRecord {
    AppointmentRecord {
        id: Uuid::new_v4(),
        especialidade: "Cardiologia".to_string(),
        medico: "Dra. Helena Souza".to_string(),
        data: "10/03/2025".to_string(),
        hora: "09:00".to_string(),
        status,
    }
}

fn snapshot(
    prescriptions: Vec<PrescriptionRecord>,
    appointments: Vec<AppointmentRecord>,
) -> ScheduleSnapshot {
    ScheduleSnapshot {
        prescriptions,
        appointments,
    }
}

async fn running_engine(sink: Arc<RecordingSink>, snapshot: ScheduleSnapshot) -> Arc<ReminderEngine> {
    let engine = ReminderEngine::new(sink, EngineConfig::default());
    engine.publish_snapshot(snapshot).await;
    engine.set_enabled(true);
    engine
}

#[tokio::test]
async fn appointment_fires_exactly_once_at_its_minute() {
    let sink = RecordingSink::new();
    let engine = running_engine(
        sink.clone(),
        snapshot(vec![], vec![consultation(AppointmentStatus::Scheduled)]),
    )
    .await;

    engine.tick(dt(2025, 3, 10, 9, 0)).await;
    assert_eq!(sink.sent().len(), 1);
    assert!(sink.sent()[0].body.contains("Cardiologia"));

    engine.tick(dt(2025, 3, 10, 9, 1)).await;
    assert_eq!(sink.sent().len(), 1);
}

#[tokio::test]
async fn dose_fires_on_its_minute_only() {
    let sink = RecordingSink::new();
    let engine = running_engine(sink.clone(), snapshot(vec![dose_prescription()], vec![])).await;

    engine.tick(dt(2025, 1, 6, 15, 59)).await;
    engine.tick(dt(2025, 1, 6, 16, 0)).await;
    engine.tick(dt(2025, 1, 6, 16, 1)).await;

    let sent = sink.sent();
    assert_eq!(sent.len(), 1);
    assert!(sent[0].body.contains("Amoxicilina"));
}

#[tokio::test]
async fn disabled_engine_ticks_silently() {
    let sink = RecordingSink::new();
    let engine = running_engine(
        sink.clone(),
        snapshot(vec![], vec![consultation(AppointmentStatus::Scheduled)]),
    )
    .await;
    engine.set_enabled(false);

    engine.tick(dt(2025, 3, 10, 9, 0)).await;
    assert!(sink.sent().is_empty());
}

#[tokio::test]
async fn revoked_permission_degrades_to_no_op() {
    let sink = RecordingSink::with_permission(false);
    let engine = running_engine(
        sink.clone(),
        snapshot(vec![], vec![consultation(AppointmentStatus::Scheduled)]),
    )
    .await;

    engine.tick(dt(2025, 3, 10, 9, 0)).await;
    assert!(sink.sent().is_empty());
}

#[tokio::test]
async fn inactive_and_concluded_records_are_ignored() {
    let mut prescription = dose_prescription();
    prescription.status = PrescriptionStatus::Inactive;

    let sink = RecordingSink::new();
    let engine = running_engine(
        sink.clone(),
        snapshot(vec![prescription], vec![consultation(AppointmentStatus::Done)]),
    )
    .await;

    engine.tick(dt(2025, 1, 6, 16, 0)).await;
    engine.tick(dt(2025, 3, 10, 9, 0)).await;
    assert!(sink.sent().is_empty());
}

#[tokio::test]
async fn malformed_record_does_not_suppress_the_rest() {
    let mut broken = dose_prescription();
    broken.data_inicio = "06/01/2025".to_string();

    let sink = RecordingSink::new();
    let engine = running_engine(
        sink.clone(),
        snapshot(
            vec![broken, dose_prescription()],
            vec![consultation(AppointmentStatus::Scheduled)],
        ),
    )
    .await;

    engine.tick(dt(2025, 1, 6, 16, 0)).await;
    assert_eq!(sink.sent().len(), 1, "healthy prescription still fires");

    engine.tick(dt(2025, 3, 10, 9, 0)).await;
    assert_eq!(sink.sent().len(), 2, "appointment still fires");
}

#[tokio::test]
async fn start_and_stop_are_idempotent() {
    let sink = RecordingSink::new();
    let engine = ReminderEngine::new(sink, EngineConfig::default());

    engine.start().await;
    engine.start().await;
    assert!(engine.is_running().await);

    engine.stop().await;
    assert!(!engine.is_running().await);
    engine.stop().await;
    assert!(!engine.is_running().await);

    // The engine can come back after a stop.
    engine.start().await;
    assert!(engine.is_running().await);
    engine.stop().await;
}

#[tokio::test]
async fn published_snapshot_replaces_the_previous_one() {
    let sink = RecordingSink::new();
    let engine = running_engine(sink.clone(), snapshot(vec![dose_prescription()], vec![])).await;

    engine.tick(dt(2025, 1, 6, 16, 0)).await;
    assert_eq!(sink.sent().len(), 1);

    engine.publish_snapshot(ScheduleSnapshot::default()).await;
    engine.tick(dt(2025, 1, 6, 16, 0)).await;
    assert_eq!(sink.sent().len(), 1, "emptied snapshot no longer fires");
}

#[test]
fn due_check_covers_the_whole_minute() {
    let records = snapshot(vec![dose_prescription()], vec![]);

    // A tick landing mid-minute still observes the dose anchored at :00.
    let mid_minute = NaiveDate::from_ymd_opt(2025, 1, 6)
        .unwrap()
        .and_hms_opt(16, 0, 37)
        .unwrap();
    assert_eq!(due_notifications(&records, mid_minute).len(), 1);
    assert_eq!(due_notifications(&records, dt(2025, 1, 6, 16, 1)).len(), 0);
}

#[test]
fn first_dose_of_the_treatment_is_observed() {
    let records = snapshot(vec![dose_prescription()], vec![]);
    assert_eq!(due_notifications(&records, dt(2025, 1, 6, 8, 0)).len(), 1);
}

#[test]
fn wire_snapshot_feeds_the_due_check() {
    let records: ScheduleSnapshot = serde_json::from_value(serde_json::json!({
        "prescriptions": [{
            "id": Uuid::new_v4(),
            "nomeMedicamento": "Losartana",
            "frequenciaHoras": 12,
            "dias": ["Segunda", "Quinta"],
            "numeroDiasTratamento": 30,
            "dataInicio": "2025-03-03",
            "horaInicio": "07:30",
            "status": "Ativo"
        }],
        "appointments": [{
            "id": Uuid::new_v4(),
            "especialidade": "Dermatologia",
            "medico": "Dr. Paulo Lima",
            "data": "06/03/2025",
            "hora": "14:30",
            "status": "Agendada"
        }]
    }))
    .unwrap();

    // Thursday 2025-03-06: the 19:30 dose and nothing else.
    assert_eq!(due_notifications(&records, dt(2025, 3, 6, 19, 30)).len(), 1);
    // Appointment minute fires the consultation reminder alone.
    assert_eq!(due_notifications(&records, dt(2025, 3, 6, 14, 30)).len(), 1);
    // A quiet minute fires nothing.
    assert_eq!(due_notifications(&records, dt(2025, 3, 6, 14, 31)).len(), 0);
}
