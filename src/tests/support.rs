//! tests/support.rs
//! Helpers compartidos: reloj fijo, mailer en memoria, fixtures.

use std::{
    collections::HashSet,
    sync::{
        atomic::{AtomicUsize, Ordering},
        Mutex,
    },
    time::Duration,
};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::{json, Value};

use crate::{
    clock::Clock,
    config::app_config::StoreConfig,
    error::{ReminderError, ReminderResult},
    models::{
        email_model::OutgoingEmail,
        reminder_model::{Reminder, ReminderStatus, ReminderType},
    },
    services::email_service::MailTransport,
};

pub const TEST_KEY: &str = "test-service-key";

pub fn utc(s: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(s)
        .expect("fecha rfc3339 inválida en test")
        .with_timezone(&Utc)
}

/// Reloj fijo que además cuenta cuántas veces se leyó
pub struct FixedClock {
    now: DateTime<Utc>,
    reads: AtomicUsize,
}

impl FixedClock {
    pub fn at(s: &str) -> Self {
        FixedClock {
            now: utc(s),
            reads: AtomicUsize::new(0),
        }
    }

    pub fn reads(&self) -> usize {
        self.reads.load(Ordering::SeqCst)
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        self.now
    }
}

/// Mailer que guarda cada intento y falla para las direcciones indicadas
#[derive(Default)]
pub struct RecordingMailer {
    failing: HashSet<String>,
    attempts: Mutex<Vec<OutgoingEmail>>,
}

impl RecordingMailer {
    pub fn failing_for(addresses: &[&str]) -> Self {
        RecordingMailer {
            failing: addresses.iter().map(|a| a.to_string()).collect(),
            attempts: Mutex::new(vec![]),
        }
    }

    pub fn attempts(&self) -> Vec<OutgoingEmail> {
        self.attempts.lock().unwrap().clone()
    }

    pub fn attempted_addresses(&self) -> Vec<String> {
        self.attempts().into_iter().map(|e| e.to).collect()
    }
}

#[async_trait]
impl MailTransport for RecordingMailer {
    async fn send(&self, email: &OutgoingEmail) -> ReminderResult<()> {
        self.attempts.lock().unwrap().push(email.clone());
        if self.failing.contains(&email.to) {
            Err(ReminderError::delivery(&email.to, "mailbox unavailable"))
        } else {
            Ok(())
        }
    }
}

pub fn reminder(id: &str, date: &str, time: &str, timezone: &str, recipients: &[&str]) -> Reminder {
    Reminder {
        id: id.to_string(),
        user_id: Some("user-1".to_string()),
        title: "Dentist".to_string(),
        reminder_type: ReminderType::Appointment,
        date: date.to_string(),
        time: time.to_string(),
        timezone: timezone.to_string(),
        recipients: recipients.iter().map(|r| r.to_string()).collect(),
        status: ReminderStatus::Scheduled,
        created_at: Some("2024-01-01T00:00:00Z".to_string()),
    }
}

pub fn reminder_json(
    id: &str,
    date: &str,
    time: &str,
    timezone: &str,
    recipients: &[&str],
) -> Value {
    json!({
        "id": id,
        "user_id": "user-1",
        "title": "Dentist",
        "type": "appointment",
        "date": date,
        "time": time,
        "timezone": timezone,
        "recipients": recipients,
        "status": "scheduled",
        "created_at": "2024-01-01T00:00:00Z"
    })
}

pub fn store_config(base_url: &str) -> StoreConfig {
    StoreConfig {
        base_url: base_url.to_string(),
        service_key: TEST_KEY.to_string(),
        timeout: Duration::from_secs(5),
    }
}
