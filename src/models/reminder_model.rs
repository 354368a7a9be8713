//! models/reminder_model.rs
//! Registro de recordatorio tal como lo guarda el store, y los resultados de entrega.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReminderType {
    Appointment,
    Task,
    Event,
    Meeting,
    Call,
}

impl ReminderType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReminderType::Appointment => "appointment",
            ReminderType::Task => "task",
            ReminderType::Event => "event",
            ReminderType::Meeting => "meeting",
            ReminderType::Call => "call",
        }
    }
}

impl fmt::Display for ReminderType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// scheduled -> sent | failed. Nunca se sale de sent/failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReminderStatus {
    Scheduled,
    Sent,
    Failed,
}

impl ReminderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReminderStatus::Scheduled => "scheduled",
            ReminderStatus::Sent => "sent",
            ReminderStatus::Failed => "failed",
        }
    }
}

impl fmt::Display for ReminderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reminder {
    pub id: String,
    #[serde(default)]
    pub user_id: Option<String>,
    pub title: String,
    #[serde(rename = "type")]
    pub reminder_type: ReminderType,
    pub date: String, // "2024-01-15"
    pub time: String, // "09:00" o "09:00:00"
    pub timezone: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub recipients: Vec<String>,
    pub status: ReminderStatus,
    #[serde(default)]
    pub created_at: Option<String>,
}

// Columna text[] nullable: null cuenta como lista vacía
fn null_as_empty<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Vec<String>>::deserialize(deserializer)?.unwrap_or_default())
}

/// Body del PATCH al store
#[derive(Debug, Clone, Serialize)]
pub struct StatusUpdate {
    pub status: ReminderStatus,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RecipientDelivery {
    pub address: String,
    pub delivered: bool,
    pub error: Option<String>,
}

/// Resultado de despachar un recordatorio a todos sus destinatarios.
#[derive(Debug, Clone, PartialEq)]
pub struct DeliveryReport {
    pub reminder_id: String,
    pub recipients: Vec<RecipientDelivery>,
    /// Error al componer el mensaje (antes de enviar nada)
    pub error: Option<String>,
}

impl DeliveryReport {
    pub fn failed(reminder_id: &str, error: String) -> Self {
        DeliveryReport {
            reminder_id: reminder_id.to_string(),
            recipients: vec![],
            error: Some(error),
        }
    }

    /// "sent" solo si todos los destinatarios recibieron el correo.
    /// Sin destinatarios cuenta como éxito.
    pub fn outcome(&self) -> ReminderStatus {
        if self.error.is_none() && self.recipients.iter().all(|r| r.delivered) {
            ReminderStatus::Sent
        } else {
            ReminderStatus::Failed
        }
    }

    pub fn failed_recipients(&self) -> usize {
        self.recipients.iter().filter(|r| !r.delivered).count()
    }
}
