//! error.rs
//! Errores tipados del pipeline de recordatorios.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ReminderError {
    /// Fallo de red/HTTP hablando con el store o con el transporte de correo
    #[error("transport error: {0}")]
    Transport(String),

    /// Respuesta del store que no es JSON válido
    #[error("decode error: {0}")]
    Decode(String),

    /// Registro con fecha/hora/zona inválida (o imposible de decodificar)
    #[error("invalid reminder {id}: {reason}")]
    Record { id: String, reason: String },

    /// Un envío a un destinatario falló
    #[error("delivery to {recipient} failed: {reason}")]
    Delivery { recipient: String, reason: String },

    #[error("configuration error: {0}")]
    Config(String),
}

impl ReminderError {
    pub fn record(id: impl Into<String>, reason: impl Into<String>) -> Self {
        ReminderError::Record {
            id: id.into(),
            reason: reason.into(),
        }
    }

    pub fn delivery(recipient: impl Into<String>, reason: impl Into<String>) -> Self {
        ReminderError::Delivery {
            recipient: recipient.into(),
            reason: reason.into(),
        }
    }
}

impl From<reqwest::Error> for ReminderError {
    fn from(e: reqwest::Error) -> Self {
        ReminderError::Transport(e.to_string())
    }
}

pub type ReminderResult<T> = std::result::Result<T, ReminderError>;
