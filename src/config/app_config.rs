//! config/app_config.rs
//! Configuración inyectada en el pipeline. Se construye una sola vez al
//! arrancar (desde el entorno / .env) y se pasa a los servicios.

use std::time::Duration;

use lettre::{message::Mailbox, Address};

use crate::error::{ReminderError, ReminderResult};

const DEFAULT_SMTP_PORT: u16 = 587;
const DEFAULT_STORE_TIMEOUT_SECS: u64 = 30;
const DEFAULT_SEND_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub store: StoreConfig,
    pub mail: MailConfig,
}

/// Acceso al store REST (PostgREST)
#[derive(Debug, Clone)]
pub struct StoreConfig {
    pub base_url: String,
    pub service_key: String,
    pub timeout: Duration,
}

#[derive(Debug, Clone)]
pub struct MailConfig {
    /// Remitente ya validado ("Nombre <correo>" o solo correo)
    pub sender: Mailbox,
    pub transport: MailTransportConfig,
    /// Tiempo máximo por envío individual
    pub send_timeout: Duration,
}

#[derive(Debug, Clone, PartialEq)]
pub enum MailTransportConfig {
    Smtp {
        host: String,
        port: u16,
        user: Option<String>,
        pass: Option<String>,
    },
    /// Binario sendmail local (None = el del PATH)
    Sendmail { path: Option<String> },
}

impl AppConfig {
    /// Lee la configuración de las variables de entorno.
    pub fn from_env() -> ReminderResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> ReminderResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let required = |key: &str| {
            get(key).ok_or_else(|| ReminderError::Config(format!("missing {key}")))
        };

        let base_url = required("SUPABASE_URL")?.trim_end_matches('/').to_string();
        let service_key = required("SUPABASE_SERVICE_KEY")?;
        let from_address: Address = required("REMINDER_FROM_EMAIL")?
            .trim()
            .parse()
            .map_err(|e| ReminderError::Config(format!("REMINDER_FROM_EMAIL: {e}")))?;
        let sender = Mailbox::new(get("REMINDER_FROM_NAME"), from_address);

        let store_timeout = parse_secs(get("STORE_TIMEOUT_SECS"), DEFAULT_STORE_TIMEOUT_SECS)
            .map_err(|e| ReminderError::Config(format!("STORE_TIMEOUT_SECS: {e}")))?;
        let send_timeout = parse_secs(get("SEND_TIMEOUT_SECS"), DEFAULT_SEND_TIMEOUT_SECS)
            .map_err(|e| ReminderError::Config(format!("SEND_TIMEOUT_SECS: {e}")))?;

        let transport = match get("SMTP_HOST") {
            Some(host) => {
                let port = match get("SMTP_PORT") {
                    Some(p) => p
                        .parse::<u16>()
                        .map_err(|e| ReminderError::Config(format!("SMTP_PORT: {e}")))?,
                    None => DEFAULT_SMTP_PORT,
                };
                MailTransportConfig::Smtp {
                    host,
                    port,
                    user: get("SMTP_USER"),
                    pass: get("SMTP_PASS"),
                }
            }
            None => MailTransportConfig::Sendmail {
                path: get("SENDMAIL_PATH"),
            },
        };

        Ok(AppConfig {
            store: StoreConfig {
                base_url,
                service_key,
                timeout: store_timeout,
            },
            mail: MailConfig {
                sender,
                transport,
                send_timeout,
            },
        })
    }
}

fn parse_secs(value: Option<String>, default: u64) -> Result<Duration, std::num::ParseIntError> {
    match value {
        Some(v) => Ok(Duration::from_secs(v.trim().parse()?)),
        None => Ok(Duration::from_secs(default)),
    }
}
