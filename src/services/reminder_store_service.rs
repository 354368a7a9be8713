//! services/reminder_store_service.rs
//! Cliente REST (PostgREST) de la tabla `reminders`.

use reqwest::{header::CONTENT_TYPE, Client, RequestBuilder};

use crate::{
    config::app_config::StoreConfig,
    error::{ReminderError, ReminderResult},
    models::reminder_model::{Reminder, ReminderStatus, StatusUpdate},
};

#[derive(Clone, Debug)]
pub struct ReminderStoreService {
    http_client: Client,
    base_url: String,
    service_key: String,
}

impl ReminderStoreService {
    pub fn new(config: &StoreConfig) -> ReminderResult<Self> {
        let http_client = Client::builder().timeout(config.timeout).build()?;

        Ok(Self {
            http_client,
            base_url: config.base_url.clone(),
            service_key: config.service_key.clone(),
        })
    }

    fn endpoint(&self) -> String {
        format!("{}/rest/v1/reminders", self.base_url)
    }

    /// Ambos headers llevan la misma credencial (apikey + Bearer)
    fn with_auth(&self, req: RequestBuilder, prefer: &str) -> RequestBuilder {
        req.header("apikey", &self.service_key)
            .bearer_auth(&self.service_key)
            .header(CONTENT_TYPE, "application/json")
            .header("Prefer", prefer)
    }

    /// Todos los recordatorios con status = scheduled.
    /// Error de red o de JSON => error para toda la corrida.
    pub async fn fetch_scheduled(&self) -> ReminderResult<Vec<Reminder>> {
        let url = format!("{}?select=*&status=eq.scheduled", self.endpoint());
        log::info!("(fetch_scheduled) Consultando recordatorios programados...");

        let resp = self
            .with_auth(self.http_client.get(&url), "return=representation")
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let body_txt = resp.text().await.unwrap_or_default();
            return Err(ReminderError::Transport(format!(
                "store returned {status}: {body_txt}"
            )));
        }

        let body = resp.text().await?;
        let reminders = decode_reminders(&body)?;
        log::info!(
            "(fetch_scheduled) {} recordatorios en estado scheduled",
            reminders.len()
        );
        Ok(reminders)
    }

    /// PATCH parcial: solo cambia `status` del registro con ese id.
    pub async fn update_status(&self, id: &str, status: ReminderStatus) -> ReminderResult<()> {
        let url = format!("{}?id=eq.{}", self.endpoint(), urlencoding::encode(id));

        let resp = self
            .with_auth(self.http_client.patch(&url), "return=minimal")
            .json(&StatusUpdate { status })
            .send()
            .await?;

        let code = resp.status();
        if !code.is_success() {
            let body_txt = resp.text().await.unwrap_or_default();
            return Err(ReminderError::Transport(format!(
                "status update for {id} returned {code}: {body_txt}"
            )));
        }

        log::debug!("(update_status) Recordatorio {} -> {}", id, status);
        Ok(())
    }
}

/// El cuerpo tiene que ser un array JSON; los elementos que no encajan en
/// `Reminder` se saltan (con log) sin tirar el resto.
pub fn decode_reminders(body: &str) -> ReminderResult<Vec<Reminder>> {
    let values: Vec<serde_json::Value> =
        serde_json::from_str(body).map_err(|e| ReminderError::Decode(e.to_string()))?;

    let mut reminders = Vec::with_capacity(values.len());
    for value in values {
        let id = value
            .get("id")
            .and_then(|v| v.as_str())
            .unwrap_or("<unknown>")
            .to_string();

        match serde_json::from_value::<Reminder>(value) {
            Ok(reminder) if reminder.status == ReminderStatus::Scheduled => {
                reminders.push(reminder)
            }
            Ok(reminder) => {
                log::warn!(
                    "(decode_reminders) Ignorando recordatorio {} con status '{}'",
                    reminder.id,
                    reminder.status
                );
            }
            Err(e) => {
                let err = ReminderError::record(id, e.to_string());
                log::error!("(decode_reminders) {}", err);
            }
        }
    }

    Ok(reminders)
}
