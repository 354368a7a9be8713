use std::{process::ExitCode, sync::Arc};

use anyhow::{Context, Result};
use dotenv::dotenv;

use crate::clock::SystemClock;
use crate::config::app_config::AppConfig;
use crate::logger::init_logger;
use crate::services::email_service::EmailService;
use crate::services::notification_service::NotificationService;
use crate::services::reminder_service::{ReminderService, RunSummary};
use crate::services::reminder_store_service::ReminderStoreService;

mod clock;
mod config;
mod error;
mod logger;
mod models;
mod services;
#[cfg(test)]
mod tests;

async fn run_once() -> Result<RunSummary> {
    let config = AppConfig::from_env().context("Failed to load configuration")?;

    let store = ReminderStoreService::new(&config.store).context("Failed to build store client")?;
    let email_service = EmailService::new(&config.mail).context("Failed to build mail transport")?;
    let notifier = NotificationService::new(Arc::new(email_service), config.mail.sender.clone());

    let service = ReminderService::new(store, notifier, Arc::new(SystemClock));
    service
        .run()
        .await
        .context("Error processing reminders")
}

// Una corrida por invocación; el cron (o similar) se encarga de repetir.
#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    dotenv().ok(); // Cargar .env al inicio
    init_logger();

    match run_once().await {
        Ok(summary) => {
            if summary.failed > 0 || summary.status_write_failures > 0 {
                log::warn!(
                    "Corrida {} terminó con {} fallidos y {} status sin guardar",
                    summary.run_id,
                    summary.failed,
                    summary.status_write_failures
                );
            }
            ExitCode::SUCCESS
        }
        Err(e) => {
            log::error!("Error fatal: {:?}", e);
            ExitCode::FAILURE
        }
    }
}
