//! services/reminder_service.rs
//! Una corrida completa: fetch -> filtro de vencidos -> envío -> status.

use std::sync::Arc;

use uuid::Uuid;

use crate::{
    clock::Clock,
    error::ReminderResult,
    models::reminder_model::ReminderStatus,
    services::{
        due_filter_service::select_due, notification_service::NotificationService,
        reminder_store_service::ReminderStoreService,
    },
};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RunSummary {
    pub run_id: String,
    pub fetched: usize,
    pub due: usize,
    pub not_due: usize,
    pub skipped: usize,
    pub sent: usize,
    pub failed: usize,
    pub status_write_failures: usize,
}

#[derive(Clone)]
pub struct ReminderService {
    store: ReminderStoreService,
    notifier: NotificationService,
    clock: Arc<dyn Clock>,
}

impl ReminderService {
    pub fn new(
        store: ReminderStoreService,
        notifier: NotificationService,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            store,
            notifier,
            clock,
        }
    }

    /// Solo el fetch inicial puede fallar la corrida. Todo lo demás se
    /// loguea y se refleja en el resumen.
    pub async fn run(&self) -> ReminderResult<RunSummary> {
        let run_id = Uuid::new_v4().to_string();
        // Un único "ahora" para todo el lote
        let now = self.clock.now();
        log::info!(
            "(run) Iniciando corrida {} (now={})",
            run_id,
            now.to_rfc3339()
        );

        let reminders = self.store.fetch_scheduled().await?;
        let fetched = reminders.len();
        let selection = select_due(reminders, now);

        let mut summary = RunSummary {
            run_id,
            fetched,
            due: selection.due.len(),
            not_due: selection.not_due,
            skipped: selection.skipped,
            ..Default::default()
        };

        for reminder in &selection.due {
            let report = self.notifier.dispatch(reminder).await;
            let outcome = report.outcome();

            match outcome {
                ReminderStatus::Sent => {
                    summary.sent += 1;
                    log::info!("(run) Recordatorio {} procesado con éxito", reminder.id);
                }
                _ => {
                    summary.failed += 1;
                    let failed: Vec<String> = report
                        .recipients
                        .iter()
                        .filter(|r| !r.delivered)
                        .map(|r| format!("{} ({})", r.address, r.error.as_deref().unwrap_or("?")))
                        .collect();
                    log::warn!(
                        "(run) Recordatorio {} procesado con fallas ({} de {} destinatarios fallaron: {:?}; error={:?})",
                        report.reminder_id,
                        report.failed_recipients(),
                        report.recipients.len(),
                        failed,
                        report.error
                    );
                }
            }

            if let Err(e) = self.store.update_status(&reminder.id, outcome).await {
                summary.status_write_failures += 1;
                log::error!(
                    "(run) No se pudo guardar status '{}' del recordatorio {}: {}",
                    outcome,
                    reminder.id,
                    e
                );
            }
        }

        log::info!(
            "(run) Corrida {} finalizada: fetched={}, due={}, not_due={}, skipped={}, sent={}, failed={}, status_write_failures={}",
            summary.run_id,
            summary.fetched,
            summary.due,
            summary.not_due,
            summary.skipped,
            summary.sent,
            summary.failed,
            summary.status_write_failures
        );
        Ok(summary)
    }
}
