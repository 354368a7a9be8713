//! services/notification_service.rs
//! Renderiza la notificación de un recordatorio y la envía a cada destinatario.

use std::sync::Arc;

use askama::Template;
use lettre::message::Mailbox;

use crate::{
    error::{ReminderError, ReminderResult},
    models::{
        email_model::{OutgoingEmail, RenderedNotification},
        reminder_model::{DeliveryReport, RecipientDelivery, Reminder},
    },
    services::{due_filter_service::local_datetime, email_service::MailTransport},
};

/// Cuerpo HTML (templates/reminder_email.html). Askama escapa el contenido.
#[derive(Template)]
#[template(path = "reminder_email.html")]
struct ReminderEmailTemplate<'a> {
    title: &'a str,
    reminder_type: &'a str,
    date: String,
    time: String,
    timezone: &'a str,
}

#[derive(Clone)]
pub struct NotificationService {
    mailer: Arc<dyn MailTransport>,
    from: Mailbox,
}

impl NotificationService {
    pub fn new(mailer: Arc<dyn MailTransport>, from: Mailbox) -> Self {
        Self { mailer, from }
    }

    /// Fecha y hora se muestran en la zona del recordatorio, no en UTC.
    pub fn render(&self, reminder: &Reminder) -> ReminderResult<RenderedNotification> {
        let local = local_datetime(reminder)?;

        let template = ReminderEmailTemplate {
            title: &reminder.title,
            reminder_type: reminder.reminder_type.as_str(),
            date: local.format("%B %-d, %Y").to_string(),
            time: local.format("%-I:%M %p").to_string(),
            timezone: &reminder.timezone,
        };
        let html_body = template
            .render()
            .map_err(|e| ReminderError::record(&reminder.id, format!("template: {e}")))?;

        Ok(RenderedNotification {
            subject: format!("Reminder: {}", reminder.title),
            html_body,
        })
    }

    /// Envía a todos los destinatarios en orden. Un fallo no corta al resto;
    /// el resultado agregado queda en el `DeliveryReport`.
    pub async fn dispatch(&self, reminder: &Reminder) -> DeliveryReport {
        let rendered = match self.render(reminder) {
            Ok(r) => r,
            Err(e) => {
                log::error!(
                    "(dispatch) Error procesando recordatorio {}: {}",
                    reminder.id,
                    e
                );
                return DeliveryReport::failed(&reminder.id, e.to_string());
            }
        };

        log::debug!(
            "(dispatch) Recordatorio {} (user={:?}) -> {} destinatarios",
            reminder.id,
            reminder.user_id,
            reminder.recipients.len()
        );

        let mut recipients = Vec::with_capacity(reminder.recipients.len());
        for address in &reminder.recipients {
            let email = OutgoingEmail {
                from: self.from.clone(),
                to: address.clone(),
                subject: rendered.subject.clone(),
                html_body: rendered.html_body.clone(),
            };

            let delivery = match self.mailer.send(&email).await {
                Ok(()) => {
                    log::debug!("(dispatch) -> Correo enviado a {}", address);
                    RecipientDelivery {
                        address: address.clone(),
                        delivered: true,
                        error: None,
                    }
                }
                Err(e) => {
                    log::error!("(dispatch) Falló el envío a: {} ({})", address, e);
                    RecipientDelivery {
                        address: address.clone(),
                        delivered: false,
                        error: Some(e.to_string()),
                    }
                }
            };
            recipients.push(delivery);
        }

        DeliveryReport {
            reminder_id: reminder.id.clone(),
            recipients,
            error: None,
        }
    }
}
