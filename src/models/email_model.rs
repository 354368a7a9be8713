//! models/email_model.rs

use lettre::message::Mailbox;

/// Un correo ya renderizado, listo para un único destinatario.
#[derive(Debug, Clone, PartialEq)]
pub struct OutgoingEmail {
    pub from: Mailbox,
    pub to: String,
    pub subject: String,
    pub html_body: String,
}

/// Asunto + cuerpo HTML de la notificación de un recordatorio
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedNotification {
    pub subject: String,
    pub html_body: String,
}
