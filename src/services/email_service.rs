//! services/email_service.rs
//! Transporte de correo: SMTP (relay con TLS) o sendmail local.

use std::time::Duration;

use async_trait::async_trait;
use lettre::{
    message::{header::ContentType, Mailbox},
    transport::smtp::{
        authentication::Credentials,
        client::{Tls, TlsParameters},
    },
    AsyncSendmailTransport, AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
};

use crate::{
    config::app_config::{MailConfig, MailTransportConfig},
    error::{ReminderError, ReminderResult},
    models::email_model::OutgoingEmail,
};

/// Un envío por llamada, sin reintentos.
#[async_trait]
pub trait MailTransport: Send + Sync {
    async fn send(&self, email: &OutgoingEmail) -> ReminderResult<()>;
}

enum Mailer {
    Smtp(AsyncSmtpTransport<Tokio1Executor>),
    Sendmail(AsyncSendmailTransport<Tokio1Executor>),
}

pub struct EmailService {
    mailer: Mailer,
    send_timeout: Duration,
}

impl EmailService {
    pub fn new(config: &MailConfig) -> ReminderResult<Self> {
        let mailer = match &config.transport {
            MailTransportConfig::Smtp {
                host,
                port,
                user,
                pass,
            } => {
                let tls_params = TlsParameters::new(host.clone())
                    .map_err(|e| ReminderError::Config(format!("SMTP TLS: {e}")))?;
                let mut builder = AsyncSmtpTransport::<Tokio1Executor>::relay(host)
                    .map_err(|e| ReminderError::Config(format!("SMTP relay {host}: {e}")))?
                    .port(*port)
                    .tls(Tls::Required(tls_params));

                if let (Some(user), Some(pass)) = (user, pass) {
                    builder = builder.credentials(Credentials::new(user.clone(), pass.clone()));
                }

                log::info!("(EmailService::new) SMTP host={}, port={}", host, port);
                Mailer::Smtp(builder.build())
            }
            MailTransportConfig::Sendmail { path } => {
                log::info!("(EmailService::new) Usando sendmail ({:?})", path);
                match path {
                    Some(cmd) => Mailer::Sendmail(
                        AsyncSendmailTransport::<Tokio1Executor>::new_with_command(cmd),
                    ),
                    None => Mailer::Sendmail(AsyncSendmailTransport::<Tokio1Executor>::new()),
                }
            }
        };

        Ok(Self {
            mailer,
            send_timeout: config.send_timeout,
        })
    }
}

pub fn build_message(email: &OutgoingEmail) -> ReminderResult<Message> {
    let to: Mailbox = email
        .to
        .parse()
        .map_err(|e| ReminderError::delivery(&email.to, format!("invalid recipient address: {e}")))?;

    Message::builder()
        .from(email.from.clone())
        .to(to)
        .subject(&email.subject)
        .header(ContentType::TEXT_HTML)
        .body(email.html_body.clone())
        .map_err(|e| ReminderError::delivery(&email.to, e.to_string()))
}

#[async_trait]
impl MailTransport for EmailService {
    async fn send(&self, email: &OutgoingEmail) -> ReminderResult<()> {
        let message = build_message(email)?;

        let result = match &self.mailer {
            Mailer::Smtp(m) => tokio::time::timeout(self.send_timeout, m.send(message))
                .await
                .map(|r| r.map(|_| ()).map_err(|e| e.to_string())),
            Mailer::Sendmail(m) => tokio::time::timeout(self.send_timeout, m.send(message))
                .await
                .map(|r| r.map_err(|e| e.to_string())),
        };

        match result {
            Ok(Ok(())) => Ok(()),
            Ok(Err(e)) => Err(ReminderError::delivery(&email.to, e)),
            Err(_) => Err(ReminderError::delivery(
                &email.to,
                format!("timed out after {:?}", self.send_timeout),
            )),
        }
    }
}
