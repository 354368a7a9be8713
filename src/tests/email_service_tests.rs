//! tests/email_service_tests.rs
//! Transporte real (lettre) con un sendmail falso escrito como script.

#[cfg(test)]
mod tests {
    use std::fs;
    use std::os::unix::fs::PermissionsExt;
    use std::path::Path;
    use std::time::{Duration, Instant};

    use tempfile::TempDir;

    use crate::config::app_config::{MailConfig, MailTransportConfig};
    use crate::error::ReminderError;
    use crate::models::email_model::OutgoingEmail;
    use crate::services::email_service::{EmailService, MailTransport};

    // Script ejecutable que hace de sendmail; lee el mensaje de stdin.
    fn fake_sendmail(dir: &Path, body: &str) -> String {
        let script = dir.join("sendmail");
        fs::write(&script, format!("#!/bin/sh\ncat > /dev/null\n{body}\n"))
            .expect("No se pudo escribir el script");
        fs::set_permissions(&script, fs::Permissions::from_mode(0o755))
            .expect("No se pudo dar permisos al script");
        script.to_string_lossy().to_string()
    }

    fn service(script: String, send_timeout: Duration) -> EmailService {
        let config = MailConfig {
            sender: "Reminders <noreply@example.com>".parse().unwrap(),
            transport: MailTransportConfig::Sendmail { path: Some(script) },
            send_timeout,
        };
        EmailService::new(&config).expect("EmailService")
    }

    fn email() -> OutgoingEmail {
        OutgoingEmail {
            from: "Reminders <noreply@example.com>".parse().unwrap(),
            to: "x@test.com".to_string(),
            subject: "Reminder: Dentist".to_string(),
            html_body: "<p>hi</p>".to_string(),
        }
    }

    #[tokio::test]
    async fn test_sendmail_success() {
        let dir = TempDir::new().unwrap();
        let service = service(fake_sendmail(dir.path(), "exit 0"), Duration::from_secs(10));

        service.send(&email()).await.expect("envío por sendmail");
    }

    #[tokio::test]
    async fn test_sendmail_nonzero_exit_is_delivery_error() {
        let dir = TempDir::new().unwrap();
        let service = service(fake_sendmail(dir.path(), "exit 1"), Duration::from_secs(10));

        match service.send(&email()).await {
            Err(ReminderError::Delivery { recipient, .. }) => assert_eq!(recipient, "x@test.com"),
            other => panic!("se esperaba DeliveryError, llegó {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_send_timeout_is_delivery_error() {
        let dir = TempDir::new().unwrap();
        let service = service(fake_sendmail(dir.path(), "sleep 3"), Duration::from_millis(200));

        let start = Instant::now();
        let result = service.send(&email()).await;

        match result {
            Err(ReminderError::Delivery { reason, .. }) => assert!(reason.contains("timed out")),
            other => panic!("se esperaba timeout, llegó {:?}", other),
        }
        assert!(start.elapsed() < Duration::from_secs(2), "no respetó el timeout");
    }
}
