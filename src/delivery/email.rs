//! SMTP email sink.
//!
//! Sends the plain-text table as the message body over a STARTTLS relay.

use async_trait::async_trait;
use lettre::message::{Mailbox, header::ContentType};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};

use crate::delivery::ReportSink;
use crate::error::{AppError, Result};
use crate::models::{EmailConfig, Report};
use crate::pipeline::render_text;

const SINK: &str = "email";

/// Email delivery through an authenticated SMTP relay.
#[derive(Debug, Clone)]
pub struct EmailSink {
    config: EmailConfig,
    from: Mailbox,
    to: Vec<Mailbox>,
}

impl EmailSink {
    /// Create a sink, validating sender and recipient addresses up front.
    pub fn from_config(config: &EmailConfig) -> Result<Self> {
        if config.smtp_server.trim().is_empty() {
            return Err(AppError::config("email.smtp_server is empty"));
        }

        let from = parse_mailbox(&config.from)?;
        let to = config
            .to
            .iter()
            .map(|addr| parse_mailbox(addr))
            .collect::<Result<Vec<_>>>()?;
        if to.is_empty() {
            return Err(AppError::config("email.to has no recipients"));
        }

        Ok(Self {
            config: config.clone(),
            from,
            to,
        })
    }

    /// Compose the report message.
    pub fn build_message(&self, report: &Report) -> Result<Message> {
        let mut builder = Message::builder()
            .from(self.from.clone())
            .subject(&self.config.subject)
            .header(ContentType::TEXT_PLAIN);
        for recipient in &self.to {
            builder = builder.to(recipient.clone());
        }

        builder
            .body(render_text(report))
            .map_err(|e| AppError::delivery(SINK, e))
    }

    fn transport(&self) -> Result<AsyncSmtpTransport<Tokio1Executor>> {
        let mut builder =
            AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&self.config.smtp_server)
                .map_err(|e| AppError::delivery(SINK, e))?
                .port(self.config.smtp_port);

        match self.config.resolve_password() {
            Some(password) => {
                builder = builder.credentials(Credentials::new(
                    self.config.username().to_string(),
                    password,
                ));
            }
            None => log::warn!("No SMTP password configured; sending without authentication"),
        }

        Ok(builder.build())
    }
}

fn parse_mailbox(address: &str) -> Result<Mailbox> {
    address
        .parse()
        .map_err(|e| AppError::config(format!("Invalid email address {address:?}: {e}")))
}

#[async_trait]
impl ReportSink for EmailSink {
    fn name(&self) -> &str {
        SINK
    }

    async fn deliver(&self, report: &Report) -> Result<()> {
        let message = self.build_message(report)?;
        self.transport()?
            .send(message)
            .await
            .map_err(|e| AppError::delivery(SINK, e))?;

        log::info!(
            "Report emailed to {} recipient(s) via {}:{}",
            self.to.len(),
            self.config.smtp_server,
            self.config.smtp_port
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{DeviceRow, Severity};

    fn email_config() -> EmailConfig {
        EmailConfig {
            enabled: true,
            smtp_server: "127.0.0.1".to_string(),
            smtp_port: 1,
            from: "monitor@example.org".to_string(),
            to: vec!["ops@example.org".to_string(), "lab@example.org".to_string()],
            password: Some("secret".to_string()),
            password_env: None,
            ..EmailConfig::default()
        }
    }

    fn sample_report() -> Report {
        Report::new(
            Report::now(),
            vec![DeviceRow {
                severity: Severity::Low,
                name: "lp4".to_string(),
                address: "10.0.0.4".to_string(),
                tray_status: "Tray1: Paper Available".to_string(),
                toner_levels: "8%".to_string(),
            }],
        )
    }

    #[test]
    fn test_build_message() {
        let sink = EmailSink::from_config(&email_config()).unwrap();
        let message = sink.build_message(&sample_report()).unwrap();
        let raw = String::from_utf8(message.formatted()).unwrap();

        assert!(raw.contains("From: monitor@example.org"));
        assert!(raw.contains("ops@example.org"));
        assert!(raw.contains("lab@example.org"));
        assert!(raw.contains("Printer Status Report - "));
        assert!(raw.contains("lp4"));
    }

    #[test]
    fn test_rejects_invalid_addresses() {
        let mut config = email_config();
        config.to = vec!["not an address".to_string()];
        assert!(EmailSink::from_config(&config).is_err());

        let mut config = email_config();
        config.to.clear();
        assert!(EmailSink::from_config(&config).is_err());

        let mut config = email_config();
        config.smtp_server.clear();
        assert!(EmailSink::from_config(&config).is_err());
    }

    #[tokio::test]
    async fn test_unreachable_server_is_an_error() {
        let sink = EmailSink::from_config(&email_config()).unwrap();
        let result = sink.deliver(&sample_report()).await;
        assert!(matches!(result, Err(AppError::Delivery { .. })));
    }
}
