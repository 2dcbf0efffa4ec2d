//! Email service for transactional emails.
//!
//! Supports multiple email providers:
//! - `console`: Logs emails to console (development)
//! - `smtp`: Sends via SMTP server (lettre)
//! - `sendgrid`: Uses SendGrid API

use std::sync::Arc;

use lettre::message::{Mailbox, MultiPart};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use thiserror::Error;
use tracing::{debug, error, info};

use crate::config::EmailConfig;

const SENDGRID_SEND_URL: &str = "https://api.sendgrid.com/v3/mail/send";

/// Errors that can occur during email operations.
#[derive(Debug, Error)]
pub enum EmailError {
    #[error("Email service not configured: {0}")]
    NotConfigured(String),

    #[error("Invalid email address: {0}")]
    InvalidAddress(String),

    #[error("Failed to send email: {0}")]
    SendFailed(String),

    #[error("Provider error: {0}")]
    ProviderError(String),
}

/// Email message to be sent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailMessage {
    /// Recipient email address
    pub to: String,
    /// Recipient name (optional)
    pub to_name: Option<String>,
    /// Address replies should go to (optional)
    pub reply_to: Option<String>,
    /// Email subject
    pub subject: String,
    /// Plain text body
    pub body_text: String,
    /// HTML body (optional)
    pub body_html: Option<String>,
}

/// Email service for sending transactional emails.
#[derive(Clone)]
pub struct EmailService {
    config: Arc<EmailConfig>,
    smtp: Option<Arc<AsyncSmtpTransport<Tokio1Executor>>>,
    http: reqwest::Client,
}

impl EmailService {
    /// Creates a new EmailService with the given configuration.
    ///
    /// The SMTP transport is built up front so a bad host fails at startup.
    pub fn new(config: EmailConfig) -> Result<Self, EmailError> {
        let smtp = if config.enabled && config.provider == "smtp" {
            Some(Arc::new(build_smtp_transport(&config)?))
        } else {
            None
        };

        Ok(Self {
            config: Arc::new(config),
            smtp,
            http: reqwest::Client::new(),
        })
    }

    /// Check if email service is enabled.
    pub fn is_enabled(&self) -> bool {
        self.config.enabled
    }

    /// Address that receives organiser copies.
    pub fn organizer_email(&self) -> &str {
        &self.config.organizer_email
    }

    /// Send an email message.
    pub async fn send(&self, message: EmailMessage) -> Result<(), EmailError> {
        if !self.config.enabled {
            debug!(
                to = %message.to,
                subject = %message.subject,
                "Email service disabled, skipping send"
            );
            return Ok(());
        }

        match self.config.provider.as_str() {
            "console" => self.send_console(message).await,
            "smtp" => self.send_smtp(message).await,
            "sendgrid" => self.send_sendgrid(message).await,
            provider => {
                error!(provider = %provider, "Unknown email provider");
                Err(EmailError::NotConfigured(format!(
                    "unknown provider '{}'",
                    provider
                )))
            }
        }
    }

    /// Console provider - logs email to console (for development).
    async fn send_console(&self, message: EmailMessage) -> Result<(), EmailError> {
        info!(
            to = %message.to,
            to_name = ?message.to_name,
            reply_to = ?message.reply_to,
            subject = %message.subject,
            from = %self.config.sender_email,
            "Email (console provider)"
        );
        debug!(body_text = %message.body_text, "Email body (plain text)");

        Ok(())
    }

    /// SMTP provider - sends via the configured relay.
    async fn send_smtp(&self, message: EmailMessage) -> Result<(), EmailError> {
        let transport = self
            .smtp
            .as_ref()
            .ok_or_else(|| EmailError::NotConfigured("smtp transport missing".to_string()))?;

        let email = self.build_mime(&message)?;
        transport
            .send(email)
            .await
            .map_err(|e| EmailError::SendFailed(format!("SMTP send failed: {}", e)))?;

        info!(
            to = %message.to,
            subject = %message.subject,
            smtp_host = %self.config.smtp_host,
            "Email sent via SMTP"
        );
        Ok(())
    }

    fn build_mime(&self, message: &EmailMessage) -> Result<Message, EmailError> {
        let from = mailbox(Some(&self.config.sender_name), &self.config.sender_email)?;
        let to = mailbox(message.to_name.as_deref(), &message.to)?;

        let mut builder = Message::builder()
            .from(from)
            .to(to)
            .subject(message.subject.clone());
        if let Some(reply_to) = &message.reply_to {
            builder = builder.reply_to(mailbox(None, reply_to)?);
        }

        let result = match &message.body_html {
            Some(html) => builder.multipart(MultiPart::alternative_plain_html(
                message.body_text.clone(),
                html.clone(),
            )),
            None => builder.body(message.body_text.clone()),
        };
        result.map_err(|e| EmailError::SendFailed(format!("Failed to build message: {}", e)))
    }

    /// SendGrid provider - sends via SendGrid API.
    async fn send_sendgrid(&self, message: EmailMessage) -> Result<(), EmailError> {
        if self.config.sendgrid_api_key.is_empty() {
            return Err(EmailError::NotConfigured(
                "sendgrid_api_key is empty".to_string(),
            ));
        }

        let body = sendgrid_body(&self.config, &message);

        let response = self
            .http
            .post(SENDGRID_SEND_URL)
            .bearer_auth(&self.config.sendgrid_api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| EmailError::SendFailed(format!("SendGrid request failed: {}", e)))?;

        if response.status().is_success() {
            info!(
                to = %message.to,
                subject = %message.subject,
                "Email sent via SendGrid"
            );
            Ok(())
        } else {
            let status = response.status();
            let error_body = response.text().await.unwrap_or_default();
            error!(
                status = %status,
                error = %error_body,
                "SendGrid API error"
            );
            Err(EmailError::ProviderError(format!(
                "SendGrid returned {}: {}",
                status, error_body
            )))
        }
    }
}

fn build_smtp_transport(
    config: &EmailConfig,
) -> Result<AsyncSmtpTransport<Tokio1Executor>, EmailError> {
    if config.smtp_host.is_empty() {
        return Err(EmailError::NotConfigured("smtp_host is empty".to_string()));
    }

    let builder = if config.smtp_use_tls {
        AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.smtp_host)
            .map_err(|e| EmailError::NotConfigured(format!("SMTP relay: {}", e)))?
    } else {
        AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(&config.smtp_host)
    };

    let mut builder = builder.port(config.smtp_port);
    if !config.smtp_username.is_empty() {
        builder = builder.credentials(Credentials::new(
            config.smtp_username.clone(),
            config.smtp_password.clone(),
        ));
    }

    Ok(builder.build())
}

fn mailbox(name: Option<&str>, address: &str) -> Result<Mailbox, EmailError> {
    let address = address
        .parse()
        .map_err(|_| EmailError::InvalidAddress(address.to_string()))?;
    Ok(Mailbox::new(name.map(str::to_string), address))
}

fn sendgrid_body(config: &EmailConfig, message: &EmailMessage) -> serde_json::Value {
    let mut to = serde_json::json!({ "email": message.to });
    if let Some(name) = &message.to_name {
        to["name"] = serde_json::json!(name);
    }

    let mut content = vec![serde_json::json!({
        "type": "text/plain",
        "value": message.body_text
    })];
    if let Some(html) = &message.body_html {
        content.push(serde_json::json!({
            "type": "text/html",
            "value": html
        }));
    }

    let mut body = serde_json::json!({
        "personalizations": [{ "to": [to] }],
        "from": {
            "email": config.sender_email,
            "name": config.sender_name
        },
        "subject": message.subject,
        "content": content
    });
    if let Some(reply_to) = &message.reply_to {
        body["reply_to"] = serde_json::json!({ "email": reply_to });
    }
    body
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> EmailConfig {
        EmailConfig {
            enabled: true,
            provider: "console".to_string(),
            sender_email: "noreply@example.com".to_string(),
            sender_name: "Poznej & Hraj".to_string(),
            organizer_email: "info@example.com".to_string(),
            ..EmailConfig::default()
        }
    }

    fn message() -> EmailMessage {
        EmailMessage {
            to: "jana@example.com".to_string(),
            to_name: Some("Jana".to_string()),
            reply_to: None,
            subject: "Rezervace".to_string(),
            body_text: "Dobrý den".to_string(),
            body_html: Some("<p>Dobrý den</p>".to_string()),
        }
    }

    #[test]
    fn test_email_service_creation() {
        let service = EmailService::new(test_config()).unwrap();
        assert!(service.is_enabled());
        assert_eq!(service.organizer_email(), "info@example.com");
    }

    #[test]
    fn test_smtp_without_host_fails_at_startup() {
        let mut config = test_config();
        config.provider = "smtp".to_string();
        assert!(matches!(
            EmailService::new(config),
            Err(EmailError::NotConfigured(_))
        ));
    }

    #[tokio::test]
    async fn test_send_console_email() {
        let service = EmailService::new(test_config()).unwrap();
        assert!(service.send(message()).await.is_ok());
    }

    #[tokio::test]
    async fn test_send_disabled_silently_succeeds() {
        let mut config = test_config();
        config.enabled = false;
        config.provider = "sendgrid".to_string();
        let service = EmailService::new(config).unwrap();
        assert!(service.send(message()).await.is_ok());
    }

    #[tokio::test]
    async fn test_sendgrid_without_key_fails() {
        let mut config = test_config();
        config.provider = "sendgrid".to_string();
        let service = EmailService::new(config).unwrap();
        assert!(matches!(
            service.send(message()).await,
            Err(EmailError::NotConfigured(_))
        ));
    }

    #[tokio::test]
    async fn test_unknown_provider_fails() {
        let mut config = test_config();
        config.provider = "pigeon".to_string();
        let service = EmailService::new(config).unwrap();
        assert!(service.send(message()).await.is_err());
    }

    #[test]
    fn test_build_mime_with_reply_to() {
        let service = EmailService::new(test_config()).unwrap();
        let mut msg = message();
        msg.reply_to = Some("author@example.com".to_string());

        let mime = service.build_mime(&msg).unwrap();
        let raw = String::from_utf8(mime.formatted()).unwrap();
        assert!(raw.contains("Reply-To: author@example.com"));
        assert!(raw.contains("jana@example.com"));
    }

    #[test]
    fn test_build_mime_rejects_bad_address() {
        let service = EmailService::new(test_config()).unwrap();
        let mut msg = message();
        msg.to = "not an address".to_string();
        assert!(matches!(
            service.build_mime(&msg),
            Err(EmailError::InvalidAddress(_))
        ));
    }

    #[test]
    fn test_sendgrid_body_shape() {
        let mut msg = message();
        msg.reply_to = Some("author@example.com".to_string());
        let body = sendgrid_body(&test_config(), &msg);

        assert_eq!(body["personalizations"][0]["to"][0]["email"], "jana@example.com");
        assert_eq!(body["personalizations"][0]["to"][0]["name"], "Jana");
        assert_eq!(body["content"][0]["type"], "text/plain");
        assert_eq!(body["content"][1]["type"], "text/html");
        assert_eq!(body["reply_to"]["email"], "author@example.com");
    }
}
