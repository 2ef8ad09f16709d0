//! Email service for sending the account verification message.
//!
//! Uses SMTP via lettre for delivery with Askama HTML templates. Delivery
//! is dispatched on a background task so a slow or failing mail relay never
//! blocks the registration response; failures are retried a bounded number
//! of times and then logged.

use std::time::Duration;

use askama::Template;
use lettre::{
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
    message::{MultiPart, SinglePart, header::ContentType},
    transport::smtp::{Error as SmtpError, authentication::Credentials},
};
use secrecy::ExposeSecret;
use thiserror::Error;

use crate::config::MailConfig;

/// Delivery attempts before a message is dropped.
const MAX_SEND_ATTEMPTS: u32 = 3;

/// Pause between delivery attempts.
const RETRY_DELAY: Duration = Duration::from_secs(5);

/// HTML template for the account verification email.
#[derive(Template)]
#[template(path = "email/confirm_account.html")]
struct ConfirmAccountEmailHtml<'a> {
    name: &'a str,
    link: &'a str,
}

/// Plain text template for the account verification email.
#[derive(Template)]
#[template(path = "email/confirm_account.txt")]
struct ConfirmAccountEmailText<'a> {
    name: &'a str,
    link: &'a str,
}

/// Errors that can occur when sending email.
#[derive(Debug, Error)]
pub enum EmailError {
    /// SMTP transport error.
    #[error("SMTP error: {0}")]
    Smtp(#[from] SmtpError),

    /// Failed to build email message.
    #[error("Failed to build message: {0}")]
    MessageBuild(#[from] lettre::error::Error),

    /// Invalid email address.
    #[error("Invalid email address: {0}")]
    InvalidAddress(String),

    /// Template rendering error.
    #[error("Template error: {0}")]
    Template(#[from] askama::Error),
}

/// Email service for sending transactional emails.
#[derive(Clone)]
pub struct EmailService {
    mailer: AsyncSmtpTransport<Tokio1Executor>,
    from_address: String,
}

impl EmailService {
    /// Create a new email service from configuration.
    ///
    /// # Errors
    ///
    /// Returns error if the SMTP relay address is invalid.
    pub fn new(config: &MailConfig) -> Result<Self, SmtpError> {
        let credentials = Credentials::new(
            config.smtp_username.clone(),
            config.smtp_password.expose_secret().to_string(),
        );

        let mailer = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.smtp_host)?
            .port(config.smtp_port)
            .credentials(credentials)
            .build();

        Ok(Self {
            mailer,
            from_address: config.from_address.clone(),
        })
    }

    /// Send the account verification email with the confirmation link.
    ///
    /// # Errors
    ///
    /// Returns error if the email fails to send or a template fails to
    /// render.
    pub async fn send_verification_email(
        &self,
        to: &str,
        name: &str,
        link: &str,
    ) -> Result<(), EmailError> {
        let html = ConfirmAccountEmailHtml { name, link }.render()?;
        let text = ConfirmAccountEmailText { name, link }.render()?;

        self.send_multipart_email(to, "Confirma tu cuenta en Farmacia Santa Rosa", &text, &html)
            .await
    }

    /// Dispatch the verification email on a background task with retries.
    ///
    /// Registration has already committed when this is called; delivery
    /// failures are logged, never surfaced to the registering customer.
    pub fn send_verification_email_background(&self, to: String, name: String, link: String) {
        let service = self.clone();

        tokio::spawn(async move {
            for attempt in 1..=MAX_SEND_ATTEMPTS {
                match service.send_verification_email(&to, &name, &link).await {
                    Ok(()) => return,
                    Err(e) if attempt < MAX_SEND_ATTEMPTS => {
                        tracing::warn!(
                            to = %to,
                            attempt,
                            error = %e,
                            "verification email delivery failed, retrying"
                        );
                        tokio::time::sleep(RETRY_DELAY * attempt).await;
                    }
                    Err(e) => {
                        tracing::error!(
                            to = %to,
                            error = %e,
                            "verification email delivery failed, giving up"
                        );
                    }
                }
            }
        });
    }

    /// Send a multipart email with both plain text and HTML versions.
    async fn send_multipart_email(
        &self,
        to: &str,
        subject: &str,
        text_body: &str,
        html_body: &str,
    ) -> Result<(), EmailError> {
        let email = Message::builder()
            .from(
                self.from_address
                    .parse()
                    .map_err(|_| EmailError::InvalidAddress(self.from_address.clone()))?,
            )
            .to(to
                .parse()
                .map_err(|_| EmailError::InvalidAddress(to.to_string()))?)
            .subject(subject)
            .multipart(
                MultiPart::alternative()
                    .singlepart(
                        SinglePart::builder()
                            .header(ContentType::TEXT_PLAIN)
                            .body(text_body.to_string()),
                    )
                    .singlepart(
                        SinglePart::builder()
                            .header(ContentType::TEXT_HTML)
                            .body(html_body.to_string()),
                    ),
            )?;

        self.mailer.send(email).await?;

        tracing::info!(to = %to, subject = %subject, "Email sent successfully");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verification_templates_render_link() {
        let html = ConfirmAccountEmailHtml {
            name: "María",
            link: "https://farmacia.example.com/confirmar/tok",
        }
        .render()
        .expect("html template renders");
        let text = ConfirmAccountEmailText {
            name: "María",
            link: "https://farmacia.example.com/confirmar/tok",
        }
        .render()
        .expect("text template renders");

        assert!(html.contains("https://farmacia.example.com/confirmar/tok"));
        assert!(html.contains("María"));
        assert!(text.contains("https://farmacia.example.com/confirmar/tok"));
    }
}
