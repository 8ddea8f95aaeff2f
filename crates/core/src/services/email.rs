//! Outbound email via SMTP.

use lettre::message::Mailbox;
use lettre::message::header::ContentType;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};

use casaflow_common::config::EmailConfig;
use casaflow_common::{AppError, AppResult};
use casaflow_db::entities::otp_code::OtpPurpose;

/// Sends transactional mail through the configured SMTP relay.
#[derive(Clone)]
pub struct EmailService {
    mailer: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
}

impl EmailService {
    /// Build the service from SMTP settings.
    pub fn new(config: &EmailConfig) -> AppResult<Self> {
        let mut builder =
            AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.smtp_host)
                .map_err(|e| AppError::Config(format!("SMTP relay: {e}")))?
                .port(config.smtp_port);

        if let (Some(username), Some(password)) = (&config.smtp_username, &config.smtp_password) {
            builder = builder.credentials(Credentials::new(username.clone(), password.clone()));
        }

        let from = format!("{} <{}>", config.from_name, config.from_address)
            .parse()
            .map_err(|e| AppError::Config(format!("From address: {e}")))?;

        Ok(Self {
            mailer: builder.build(),
            from,
        })
    }

    /// Send a one-time passcode to an address.
    pub async fn send_otp(
        &self,
        to: &str,
        code: &str,
        purpose: OtpPurpose,
        ttl_minutes: i64,
    ) -> AppResult<()> {
        let subject = match purpose {
            OtpPurpose::Signup => "Confirm your email",
            OtpPurpose::Login => "Your login code",
        };

        let body = format!(
            "Your verification code is: {code}\n\n\
            It expires in {ttl_minutes} minutes. If you did not request this code, \
            you can safely ignore this email.",
        );

        let message = Message::builder()
            .from(self.from.clone())
            .to(to
                .parse()
                .map_err(|_| AppError::BadRequest(format!("Invalid email address: {to}")))?)
            .subject(subject)
            .header(ContentType::TEXT_PLAIN)
            .body(body)
            .map_err(|e| AppError::Email(e.to_string()))?;

        self.mailer
            .send(message)
            .await
            .map_err(|e| AppError::Email(e.to_string()))?;

        tracing::info!(to = %to, purpose = ?purpose, "Sent OTP email");
        Ok(())
    }
}
