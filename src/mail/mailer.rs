use crate::shared::util::config::MailConfig;

use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use lettre::message::header::ContentType;
use lettre::transport::smtp::authentication::Credentials;

#[derive(Debug, thiserror::Error)]
pub enum MailError {
    #[error("Invalid address: {0}")]
    Address(#[from] lettre::address::AddressError),
    #[error("Could not build message: {0}")]
    Message(#[from] lettre::error::Error),
    #[error("SMTP error: {0}")]
    Smtp(#[from] lettre::transport::smtp::Error)
}

/// Sends plain text mails over SMTP. When mail is disabled in the config
/// (development), messages are only logged.
#[derive(Clone)]
pub struct Mailer {
    transport: Option<AsyncSmtpTransport<Tokio1Executor>>,
    from: String,
    cc: String
}

impl Mailer {
    pub fn new(config: &MailConfig) -> Result<Mailer, MailError> {
        let transport = if config.enabled {
            Some(AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.smtp_host)?
                .port(config.smtp_port)
                .credentials(Credentials::new(config.user.clone(), config.password.clone()))
                .build())
        } else {
            None
        };

        Ok(Mailer { transport, from: config.from.clone(), cc: config.cc.clone() })
    }

    /// Copy address of the reprographics team
    pub fn team_cc(&self) -> &str {
        &self.cc
    }

    pub async fn send_mail(&self, to: &str, subject: &str, body: String, cc: Option<&str>) -> Result<(), MailError> {
        let Some(transport) = &self.transport else {
            log::info!("Mail disabled, not sending `{}` to {}", subject, to);
            return Ok(());
        };

        let mut builder = Message::builder()
            .from(self.from.parse()?)
            .to(to.parse()?)
            .subject(subject)
            .header(ContentType::TEXT_PLAIN);
        if let Some(cc) = cc.filter(|cc| !cc.is_empty()) {
            builder = builder.cc(cc.parse()?);
        }

        transport.send(builder.body(body)?).await?;
        log::info!("Sent `{}` to {}", subject, to);
        Ok(())
    }
}
