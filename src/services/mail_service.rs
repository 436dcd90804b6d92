use std::sync::{Arc, Mutex};

use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use serde_json::Value as JsonValue;
use tracing::info;

use crate::config::Config;
use crate::error::{Error, Result};

/// The closed set of templated emails the system sends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmailTemplate {
    VerificationCode,
    PasswordReset,
    ApplicationOutcome,
}

impl EmailTemplate {
    pub fn render(&self, context: &JsonValue) -> String {
        let field = |key: &str| context.get(key).and_then(|v| v.as_str()).unwrap_or("");
        match self {
            EmailTemplate::VerificationCode => format!(
                "Welcome!\n\nYour verification code is {}.\n\nIt expires in 20 minutes.",
                field("code")
            ),
            EmailTemplate::PasswordReset => format!(
                "A password reset was requested for {}.\n\nYour reset token is {}.\n\nIt expires in 20 minutes. If you did not request this, ignore this email.",
                field("email"),
                field("token")
            ),
            EmailTemplate::ApplicationOutcome => format!(
                "Dear {},\n\nThank you for applying for {} at {}. After careful consideration we decided not to move forward with your application.\n\nWe wish you the best in your search.",
                field("applicant_name"),
                field("job_title"),
                field("company_name")
            ),
        }
    }
}

#[derive(Debug, Clone)]
pub struct OutboundEmail {
    pub subject: String,
    pub recipients: Vec<String>,
    pub template: EmailTemplate,
    pub context: JsonValue,
}

#[derive(Clone)]
enum Backend {
    Smtp {
        transport: AsyncSmtpTransport<Tokio1Executor>,
        from: Mailbox,
    },
    /// Logs instead of sending; the default when SMTP is not configured.
    Console,
    /// Records sent mail for inspection in tests.
    Memory(Arc<Mutex<Vec<OutboundEmail>>>),
}

#[derive(Clone)]
pub struct MailService {
    backend: Backend,
}

impl MailService {
    pub fn from_config(config: &Config) -> Result<Self> {
        let Some(host) = &config.smtp_host else {
            return Ok(Self {
                backend: Backend::Console,
            });
        };

        let from: Mailbox = config
            .mail_from
            .parse()
            .map_err(|e| Error::Config(format!("Invalid MAIL_FROM address: {}", e)))?;

        let mut builder = AsyncSmtpTransport::<Tokio1Executor>::relay(host)
            .map_err(|e| Error::Config(format!("Invalid SMTP relay {}: {}", host, e)))?;
        if let (Some(user), Some(pass)) = (&config.smtp_username, &config.smtp_password) {
            builder = builder.credentials(Credentials::new(user.clone(), pass.clone()));
        }

        Ok(Self {
            backend: Backend::Smtp {
                transport: builder.build(),
                from,
            },
        })
    }

    pub fn memory() -> Self {
        Self {
            backend: Backend::Memory(Arc::new(Mutex::new(Vec::new()))),
        }
    }

    /// Emails recorded by the memory backend; empty for the others.
    pub fn sent(&self) -> Vec<OutboundEmail> {
        match &self.backend {
            Backend::Memory(store) => store.lock().expect("mail store mutex poisoned").clone(),
            _ => Vec::new(),
        }
    }

    pub async fn send(
        &self,
        subject: &str,
        recipients: &[String],
        template: EmailTemplate,
        context: &JsonValue,
    ) -> Result<()> {
        match &self.backend {
            Backend::Smtp { transport, from } => {
                let body = template.render(context);
                for recipient in recipients {
                    let to: Mailbox = recipient
                        .parse()
                        .map_err(|e| Error::Mail(format!("Invalid recipient {}: {}", recipient, e)))?;
                    let message = Message::builder()
                        .from(from.clone())
                        .to(to)
                        .subject(subject)
                        .body(body.clone())
                        .map_err(|e| Error::Mail(format!("Failed to build message: {}", e)))?;
                    transport
                        .send(message)
                        .await
                        .map_err(|e| Error::Mail(format!("SMTP delivery failed: {}", e)))?;
                }
            }
            Backend::Console => {
                info!(
                    subject,
                    recipients = ?recipients,
                    "mail (console backend): {}",
                    template.render(context)
                );
            }
            Backend::Memory(store) => {
                store
                    .lock()
                    .expect("mail store mutex poisoned")
                    .push(OutboundEmail {
                        subject: subject.to_string(),
                        recipients: recipients.to_vec(),
                        template,
                        context: context.clone(),
                    });
            }
        }
        Ok(())
    }
}
