//! Outgoing email.

use async_trait::async_trait;
use tracing::info;

#[derive(Debug, Clone, PartialEq)]
pub struct Email {
    pub to: String,
    pub subject: String,
    pub body: String,
}

#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, email: &Email) -> anyhow::Result<()>;
}

/// Writes emails to the log instead of delivering them.
pub struct LogMailer;

#[async_trait]
impl Mailer for LogMailer {
    async fn send(&self, email: &Email) -> anyhow::Result<()> {
        info!(to = %email.to, subject = %email.subject, body = %email.body, "email");
        Ok(())
    }
}

/// Invitation for a newly created staff account.
pub fn invitation(to: &str, link: &str) -> Email {
    Email {
        to: to.to_string(),
        subject: "Einladung zu famdoc".to_string(),
        body: format!(
            "Sie wurden zu famdoc eingeladen. Bitte legen Sie Ihr Passwort fest:\n\n{}\n",
            link
        ),
    }
}
