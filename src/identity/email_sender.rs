use super::{EmailSender, IdentityStoreError};
use async_trait::async_trait;
use tracing::info;

/// Writes outgoing mail to the log instead of delivering it.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingEmailSender;

#[async_trait]
impl EmailSender for TracingEmailSender {
    async fn send_email(
        &self,
        email: &str,
        subject: &str,
        message: &str,
    ) -> Result<(), IdentityStoreError> {
        info!(to = email, subject, "Sending email: {}", message);
        Ok(())
    }
}
