//! Reset Mailers

use crate::domain::mailer::ResetMailer;
use crate::domain::value_object::email::Email;
use crate::error::AuthResult;

/// Development delivery channel: writes the link to the debug log.
///
/// The link contains a live reset token, so this must not run with debug
/// logging enabled in production.
#[derive(Debug, Clone, Default)]
pub struct TracingResetMailer;

impl ResetMailer for TracingResetMailer {
    async fn send_reset_link(&self, to: &Email, link: &str) -> AuthResult<()> {
        tracing::debug!(to = %to, link = %link, "Password reset link");
        Ok(())
    }
}
