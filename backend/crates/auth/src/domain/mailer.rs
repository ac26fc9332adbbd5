//! Out-of-band delivery of password reset links.

use crate::domain::value_object::email::Email;
use crate::error::AuthResult;

#[trait_variant::make(ResetMailer: Send)]
pub trait LocalResetMailer {
    /// Deliver `link` to `to`. The link carries the raw reset token.
    async fn send_reset_link(&self, to: &Email, link: &str) -> AuthResult<()>;
}
