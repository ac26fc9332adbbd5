//! Application Layer
//!
//! Use cases and application services.

pub mod config;
pub mod current_user;
pub mod forgot_password;
pub mod manage_users;
pub mod refresh_token;
pub mod reset_password;
pub mod resolve_session;
pub mod sign_in;
pub mod sign_up;
pub mod token;

// Re-exports
pub use config::AuthConfig;
pub use current_user::CurrentUserUseCase;
pub use forgot_password::ForgotPasswordUseCase;
pub use manage_users::{ChangeRoleUseCase, GetUserUseCase};
pub use refresh_token::RefreshTokenUseCase;
pub use reset_password::{ResetPasswordInput, ResetPasswordUseCase};
pub use resolve_session::{SessionResolver, TokenSource};
pub use sign_in::{SignInInput, SignInOutput, SignInUseCase};
pub use sign_up::{SignUpInput, SignUpOutput, SignUpUseCase};
pub use token::{IdentityClaim, IssuedToken, TokenKind, TokenService};
