//! HTTP Handlers

use axum::Json;
use axum::extract::State;
use axum::http::{StatusCode, header};
use axum::response::IntoResponse;
use platform::cookie::set_cookie_header;
use platform::password::CredentialHasher;
use std::sync::Arc;
use uuid::Uuid;

use crate::application::config::AuthConfig;
use crate::application::{
    ChangeRoleUseCase, CurrentUserUseCase, ForgotPasswordUseCase, GetUserUseCase,
    RefreshTokenUseCase, ResetPasswordInput, ResetPasswordUseCase, SignInInput, SignInUseCase,
    SignUpInput, SignUpUseCase, TokenService,
};
use crate::domain::mailer::ResetMailer;
use crate::domain::repository::AuthStore;
use crate::domain::value_object::user_id::UserId;
use crate::error::AuthResult;
use crate::presentation::dto::{
    AuthUserResponse, ChangeRoleRequest, ForgotPasswordRequest, MessageResponse, RefreshResponse,
    ResetPasswordRequest, SignInRequest, SignUpRequest, UserResponse,
};
use crate::presentation::extract::{ValidJson, ValidPath};
use crate::presentation::middleware::CurrentSession;

/// Same text whether or not the account exists
pub const FORGOT_PASSWORD_MESSAGE: &str =
    "If an account exists for that email, a password reset link has been sent";

/// Shared state for auth handlers
pub struct AuthAppState<R, M> {
    pub repo: Arc<R>,
    pub mailer: Arc<M>,
    pub config: Arc<AuthConfig>,
    pub hasher: Arc<CredentialHasher>,
    pub tokens: Arc<TokenService>,
}

impl<R, M> Clone for AuthAppState<R, M> {
    fn clone(&self) -> Self {
        Self {
            repo: self.repo.clone(),
            mailer: self.mailer.clone(),
            config: self.config.clone(),
            hasher: self.hasher.clone(),
            tokens: self.tokens.clone(),
        }
    }
}

impl<R, M> AuthAppState<R, M>
where
    R: AuthStore,
    M: ResetMailer + Send + Sync + 'static,
{
    /// Builds the signing and hashing services; fails on a bad secret.
    pub fn new(repo: Arc<R>, mailer: Arc<M>, config: AuthConfig) -> AuthResult<Self> {
        let tokens = Arc::new(config.token_service()?);
        let hasher = Arc::new(config.credential_hasher()?);

        Ok(Self {
            repo,
            mailer,
            config: Arc::new(config),
            hasher,
            tokens,
        })
    }

    fn session_cookie(&self, token: &str) -> axum::http::HeaderValue {
        set_cookie_header(&self.config.cookie_config().build_set_cookie(token))
    }
}

// ============================================================================
// Sign Up
// ============================================================================

/// POST /api/auth/signup
pub async fn sign_up<R, M>(
    State(state): State<AuthAppState<R, M>>,
    ValidJson(req): ValidJson<SignUpRequest>,
) -> AuthResult<impl IntoResponse>
where
    R: AuthStore,
    M: ResetMailer + Send + Sync + 'static,
{
    let use_case = SignUpUseCase::new(
        state.repo.clone(),
        state.hasher.clone(),
        state.tokens.clone(),
        state.config.clone(),
    );

    let output = use_case
        .execute(SignUpInput {
            email: req.email,
            username: req.username,
            password: req.password,
        })
        .await?;

    Ok((
        StatusCode::CREATED,
        [(header::SET_COOKIE, state.session_cookie(&output.session.token))],
        Json(AuthUserResponse::from(&output.user)),
    ))
}

// ============================================================================
// Sign In / Sign Out
// ============================================================================

/// POST /api/auth/login
pub async fn sign_in<R, M>(
    State(state): State<AuthAppState<R, M>>,
    ValidJson(req): ValidJson<SignInRequest>,
) -> AuthResult<impl IntoResponse>
where
    R: AuthStore,
    M: ResetMailer + Send + Sync + 'static,
{
    let use_case = SignInUseCase::new(
        state.repo.clone(),
        state.hasher.clone(),
        state.tokens.clone(),
        state.config.clone(),
    );

    let output = use_case
        .execute(SignInInput {
            identifier: req.email,
            password: req.password,
        })
        .await?;

    Ok((
        StatusCode::OK,
        [(header::SET_COOKIE, state.session_cookie(&output.session.token))],
        Json(AuthUserResponse::from(&output.user)),
    ))
}

/// POST /api/auth/logout
///
/// Tokens are stateless, so this only clears the cookie.
pub async fn sign_out<R, M>(State(state): State<AuthAppState<R, M>>) -> impl IntoResponse
where
    R: AuthStore,
    M: ResetMailer + Send + Sync + 'static,
{
    let cookie = state.config.cookie_config().build_delete_cookie();
    (
        StatusCode::NO_CONTENT,
        [(header::SET_COOKIE, set_cookie_header(&cookie))],
    )
}

// ============================================================================
// Session
// ============================================================================

/// GET /api/auth/user
pub async fn current_user<R, M>(
    State(state): State<AuthAppState<R, M>>,
    CurrentSession(session): CurrentSession,
) -> AuthResult<Json<AuthUserResponse>>
where
    R: AuthStore,
    M: ResetMailer + Send + Sync + 'static,
{
    let user = CurrentUserUseCase::new(state.repo.clone())
        .execute(&session)
        .await?;

    Ok(Json(AuthUserResponse::from(&user)))
}

/// POST /api/auth/refresh (bearer)
pub async fn refresh_token<R, M>(
    State(state): State<AuthAppState<R, M>>,
    CurrentSession(session): CurrentSession,
) -> AuthResult<Json<RefreshResponse>>
where
    R: AuthStore,
    M: ResetMailer + Send + Sync + 'static,
{
    let issued = RefreshTokenUseCase::new(
        state.repo.clone(),
        state.tokens.clone(),
        state.config.clone(),
    )
    .execute(&session)
    .await?;

    Ok(Json(RefreshResponse {
        token: issued.token,
        expires_in: issued.expires_in_secs,
    }))
}

// ============================================================================
// Password Reset
// ============================================================================

/// POST /api/auth/forgot-password
pub async fn forgot_password<R, M>(
    State(state): State<AuthAppState<R, M>>,
    ValidJson(req): ValidJson<ForgotPasswordRequest>,
) -> AuthResult<Json<MessageResponse>>
where
    R: AuthStore,
    M: ResetMailer + Send + Sync + 'static,
{
    ForgotPasswordUseCase::new(state.repo.clone(), state.mailer.clone(), state.config.clone())
        .execute(req.email)
        .await?;

    Ok(Json(MessageResponse::new(FORGOT_PASSWORD_MESSAGE)))
}

/// POST /api/auth/reset-password
pub async fn reset_password<R, M>(
    State(state): State<AuthAppState<R, M>>,
    ValidJson(req): ValidJson<ResetPasswordRequest>,
) -> AuthResult<Json<MessageResponse>>
where
    R: AuthStore,
    M: ResetMailer + Send + Sync + 'static,
{
    ResetPasswordUseCase::new(state.repo.clone(), state.hasher.clone())
        .execute(ResetPasswordInput {
            token: req.token,
            password: req.password,
        })
        .await?;

    Ok(Json(MessageResponse::new("Password has been reset")))
}

// ============================================================================
// Admin
// ============================================================================

/// GET /api/admin/users/{id}
pub async fn get_user<R, M>(
    State(state): State<AuthAppState<R, M>>,
    ValidPath(user_id): ValidPath<Uuid>,
) -> AuthResult<Json<UserResponse>>
where
    R: AuthStore,
    M: ResetMailer + Send + Sync + 'static,
{
    let user = GetUserUseCase::new(state.repo.clone())
        .execute(&UserId::from_uuid(user_id))
        .await?;

    Ok(Json(UserResponse::from(&user)))
}

/// PATCH /api/admin/users/{id}/role
pub async fn change_role<R, M>(
    State(state): State<AuthAppState<R, M>>,
    CurrentSession(session): CurrentSession,
    ValidPath(user_id): ValidPath<Uuid>,
    ValidJson(req): ValidJson<ChangeRoleRequest>,
) -> AuthResult<Json<UserResponse>>
where
    R: AuthStore,
    M: ResetMailer + Send + Sync + 'static,
{
    let user = ChangeRoleUseCase::new(state.repo.clone())
        .execute(&session, UserId::from_uuid(user_id), req.role)
        .await?;

    Ok(Json(UserResponse::from(&user)))
}
