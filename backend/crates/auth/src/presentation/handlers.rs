//! HTTP Handlers

use axum::Json;
use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::IntoResponse;
use std::sync::Arc;

use kernel::clock::Clock;
use platform::bearer::extract_bearer_token;

use crate::application::config::AuthConfig;
use crate::application::{
    AuthenticateUseCase, CurrentUser, LoginInput, LoginUseCase, LogoutUseCase, RegisterInput,
    RegisterUseCase, SessionIssuer, TokenCodec, UserAccountsUseCase,
};
use crate::domain::repository::{SessionRegistry, UserRepository};
use crate::domain::value_object::user_id::UserId;
use crate::error::{AuthError, AuthResult};
use crate::presentation::dto::{
    CreateUserRequest, LoginRequest, MessageResponse, RegisterRequest, TokenResponse,
    UpdateUserRequest, UserResponse, UserUpdatedResponse,
};

/// Shared state for auth and user handlers
///
/// One instance per process; the session registry inside it is the only
/// registry the process uses.
pub struct AuthAppState<U, S>
where
    U: UserRepository + Sync + 'static,
    S: SessionRegistry + Sync + 'static,
{
    pub users: Arc<U>,
    pub sessions: Arc<S>,
    pub tokens: Arc<TokenCodec>,
    pub clock: Arc<dyn Clock>,
    pub config: Arc<AuthConfig>,
}

impl<U, S> Clone for AuthAppState<U, S>
where
    U: UserRepository + Sync + 'static,
    S: SessionRegistry + Sync + 'static,
{
    fn clone(&self) -> Self {
        Self {
            users: self.users.clone(),
            sessions: self.sessions.clone(),
            tokens: self.tokens.clone(),
            clock: self.clock.clone(),
            config: self.config.clone(),
        }
    }
}

impl<U, S> AuthAppState<U, S>
where
    U: UserRepository + Sync + 'static,
    S: SessionRegistry + Sync + 'static,
{
    pub fn new(users: Arc<U>, sessions: Arc<S>, clock: Arc<dyn Clock>, config: AuthConfig) -> Self {
        Self {
            users,
            sessions,
            tokens: Arc::new(TokenCodec::from_config(&config)),
            clock,
            config: Arc::new(config),
        }
    }

    fn issuer(&self) -> SessionIssuer<S> {
        SessionIssuer::new(
            self.sessions.clone(),
            self.tokens.clone(),
            self.clock.clone(),
            self.config.clone(),
        )
    }

    pub fn authenticator(&self) -> AuthenticateUseCase<U, S> {
        AuthenticateUseCase::new(
            self.users.clone(),
            self.sessions.clone(),
            self.tokens.clone(),
            self.clock.clone(),
        )
    }

    fn accounts(&self) -> UserAccountsUseCase<U, S> {
        UserAccountsUseCase::new(
            self.users.clone(),
            self.sessions.clone(),
            self.clock.clone(),
            self.config.clone(),
        )
    }
}

// ============================================================================
// Auth
// ============================================================================

/// POST /auth/register
pub async fn register<U, S>(
    State(state): State<AuthAppState<U, S>>,
    body: Result<Json<RegisterRequest>, JsonRejection>,
) -> AuthResult<Json<TokenResponse>>
where
    U: UserRepository + Sync + 'static,
    S: SessionRegistry + Sync + 'static,
{
    let Json(req) = body?;
    let use_case = RegisterUseCase::new(state.users.clone(), state.issuer(), state.config.clone());

    let output = use_case
        .execute(RegisterInput {
            user_name: req.username,
            email: req.email,
            password: req.password,
        })
        .await?;

    Ok(Json(TokenResponse {
        token: output.token,
    }))
}

/// POST /auth/login
pub async fn login<U, S>(
    State(state): State<AuthAppState<U, S>>,
    body: Result<Json<LoginRequest>, JsonRejection>,
) -> AuthResult<Json<TokenResponse>>
where
    U: UserRepository + Sync + 'static,
    S: SessionRegistry + Sync + 'static,
{
    let Json(req) = body?;
    let use_case = LoginUseCase::new(state.users.clone(), state.issuer(), state.config.clone());

    let output = use_case
        .execute(LoginInput {
            email: req.email,
            password: req.password,
        })
        .await?;

    Ok(Json(TokenResponse {
        token: output.token,
    }))
}

/// DELETE /auth/logout
pub async fn logout<U, S>(
    State(state): State<AuthAppState<U, S>>,
    headers: HeaderMap,
) -> AuthResult<Json<MessageResponse>>
where
    U: UserRepository + Sync + 'static,
    S: SessionRegistry + Sync + 'static,
{
    let token = extract_bearer_token(&headers).ok_or(AuthError::InvalidToken)?;

    LogoutUseCase::new(state.sessions.clone(), state.tokens.clone())
        .execute(&token)
        .await?;

    Ok(Json(MessageResponse::new("Successfully logged out")))
}

// ============================================================================
// Users
// ============================================================================

/// GET /users
pub async fn list_users<U, S>(
    State(state): State<AuthAppState<U, S>>,
    _current: CurrentUser,
) -> AuthResult<Json<Vec<UserResponse>>>
where
    U: UserRepository + Sync + 'static,
    S: SessionRegistry + Sync + 'static,
{
    let users = state.accounts().list().await?;
    Ok(Json(users.iter().map(UserResponse::from).collect()))
}

/// GET /users/me
pub async fn current_user<U, S>(
    State(state): State<AuthAppState<U, S>>,
    current: CurrentUser,
) -> AuthResult<Json<UserResponse>>
where
    U: UserRepository + Sync + 'static,
    S: SessionRegistry + Sync + 'static,
{
    let user = state.accounts().get(current.user_id).await?;
    Ok(Json(user.into()))
}

/// GET /users/{id}
pub async fn get_user<U, S>(
    State(state): State<AuthAppState<U, S>>,
    _current: CurrentUser,
    path: Result<Path<i64>, PathRejection>,
) -> AuthResult<Json<UserResponse>>
where
    U: UserRepository + Sync + 'static,
    S: SessionRegistry + Sync + 'static,
{
    let Path(id) = path?;
    let user = state.accounts().get(UserId::new(id)).await?;
    Ok(Json(user.into()))
}

/// POST /users
pub async fn create_user<U, S>(
    State(state): State<AuthAppState<U, S>>,
    current: CurrentUser,
    body: Result<Json<CreateUserRequest>, JsonRejection>,
) -> AuthResult<impl IntoResponse>
where
    U: UserRepository + Sync + 'static,
    S: SessionRegistry + Sync + 'static,
{
    let Json(req) = body?;
    let user = state.accounts().create(&current, req.into()).await?;
    Ok((StatusCode::CREATED, Json(UserResponse::from(user))))
}

/// PUT /users/{id}
pub async fn update_user<U, S>(
    State(state): State<AuthAppState<U, S>>,
    current: CurrentUser,
    path: Result<Path<i64>, PathRejection>,
    body: Result<Json<UpdateUserRequest>, JsonRejection>,
) -> AuthResult<Json<UserUpdatedResponse>>
where
    U: UserRepository + Sync + 'static,
    S: SessionRegistry + Sync + 'static,
{
    let Path(id) = path?;
    let Json(req) = body?;
    let user = state
        .accounts()
        .update(&current, UserId::new(id), req.into())
        .await?;

    Ok(Json(UserUpdatedResponse {
        message: "User updated successfully".to_string(),
        user: user.into(),
    }))
}

/// DELETE /users/{id}
pub async fn delete_user<U, S>(
    State(state): State<AuthAppState<U, S>>,
    current: CurrentUser,
    path: Result<Path<i64>, PathRejection>,
) -> AuthResult<StatusCode>
where
    U: UserRepository + Sync + 'static,
    S: SessionRegistry + Sync + 'static,
{
    let Path(id) = path?;
    state.accounts().delete(&current, UserId::new(id)).await?;
    Ok(StatusCode::NO_CONTENT)
}
