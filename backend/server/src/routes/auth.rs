use std::sync::Arc;

use axum::{
    Json, Router,
    extract::State,
    http::header::SET_COOKIE,
    response::IntoResponse,
    routing::{get, post},
};
use chrono::Duration;
use tracing::info;

use crate::{
    auth::{
        Claims, SESSION_COOKIE, create_magic_link_token, encode_session, get_or_create_user,
        verify_magic_token,
    },
    error::AppError,
    extract::{AppJson, CurrentUser},
    payloads::{LoginRequest, MessageResponse, UserResponse, VerifyRequest},
    state::State as AppState,
    utils::sanitize_email,
};

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/auth/login", post(login_handler))
        .route("/auth/verify", post(verify_handler))
        .route("/auth/logout", post(logout_handler))
        .route("/auth/me", get(me_handler))
}

fn session_cookie(value: &str, max_age: i64) -> String {
    format!("{SESSION_COOKIE}={value}; HttpOnly; SameSite=Lax; Secure; Path=/; Max-Age={max_age}")
}

pub async fn login_handler(
    State(state): State<Arc<AppState>>,
    AppJson(payload): AppJson<LoginRequest>,
) -> Result<Json<MessageResponse>, AppError> {
    let email = sanitize_email(&payload.email)
        .ok_or_else(|| AppError::BadRequest("Invalid email address".to_string()))?;

    let user = get_or_create_user(&state.db, &state.config, &email).await?;
    let token = create_magic_link_token(&state.db, &state.config, &user).await?;

    state.mailer.send_magic_link(&email, &token).await?;

    Ok(Json(MessageResponse::new("Check your email for a login link.")))
}

pub async fn verify_handler(
    State(state): State<Arc<AppState>>,
    AppJson(payload): AppJson<VerifyRequest>,
) -> Result<impl IntoResponse, AppError> {
    let user = verify_magic_token(&state.db, &payload.token)
        .await?
        .ok_or(AppError::InvalidMagicToken)?;

    let expiry = Duration::days(state.config.session_expiry_days);
    let session = encode_session(&Claims::new(&user, expiry), &state.config.session_secret)?;

    info!("User {} signed in", user.email);

    Ok((
        [(SET_COOKIE, session_cookie(&session, expiry.num_seconds()))],
        Json(UserResponse {
            id: user.id,
            email: user.email,
            role: user.role,
            created_at: Some(user.created_at),
        }),
    ))
}

pub async fn logout_handler() -> impl IntoResponse {
    (
        [(SET_COOKIE, session_cookie("", 0))],
        Json(MessageResponse::new("Logged out successfully.")),
    )
}

pub async fn me_handler(user: CurrentUser) -> Json<UserResponse> {
    Json(UserResponse {
        id: user.id,
        email: user.email,
        role: user.role,
        created_at: None,
    })
}
