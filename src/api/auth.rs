use super::AppState;
use crate::{
    core::{auth::Claims, user},
    errors::{Error, Result},
    models::{User, UserRole},
};
use axum::{Json, extract::State, http::HeaderMap};
use serde::{Deserialize, Serialize};
use tracing::info;

#[derive(Debug, Deserialize)]
pub(super) struct RegisterRequest {
    #[serde(default)]
    name: String,
    email: String,
    password: String,
    role: UserRole,
}

#[derive(Debug, Deserialize)]
pub(super) struct LoginRequest {
    email: String,
    password: String,
}

#[derive(Debug, Serialize)]
pub(super) struct AuthResponse {
    user: User,
    token: String,
}

/// Verifies the bearer token of a request.
pub(super) fn bearer_claims(headers: &HeaderMap, state: &AppState) -> Result<Claims> {
    let token = headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .ok_or(Error::InvalidToken)?;
    state.signer.verify(token.trim())
}

fn issue(state: &AppState, user: User) -> Result<Json<AuthResponse>> {
    let token = state.signer.sign(&Claims::new(user.id, user.role()))?;
    Ok(Json(AuthResponse { user, token }))
}

pub(super) async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> Result<Json<AuthResponse>> {
    let account = user::register(
        state.service.db(),
        &req.name,
        &req.email,
        &req.password,
        req.role,
    )
    .await?;
    info!(user_id = account.id, role = %account.role(), "Account registered");
    issue(&state, account)
}

pub(super) async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<AuthResponse>> {
    let account = user::login(state.service.db(), &req.email, Some(&req.password)).await?;
    issue(&state, account)
}
