use axum::{extract::State, http::StatusCode, routing::post, Json, Router};
use tracing::instrument;

use crate::{
    auth::{
        dto::{CredentialsRequest, TokenResponse},
        error::AuthError,
        services,
    },
    state::AppState,
};

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/signup", post(signup))
        .route("/login", post(login))
}

// A body that isn't a JSON object counts as one with no credentials.
fn body_or_empty(payload: Option<Json<CredentialsRequest>>) -> CredentialsRequest {
    payload.map(|Json(p)| p).unwrap_or_default()
}

#[instrument(skip(state, payload))]
pub async fn signup(
    State(state): State<AppState>,
    payload: Option<Json<CredentialsRequest>>,
) -> Result<(StatusCode, &'static str), AuthError> {
    services::signup(state.store.as_ref(), body_or_empty(payload)).await?;
    Ok((StatusCode::CREATED, "User created successfully"))
}

#[instrument(skip(state, payload))]
pub async fn login(
    State(state): State<AppState>,
    payload: Option<Json<CredentialsRequest>>,
) -> Result<Json<TokenResponse>, AuthError> {
    let token = services::login(state.store.as_ref(), &state.jwt, body_or_empty(payload)).await?;
    Ok(Json(TokenResponse { token }))
}
