//! Authentication endpoints.

use axum::{Json, Router, extract::State, routing::post};
use photogram_common::AppResult;
use photogram_core::RegisterInput;
use serde::Serialize;

use crate::{middleware::AppState, response::ApiResponse};

/// Registration response.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterResponse {
    pub id: String,
    pub username: String,
    pub token: String,
}

/// Create a new account and issue its access token.
async fn register(
    State(state): State<AppState>,
    Json(input): Json<RegisterInput>,
) -> AppResult<ApiResponse<RegisterResponse>> {
    let user = state.user_service.register(input).await?;

    Ok(ApiResponse::ok(RegisterResponse {
        id: user.id.clone(),
        username: user.username,
        token: user.token.unwrap_or_default(),
    }))
}

pub fn router() -> Router<AppState> {
    Router::new().route("/register", post(register))
}
