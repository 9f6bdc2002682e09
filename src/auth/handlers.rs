use axum::{extract::State, response::Response, Json};
use tracing::{info, instrument};

use super::types::IssueTokenRequest;
use crate::shared::{AppError, AppState};

/// HTTP handler for issuing a credential
///
/// POST /jwt
/// Hands the token over through the configured transport
#[instrument(name = "issue_token", skip(state, request), fields(email = %request.email))]
pub async fn issue_token(
    State(state): State<AppState>,
    Json(request): Json<IssueTokenRequest>,
) -> Result<Response, AppError> {
    let token = state.token_config.create_token(&request.email)?;

    info!(
        transport = state.transport.kind().as_ref(),
        "Credential issued"
    );

    Ok(state.transport.deliver(token))
}

/// GET /logout
#[instrument(name = "logout", skip(state))]
pub async fn logout(State(state): State<AppState>) -> Response {
    info!("Clearing credential");
    state.transport.clear()
}
