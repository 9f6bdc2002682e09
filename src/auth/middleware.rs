use axum::{
    extract::{Request, State},
    middleware::{from_fn_with_state, Next},
    response::Response,
    routing::MethodRouter,
};
use tracing::{info, instrument, warn};

use super::types::TokenClaims;
use crate::shared::{AppError, AppState};
use crate::user::UserService;

/// Who may reach a route.
/// Every route in the router declares one of these explicitly.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    Open,
    /// Valid credential required
    Authenticated,
    /// Valid credential whose user holds the admin role
    Admin,
}

impl Access {
    /// Wraps a method router with the guards for this access level.
    /// Guards run before the handler and short-circuit on failure.
    pub fn guard(self, route: MethodRouter<AppState>, state: &AppState) -> MethodRouter<AppState> {
        match self {
            Access::Open => route,
            Access::Authenticated => {
                route.route_layer(from_fn_with_state(state.clone(), require_authenticated))
            }
            // Layers added last run first: authentication precedes the role check
            Access::Admin => route
                .route_layer(from_fn_with_state(state.clone(), require_admin))
                .route_layer(from_fn_with_state(state.clone(), require_authenticated)),
        }
    }
}

/// Authentication middleware - reads the credential through the configured
/// transport, validates it and adds TokenClaims to the request.
/// Handlers can then extract Extension(claims): Extension<TokenClaims>.
#[instrument(skip(state, req, next), fields(uri = %req.uri()))]
pub async fn require_authenticated(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let token = state.transport.extract(req.headers()).ok_or_else(|| {
        warn!(
            transport = state.transport.kind().as_ref(),
            "Missing credential in request"
        );
        AppError::Unauthorized("unauthorized".to_string())
    })?;

    let claims = match state.token_config.validate_token(&token) {
        Ok(claims) => claims,
        Err(e) => {
            warn!("Credential rejected: {}", e);
            return Err(e);
        }
    };

    info!(email = %claims.email, "Authentication successful, adding claims to request");

    req.extensions_mut().insert(claims);
    Ok(next.run(req).await)
}

/// Authorization middleware - must run after `require_authenticated`.
/// Lets the request through only when the caller's stored role is admin.
#[instrument(skip(state, req, next), fields(uri = %req.uri()))]
pub async fn require_admin(
    State(state): State<AppState>,
    req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let claims = req
        .extensions()
        .get::<TokenClaims>()
        .cloned()
        .ok_or_else(|| {
            warn!("Admin check reached without authenticated claims");
            AppError::Unauthorized("unauthorized".to_string())
        })?;

    let is_admin = UserService::new(state.user_repository.clone())
        .is_admin(&claims.email)
        .await?;

    if !is_admin {
        warn!(email = %claims.email, "Caller is not an admin");
        return Err(AppError::Forbidden("forbidden access".to_string()));
    }

    Ok(next.run(req).await)
}
