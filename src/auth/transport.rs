use axum::{
    http::{header::AUTHORIZATION, HeaderMap},
    response::{IntoResponse, Response},
    Json,
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use std::sync::Arc;

use super::types::{SuccessResponse, TokenResponse};
use crate::config::{AppConfig, TransportKind};

/// Name of the cookie carrying the access token
pub const TOKEN_COOKIE: &str = "token";

/// Strategy for handing a token to the caller and reading it back.
/// A deployment runs with exactly one implementation.
pub trait CredentialTransport: Send + Sync {
    fn kind(&self) -> TransportKind;

    /// Pulls the presented token out of the request headers
    fn extract(&self, headers: &HeaderMap) -> Option<String>;

    /// Builds the response that hands a freshly issued token to the caller
    fn deliver(&self, token: String) -> Response;

    /// Builds the response that discards the caller's token
    fn clear(&self) -> Response;
}

/// Builds the transport selected by configuration
pub fn from_config(config: &AppConfig) -> Arc<dyn CredentialTransport> {
    match config.transport {
        TransportKind::Bearer => Arc::new(BearerTransport),
        TransportKind::Cookie => Arc::new(CookieTransport::new(config.production)),
    }
}

/// Token returned in the body, re-presented as `Authorization: Bearer <token>`
#[derive(Debug, Clone, Copy, Default)]
pub struct BearerTransport;

impl CredentialTransport for BearerTransport {
    fn kind(&self) -> TransportKind {
        TransportKind::Bearer
    }

    fn extract(&self, headers: &HeaderMap) -> Option<String> {
        headers
            .get(AUTHORIZATION)
            .and_then(|header| header.to_str().ok())
            .and_then(|value| value.strip_prefix("Bearer "))
            .map(str::trim)
            .filter(|token| !token.is_empty())
            .map(str::to_string)
    }

    fn deliver(&self, token: String) -> Response {
        Json(TokenResponse { token }).into_response()
    }

    fn clear(&self) -> Response {
        // Nothing is held server side; the client simply drops its token
        Json(SuccessResponse { success: true }).into_response()
    }
}

/// Token set as an HTTP-only cookie that the browser re-presents
#[derive(Debug, Clone, Copy)]
pub struct CookieTransport {
    production: bool,
}

impl CookieTransport {
    pub fn new(production: bool) -> Self {
        Self { production }
    }

    fn cookie(&self, value: String) -> Cookie<'static> {
        let same_site = if self.production {
            SameSite::None
        } else {
            SameSite::Strict
        };

        Cookie::build((TOKEN_COOKIE, value))
            .path("/")
            .http_only(true)
            .secure(self.production)
            .same_site(same_site)
            .build()
    }
}

impl CredentialTransport for CookieTransport {
    fn kind(&self) -> TransportKind {
        TransportKind::Cookie
    }

    fn extract(&self, headers: &HeaderMap) -> Option<String> {
        CookieJar::from_headers(headers)
            .get(TOKEN_COOKIE)
            .map(|cookie| cookie.value().to_string())
            .filter(|token| !token.is_empty())
    }

    fn deliver(&self, token: String) -> Response {
        let jar = CookieJar::new().add(self.cookie(token));
        (jar, Json(SuccessResponse { success: true })).into_response()
    }

    fn clear(&self) -> Response {
        let mut cookie = self.cookie(String::new());
        cookie.make_removal();
        let jar = CookieJar::new().add(cookie);
        (jar, Json(SuccessResponse { success: true })).into_response()
    }
}
