//! Request helpers - drive the router the way a browser client would
#![allow(dead_code)] // Test utilities may not all be used in every test

use axum::{
    body::Body,
    http::{header, HeaderMap, Request, StatusCode},
};
use serde_json::Value;
use tower::ServiceExt; // for `oneshot`

use diagnostic_booking::auth::TOKEN_COOKIE;

use super::setup::TestApp;

/// How a request presents its token
#[derive(Debug, Clone)]
pub enum Credential {
    None,
    Bearer(String),
    Cookie(String),
}

pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub json: Value,
}

impl TestResponse {
    /// Value of the token cookie set by this response, if any
    pub fn token_cookie(&self) -> Option<String> {
        self.set_cookie_header().and_then(|raw| {
            raw.split(';')
                .next()
                .and_then(|pair| pair.trim().strip_prefix(&format!("{}=", TOKEN_COOKIE)))
                .map(str::to_string)
        })
    }

    pub fn set_cookie_header(&self) -> Option<String> {
        self.headers
            .get(header::SET_COOKIE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
    }
}

impl TestApp {
    pub async fn send(
        &self,
        method: &str,
        uri: &str,
        credential: &Credential,
        body: Option<Value>,
    ) -> TestResponse {
        let mut builder = Request::builder().method(method).uri(uri);

        builder = match credential {
            Credential::None => builder,
            Credential::Bearer(token) => {
                builder.header(header::AUTHORIZATION, format!("Bearer {}", token))
            }
            Credential::Cookie(token) => {
                builder.header(header::COOKIE, format!("{}={}", TOKEN_COOKIE, token))
            }
        };

        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let headers = response.headers().clone();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);

        TestResponse {
            status,
            headers,
            json,
        }
    }

    /// POST /jwt and return the bearer token from the body
    pub async fn login_bearer(&self, email: &str) -> Credential {
        let response = self
            .send(
                "POST",
                "/jwt",
                &Credential::None,
                Some(serde_json::json!({ "email": email })),
            )
            .await;
        assert_eq!(response.status, StatusCode::OK);

        let token = response.json["token"]
            .as_str()
            .expect("bearer login returns a token")
            .to_string();
        Credential::Bearer(token)
    }

    /// POST /jwt and return the token carried in the Set-Cookie header
    pub async fn login_cookie(&self, email: &str) -> Credential {
        let response = self
            .send(
                "POST",
                "/jwt",
                &Credential::None,
                Some(serde_json::json!({ "email": email })),
            )
            .await;
        assert_eq!(response.status, StatusCode::OK);
        assert_eq!(response.json["success"], true);

        Credential::Cookie(response.token_cookie().expect("cookie login sets a token"))
    }

    pub async fn is_admin(&self, email: &str, credential: &Credential) -> bool {
        let response = self
            .send("GET", &format!("/users/admin/{}", email), credential, None)
            .await;
        assert_eq!(response.status, StatusCode::OK);
        response.json["admin"].as_bool().unwrap()
    }
}
