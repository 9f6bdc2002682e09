use serde::{Deserialize, Serialize};

/// JWT claims identifying the caller
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TokenClaims {
    pub email: String,
    pub exp: usize, // Expiration timestamp (standard JWT claim)
    pub iat: usize, // Issued at timestamp (standard JWT claim)
}

/// Request payload for `POST /jwt`
#[derive(Debug, Deserialize)]
pub struct IssueTokenRequest {
    pub email: String,
}

/// Token handed back in the body when the bearer transport is active
#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct TokenResponse {
    pub token: String,
}

/// Acknowledgement for cookie operations
#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct SuccessResponse {
    pub success: bool,
}
