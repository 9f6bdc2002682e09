use serde::{Deserialize, Serialize};

/// Body of `PUT /users/:email`; only used when the user does not exist yet.
/// Any role sent by the caller is ignored, new users always start as `user`.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpsertUserRequest {
    pub name: Option<String>,
    pub photo_url: Option<String>,
}

/// Response for the self-only admin check
#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct AdminStatusResponse {
    pub admin: bool,
}
