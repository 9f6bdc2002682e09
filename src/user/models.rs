use chrono::Utc;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::str::FromStr;
use strum_macros::{AsRefStr, Display, EnumString};
use uuid::Uuid;

/// Access level stored on a user record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, AsRefStr)]
#[strum(serialize_all = "lowercase")]
pub enum Role {
    User,
    Admin,
}

/// Database model for the users collection
#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserModel {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub email: String, // Natural key, unique across the collection
    pub name: Option<String>,
    pub photo_url: Option<String>,
    pub role: String, // Stored as text; anything but "admin" is a regular user
    #[sqlx(rename = "created_at")]
    pub timestamp: i64, // Creation time in milliseconds since the epoch
}

impl UserModel {
    pub fn new(email: String, name: Option<String>, photo_url: Option<String>, role: Role) -> Self {
        Self {
            id: Uuid::new_v4(),
            email,
            name,
            photo_url,
            role: role.to_string(),
            timestamp: Utc::now().timestamp_millis(),
        }
    }

    /// Parsed role, `None` when the stored value is not a known role
    pub fn role(&self) -> Option<Role> {
        Role::from_str(&self.role).ok()
    }

    pub fn is_admin(&self) -> bool {
        self.role() == Some(Role::Admin)
    }
}
