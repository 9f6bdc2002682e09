use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use super::types::BookingRequest;

/// Database model for a booked test
#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingModel {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub email: String,           // Email of the booking user
    pub test_id: Option<String>, // Opaque reference to a catalog entry, not enforced
    pub title: Option<String>,
    pub date: Option<String>,
    pub price: Option<f64>,
    pub booked_at: DateTime<Utc>,
}

impl BookingModel {
    pub fn new(request: BookingRequest) -> Self {
        Self {
            id: Uuid::new_v4(),
            email: request.email,
            test_id: request.test_id,
            title: request.title,
            date: request.date,
            price: request.price,
            booked_at: Utc::now(),
        }
    }
}
