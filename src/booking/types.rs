use serde::Deserialize;

/// Request payload for booking a test.
/// The catalog fields are a snapshot taken by the client at booking time.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingRequest {
    pub email: String,
    pub test_id: Option<String>,
    pub title: Option<String>,
    pub date: Option<String>,
    pub price: Option<f64>,
}
