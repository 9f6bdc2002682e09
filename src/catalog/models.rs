use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use super::types::TestRequest;

/// Database model for the catalog of diagnostic tests
#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestModel {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub title: Option<String>,
    pub details: Option<String>,
    pub img_url: Option<String>,
    pub date: Option<String>, // As supplied by the admin UI, not interpreted
    pub price: Option<f64>,
    pub slots: Option<i64>,
}

impl TestModel {
    /// Creates a new catalog entry with a generated ID
    pub fn new(request: TestRequest) -> Self {
        let mut test = Self {
            id: Uuid::new_v4(),
            title: None,
            details: None,
            img_url: None,
            date: None,
            price: None,
            slots: None,
        };
        test.overwrite(request);
        test
    }

    /// Replaces every editable field, whether or not it changed
    pub fn overwrite(&mut self, request: TestRequest) {
        self.title = request.title;
        self.details = request.details;
        self.img_url = request.img_url;
        self.date = request.date;
        self.price = request.price;
        self.slots = request.slots;
    }
}
