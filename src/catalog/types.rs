use serde::Deserialize;

/// Editable fields of a catalog entry, used for both create and overwrite
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestRequest {
    pub title: Option<String>,
    pub details: Option<String>,
    pub img_url: Option<String>,
    pub date: Option<String>,
    pub price: Option<f64>,
    pub slots: Option<i64>,
}
