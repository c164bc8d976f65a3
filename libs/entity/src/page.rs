use chrono::{DateTime, Utc};
use serde::Serialize;

#[derive(Debug, Default, PartialEq, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Page {
    pub id: String,
    pub title: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
