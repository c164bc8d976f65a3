use serde::Deserialize;
use utoipa::ToSchema;

#[derive(Deserialize, ToSchema)]
pub struct CreatePageRequest {
    #[serde(default)]
    pub title: String,
}
