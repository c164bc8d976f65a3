use serde::Deserialize;
use serde_json::Value;
use utoipa::ToSchema;

/// Documented shape of a block body. Handlers read the body as loose JSON:
/// only the fields of the block's type are used and the rest is ignored.
#[derive(Deserialize, ToSchema)]
pub struct BlockFields {
    /// One of TEXT, HEADING, IMAGE, CODE, TABLE, WEBPAGE_EMBED. Required on
    /// create, ignored on update.
    #[serde(rename = "type")]
    pub block_type: Option<String>,
    /// TEXT, HEADING
    pub content: Option<String>,
    /// IMAGE, WEBPAGE_EMBED
    pub url: Option<String>,
    /// IMAGE
    pub caption: Option<String>,
    /// CODE
    pub code: Option<String>,
    /// CODE
    pub language: Option<String>,
    /// WEBPAGE_EMBED
    pub title: Option<String>,
    /// TABLE, conventionally rows of strings with the header first
    #[schema(value_type = Object)]
    pub data: Option<Value>,
}

#[derive(Deserialize, ToSchema)]
pub struct PromptRequest {
    #[serde(default)]
    pub prompt: String,
}
