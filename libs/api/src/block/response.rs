use chrono::{DateTime, Utc};
use entity::prelude::*;
use serde::Serialize;
use serde_json::Value;
use utoipa::ToSchema;

/// A block with exactly one non-null payload, the one named by `type`.
#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BlockResponse {
    pub id: String,
    pub page_id: String,
    #[serde(rename = "type")]
    #[schema(value_type = String, example = "TEXT")]
    pub block_type: BlockType,
    pub order: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub text_block: Option<TextBlockResponse>,
    pub heading_block: Option<TextBlockResponse>,
    pub image_block: Option<ImageBlockResponse>,
    pub code_block: Option<CodeBlockResponse>,
    pub table_block: Option<TableBlockResponse>,
    pub webpage_embed: Option<WebpageEmbedResponse>,
}

#[derive(Serialize, ToSchema)]
pub struct TextBlockResponse {
    pub id: String,
    pub content: String,
}

#[derive(Serialize, ToSchema)]
pub struct ImageBlockResponse {
    pub id: String,
    pub url: String,
    pub caption: String,
}

#[derive(Serialize, ToSchema)]
pub struct CodeBlockResponse {
    pub id: String,
    pub code: String,
    pub language: String,
}

#[derive(Serialize, ToSchema)]
pub struct TableBlockResponse {
    pub id: String,
    #[schema(value_type = Object)]
    pub data: Value,
}

#[derive(Serialize, ToSchema)]
pub struct WebpageEmbedResponse {
    pub id: String,
    pub url: String,
    pub title: String,
}

#[derive(Serialize, ToSchema)]
pub struct AskBlockResponse {
    pub answer: String,
}

impl From<BlockEntity> for BlockResponse {
    fn from(value: BlockEntity) -> Self {
        let mut response = Self {
            id: value.id,
            page_id: value.page_id,
            block_type: value.content.block_type(),
            order: value.order,
            created_at: value.created_at,
            updated_at: value.updated_at,
            text_block: None,
            heading_block: None,
            image_block: None,
            code_block: None,
            table_block: None,
            webpage_embed: None,
        };

        match value.content {
            BlockContent::Text(text) => {
                response.text_block = Some(TextBlockResponse {
                    id: text.id,
                    content: text.content,
                });
            }
            BlockContent::Heading(heading) => {
                response.heading_block = Some(TextBlockResponse {
                    id: heading.id,
                    content: heading.content,
                });
            }
            BlockContent::Image(image) => {
                response.image_block = Some(ImageBlockResponse {
                    id: image.id,
                    url: image.url,
                    caption: image.caption,
                });
            }
            BlockContent::Code(code) => {
                response.code_block = Some(CodeBlockResponse {
                    id: code.id,
                    code: code.code,
                    language: code.language,
                });
            }
            BlockContent::Table(table) => {
                response.table_block = Some(TableBlockResponse {
                    id: table.id,
                    data: table.data,
                });
            }
            BlockContent::WebpageEmbed(embed) => {
                response.webpage_embed = Some(WebpageEmbedResponse {
                    id: embed.id,
                    url: embed.url,
                    title: embed.title,
                });
            }
        }

        response
    }
}

#[cfg(test)]
mod test {
    use chrono::Utc;
    use serde_json::json;

    use super::*;

    #[test]
    fn test_serializes_only_the_matching_payload() {
        // Arrange
        let now = Utc::now();
        let block = BlockEntity {
            id: "b".to_string(),
            page_id: "p".to_string(),
            order: 2,
            content: BlockContent::WebpageEmbed(WebpageEmbed {
                id: "w".to_string(),
                url: "https://example.com".to_string(),
                title: "Example".to_string(),
            }),
            created_at: now,
            updated_at: now,
        };

        // Act
        let value = serde_json::to_value(BlockResponse::from(block)).unwrap();

        // Assert
        assert_eq!(value["type"], json!("WEBPAGE_EMBED"));
        assert_eq!(value["pageId"], json!("p"));
        assert_eq!(value["order"], json!(2));
        assert_eq!(
            value["webpageEmbed"],
            json!({"id": "w", "url": "https://example.com", "title": "Example"})
        );
        for key in [
            "textBlock",
            "headingBlock",
            "imageBlock",
            "codeBlock",
            "tableBlock",
        ] {
            assert_eq!(value[key], Value::Null, "{}", key);
        }
    }
}
