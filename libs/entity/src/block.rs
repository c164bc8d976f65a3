use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use strum::{AsRefStr, Display, EnumIter, EnumString};

/// Closed set of block kinds. The string form (`TEXT`, `WEBPAGE_EMBED`, ...)
/// is what is stored in the `type` column and sent over the wire.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Display,
    EnumString,
    EnumIter,
    AsRefStr,
    Serialize,
    Deserialize,
)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BlockType {
    Text,
    Heading,
    Image,
    Code,
    Table,
    WebpageEmbed,
}

#[derive(Debug, Default, PartialEq, Clone, Serialize, Deserialize)]
pub struct TextBlock {
    pub id: String,
    pub content: String,
}

#[derive(Debug, Default, PartialEq, Clone, Serialize, Deserialize)]
pub struct HeadingBlock {
    pub id: String,
    pub content: String,
}

#[derive(Debug, Default, PartialEq, Clone, Serialize, Deserialize)]
pub struct ImageBlock {
    pub id: String,
    pub url: String,
    pub caption: String,
}

#[derive(Debug, Default, PartialEq, Clone, Serialize, Deserialize)]
pub struct CodeBlock {
    pub id: String,
    pub code: String,
    pub language: String,
}

/// `data` is conventionally a 2-D array of strings whose first row is the
/// header, but any JSON value is accepted.
#[derive(Debug, Default, PartialEq, Clone, Serialize, Deserialize)]
pub struct TableBlock {
    pub id: String,
    pub data: Value,
}

#[derive(Debug, Default, PartialEq, Clone, Serialize, Deserialize)]
pub struct WebpageEmbed {
    pub id: String,
    pub url: String,
    pub title: String,
}

/// The typed payload of a block. Exactly one variant exists per block and it
/// always agrees with [`BlockType`].
#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub enum BlockContent {
    Text(TextBlock),
    Heading(HeadingBlock),
    Image(ImageBlock),
    Code(CodeBlock),
    Table(TableBlock),
    WebpageEmbed(WebpageEmbed),
}

impl BlockContent {
    pub fn block_type(&self) -> BlockType {
        match self {
            BlockContent::Text(_) => BlockType::Text,
            BlockContent::Heading(_) => BlockType::Heading,
            BlockContent::Image(_) => BlockType::Image,
            BlockContent::Code(_) => BlockType::Code,
            BlockContent::Table(_) => BlockType::Table,
            BlockContent::WebpageEmbed(_) => BlockType::WebpageEmbed,
        }
    }

    /// Id of the payload row, empty until the payload is stored.
    pub fn payload_id(&self) -> &str {
        match self {
            BlockContent::Text(text) => &text.id,
            BlockContent::Heading(heading) => &heading.id,
            BlockContent::Image(image) => &image.id,
            BlockContent::Code(code) => &code.id,
            BlockContent::Table(table) => &table.id,
            BlockContent::WebpageEmbed(embed) => &embed.id,
        }
    }

    pub fn set_payload_id(&mut self, id: String) {
        match self {
            BlockContent::Text(text) => text.id = id,
            BlockContent::Heading(heading) => heading.id = id,
            BlockContent::Image(image) => image.id = id,
            BlockContent::Code(code) => code.id = id,
            BlockContent::Table(table) => table.id = id,
            BlockContent::WebpageEmbed(embed) => embed.id = id,
        }
    }

    /// Builds a payload of `block_type` from a loose JSON object. Fields that
    /// do not belong to the type are ignored and missing ones are left empty.
    pub fn from_fields(block_type: BlockType, fields: &Value) -> Self {
        let mut content = match block_type {
            BlockType::Text => BlockContent::Text(TextBlock::default()),
            BlockType::Heading => {
                BlockContent::Heading(HeadingBlock::default())
            }
            BlockType::Image => BlockContent::Image(ImageBlock::default()),
            BlockType::Code => BlockContent::Code(CodeBlock::default()),
            BlockType::Table => BlockContent::Table(TableBlock::default()),
            BlockType::WebpageEmbed => {
                BlockContent::WebpageEmbed(WebpageEmbed::default())
            }
        };
        content.merge(fields);
        content
    }

    /// Overwrites the fields of this payload that are present in `fields`.
    /// Absent fields keep their value; string fields only accept strings.
    pub fn merge(&mut self, fields: &Value) {
        match self {
            BlockContent::Text(text) => {
                merge_str(&mut text.content, fields, "content");
            }
            BlockContent::Heading(heading) => {
                merge_str(&mut heading.content, fields, "content");
            }
            BlockContent::Image(image) => {
                merge_str(&mut image.url, fields, "url");
                merge_str(&mut image.caption, fields, "caption");
            }
            BlockContent::Code(code) => {
                merge_str(&mut code.code, fields, "code");
                merge_str(&mut code.language, fields, "language");
            }
            BlockContent::Table(table) => {
                if let Some(data) = fields.get("data") {
                    table.data = data.clone();
                }
            }
            BlockContent::WebpageEmbed(embed) => {
                merge_str(&mut embed.url, fields, "url");
                merge_str(&mut embed.title, fields, "title");
            }
        }
    }

    /// Plain-text projection handed to the language model. Images and embeds
    /// are described rather than transmitted.
    pub fn as_text(&self) -> String {
        match self {
            BlockContent::Text(text) => text.content.clone(),
            BlockContent::Heading(heading) => heading.content.clone(),
            BlockContent::Code(code) => code.code.clone(),
            BlockContent::Table(table) => table.data.to_string(),
            BlockContent::Image(image) => format!(
                "Image at {} (Caption: {})",
                or_default(&image.url, "unknown URL"),
                or_default(&image.caption, "no caption"),
            ),
            BlockContent::WebpageEmbed(embed) => format!(
                "Webpage embed of {} (Title: {})",
                or_default(&embed.url, "unknown URL"),
                or_default(&embed.title, "no title"),
            ),
        }
    }
}

fn merge_str(target: &mut String, fields: &Value, key: &str) {
    if let Some(value) = fields.get(key).and_then(Value::as_str) {
        *target = value.to_string();
    }
}

fn or_default<'a>(value: &'a str, default: &'a str) -> &'a str {
    if value.is_empty() {
        default
    } else {
        value
    }
}

#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub struct Block {
    pub id: String,
    pub page_id: String,
    pub order: i32,
    pub content: BlockContent,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Block {
    pub fn block_type(&self) -> BlockType {
        self.content.block_type()
    }
}
