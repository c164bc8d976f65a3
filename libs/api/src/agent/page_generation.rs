use std::sync::Arc;

use gemini::{GeminiError, TextGeneration};
use serde::Deserialize;
use serde_json::{Map, Value};

use super::Agent;

static SYSTEM_PROMPT: &str = r#"You are an assistant that writes pages for a block-based document editor.
Reply with a single JSON object and nothing else, in this shape:
{"title": "<page title>", "blocks": [{"type": "<TYPE>", "data": {...}}]}
Allowed block types and their data:
- TEXT: {"content": "<paragraph>"}
- HEADING: {"content": "<heading text>"}
- CODE: {"code": "<source code>", "language": "<language name>"}
- TABLE: {"data": [["<header>", ...], ["<cell>", ...]]}
- IMAGE: {"url": "<image url>", "caption": "<caption>"}
- WEBPAGE_EMBED: {"url": "<page url>", "title": "<page title>"}
List the blocks in reading order."#;

#[derive(Debug, Deserialize)]
pub struct GeneratedPage {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub blocks: Vec<GeneratedBlock>,
}

#[derive(Debug, Deserialize)]
pub struct GeneratedBlock {
    #[serde(default)]
    pub r#type: String,
    #[serde(default)]
    pub data: Value,
    #[serde(flatten)]
    rest: Map<String, Value>,
}

impl GeneratedBlock {
    /// The block's fields: `data` when it is an object, otherwise the
    /// remaining top-level keys. A TABLE whose `data` is the grid itself is
    /// wrapped so it reads as `{"data": [...]}`.
    pub fn fields(&self) -> Value {
        match &self.data {
            Value::Object(_) => self.data.clone(),
            Value::Array(_) => {
                let mut fields = Map::new();
                fields.insert("data".to_string(), self.data.clone());
                Value::Object(fields)
            }
            _ => Value::Object(self.rest.clone()),
        }
    }
}

pub struct PageGenerationAgent {
    client: Arc<dyn TextGeneration>,
}

impl PageGenerationAgent {
    pub fn new(client: Arc<dyn TextGeneration>) -> Self {
        Self { client }
    }
}

impl Agent for PageGenerationAgent {
    type Output = GeneratedPage;

    async fn prompt(
        &self,
        prompt: &str,
        _context: Option<&str>,
    ) -> Result<GeneratedPage, GeminiError> {
        let text = self.client.generate(prompt, SYSTEM_PROMPT).await?;

        parse(&text)
    }
}

/// Best-effort parse of the model's reply: prose or Markdown fences around
/// the outermost `{...}` are ignored.
pub fn parse(text: &str) -> Result<GeneratedPage, GeminiError> {
    let (Some(start), Some(end)) = (text.find('{'), text.rfind('}')) else {
        return Err(GeminiError::Parse("no JSON object in reply".to_string()));
    };
    if end < start {
        return Err(GeminiError::Parse("no JSON object in reply".to_string()));
    }

    let page = serde_json::from_str::<GeneratedPage>(&text[start..=end])
        .map_err(|e| GeminiError::Parse(e.to_string()))?;

    if page.title.trim().is_empty() {
        return Err(GeminiError::Parse("generated page has no title".into()));
    }
    if page.blocks.is_empty() {
        return Err(GeminiError::Parse("generated page has no blocks".into()));
    }

    Ok(page)
}

#[cfg(test)]
mod test {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_parse_fenced_reply() {
        // Arrange
        let text = r#"Sure! Here is your page:
```json
{"title": "Rust notes", "blocks": [
  {"type": "HEADING", "data": {"content": "Ownership"}},
  {"type": "CODE", "data": {"code": "let s = String::new();", "language": "rust"}}
]}
```"#;

        // Act
        let page = parse(text).unwrap();

        // Assert
        assert_eq!(page.title, "Rust notes");
        assert_eq!(page.blocks.len(), 2);
        assert_eq!(page.blocks[1].r#type, "CODE");
        assert_eq!(page.blocks[1].fields()["language"], json!("rust"));
    }

    #[test]
    fn test_fields_fallbacks() {
        let page = parse(
            r#"{"title": "t", "blocks": [
                {"type": "TEXT", "content": "inline"},
                {"type": "TABLE", "data": [["h"], ["c"]]}
            ]}"#,
        )
        .unwrap();

        assert_eq!(page.blocks[0].fields()["content"], json!("inline"));
        assert_eq!(page.blocks[1].fields(), json!({"data": [["h"], ["c"]]}));
    }

    #[test]
    fn test_parse_rejects_unusable_replies() {
        for text in [
            "I cannot help with that.",
            "} nope {",
            r#"{"title": "t", "blocks": [}"#,
            r#"{"title": "  ", "blocks": [{"type": "TEXT"}]}"#,
            r#"{"title": "t", "blocks": []}"#,
            r#"{"blocks": [{"type": "TEXT"}]}"#,
        ] {
            assert!(
                matches!(parse(text), Err(GeminiError::Parse(_))),
                "{}",
                text
            );
        }
    }
}
