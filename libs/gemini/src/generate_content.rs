use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentRequest {
    pub contents: Vec<Content>,
    pub system_instruction: Content,
}

impl GenerateContentRequest {
    pub fn new(user_query: &str, system_instruction: &str) -> Self {
        Self {
            contents: vec![Content::text(user_query)],
            system_instruction: Content::text(system_instruction),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Default)]
pub struct Content {
    #[serde(default)]
    pub parts: Vec<Part>,
}

impl Content {
    fn text(text: &str) -> Self {
        Self {
            parts: vec![Part {
                text: Some(text.to_string()),
            }],
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Default)]
pub struct Part {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct GenerateContentResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
pub struct Candidate {
    #[serde(default)]
    pub content: Content,
}

impl GenerateContentResponse {
    /// Text of the first part of the first candidate, if it is non-empty.
    pub fn into_text(self) -> Option<String> {
        self.candidates
            .into_iter()
            .next()?
            .content
            .parts
            .into_iter()
            .next()?
            .text
            .filter(|text| !text.is_empty())
    }
}

#[cfg(test)]
mod test {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_request_shape() {
        let request = GenerateContentRequest::new("question", "instruction");

        let value = serde_json::to_value(&request).unwrap();

        assert_eq!(
            value,
            json!({
                "contents": [{ "parts": [{ "text": "question" }] }],
                "systemInstruction": { "parts": [{ "text": "instruction" }] }
            })
        );
    }

    #[test]
    fn test_into_text() {
        // Arrange
        let ok = json!({
            "candidates": [{
                "content": { "parts": [{ "text": "answer" }], "role": "model" },
                "finishReason": "STOP"
            }],
            "usageMetadata": { "totalTokenCount": 3 }
        });
        let blocked = json!({ "promptFeedback": { "blockReason": "SAFETY" } });
        let empty_parts = json!({ "candidates": [{ "content": {} }] });

        // Act
        let parse = |value: serde_json::Value| {
            serde_json::from_value::<GenerateContentResponse>(value)
                .unwrap()
                .into_text()
        };

        // Assert
        assert_eq!(parse(ok), Some("answer".to_string()));
        assert_eq!(parse(blocked), None);
        assert_eq!(parse(empty_parts), None);
    }
}
