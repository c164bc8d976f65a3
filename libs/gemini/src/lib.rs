use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE};
use tracing::error;

pub mod generate_content;

use generate_content::{GenerateContentRequest, GenerateContentResponse};

pub static DEFAULT_BASE_URL: &str =
    "https://generativelanguage.googleapis.com/v1beta";
pub static DEFAULT_MODEL: &str = "gemini-2.5-flash-preview-09-2025";

#[derive(Debug, thiserror::Error)]
pub enum GeminiError {
    #[error("gemini api key is not configured")]
    Config,

    #[error("gemini request failed: {0}")]
    Upstream(String),

    #[error("failed to parse gemini response: {0}")]
    Parse(String),
}

/// Single-shot text generation. Failures are returned as-is, never retried.
#[async_trait]
pub trait TextGeneration: Send + Sync {
    async fn generate(
        &self,
        user_query: &str,
        system_instruction: &str,
    ) -> Result<String, GeminiError>;
}

#[derive(Clone, Debug)]
pub struct Client {
    base_url: String,
    model: String,
    api_key: Option<String>,
    client: reqwest::Client,
}

impl Client {
    /// `api_key` may be absent so the server can start without AI features;
    /// generation then fails with [`GeminiError::Config`].
    pub fn new(
        api_key: Option<String>,
        base_url: String,
        model: String,
    ) -> Result<Self, GeminiError> {
        let mut headers = HeaderMap::new();
        headers.insert("Accept", HeaderValue::from_static("*/*"));
        headers.insert(
            CONTENT_TYPE,
            HeaderValue::from_static("application/json"),
        );

        let client = reqwest::ClientBuilder::new()
            .default_headers(headers)
            .build()
            .map_err(|e| GeminiError::Upstream(e.to_string()))?;

        Ok(Self {
            base_url,
            model,
            api_key: api_key.filter(|key| !key.trim().is_empty()),
            client,
        })
    }

    async fn string_response(
        &self,
        request: &GenerateContentRequest,
    ) -> Result<String, GeminiError> {
        let Some(api_key) = &self.api_key else {
            return Err(GeminiError::Config);
        };

        let response = self
            .client
            .post(format!(
                "{}/models/{}:generateContent",
                self.base_url, self.model
            ))
            .query(&[("key", api_key)])
            .json(request)
            .send()
            .await
            .map_err(|e| GeminiError::Upstream(e.without_url().to_string()))?;

        let status_code = response.status();
        let text = response.text().await;

        if !status_code.is_success() {
            error!(
                task = "generate content",
                status = status_code.as_u16(),
                response = format!("{:?}", text)
            );
            return Err(GeminiError::Upstream(format!(
                "status code: {}",
                status_code
            )));
        }

        text.map_err(|e| GeminiError::Upstream(e.without_url().to_string()))
    }
}

#[async_trait]
impl TextGeneration for Client {
    async fn generate(
        &self,
        user_query: &str,
        system_instruction: &str,
    ) -> Result<String, GeminiError> {
        let request =
            GenerateContentRequest::new(user_query, system_instruction);
        let text = self.string_response(&request).await?;

        let response = serde_json::from_str::<GenerateContentResponse>(&text)
            .map_err(|e| GeminiError::Parse(e.to_string()))?;

        response.into_text().ok_or_else(|| {
            error!(task = "generate content", response = text);
            GeminiError::Parse("no text in first candidate".to_string())
        })
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[tokio::test]
    async fn test_generate_without_api_key() {
        // Arrange
        let client = Client::new(
            Some("  ".to_string()),
            DEFAULT_BASE_URL.to_string(),
            DEFAULT_MODEL.to_string(),
        )
        .unwrap();

        // Act
        let result = client.generate("hello", "be brief").await;

        // Assert
        assert!(matches!(result, Err(GeminiError::Config)));
    }
}
