use std::sync::Arc;

use gemini::{GeminiError, TextGeneration};

use super::Agent;

static SYSTEM_PROMPT: &str = "You are an assistant that answers questions about a specific piece of content. The user will provide a question (prompt) and the content itself. Answer the user's question based *only* on the provided content.";

pub struct AskBlockAgent {
    client: Arc<dyn TextGeneration>,
}

impl AskBlockAgent {
    pub fn new(client: Arc<dyn TextGeneration>) -> Self {
        Self { client }
    }
}

fn user_query(prompt: &str, content: &str) -> String {
    format!(
        "USER QUESTION: \"{}\"\n\nBLOCK CONTENT:\n\"\"\"\n{}\n\"\"\"",
        prompt, content
    )
}

impl Agent for AskBlockAgent {
    type Output = String;

    /// `context` is the block's text projection.
    async fn prompt(
        &self,
        prompt: &str,
        context: Option<&str>,
    ) -> Result<String, GeminiError> {
        self.client
            .generate(
                &user_query(prompt, context.unwrap_or_default()),
                SYSTEM_PROMPT,
            )
            .await
    }
}
