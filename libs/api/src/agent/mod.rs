use std::future::Future;

use gemini::GeminiError;

pub mod ask_block;
pub mod page_generation;

pub trait Agent {
    type Output;
    fn prompt(
        &self,
        prompt: &str,
        context: Option<&str>,
    ) -> impl Future<Output = Result<Self::Output, GeminiError>> + Send;
}
