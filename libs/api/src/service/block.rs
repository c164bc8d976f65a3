use std::{str::FromStr, sync::Arc};

use entity::prelude::*;
use gemini::TextGeneration;
use repository::Repository;
use serde_json::Value;

use super::{require, ServiceError, ServiceResult};
use crate::agent::{ask_block::AskBlockAgent, Agent};

#[derive(Clone)]
pub struct BlockService {
    repo: Repository,
    gemini: Arc<dyn TextGeneration>,
}

impl BlockService {
    pub fn new(repo: Repository, gemini: Arc<dyn TextGeneration>) -> Self {
        Self { repo, gemini }
    }

    pub async fn list(&self, page_id: &str) -> ServiceResult<Vec<BlockEntity>> {
        self.repo.page.find_by_id(page_id).await?;

        Ok(self.repo.block.find_by_page_id(page_id).await?)
    }

    pub async fn get(&self, id: &str) -> ServiceResult<BlockEntity> {
        Ok(self.repo.block.find_by_id(id).await?)
    }

    /// Appends a block of `fields["type"]` to the page at `max(order) + 1`.
    /// The type is checked before anything is written; the rest of `fields`
    /// is read according to that type.
    pub async fn create(
        &self,
        page_id: &str,
        fields: &Value,
    ) -> ServiceResult<BlockEntity> {
        let block_type = parse_type(fields)?;
        let content = BlockContent::from_fields(block_type, fields);

        Ok(self.repo.block.append(page_id, content).await?)
    }

    /// Applies the fields that belong to the block's own type. `type`,
    /// `order` and `pageId` in `fields` are ignored.
    pub async fn update(
        &self,
        id: &str,
        fields: &Value,
    ) -> ServiceResult<BlockEntity> {
        let block = self.repo.block.find_by_id(id).await?;

        let mut content = block.content;
        content.merge(fields);

        Ok(self.repo.block.update_content(id, content).await?)
    }

    pub async fn delete(&self, id: &str) -> ServiceResult<()> {
        Ok(self.repo.block.delete(id).await?)
    }

    /// Answers `prompt` using only the text projection of one block.
    pub async fn ask(&self, id: &str, prompt: &str) -> ServiceResult<String> {
        require(prompt, "A \"prompt\" is required in the body")?;

        let block = self.repo.block.find_by_id(id).await?;
        let content = block.content.as_text();
        require(&content, "Block has no text content to ask about")?;

        let agent = AskBlockAgent::new(self.gemini.clone());
        Ok(agent.prompt(prompt, Some(&content)).await?)
    }
}

fn parse_type(fields: &Value) -> ServiceResult<BlockType> {
    let tag = fields.get("type").and_then(Value::as_str).unwrap_or_default();
    if tag.is_empty() {
        return Err(ServiceError::Validation(
            "Block type is required".to_string(),
        ));
    }

    BlockType::from_str(tag).map_err(|_| {
        ServiceError::Validation(format!("Invalid block type: {}", tag))
    })
}
