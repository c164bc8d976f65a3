use std::{str::FromStr, sync::Arc};

use entity::prelude::*;
use gemini::TextGeneration;
use repository::Repository;
use tracing::warn;

use super::{require, ServiceResult};
use crate::agent::{page_generation::PageGenerationAgent, Agent};

#[derive(Clone)]
pub struct PageService {
    repo: Repository,
    gemini: Arc<dyn TextGeneration>,
}

impl PageService {
    pub fn new(repo: Repository, gemini: Arc<dyn TextGeneration>) -> Self {
        Self { repo, gemini }
    }

    pub async fn list(&self) -> ServiceResult<Vec<PageEntity>> {
        Ok(self.repo.page.find_all().await?)
    }

    pub async fn get(
        &self,
        id: &str,
    ) -> ServiceResult<(PageEntity, Vec<BlockEntity>)> {
        Ok(self.repo.page.find_with_blocks(id).await?)
    }

    pub async fn create(&self, title: &str) -> ServiceResult<PageEntity> {
        require(title, "Title is required")?;

        Ok(self.repo.page.insert(title.trim()).await?)
    }

    pub async fn delete(&self, id: &str) -> ServiceResult<()> {
        Ok(self.repo.page.delete(id).await?)
    }

    /// Asks the model for a whole page and stores it with its blocks in one
    /// transaction. An unusable reply creates nothing; blocks of unknown
    /// type are dropped and the remaining ones are ordered from 0.
    pub async fn create_with_ai(
        &self,
        prompt: &str,
    ) -> ServiceResult<(PageEntity, Vec<BlockEntity>)> {
        require(prompt, "A \"prompt\" is required in the body")?;

        let agent = PageGenerationAgent::new(self.gemini.clone());
        let generated = agent.prompt(prompt, None).await?;

        let contents = generated
            .blocks
            .iter()
            .filter_map(|block| match BlockType::from_str(&block.r#type) {
                Ok(block_type) => {
                    Some(BlockContent::from_fields(block_type, &block.fields()))
                }
                Err(_) => {
                    warn!(
                        task = "create page with ai",
                        skipped_type = block.r#type.as_str()
                    );
                    None
                }
            })
            .collect();

        let page = self
            .repo
            .page
            .insert_with_blocks(generated.title.trim(), contents)
            .await?;

        // Read back outside the write transaction; a concurrent edit between
        // the two may show up here.
        Ok(self.repo.page.find_with_blocks(&page.id).await?)
    }
}
