use chrono::{DateTime, Utc};
use entity::prelude::*;
use serde::Serialize;
use utoipa::ToSchema;

use crate::block::response::BlockResponse;

#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PageResponse {
    pub id: String,
    pub title: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PageWithBlocksResponse {
    #[serde(flatten)]
    pub page: PageResponse,
    pub blocks: Vec<BlockResponse>,
}

impl From<PageEntity> for PageResponse {
    fn from(value: PageEntity) -> Self {
        Self {
            id: value.id,
            title: value.title,
            created_at: value.created_at,
            updated_at: value.updated_at,
        }
    }
}

impl From<(PageEntity, Vec<BlockEntity>)> for PageWithBlocksResponse {
    fn from((page, blocks): (PageEntity, Vec<BlockEntity>)) -> Self {
        Self {
            page: PageResponse::from(page),
            blocks: blocks.into_iter().map(BlockResponse::from).collect(),
        }
    }
}
