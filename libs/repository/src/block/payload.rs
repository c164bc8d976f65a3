//! Storage dispatch for the six payload tables. Every operation here is one
//! exhaustive match over [`BlockContent`] or [`BlockType`], so adding a block
//! type fails to compile until each path handles it.

use std::str::FromStr;

use entity::prelude::*;
use sea_orm::{
    prelude::Uuid, ActiveValue, ConnectionTrait, DbErr, EntityTrait,
};

use crate::active_models::*;
use crate::{RepositoryError, Response};

/// Inserts the payload row, assigning it a fresh id.
pub(crate) async fn insert<C: ConnectionTrait>(
    db: &C,
    content: &mut BlockContent,
) -> Result<(), DbErr> {
    content.set_payload_id(Uuid::new_v4().to_string());

    match content {
        BlockContent::Text(text) => {
            text_block::Entity::insert(text_block::ActiveModel::from(
                text.clone(),
            ))
            .exec_without_returning(db)
            .await?;
        }
        BlockContent::Heading(heading) => {
            heading_block::Entity::insert(heading_block::ActiveModel::from(
                heading.clone(),
            ))
            .exec_without_returning(db)
            .await?;
        }
        BlockContent::Image(image) => {
            image_block::Entity::insert(image_block::ActiveModel::from(
                image.clone(),
            ))
            .exec_without_returning(db)
            .await?;
        }
        BlockContent::Code(code) => {
            code_block::Entity::insert(code_block::ActiveModel::from(
                code.clone(),
            ))
            .exec_without_returning(db)
            .await?;
        }
        BlockContent::Table(table) => {
            table_block::Entity::insert(table_block::ActiveModel::from(
                table.clone(),
            ))
            .exec_without_returning(db)
            .await?;
        }
        BlockContent::WebpageEmbed(embed) => {
            webpage_embed::Entity::insert(webpage_embed::ActiveModel::from(
                embed.clone(),
            ))
            .exec_without_returning(db)
            .await?;
        }
    }

    Ok(())
}

/// Points the block row at its payload and clears the other five relations.
pub(crate) fn link(block: &mut block::ActiveModel, content: &BlockContent) {
    let id = Some(content.payload_id().to_string());
    let is = |block_type: BlockType| {
        if content.block_type() == block_type {
            ActiveValue::Set(id.clone())
        } else {
            ActiveValue::Set(None)
        }
    };

    block.r#type = ActiveValue::Set(content.block_type().to_string());
    block.text_block_id = is(BlockType::Text);
    block.heading_block_id = is(BlockType::Heading);
    block.image_block_id = is(BlockType::Image);
    block.code_block_id = is(BlockType::Code);
    block.table_block_id = is(BlockType::Table);
    block.webpage_embed_id = is(BlockType::WebpageEmbed);
}

/// Resolves the payload selected by the block's stored type.
pub(crate) async fn load<C: ConnectionTrait>(
    db: &C,
    block: &block::Model,
) -> Response<BlockContent> {
    let block_type = stored_type(block)?;
    let Some(id) = reference(block, block_type) else {
        return Err(RepositoryError::InvalidState(format!(
            "block {} of type {} has no payload reference",
            block.id, block_type
        )));
    };
    let id = id.to_string();

    let content = match block_type {
        BlockType::Text => text_block::Entity::find_by_id(id.clone())
            .one(db)
            .await
            .map(|m| m.map(|m| BlockContent::Text(m.into()))),
        BlockType::Heading => heading_block::Entity::find_by_id(id.clone())
            .one(db)
            .await
            .map(|m| m.map(|m| BlockContent::Heading(m.into()))),
        BlockType::Image => image_block::Entity::find_by_id(id.clone())
            .one(db)
            .await
            .map(|m| m.map(|m| BlockContent::Image(m.into()))),
        BlockType::Code => code_block::Entity::find_by_id(id.clone())
            .one(db)
            .await
            .map(|m| m.map(|m| BlockContent::Code(m.into()))),
        BlockType::Table => table_block::Entity::find_by_id(id.clone())
            .one(db)
            .await
            .map(|m| m.map(|m| BlockContent::Table(m.into()))),
        BlockType::WebpageEmbed => {
            webpage_embed::Entity::find_by_id(id.clone())
                .one(db)
                .await
                .map(|m| m.map(|m| BlockContent::WebpageEmbed(m.into())))
        }
    };

    let Some(content) = content.map_err(|e| RepositoryError::InSeaOrmDbErr {
        message: format!("load {} payload", block_type),
        source: e,
    })?
    else {
        return Err(RepositoryError::InvalidState(format!(
            "payload {} of block {} is missing",
            id, block.id
        )));
    };

    Ok(content)
}

/// Writes every field of the payload row identified by `content`.
pub(crate) async fn update<C: ConnectionTrait>(
    db: &C,
    content: &BlockContent,
) -> Result<(), DbErr> {
    match content {
        BlockContent::Text(text) => {
            text_block::Entity::update(text_block::ActiveModel::from(
                text.clone(),
            ))
            .exec(db)
            .await?;
        }
        BlockContent::Heading(heading) => {
            heading_block::Entity::update(heading_block::ActiveModel::from(
                heading.clone(),
            ))
            .exec(db)
            .await?;
        }
        BlockContent::Image(image) => {
            image_block::Entity::update(image_block::ActiveModel::from(
                image.clone(),
            ))
            .exec(db)
            .await?;
        }
        BlockContent::Code(code) => {
            code_block::Entity::update(code_block::ActiveModel::from(
                code.clone(),
            ))
            .exec(db)
            .await?;
        }
        BlockContent::Table(table) => {
            table_block::Entity::update(table_block::ActiveModel::from(
                table.clone(),
            ))
            .exec(db)
            .await?;
        }
        BlockContent::WebpageEmbed(embed) => {
            webpage_embed::Entity::update(webpage_embed::ActiveModel::from(
                embed.clone(),
            ))
            .exec(db)
            .await?;
        }
    }

    Ok(())
}

/// Deletes one payload row, returning how many rows went away.
pub(crate) async fn delete<C: ConnectionTrait>(
    db: &C,
    block_type: BlockType,
    id: &str,
) -> Result<u64, DbErr> {
    let id = id.to_string();
    let result = match block_type {
        BlockType::Text => text_block::Entity::delete_by_id(id).exec(db).await,
        BlockType::Heading => {
            heading_block::Entity::delete_by_id(id).exec(db).await
        }
        BlockType::Image => {
            image_block::Entity::delete_by_id(id).exec(db).await
        }
        BlockType::Code => code_block::Entity::delete_by_id(id).exec(db).await,
        BlockType::Table => {
            table_block::Entity::delete_by_id(id).exec(db).await
        }
        BlockType::WebpageEmbed => {
            webpage_embed::Entity::delete_by_id(id).exec(db).await
        }
    }?;

    Ok(result.rows_affected)
}

pub(crate) fn stored_type(block: &block::Model) -> Response<BlockType> {
    BlockType::from_str(&block.r#type).map_err(|_| {
        RepositoryError::InvalidState(format!(
            "block {} has unknown type {}",
            block.id, block.r#type
        ))
    })
}

pub(crate) fn reference(
    block: &block::Model,
    block_type: BlockType,
) -> Option<&str> {
    match block_type {
        BlockType::Text => block.text_block_id.as_deref(),
        BlockType::Heading => block.heading_block_id.as_deref(),
        BlockType::Image => block.image_block_id.as_deref(),
        BlockType::Code => block.code_block_id.as_deref(),
        BlockType::Table => block.table_block_id.as_deref(),
        BlockType::WebpageEmbed => block.webpage_embed_id.as_deref(),
    }
}

impl From<TextBlock> for text_block::ActiveModel {
    fn from(value: TextBlock) -> Self {
        Self {
            id: ActiveValue::Set(value.id),
            content: ActiveValue::Set(value.content),
        }
    }
}

impl From<text_block::Model> for TextBlock {
    fn from(value: text_block::Model) -> Self {
        Self {
            id: value.id,
            content: value.content,
        }
    }
}

impl From<HeadingBlock> for heading_block::ActiveModel {
    fn from(value: HeadingBlock) -> Self {
        Self {
            id: ActiveValue::Set(value.id),
            content: ActiveValue::Set(value.content),
        }
    }
}

impl From<heading_block::Model> for HeadingBlock {
    fn from(value: heading_block::Model) -> Self {
        Self {
            id: value.id,
            content: value.content,
        }
    }
}

impl From<ImageBlock> for image_block::ActiveModel {
    fn from(value: ImageBlock) -> Self {
        Self {
            id: ActiveValue::Set(value.id),
            url: ActiveValue::Set(value.url),
            caption: ActiveValue::Set(value.caption),
        }
    }
}

impl From<image_block::Model> for ImageBlock {
    fn from(value: image_block::Model) -> Self {
        Self {
            id: value.id,
            url: value.url,
            caption: value.caption,
        }
    }
}

impl From<CodeBlock> for code_block::ActiveModel {
    fn from(value: CodeBlock) -> Self {
        Self {
            id: ActiveValue::Set(value.id),
            code: ActiveValue::Set(value.code),
            language: ActiveValue::Set(value.language),
        }
    }
}

impl From<code_block::Model> for CodeBlock {
    fn from(value: code_block::Model) -> Self {
        Self {
            id: value.id,
            code: value.code,
            language: value.language,
        }
    }
}

impl From<TableBlock> for table_block::ActiveModel {
    fn from(value: TableBlock) -> Self {
        Self {
            id: ActiveValue::Set(value.id),
            data: ActiveValue::Set(value.data),
        }
    }
}

impl From<table_block::Model> for TableBlock {
    fn from(value: table_block::Model) -> Self {
        Self {
            id: value.id,
            data: value.data,
        }
    }
}

impl From<WebpageEmbed> for webpage_embed::ActiveModel {
    fn from(value: WebpageEmbed) -> Self {
        Self {
            id: ActiveValue::Set(value.id),
            url: ActiveValue::Set(value.url),
            title: ActiveValue::Set(value.title),
        }
    }
}

impl From<webpage_embed::Model> for WebpageEmbed {
    fn from(value: webpage_embed::Model) -> Self {
        Self {
            id: value.id,
            url: value.url,
            title: value.title,
        }
    }
}
