use sea_orm_migration::prelude::*;

use crate::{
    m20251001_000001_create_page_table::Page,
    m20251001_000002_create_payload_tables::{
        CodeBlock, HeadingBlock, ImageBlock, TableBlock, TextBlock,
        WebpageEmbed,
    },
};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Block::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Block::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Block::PageId).string().not_null())
                    .col(ColumnDef::new(Block::Type).string().not_null())
                    .col(ColumnDef::new(Block::Order).integer().not_null())
                    .col(ColumnDef::new(Block::TextBlockId).string().unique_key())
                    .col(
                        ColumnDef::new(Block::HeadingBlockId)
                            .string()
                            .unique_key(),
                    )
                    .col(
                        ColumnDef::new(Block::ImageBlockId).string().unique_key(),
                    )
                    .col(ColumnDef::new(Block::CodeBlockId).string().unique_key())
                    .col(
                        ColumnDef::new(Block::TableBlockId).string().unique_key(),
                    )
                    .col(
                        ColumnDef::new(Block::WebpageEmbedId)
                            .string()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Block::CreatedAt).date_time().not_null())
                    .col(ColumnDef::new(Block::UpdatedAt).date_time().not_null())
                    .foreign_key(
                        ForeignKeyCreateStatement::new()
                            .name("fk_block_page_id")
                            .from(Block::Table, Block::PageId)
                            .to(Page::Table, Page::Id),
                    )
                    .foreign_key(
                        ForeignKeyCreateStatement::new()
                            .name("fk_block_text_block_id")
                            .from(Block::Table, Block::TextBlockId)
                            .to(TextBlock::Table, TextBlock::Id),
                    )
                    .foreign_key(
                        ForeignKeyCreateStatement::new()
                            .name("fk_block_heading_block_id")
                            .from(Block::Table, Block::HeadingBlockId)
                            .to(HeadingBlock::Table, HeadingBlock::Id),
                    )
                    .foreign_key(
                        ForeignKeyCreateStatement::new()
                            .name("fk_block_image_block_id")
                            .from(Block::Table, Block::ImageBlockId)
                            .to(ImageBlock::Table, ImageBlock::Id),
                    )
                    .foreign_key(
                        ForeignKeyCreateStatement::new()
                            .name("fk_block_code_block_id")
                            .from(Block::Table, Block::CodeBlockId)
                            .to(CodeBlock::Table, CodeBlock::Id),
                    )
                    .foreign_key(
                        ForeignKeyCreateStatement::new()
                            .name("fk_block_table_block_id")
                            .from(Block::Table, Block::TableBlockId)
                            .to(TableBlock::Table, TableBlock::Id),
                    )
                    .foreign_key(
                        ForeignKeyCreateStatement::new()
                            .name("fk_block_webpage_embed_id")
                            .from(Block::Table, Block::WebpageEmbedId)
                            .to(WebpageEmbed::Table, WebpageEmbed::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_block_page_id_order")
                    .table(Block::Table)
                    .col(Block::PageId)
                    .col(Block::Order)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(
                Index::drop()
                    .name("idx_block_page_id_order")
                    .table(Block::Table)
                    .to_owned(),
            )
            .await?;

        manager
            .drop_table(Table::drop().table(Block::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Block {
    Table,
    Id,
    PageId,
    Type,
    Order,
    TextBlockId,
    HeadingBlockId,
    ImageBlockId,
    CodeBlockId,
    TableBlockId,
    WebpageEmbedId,
    CreatedAt,
    UpdatedAt,
}
