use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(TextBlock::Table)
                    .if_not_exists()
                    .col(&mut id(TextBlock::Id))
                    .col(ColumnDef::new(TextBlock::Content).text().not_null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(HeadingBlock::Table)
                    .if_not_exists()
                    .col(&mut id(HeadingBlock::Id))
                    .col(
                        ColumnDef::new(HeadingBlock::Content)
                            .text()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(ImageBlock::Table)
                    .if_not_exists()
                    .col(&mut id(ImageBlock::Id))
                    .col(ColumnDef::new(ImageBlock::Url).text().not_null())
                    .col(ColumnDef::new(ImageBlock::Caption).text().not_null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(CodeBlock::Table)
                    .if_not_exists()
                    .col(&mut id(CodeBlock::Id))
                    .col(ColumnDef::new(CodeBlock::Code).text().not_null())
                    .col(ColumnDef::new(CodeBlock::Language).string().not_null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(TableBlock::Table)
                    .if_not_exists()
                    .col(&mut id(TableBlock::Id))
                    .col(ColumnDef::new(TableBlock::Data).json().not_null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(WebpageEmbed::Table)
                    .if_not_exists()
                    .col(&mut id(WebpageEmbed::Id))
                    .col(ColumnDef::new(WebpageEmbed::Url).text().not_null())
                    .col(ColumnDef::new(WebpageEmbed::Title).text().not_null())
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(WebpageEmbed::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(TableBlock::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(CodeBlock::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(ImageBlock::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(HeadingBlock::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(TextBlock::Table).to_owned())
            .await
    }
}

fn id<T: IntoIden>(column: T) -> ColumnDef {
    ColumnDef::new(column).string().not_null().primary_key().to_owned()
}

#[derive(DeriveIden)]
pub enum TextBlock {
    Table,
    Id,
    Content,
}

#[derive(DeriveIden)]
pub enum HeadingBlock {
    Table,
    Id,
    Content,
}

#[derive(DeriveIden)]
pub enum ImageBlock {
    Table,
    Id,
    Url,
    Caption,
}

#[derive(DeriveIden)]
pub enum CodeBlock {
    Table,
    Id,
    Code,
    Language,
}

#[allow(clippy::enum_variant_names)]
#[derive(DeriveIden)]
pub enum TableBlock {
    Table,
    Id,
    Data,
}

#[derive(DeriveIden)]
pub enum WebpageEmbed {
    Table,
    Id,
    Url,
    Title,
}
