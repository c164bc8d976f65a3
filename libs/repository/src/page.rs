use sea_orm::{
    prelude::Uuid, ColumnTrait, DatabaseConnection, EntityTrait,
    IntoActiveModel, PaginatorTrait, QueryFilter, QueryOrder,
    TransactionTrait,
};

use crate::active_models::prelude::{Block, Page};
use crate::active_models::{block, page};
use crate::block::{delete_in, find_for_page, insert_in};
use crate::{now, IntoResponse, RepositoryError, Response};
use entity::prelude::*;

#[derive(Clone, Debug)]
pub struct PageRepository {
    db: DatabaseConnection,
}

impl PageRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

impl From<page::Model> for PageEntity {
    fn from(value: page::Model) -> Self {
        Self {
            id: value.id,
            title: value.title,
            created_at: value.created_at.and_utc(),
            updated_at: value.updated_at.and_utc(),
        }
    }
}

fn new_page(title: &str) -> page::Model {
    let now = now();
    page::Model {
        id: Uuid::new_v4().to_string(),
        title: title.to_string(),
        created_at: now,
        updated_at: now,
    }
}

impl PageRepository {
    pub async fn find_all(&self) -> Response<Vec<PageEntity>> {
        let pages = Page::find()
            .order_by_asc(page::Column::CreatedAt)
            .order_by_asc(page::Column::Id)
            .all(&self.db)
            .await
            .into_response("find all pages")?;

        Ok(pages.into_iter().map(PageEntity::from).collect())
    }

    pub async fn find_by_id(&self, id: &str) -> Response<PageEntity> {
        Page::find_by_id(id.to_string())
            .one(&self.db)
            .await
            .into_response("find page")?
            .map(PageEntity::from)
            .ok_or_else(|| RepositoryError::NotFound {
                entity: "page",
                id: id.to_string(),
            })
    }

    /// The page and its blocks, read in one transaction.
    pub async fn find_with_blocks(
        &self,
        id: &str,
    ) -> Response<(PageEntity, Vec<BlockEntity>)> {
        let txn = self.db.begin().await.into_response("begin read")?;

        let page = Page::find_by_id(id.to_string())
            .one(&txn)
            .await
            .into_response("find page")?
            .ok_or_else(|| RepositoryError::NotFound {
                entity: "page",
                id: id.to_string(),
            })?;
        let blocks = find_for_page(&txn, id).await?;

        txn.commit().await.into_response("commit read")?;

        Ok((PageEntity::from(page), blocks))
    }

    pub async fn insert(&self, title: &str) -> Response<PageEntity> {
        let page = new_page(title);

        Page::insert(page.clone().into_active_model())
            .exec_without_returning(&self.db)
            .await
            .into_response("insert page")?;

        Ok(PageEntity::from(page))
    }

    /// Creates a page with `contents` as its blocks, ordered from 0, in one
    /// transaction. Nothing is written if any row fails.
    pub async fn insert_with_blocks(
        &self,
        title: &str,
        contents: Vec<BlockContent>,
    ) -> Response<PageEntity> {
        let txn = self.db.begin().await.into_response("begin insert")?;
        let page = new_page(title);

        Page::insert(page.clone().into_active_model())
            .exec_without_returning(&txn)
            .await
            .into_response("insert page")?;

        for (order, content) in contents.into_iter().enumerate() {
            insert_in(&txn, &page.id, order as i32, content, page.created_at)
                .await?;
        }

        txn.commit().await.into_response("commit insert")?;

        Ok(PageEntity::from(page))
    }

    /// Deletes the page together with every block and payload it owns.
    pub async fn delete(&self, id: &str) -> Response<()> {
        let txn = self.db.begin().await.into_response("begin delete")?;

        let page = Page::find_by_id(id.to_string())
            .one(&txn)
            .await
            .into_response("find page")?;
        if page.is_none() {
            return Err(RepositoryError::NotFound {
                entity: "page",
                id: id.to_string(),
            });
        }

        let blocks = Block::find()
            .filter(block::Column::PageId.eq(id))
            .all(&txn)
            .await
            .into_response("find blocks of page")?;
        for block in &blocks {
            delete_in(&txn, block).await?;
        }

        Page::delete_by_id(id.to_string())
            .exec(&txn)
            .await
            .into_response("delete page")?;

        txn.commit().await.into_response("commit delete")?;

        Ok(())
    }

    pub async fn count(&self) -> Response<u64> {
        Page::find()
            .count(&self.db)
            .await
            .into_response("count pages")
    }
}

#[cfg(test)]
mod test {
    use sea_orm::{EntityTrait, PaginatorTrait};
    use serde_json::json;

    use super::*;
    use crate::active_models::prelude as tables;
    use crate::test_repository;

    #[tokio::test]
    async fn test_insert_and_find() {
        // Arrange
        let repo = test_repository().await;

        // Act
        let first = repo.page.insert("first").await.unwrap();
        let second = repo.page.insert("second").await.unwrap();

        // Assert
        assert_eq!(repo.page.find_by_id(&first.id).await.unwrap(), first);
        let titles: Vec<_> = repo
            .page
            .find_all()
            .await
            .unwrap()
            .into_iter()
            .map(|p| p.title)
            .collect();
        assert_eq!(titles.len(), 2);
        assert!(titles.contains(&first.title));
        assert!(titles.contains(&second.title));
        assert!(matches!(
            repo.page.find_by_id("missing").await,
            Err(RepositoryError::NotFound { entity: "page", .. })
        ));
    }

    #[tokio::test]
    async fn test_insert_with_blocks_orders_from_zero() {
        // Arrange
        let repo = test_repository().await;
        let contents = vec![
            BlockContent::from_fields(
                BlockType::Heading,
                &json!({"content": "Agenda"}),
            ),
            BlockContent::from_fields(
                BlockType::Table,
                &json!({"data": [["item"], ["budget"]]}),
            ),
            BlockContent::from_fields(
                BlockType::Code,
                &json!({"code": "SELECT 1", "language": "sql"}),
            ),
        ];

        // Act
        let page = repo
            .page
            .insert_with_blocks("Q4 planning", contents)
            .await
            .unwrap();

        // Assert
        let (stored, blocks) =
            repo.page.find_with_blocks(&page.id).await.unwrap();
        assert_eq!(stored, page);
        let summary: Vec<_> =
            blocks.iter().map(|b| (b.order, b.block_type())).collect();
        assert_eq!(
            summary,
            vec![
                (0, BlockType::Heading),
                (1, BlockType::Table),
                (2, BlockType::Code)
            ]
        );
        assert_eq!(blocks[1].content.as_text(), r#"[["item"],["budget"]]"#);
    }

    #[tokio::test]
    async fn test_delete_cascades_to_blocks_and_payloads() {
        // Arrange
        let repo = test_repository().await;
        let kept = repo
            .page
            .insert_with_blocks(
                "kept",
                vec![BlockContent::Text(TextBlock::default())],
            )
            .await
            .unwrap();
        let page = repo
            .page
            .insert_with_blocks(
                "doomed",
                vec![
                    BlockContent::Text(TextBlock::default()),
                    BlockContent::WebpageEmbed(WebpageEmbed::default()),
                ],
            )
            .await
            .unwrap();

        // Act
        repo.page.delete(&page.id).await.unwrap();

        // Assert
        assert_eq!(repo.page.count().await.unwrap(), 1);
        assert!(repo.page.find_by_id(&kept.id).await.is_ok());
        assert_eq!(
            tables::Block::find().count(&repo.page.db).await.unwrap(),
            1
        );
        assert_eq!(
            tables::TextBlock::find().count(&repo.page.db).await.unwrap(),
            1
        );
        assert_eq!(
            tables::WebpageEmbed::find().count(&repo.page.db).await.unwrap(),
            0
        );
        assert!(matches!(
            repo.page.delete(&page.id).await,
            Err(RepositoryError::NotFound { .. })
        ));
    }
}
