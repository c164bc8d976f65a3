use chrono::NaiveDateTime;
use log::warn;
use sea_orm::{
    prelude::Uuid, ActiveValue, ColumnTrait, ConnectionTrait,
    DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, QuerySelect,
    TransactionTrait, TryIntoModel,
};
use strum::IntoEnumIterator;

use crate::active_models::block;
use crate::active_models::prelude::{Block, Page};
use crate::{now, IntoResponse, RepositoryError, Response};
use entity::prelude::*;

pub(crate) mod payload;

#[derive(Clone, Debug)]
pub struct BlockRepository {
    db: DatabaseConnection,
}

impl BlockRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

fn into_entity(value: block::Model, content: BlockContent) -> BlockEntity {
    BlockEntity {
        id: value.id,
        page_id: value.page_id,
        order: value.order,
        content,
        created_at: value.created_at.and_utc(),
        updated_at: value.updated_at.and_utc(),
    }
}

impl BlockRepository {
    pub async fn find_by_id(&self, id: &str) -> Response<BlockEntity> {
        let block = find_row(&self.db, id).await?;
        let content = payload::load(&self.db, &block).await?;

        Ok(into_entity(block, content))
    }

    /// Blocks of a page ascending by `order`; equal orders fall back to
    /// creation time, then id.
    pub async fn find_by_page_id(
        &self,
        page_id: &str,
    ) -> Response<Vec<BlockEntity>> {
        find_for_page(&self.db, page_id).await
    }

    /// Highest order currently used on the page.
    pub async fn max_order(&self, page_id: &str) -> Response<Option<i32>> {
        max_order(&self.db, page_id).await
    }

    /// Writes the block row and its payload row in one transaction, at an
    /// explicit `order`.
    pub async fn insert(
        &self,
        page_id: &str,
        order: i32,
        content: BlockContent,
    ) -> Response<BlockEntity> {
        let txn = self.db.begin().await.into_response("begin insert")?;

        lock_page(&txn, page_id).await?;
        let block = insert_in(&txn, page_id, order, content, now()).await?;

        txn.commit().await.into_response("commit insert")?;

        Ok(block)
    }

    /// Appends a block after the last one of the page. The page row is locked
    /// for the transaction so concurrent appends get distinct orders.
    pub async fn append(
        &self,
        page_id: &str,
        content: BlockContent,
    ) -> Response<BlockEntity> {
        let txn = self.db.begin().await.into_response("begin append")?;

        lock_page(&txn, page_id).await?;
        let order = next_order(&txn, page_id).await?;
        let block = insert_in(&txn, page_id, order, content, now()).await?;

        txn.commit().await.into_response("commit append")?;

        Ok(block)
    }

    /// Replaces the payload of block `id`. The payload must be of the block's
    /// stored type; `type`, `order` and `page_id` never change.
    pub async fn update_content(
        &self,
        id: &str,
        mut content: BlockContent,
    ) -> Response<BlockEntity> {
        let txn = self.db.begin().await.into_response("begin update")?;

        let block = find_row(&txn, id).await?;
        let block_type = payload::stored_type(&block)?;
        if block_type != content.block_type() {
            return Err(RepositoryError::InvalidState(format!(
                "block {} is {} but got {} content",
                id,
                block_type,
                content.block_type()
            )));
        }
        let Some(payload_id) = payload::reference(&block, block_type) else {
            return Err(RepositoryError::InvalidState(format!(
                "block {} of type {} has no payload reference",
                id, block_type
            )));
        };
        content.set_payload_id(payload_id.to_string());

        payload::update(&txn, &content)
            .await
            .into_response("update payload")?;

        let updated_at = now();
        Block::update(block::ActiveModel {
            id: ActiveValue::Unchanged(block.id.clone()),
            updated_at: ActiveValue::Set(updated_at),
            ..Default::default()
        })
        .exec(&txn)
        .await
        .into_response("touch block")?;

        txn.commit().await.into_response("commit update")?;

        Ok(into_entity(
            block::Model { updated_at, ..block },
            content,
        ))
    }

    /// Removes the block row and its payload row in one transaction. A
    /// missing payload row is logged and does not stop the delete.
    pub async fn delete(&self, id: &str) -> Response<()> {
        let txn = self.db.begin().await.into_response("begin delete")?;

        let block = find_row(&txn, id).await?;
        delete_in(&txn, &block).await?;

        txn.commit().await.into_response("commit delete")?;

        Ok(())
    }
}

/// `SELECT ... FOR UPDATE` on the page row. SQLite has no row locks; its
/// write transactions are already serialized.
async fn lock_page<C: ConnectionTrait>(db: &C, page_id: &str) -> Response<()> {
    Page::find_by_id(page_id.to_string())
        .lock_exclusive()
        .one(db)
        .await
        .into_response("lock page")?
        .ok_or_else(|| RepositoryError::NotFound {
            entity: "page",
            id: page_id.to_string(),
        })?;

    Ok(())
}

async fn max_order<C: ConnectionTrait>(
    db: &C,
    page_id: &str,
) -> Response<Option<i32>> {
    let block = Block::find()
        .filter(block::Column::PageId.eq(page_id))
        .order_by_desc(block::Column::Order)
        .one(db)
        .await
        .into_response("find max order")?;

    Ok(block.map(|b| b.order))
}

async fn next_order<C: ConnectionTrait>(
    db: &C,
    page_id: &str,
) -> Response<i32> {
    Ok(max_order(db, page_id).await?.map_or(0, |order| order + 1))
}

async fn find_row<C: ConnectionTrait>(
    db: &C,
    id: &str,
) -> Response<block::Model> {
    Block::find_by_id(id.to_string())
        .one(db)
        .await
        .into_response("find block")?
        .ok_or_else(|| RepositoryError::NotFound {
            entity: "block",
            id: id.to_string(),
        })
}

pub(crate) async fn find_for_page<C: ConnectionTrait>(
    db: &C,
    page_id: &str,
) -> Response<Vec<BlockEntity>> {
    let blocks = Block::find()
        .filter(block::Column::PageId.eq(page_id))
        .order_by_asc(block::Column::Order)
        .order_by_asc(block::Column::CreatedAt)
        .order_by_asc(block::Column::Id)
        .all(db)
        .await
        .into_response("find blocks by page id")?;

    let mut entities = Vec::with_capacity(blocks.len());
    for block in blocks {
        let content = payload::load(db, &block).await?;
        entities.push(into_entity(block, content));
    }

    Ok(entities)
}

/// Payload first so the block row's foreign key resolves.
pub(crate) async fn insert_in<C: ConnectionTrait>(
    db: &C,
    page_id: &str,
    order: i32,
    mut content: BlockContent,
    now: NaiveDateTime,
) -> Response<BlockEntity> {
    payload::insert(db, &mut content)
        .await
        .into_response("insert payload")?;

    let mut model = block::ActiveModel {
        id: ActiveValue::Set(Uuid::new_v4().to_string()),
        page_id: ActiveValue::Set(page_id.to_string()),
        order: ActiveValue::Set(order),
        created_at: ActiveValue::Set(now),
        updated_at: ActiveValue::Set(now),
        ..Default::default()
    };
    payload::link(&mut model, &content);

    Block::insert(model.clone())
        .exec_without_returning(db)
        .await
        .into_response("insert block")?;
    let block = model.try_into_model().into_response("read block")?;

    Ok(into_entity(block, content))
}

/// Block row first, then every payload it references. References that do
/// not match the stored type are removed too so no row is left orphaned.
pub(crate) async fn delete_in<C: ConnectionTrait>(
    db: &C,
    block: &block::Model,
) -> Response<()> {
    Block::delete_by_id(block.id.clone())
        .exec(db)
        .await
        .into_response("delete block")?;

    let mut deleted = 0;
    for block_type in BlockType::iter() {
        let Some(payload_id) = payload::reference(block, block_type) else {
            continue;
        };
        deleted += payload::delete(db, block_type, payload_id)
            .await
            .into_response("delete payload")?;
    }

    if deleted == 0 {
        warn!(
            "block {} of type {} had no payload row to delete",
            block.id, block.r#type
        );
    }

    Ok(())
}

#[cfg(test)]
mod test {
    use sea_orm::{EntityTrait, PaginatorTrait};
    use serde_json::json;

    use super::*;
    use crate::active_models::prelude as tables;
    use crate::{test_repository, Repository};

    async fn page(repo: &Repository) -> String {
        repo.page.insert("T").await.unwrap().id
    }

    #[tokio::test]
    async fn test_insert_populates_exactly_the_matching_payload() {
        // Arrange
        let repo = test_repository().await;
        let page_id = page(&repo).await;

        for (order, block_type) in BlockType::iter().enumerate() {
            let content =
                BlockContent::from_fields(block_type, &json!({"url": "u"}));

            // Act
            let block = repo
                .block
                .insert(&page_id, order as i32, content)
                .await
                .unwrap();

            // Assert
            let row = Block::find_by_id(block.id.clone())
                .one(&repo.block.db)
                .await
                .unwrap()
                .unwrap();
            let populated: Vec<_> = BlockType::iter()
                .filter(|t| payload::reference(&row, *t).is_some())
                .collect();
            assert_eq!(populated, vec![block_type]);
            assert_eq!(row.r#type, block_type.to_string());
            assert_eq!(block.block_type(), block_type);
            assert!(!block.content.payload_id().is_empty());
        }
    }

    #[tokio::test]
    async fn test_insert_into_unknown_page_writes_nothing() {
        // Arrange
        let repo = test_repository().await;
        let content = BlockContent::Text(TextBlock::default());

        // Act
        let result = repo.block.insert("missing", 0, content).await;

        // Assert
        assert!(matches!(
            result,
            Err(RepositoryError::NotFound { entity: "page", .. })
        ));
        assert_eq!(
            tables::TextBlock::find().count(&repo.block.db).await.unwrap(),
            0
        );
        assert_eq!(Block::find().count(&repo.block.db).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_failed_write_rolls_back_earlier_rows() {
        // Arrange
        let repo = test_repository().await;
        let page_id = page(&repo).await;
        let txn = repo.block.db.begin().await.unwrap();
        insert_in(
            &txn,
            &page_id,
            0,
            BlockContent::Code(CodeBlock::default()),
            now(),
        )
        .await
        .unwrap();

        // Act
        // the payload row is written, then the block row violates its page FK
        let result = insert_in(
            &txn,
            "missing",
            1,
            BlockContent::Text(TextBlock::default()),
            now(),
        )
        .await;
        drop(txn);

        // Assert
        assert!(matches!(result, Err(RepositoryError::InSeaOrmDbErr { .. })));
        let db = &repo.block.db;
        assert_eq!(tables::Page::find().count(db).await.unwrap(), 1);
        assert_eq!(Block::find().count(db).await.unwrap(), 0);
        assert_eq!(tables::CodeBlock::find().count(db).await.unwrap(), 0);
        assert_eq!(tables::TextBlock::find().count(db).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_append_continues_after_max_order() {
        // Arrange
        let repo = test_repository().await;
        let page_id = page(&repo).await;
        repo.block
            .insert(&page_id, 4, BlockContent::Text(TextBlock::default()))
            .await
            .unwrap();

        // Act
        let appended = repo
            .block
            .append(&page_id, BlockContent::Code(CodeBlock::default()))
            .await
            .unwrap();
        let missing = repo
            .block
            .append("missing", BlockContent::Text(TextBlock::default()))
            .await;

        // Assert
        assert_eq!(appended.order, 5);
        assert!(matches!(
            missing,
            Err(RepositoryError::NotFound { entity: "page", .. })
        ));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_appends_get_distinct_orders() {
        // Arrange
        let repo = test_repository().await;
        let page_id = page(&repo).await;

        // Act
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let blocks = repo.block.clone();
                let page_id = page_id.clone();
                let content = BlockContent::Text(TextBlock::default());
                tokio::spawn(
                    async move { blocks.append(&page_id, content).await },
                )
            })
            .collect();
        let mut orders = Vec::new();
        for handle in handles {
            orders.push(handle.await.unwrap().unwrap().order);
        }

        // Assert
        orders.sort();
        assert_eq!(orders, (0..8).collect::<Vec<_>>());
    }

    #[tokio::test]
    async fn test_find_by_page_id_sorts_by_order_with_gaps() {
        // Arrange
        let repo = test_repository().await;
        let page_id = page(&repo).await;
        let other_page_id = page(&repo).await;
        for (order, content) in [(5, "five"), (0, "zero"), (2, "two")] {
            repo.block
                .insert(
                    &page_id,
                    order,
                    BlockContent::Text(TextBlock {
                        content: content.to_string(),
                        ..Default::default()
                    }),
                )
                .await
                .unwrap();
        }
        repo.block
            .insert(
                &other_page_id,
                1,
                BlockContent::Text(TextBlock::default()),
            )
            .await
            .unwrap();

        // Act
        let blocks = repo.block.find_by_page_id(&page_id).await.unwrap();

        // Assert
        let orders: Vec<_> = blocks.iter().map(|b| b.order).collect();
        assert_eq!(orders, vec![0, 2, 5]);
        assert_eq!(blocks[0].content.as_text(), "zero");
        assert_eq!(repo.block.max_order(&page_id).await.unwrap(), Some(5));
        assert_eq!(repo.block.max_order("empty").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_update_content_keeps_block_fields() {
        // Arrange
        let repo = test_repository().await;
        let page_id = page(&repo).await;
        let block = repo
            .block
            .insert(
                &page_id,
                3,
                BlockContent::Text(TextBlock {
                    content: "before".to_string(),
                    ..Default::default()
                }),
            )
            .await
            .unwrap();

        // Act
        let updated = repo
            .block
            .update_content(
                &block.id,
                BlockContent::Text(TextBlock {
                    content: "X".to_string(),
                    ..Default::default()
                }),
            )
            .await
            .unwrap();

        // Assert
        let stored = repo.block.find_by_id(&block.id).await.unwrap();
        assert_eq!(stored, updated);
        assert_eq!(stored.content.as_text(), "X");
        assert_eq!(stored.content.payload_id(), block.content.payload_id());
        assert_eq!(stored.order, 3);
        assert_eq!(stored.page_id, page_id);
        assert_eq!(stored.block_type(), BlockType::Text);
    }

    #[tokio::test]
    async fn test_update_content_rejects_other_type() {
        // Arrange
        let repo = test_repository().await;
        let page_id = page(&repo).await;
        let block = repo
            .block
            .insert(&page_id, 0, BlockContent::Text(TextBlock::default()))
            .await
            .unwrap();

        // Act
        let result = repo
            .block
            .update_content(
                &block.id,
                BlockContent::Code(CodeBlock::default()),
            )
            .await;

        // Assert
        assert!(matches!(result, Err(RepositoryError::InvalidState(_))));
        assert_eq!(
            repo.block.find_by_id(&block.id).await.unwrap().block_type(),
            BlockType::Text
        );
    }

    #[tokio::test]
    async fn test_update_content_of_unknown_block() {
        let repo = test_repository().await;

        let result = repo
            .block
            .update_content("missing", BlockContent::Text(TextBlock::default()))
            .await;

        assert!(matches!(
            result,
            Err(RepositoryError::NotFound { entity: "block", .. })
        ));
    }

    #[tokio::test]
    async fn test_delete_removes_block_and_payload() {
        // Arrange
        let repo = test_repository().await;
        let page_id = page(&repo).await;
        let block = repo
            .block
            .insert(
                &page_id,
                0,
                BlockContent::Image(ImageBlock {
                    url: "https://example.com/a.png".to_string(),
                    ..Default::default()
                }),
            )
            .await
            .unwrap();

        // Act
        repo.block.delete(&block.id).await.unwrap();

        // Assert
        assert!(matches!(
            repo.block.find_by_id(&block.id).await,
            Err(RepositoryError::NotFound { .. })
        ));
        assert_eq!(
            tables::ImageBlock::find().count(&repo.block.db).await.unwrap(),
            0
        );
        assert!(matches!(
            repo.block.delete(&block.id).await,
            Err(RepositoryError::NotFound { .. })
        ));
    }

    #[tokio::test]
    async fn test_delete_tolerates_missing_payload_reference() {
        // Arrange
        let repo = test_repository().await;
        let page_id = page(&repo).await;
        let block = repo
            .block
            .insert(&page_id, 0, BlockContent::Text(TextBlock::default()))
            .await
            .unwrap();
        Block::update(block::ActiveModel {
            id: ActiveValue::Unchanged(block.id.clone()),
            text_block_id: ActiveValue::Set(None),
            ..Default::default()
        })
        .exec(&repo.block.db)
        .await
        .unwrap();

        // Act
        let found = repo.block.find_by_id(&block.id).await;
        let deleted = repo.block.delete(&block.id).await;

        // Assert
        assert!(matches!(found, Err(RepositoryError::InvalidState(_))));
        assert!(deleted.is_ok());
        assert_eq!(Block::find().count(&repo.block.db).await.unwrap(), 0);
    }
}
