use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
#[sea_orm(table_name = "block")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub page_id: String,
    pub r#type: String,
    pub order: i32,
    #[sea_orm(unique)]
    pub text_block_id: Option<String>,
    #[sea_orm(unique)]
    pub heading_block_id: Option<String>,
    #[sea_orm(unique)]
    pub image_block_id: Option<String>,
    #[sea_orm(unique)]
    pub code_block_id: Option<String>,
    #[sea_orm(unique)]
    pub table_block_id: Option<String>,
    #[sea_orm(unique)]
    pub webpage_embed_id: Option<String>,
    pub created_at: DateTime,
    pub updated_at: DateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::page::Entity",
        from = "Column::PageId",
        to = "super::page::Column::Id"
    )]
    Page,
}

impl Related<super::page::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Page.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
