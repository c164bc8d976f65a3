//! `SeaORM` entities for the page/block schema.

pub mod prelude;

pub mod block;
pub mod code_block;
pub mod heading_block;
pub mod image_block;
pub mod page;
pub mod table_block;
pub mod text_block;
pub mod webpage_embed;
