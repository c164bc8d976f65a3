pub use super::block::Entity as Block;
pub use super::code_block::Entity as CodeBlock;
pub use super::heading_block::Entity as HeadingBlock;
pub use super::image_block::Entity as ImageBlock;
pub use super::page::Entity as Page;
pub use super::table_block::Entity as TableBlock;
pub use super::text_block::Entity as TextBlock;
pub use super::webpage_embed::Entity as WebpageEmbed;
