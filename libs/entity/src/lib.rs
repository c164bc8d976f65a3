pub mod block;
pub mod page;

pub mod prelude {
    pub use crate::block::{
        Block as BlockEntity, BlockContent, BlockType, CodeBlock,
        HeadingBlock, ImageBlock, TableBlock, TextBlock, WebpageEmbed,
    };
    pub use crate::page::Page as PageEntity;
}
