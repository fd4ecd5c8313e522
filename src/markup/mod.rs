//! Marker-delimited image description blocks.
//!
//! A block looks like:
//!
//! ```text
//! <!-- IMAGE_START -->
//! **[图片描述]**
//! - 图片类型: 柱状图
//! - 主要内容: 2023 年各季度销售额
//! - 关键元素: Q1, Q2, Q3, Q4
//! <!-- IMAGE_END -->
//! ```
//!
//! Extraction sits behind [`BlockExtractor`] so the matcher can be swapped
//! without touching the segmenter.

mod block;
mod clean;
mod extractor;
mod render;


pub use block::{ImageBlock, META_KEY_ELEMENTS, META_MAIN_CONTENT, META_TYPE};
pub use clean::{clean_block_text, parse_block_metadata};
pub use extractor::{BlockExtractor, MarkerExtractor};
pub use render::{DEFAULT_IMAGE_KIND, ImageDescription, render_block};

/// Extract all image blocks from `text` with the default marker matcher
pub fn extract(text: &str) -> Vec<ImageBlock> {
    MarkerExtractor.extract(text)
}
