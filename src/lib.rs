//! Image-aware text segmentation.
//!
//! Documents carrying `<!-- IMAGE_START -->` ... `<!-- IMAGE_END -->`
//! description blocks are split by any [`DelegateSplitter`] without ever
//! cutting a block in half. Blocks are swapped for placeholder tokens
//! before the delegate runs and restored afterwards, either inline, as
//! standalone chunks, or decided per image by length.

// Public API exports
pub mod chunker;
pub mod config;
pub mod error;
pub mod markup;
pub mod placeholder;
pub mod segment;

// Re-export main types for convenience
pub use chunker::{
    Chunk, ChunkMetadata, DelegateSplitter, MarkdownHeaderSplitter, ParagraphSplitter, from_fn,
};

pub use config::{Config, LogLevel, LoggingConfig, SplitterConfig};
pub use error::SegmentError;

pub use markup::{BlockExtractor, ImageBlock, ImageDescription, MarkerExtractor, extract, render_block};
pub use placeholder::{PlaceholderMap, substitute};

pub use segment::{ImageAwareSplitter, MergeConfig, MergeStrategy, reconstruct, segment};
