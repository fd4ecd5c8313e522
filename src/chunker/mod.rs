mod header;
mod splitter;

#[cfg(test)]
mod tests;

pub use header::MarkdownHeaderSplitter;
pub use splitter::ParagraphSplitter;

use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Free-form per-chunk metadata (section headers, indices, ...)
pub type ChunkMetadata = serde_json::Map<String, serde_json::Value>;

/// A chunk of text ready for embedding/indexing
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Chunk {
    /// The text content of this chunk
    pub content: String,
    /// Metadata owned by this chunk alone
    #[serde(default)]
    pub metadata: ChunkMetadata,
}

impl Chunk {
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            metadata: ChunkMetadata::new(),
        }
    }

    pub fn with_metadata(content: impl Into<String>, metadata: ChunkMetadata) -> Self {
        Self {
            content: content.into(),
            metadata,
        }
    }

    /// True when the content is empty or whitespace only
    pub fn is_blank(&self) -> bool {
        self.content.trim().is_empty()
    }
}

/// The splitting capability the image-aware segmenter wraps.
///
/// Implementations may use any policy (headers, size, semantics), but must
/// keep single-line tokens in their input intact: never cut inside a line
/// that consists of one token.
pub trait DelegateSplitter: Send + Sync {
    /// Split text into ordered chunks
    fn split(&self, text: &str) -> anyhow::Result<Vec<Chunk>>;
}

impl<T: DelegateSplitter + ?Sized> DelegateSplitter for Box<T> {
    fn split(&self, text: &str) -> anyhow::Result<Vec<Chunk>> {
        (**self).split(text)
    }
}

impl<T: DelegateSplitter + ?Sized> DelegateSplitter for Arc<T> {
    fn split(&self, text: &str) -> anyhow::Result<Vec<Chunk>> {
        (**self).split(text)
    }
}

/// Adapter turning a closure into a [`DelegateSplitter`]
pub struct FnSplitter<F>(F);

/// Wrap a closure as a delegate splitter
///
/// # Example
/// ```
/// use imgsplit::chunker::{from_fn, Chunk, DelegateSplitter};
///
/// let lines = from_fn(|text: &str| Ok(text.lines().map(Chunk::new).collect()));
/// assert_eq!(lines.split("a\nb").unwrap().len(), 2);
/// ```
pub fn from_fn<F>(f: F) -> FnSplitter<F>
where
    F: Fn(&str) -> anyhow::Result<Vec<Chunk>> + Send + Sync,
{
    FnSplitter(f)
}

impl<F> DelegateSplitter for FnSplitter<F>
where
    F: Fn(&str) -> anyhow::Result<Vec<Chunk>> + Send + Sync,
{
    fn split(&self, text: &str) -> anyhow::Result<Vec<Chunk>> {
        (self.0)(text)
    }
}
