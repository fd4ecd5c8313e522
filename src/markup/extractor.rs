use regex::Regex;
use std::sync::LazyLock;

use super::ImageBlock;

static BLOCK_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)<!--\s*IMAGE_START\s*-->.*?<!--\s*IMAGE_END\s*-->")
        .expect("image block regex is valid")
});

/// Finds image blocks in source text
pub trait BlockExtractor: Send + Sync {
    /// Return every block in document order, without overlaps.
    ///
    /// Unterminated markers are not an error; they simply yield no block.
    fn extract(&self, text: &str) -> Vec<ImageBlock>;
}

/// Case-insensitive `<!-- IMAGE_START -->` ... `<!-- IMAGE_END -->` matcher.
///
/// Matching is non-greedy, so adjacent blocks stay separate.
#[derive(Debug, Clone, Copy, Default)]
pub struct MarkerExtractor;

impl BlockExtractor for MarkerExtractor {
    fn extract(&self, text: &str) -> Vec<ImageBlock> {
        BLOCK_RE
            .find_iter(text)
            .map(|m| ImageBlock::from_match(m.as_str(), m.start(), m.end()))
            .collect()
    }
}
