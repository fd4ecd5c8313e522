//! Placeholder substitution: swaps image blocks for opaque single-line
//! tokens so any line-oriented splitter can cut the text safely.

#[cfg(test)]
mod tests;

use regex::Regex;
use std::ops::Range;
use tracing::{debug, warn};

use crate::markup::ImageBlock;

/// Token prefix; brackets outside the usual markdown alphabet
const SENTINEL_OPEN: &str = "⟦IMAGE_BLOCK_";
const SENTINEL_CLOSE: &str = "⟧";

/// Token -> block lookup built for one segmentation call
#[derive(Debug, Clone, Default)]
pub struct PlaceholderMap {
    prefix: String,
    blocks: Vec<ImageBlock>,
    pattern: Option<Regex>,
}

/// A token occurrence found inside a chunk
#[derive(Debug, Clone, Copy)]
pub struct PlaceholderMatch<'a> {
    /// Byte range of the token inside the searched text
    pub start: usize,
    pub end: usize,
    pub block: &'a ImageBlock,
}

impl PlaceholderMatch<'_> {
    pub fn range(&self) -> Range<usize> {
        self.start..self.end
    }
}

impl PlaceholderMap {
    fn new(prefix: String, blocks: Vec<ImageBlock>) -> Self {
        let pattern = format!(
            "{}(\\d+){}",
            regex::escape(&prefix),
            regex::escape(SENTINEL_CLOSE)
        );
        Self {
            pattern: Some(Regex::new(&pattern).expect("escaped placeholder pattern is valid")),
            prefix,
            blocks,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    /// Blocks in document order; position is the token index
    pub fn blocks(&self) -> &[ImageBlock] {
        &self.blocks
    }

    /// The token standing in for block `index`
    pub fn token(&self, index: usize) -> String {
        format!("{}{}{}", self.prefix, index, SENTINEL_CLOSE)
    }

    /// Look up the block a (trimmed) token refers to
    pub fn get(&self, token: &str) -> Option<&ImageBlock> {
        if self.blocks.is_empty() {
            return None;
        }
        let index: usize = token
            .trim()
            .strip_prefix(self.prefix.as_str())?
            .strip_suffix(SENTINEL_CLOSE)?
            .parse()
            .ok()?;
        self.blocks.get(index)
    }

    /// Iterate `(token, block)` pairs in document order
    pub fn iter(&self) -> impl Iterator<Item = (String, &ImageBlock)> + '_ {
        self.blocks
            .iter()
            .enumerate()
            .map(|(index, block)| (self.token(index), block))
    }

    /// Find every known token in `text`, left to right.
    ///
    /// Token-shaped strings with an unknown index are left alone.
    pub fn locate<'a>(&'a self, text: &str) -> Vec<PlaceholderMatch<'a>> {
        let Some(pattern) = &self.pattern else {
            return Vec::new();
        };

        pattern
            .captures_iter(text)
            .filter_map(|caps| {
                let whole = caps.get(0)?;
                let index: usize = caps.get(1)?.as_str().parse().ok()?;
                let block = self.blocks.get(index)?;
                Some(PlaceholderMatch {
                    start: whole.start(),
                    end: whole.end(),
                    block,
                })
            })
            .collect()
    }
}

/// Replace each block with a newline-wrapped token.
///
/// Returns the input unchanged with an empty map when there are no blocks.
pub fn substitute(text: &str, blocks: Vec<ImageBlock>) -> (String, PlaceholderMap) {
    if blocks.is_empty() {
        return (text.to_string(), PlaceholderMap::default());
    }

    let map = PlaceholderMap::new(choose_prefix(text), blocks);
    let mut substituted = String::with_capacity(text.len());
    let mut cursor = 0;

    for (index, block) in map.blocks.iter().enumerate() {
        let Some(start) = find_block(text, cursor, block) else {
            warn!(
                "Image block {} not found after byte {}, left in place",
                index, cursor
            );
            continue;
        };
        substituted.push_str(&text[cursor..start]);
        substituted.push('\n');
        substituted.push_str(&map.token(index));
        substituted.push('\n');
        cursor = start + block.raw_content.len();
    }
    substituted.push_str(&text[cursor..]);

    debug!("Substituted {} image blocks with placeholders", map.len());
    (substituted, map)
}

/// Pick a sentinel prefix that does not already occur in `text`
fn choose_prefix(text: &str) -> String {
    if !text.contains(SENTINEL_OPEN) {
        return SENTINEL_OPEN.to_string();
    }

    let mut salt = 0u32;
    loop {
        let prefix = format!("{}{}_", SENTINEL_OPEN, salt);
        if !text.contains(&prefix) {
            warn!("Placeholder sentinel already present in text, using {}", prefix);
            return prefix;
        }
        salt += 1;
    }
}

/// Byte position of `block` at or after `cursor`.
///
/// Trusts the recorded offsets when they address the raw content exactly,
/// otherwise falls back to the next occurrence of the raw content.
fn find_block(text: &str, cursor: usize, block: &ImageBlock) -> Option<usize> {
    if block.raw_content.is_empty() {
        return None;
    }
    let (start, end) = (block.start_offset, block.end_offset);
    if start >= cursor && text.get(start..end) == Some(block.raw_content.as_str()) {
        return Some(start);
    }
    text.get(cursor..)?
        .find(block.raw_content.as_str())
        .map(|pos| cursor + pos)
}
