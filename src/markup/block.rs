use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::clean::{clean_block_text, parse_block_metadata};

/// Metadata key for the image kind (chart, table, photo, ...)
pub const META_TYPE: &str = "type";
/// Metadata key for the main content summary
pub const META_MAIN_CONTENT: &str = "main_content";
/// Metadata key for the key elements list
pub const META_KEY_ELEMENTS: &str = "key_elements";

/// An image description block found in source text
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageBlock {
    /// Exact substring of the source, markers included
    pub raw_content: String,
    /// Description with markers and markup decoration removed
    pub clean_text: String,
    /// Byte offset in the source (inclusive)
    pub start_offset: usize,
    /// Byte offset in the source (exclusive)
    pub end_offset: usize,
    /// Parsed fields; a key is present only if its label was found
    pub metadata: BTreeMap<String, String>,
}

impl ImageBlock {
    /// Build a block from a matched span of the source text
    pub fn from_match(raw_content: &str, start_offset: usize, end_offset: usize) -> Self {
        Self {
            raw_content: raw_content.to_string(),
            clean_text: clean_block_text(raw_content),
            start_offset,
            end_offset,
            metadata: parse_block_metadata(raw_content),
        }
    }

    /// Description length in characters, the unit the merge threshold uses
    pub fn char_len(&self) -> usize {
        self.clean_text.chars().count()
    }

    /// True when nothing describable survived cleaning
    pub fn is_blank(&self) -> bool {
        self.clean_text.is_empty()
    }

    pub fn kind(&self) -> Option<&str> {
        self.metadata.get(META_TYPE).map(String::as_str)
    }

    pub fn main_content(&self) -> Option<&str> {
        self.metadata.get(META_MAIN_CONTENT).map(String::as_str)
    }

    pub fn key_elements(&self) -> Option<&str> {
        self.metadata.get(META_KEY_ELEMENTS).map(String::as_str)
    }
}
