use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::SegmentError;

/// Default description length (characters) below which images are inlined
pub const DEFAULT_MERGE_THRESHOLD: usize = 100;

/// How image descriptions are put back into the chunks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", try_from = "String")]
pub enum MergeStrategy {
    /// Always fold the description into the surrounding chunk
    Inline,
    /// Always emit the description as its own chunk
    Separate,
    /// Inline short descriptions, split out long ones
    #[default]
    Contextual,
}

impl MergeStrategy {
    pub const ALL: [MergeStrategy; 3] = [Self::Inline, Self::Separate, Self::Contextual];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Inline => "inline",
            Self::Separate => "separate",
            Self::Contextual => "contextual",
        }
    }
}

impl FromStr for MergeStrategy {
    type Err = SegmentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim();
        Self::ALL
            .into_iter()
            .find(|strategy| strategy.as_str().eq_ignore_ascii_case(name))
            .ok_or_else(|| SegmentError::UnknownStrategy(s.to_string()))
    }
}

impl TryFrom<String> for MergeStrategy {
    type Error = SegmentError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl fmt::Display for MergeStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Merge policy passed into every segmentation call
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MergeConfig {
    /// Contextual strategy inlines descriptions shorter than this
    #[serde(default = "default_merge_threshold")]
    pub merge_threshold: usize,
    #[serde(default)]
    pub strategy: MergeStrategy,
}

fn default_merge_threshold() -> usize {
    DEFAULT_MERGE_THRESHOLD
}

impl Default for MergeConfig {
    fn default() -> Self {
        Self {
            merge_threshold: DEFAULT_MERGE_THRESHOLD,
            strategy: MergeStrategy::default(),
        }
    }
}

impl MergeConfig {
    pub fn new(strategy: MergeStrategy, merge_threshold: usize) -> Self {
        Self {
            merge_threshold,
            strategy,
        }
    }

    pub fn with_strategy(mut self, strategy: MergeStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    pub fn with_threshold(mut self, merge_threshold: usize) -> Self {
        self.merge_threshold = merge_threshold;
        self
    }
}
