use tracing::debug;

use super::{MergeConfig, MergeStrategy, reconstruct};
use crate::chunker::{Chunk, DelegateSplitter};
use crate::config::Config;
use crate::error::SegmentError;
use crate::markup::{BlockExtractor, MarkerExtractor};
use crate::placeholder::substitute;

/// Run the full pipeline once: extract, substitute, delegate, reconstruct.
///
/// Errors from the delegate are returned unchanged inside
/// [`SegmentError::Delegate`].
pub fn segment<D>(
    text: &str,
    delegate: &D,
    extractor: &dyn BlockExtractor,
    config: &MergeConfig,
) -> Result<Vec<Chunk>, SegmentError>
where
    D: DelegateSplitter + ?Sized,
{
    if text.trim().is_empty() {
        return Ok(Vec::new());
    }

    let blocks = extractor.extract(text);
    debug!("Extracted {} image blocks from {} bytes", blocks.len(), text.len());

    let (substituted, map) = substitute(text, blocks);
    let chunks = delegate.split(&substituted)?;

    Ok(reconstruct(chunks, &map, config))
}

/// Wraps any [`DelegateSplitter`] so image blocks are never cut by a chunk
/// boundary and are restored according to a [`MergeConfig`].
///
/// ```
/// use imgsplit::chunker::ParagraphSplitter;
/// use imgsplit::segment::{ImageAwareSplitter, MergeConfig, MergeStrategy};
///
/// let splitter = ImageAwareSplitter::with_config(
///     ParagraphSplitter::new(1000, 0),
///     MergeConfig::new(MergeStrategy::Separate, 100),
/// );
/// let chunks = splitter
///     .split("intro\n<!--IMAGE_START-->a chart<!--IMAGE_END-->\noutro")
///     .unwrap();
/// assert_eq!(chunks[1].content, "[IMAGE]\na chart");
/// ```
pub struct ImageAwareSplitter<D> {
    delegate: D,
    extractor: Box<dyn BlockExtractor>,
    config: MergeConfig,
}

impl<D: DelegateSplitter> ImageAwareSplitter<D> {
    /// Wrap `delegate` with the default merge policy
    pub fn new(delegate: D) -> Self {
        Self::with_config(delegate, MergeConfig::default())
    }

    pub fn with_config(delegate: D, config: MergeConfig) -> Self {
        Self {
            delegate,
            extractor: Box::new(MarkerExtractor),
            config,
        }
    }

    /// Replace the block matcher
    pub fn extractor(mut self, extractor: impl BlockExtractor + 'static) -> Self {
        self.extractor = Box::new(extractor);
        self
    }

    pub fn strategy(mut self, strategy: MergeStrategy) -> Self {
        self.config.strategy = strategy;
        self
    }

    /// Select the strategy by name, failing on anything unrecognised
    pub fn strategy_named(self, name: &str) -> Result<Self, SegmentError> {
        let strategy = name.parse()?;
        Ok(self.strategy(strategy))
    }

    pub fn merge_threshold(mut self, merge_threshold: usize) -> Self {
        self.config.merge_threshold = merge_threshold;
        self
    }

    pub fn config(&self) -> &MergeConfig {
        &self.config
    }

    pub fn delegate(&self) -> &D {
        &self.delegate
    }

    /// Segment one document
    pub fn split(&self, text: &str) -> Result<Vec<Chunk>, SegmentError> {
        segment(text, &self.delegate, self.extractor.as_ref(), &self.config)
    }
}

impl ImageAwareSplitter<Box<dyn DelegateSplitter>> {
    /// Build the splitter described by a validated [`Config`]
    pub fn from_config(config: &Config) -> Result<Self, SegmentError> {
        config.validate()?;
        Ok(Self::with_config(config.splitter.build(), config.merge))
    }
}

impl<D: DelegateSplitter> DelegateSplitter for ImageAwareSplitter<D> {
    fn split(&self, text: &str) -> anyhow::Result<Vec<Chunk>> {
        Ok(ImageAwareSplitter::split(self, text)?)
    }
}
