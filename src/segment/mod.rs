//! Image-aware segmentation.
//!
//! Pipeline for one document:
//!
//! 1. extract image blocks ([`crate::markup`])
//! 2. swap them for placeholder tokens ([`crate::placeholder`])
//! 3. run the delegate splitter over the substituted text
//! 4. [`reconstruct`] the chunks according to the [`MergeStrategy`]
//!
//! Every call owns its own placeholder map, so independent documents can be
//! segmented concurrently through a shared `&ImageAwareSplitter`.

mod inherit;
mod reconstruct;
mod segmenter;
mod strategy;


pub use inherit::derive_chunk;
pub use reconstruct::{IMAGE_LABEL, INLINE_MARK, inline_image, reconstruct, standalone_image};
pub use segmenter::{ImageAwareSplitter, segment};
pub use strategy::{DEFAULT_MERGE_THRESHOLD, MergeConfig, MergeStrategy};
