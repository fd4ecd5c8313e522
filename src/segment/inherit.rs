use crate::chunker::{Chunk, ChunkMetadata};

/// Build a chunk derived from a parent, owning its own copy of the metadata
pub fn derive_chunk(parent: &ChunkMetadata, content: impl Into<String>) -> Chunk {
    Chunk::with_metadata(content, parent.clone())
}

/// Collects the chunks a single parent decomposes into.
///
/// Content is trimmed on the way in and blank pieces are dropped.
pub(crate) struct Children<'a> {
    parent: &'a ChunkMetadata,
    out: &'a mut Vec<Chunk>,
}

impl<'a> Children<'a> {
    pub(crate) fn new(parent: &'a ChunkMetadata, out: &'a mut Vec<Chunk>) -> Self {
        Self { parent, out }
    }

    pub(crate) fn push(&mut self, content: &str) {
        let content = content.trim();
        if !content.is_empty() {
            self.out.push(derive_chunk(self.parent, content));
        }
    }
}
