use super::{Chunk, DelegateSplitter};
use crate::config::ParagraphSplitterConfig;

/// Separator placed between paragraphs packed into one chunk
const PARAGRAPH_SEPARATOR: &str = "\n\n";

/// Size-based splitter that packs blank-line separated paragraphs.
///
/// - Merge small paragraphs together up to `max_chars`
/// - Carry up to `overlap` characters of trailing paragraphs forward
/// - Fall back to line packing for oversized paragraphs
/// - Never cut inside a line
#[derive(Debug, Clone)]
pub struct ParagraphSplitter {
    max_chars: usize,
    overlap: usize,
}

impl ParagraphSplitter {
    pub fn new(max_chars: usize, overlap: usize) -> Self {
        Self {
            max_chars: max_chars.max(1),
            overlap,
        }
    }

    pub fn from_config(config: &ParagraphSplitterConfig) -> Self {
        Self::new(config.max_chars, config.overlap)
    }

    /// Split text into chunk strings
    pub fn split_text(&self, text: &str) -> Vec<String> {
        let paragraphs = split_paragraphs(text);
        if paragraphs.is_empty() {
            return vec![];
        }

        let mut chunks = Vec::new();
        let mut current_batch: Vec<&str> = Vec::new();

        for paragraph in paragraphs {
            let paragraph_chars = char_len(paragraph);

            // If this paragraph alone exceeds max_chars, split it separately
            if paragraph_chars > self.max_chars {
                if !current_batch.is_empty() {
                    chunks.push(current_batch.join(PARAGRAPH_SEPARATOR));
                    current_batch.clear();
                }
                chunks.extend(self.split_large_paragraph(paragraph));
                continue;
            }

            // Check if adding this paragraph would exceed the limit
            if !current_batch.is_empty()
                && packed_len(&current_batch) + PARAGRAPH_SEPARATOR.len() + paragraph_chars
                    > self.max_chars
            {
                chunks.push(current_batch.join(PARAGRAPH_SEPARATOR));
                self.retain_overlap(&mut current_batch);

                while !current_batch.is_empty()
                    && packed_len(&current_batch) + PARAGRAPH_SEPARATOR.len() + paragraph_chars
                        > self.max_chars
                {
                    current_batch.remove(0);
                }
            }

            current_batch.push(paragraph);
        }

        // Flush remaining batch
        if !current_batch.is_empty() {
            chunks.push(current_batch.join(PARAGRAPH_SEPARATOR));
        }

        chunks
    }

    /// Keep the trailing paragraphs that fit into the overlap budget
    fn retain_overlap(&self, batch: &mut Vec<&str>) {
        let mut kept = 0;
        let mut total = 0;
        for paragraph in batch.iter().rev() {
            let separator = if kept > 0 { PARAGRAPH_SEPARATOR.len() } else { 0 };
            let added = char_len(paragraph) + separator;
            if total + added > self.overlap {
                break;
            }
            total += added;
            kept += 1;
        }
        let drop = batch.len() - kept;
        batch.drain(..drop);
    }

    /// Split a paragraph that exceeds max_chars.
    /// Falls back to line packing; a single oversized line is kept whole.
    fn split_large_paragraph(&self, paragraph: &str) -> Vec<String> {
        let mut chunks = Vec::new();
        let mut current_lines: Vec<&str> = Vec::new();
        let mut current_chars = 0;

        for line in paragraph.lines() {
            let line_chars = char_len(line);

            // If a single line is too big, we have to include it anyway
            if line_chars > self.max_chars {
                if !current_lines.is_empty() {
                    chunks.push(current_lines.join("\n"));
                    current_lines.clear();
                    current_chars = 0;
                }
                chunks.push(line.to_string());
                continue;
            }

            let separator = usize::from(!current_lines.is_empty());
            if current_chars + separator + line_chars > self.max_chars && !current_lines.is_empty()
            {
                chunks.push(current_lines.join("\n"));
                current_lines.clear();
                current_chars = 0;
            }

            current_chars += line_chars + usize::from(!current_lines.is_empty());
            current_lines.push(line);
        }

        if !current_lines.is_empty() {
            chunks.push(current_lines.join("\n"));
        }

        chunks
    }
}

impl DelegateSplitter for ParagraphSplitter {
    fn split(&self, text: &str) -> anyhow::Result<Vec<Chunk>> {
        Ok(self.split_text(text).into_iter().map(Chunk::new).collect())
    }
}

/// Split on blank lines, dropping empty paragraphs.
/// Paragraphs borrow from `text` and keep their inner newlines.
fn split_paragraphs(text: &str) -> Vec<&str> {
    let mut paragraphs = Vec::new();
    let mut start: Option<usize> = None;
    let mut end = 0;
    let mut offset = 0;

    for line in text.split_inclusive('\n') {
        let line_start = offset;
        offset += line.len();

        if line.trim().is_empty() {
            if let Some(s) = start.take() {
                paragraphs.push(&text[s..end]);
            }
            continue;
        }

        if start.is_none() {
            start = Some(line_start);
        }
        end = line_start + line.trim_end_matches(['\r', '\n']).len();
    }

    if let Some(s) = start {
        paragraphs.push(&text[s..end]);
    }

    paragraphs
}

fn char_len(text: &str) -> usize {
    text.chars().count()
}

/// Length in characters of `batch` joined with the paragraph separator
fn packed_len(batch: &[&str]) -> usize {
    let content: usize = batch.iter().map(|p| char_len(p)).sum();
    content + PARAGRAPH_SEPARATOR.len() * batch.len().saturating_sub(1)
}
