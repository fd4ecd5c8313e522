use tracing::{debug, trace};

use super::inherit::Children;
use super::{MergeConfig, MergeStrategy};
use crate::chunker::Chunk;
use crate::markup::ImageBlock;
use crate::placeholder::{PlaceholderMap, PlaceholderMatch};

/// Marker prefixed to descriptions folded into text
pub const INLINE_MARK: &str = "📷";
/// Label heading a standalone image chunk
pub const IMAGE_LABEL: &str = "[IMAGE]";

/// Inline form of an image description
pub fn inline_image(block: &ImageBlock) -> String {
    format!("{} {}", INLINE_MARK, block.clean_text)
}

/// Standalone chunk form of an image description
pub fn standalone_image(block: &ImageBlock) -> String {
    format!("{}\n{}", IMAGE_LABEL, block.clean_text)
}

/// Put image descriptions back into delegate output.
///
/// Output order follows input order. Every chunk is trimmed and blank
/// chunks are dropped. With an empty map the chunks only get trimmed.
pub fn reconstruct(chunks: Vec<Chunk>, map: &PlaceholderMap, config: &MergeConfig) -> Vec<Chunk> {
    let input_count = chunks.len();
    let mut output = Vec::with_capacity(input_count);

    for chunk in chunks {
        let found = map.locate(&chunk.content);
        if found.is_empty() {
            push_trimmed(chunk, &mut output);
            continue;
        }

        match config.strategy {
            MergeStrategy::Inline => restore_inline(chunk, &found, &mut output),
            MergeStrategy::Separate => restore_separate(&chunk, &found, &mut output),
            MergeStrategy::Contextual => {
                restore_contextual(&chunk, &found, config.merge_threshold, &mut output)
            }
        }
    }

    debug!(
        "Reconstructed {} chunks into {} ({} strategy, {} images)",
        input_count,
        output.len(),
        config.strategy,
        map.len()
    );
    output
}

fn push_trimmed(mut chunk: Chunk, output: &mut Vec<Chunk>) {
    let trimmed = chunk.content.trim();
    if trimmed.is_empty() {
        return;
    }
    if trimmed.len() != chunk.content.len() {
        chunk.content = trimmed.to_string();
    }
    output.push(chunk);
}

/// One chunk in, one chunk out: each token becomes its inline form in place
fn restore_inline(chunk: Chunk, found: &[PlaceholderMatch<'_>], output: &mut Vec<Chunk>) {
    let mut content = String::with_capacity(chunk.content.len());
    let mut cursor = 0;

    for placeholder in found {
        content.push_str(&chunk.content[cursor..placeholder.start]);
        if !placeholder.block.is_blank() {
            content.push_str(&inline_image(placeholder.block));
        }
        cursor = placeholder.end;
    }
    content.push_str(&chunk.content[cursor..]);

    push_trimmed(Chunk::with_metadata(content, chunk.metadata), output);
}

/// Every image becomes its own chunk; text around it becomes sibling chunks
fn restore_separate(chunk: &Chunk, found: &[PlaceholderMatch<'_>], output: &mut Vec<Chunk>) {
    let mut children = Children::new(&chunk.metadata, output);
    let mut cursor = 0;

    for placeholder in found {
        children.push(&chunk.content[cursor..placeholder.start]);
        if !placeholder.block.is_blank() {
            children.push(&standalone_image(placeholder.block));
        }
        cursor = placeholder.end;
    }
    children.push(&chunk.content[cursor..]);
}

/// Decide per image: short descriptions join the pending text, long ones
/// flush it and stand alone.
fn restore_contextual(
    chunk: &Chunk,
    found: &[PlaceholderMatch<'_>],
    merge_threshold: usize,
    output: &mut Vec<Chunk>,
) {
    let mut children = Children::new(&chunk.metadata, output);
    let mut pending = String::new();
    let mut cursor = 0;

    for placeholder in found {
        append_piece(&mut pending, &chunk.content[cursor..placeholder.start]);
        cursor = placeholder.end;

        let block = placeholder.block;
        if block.is_blank() {
            continue;
        }

        if block.char_len() < merge_threshold {
            trace!("Merging image ({} chars) inline", block.char_len());
            append_piece(&mut pending, &inline_image(block));
        } else {
            trace!("Splitting image ({} chars) into its own chunk", block.char_len());
            children.push(&pending);
            pending.clear();
            children.push(&standalone_image(block));
        }
    }

    append_piece(&mut pending, &chunk.content[cursor..]);
    children.push(&pending);
}

/// Append a trimmed piece, space-separated from what is already pending
fn append_piece(pending: &mut String, piece: &str) {
    let piece = piece.trim();
    if piece.is_empty() {
        return;
    }
    if !pending.is_empty() {
        pending.push(' ');
    }
    pending.push_str(piece);
}
