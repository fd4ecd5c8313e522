//! Markdown header splitter

use serde_json::Value;

use super::{Chunk, ChunkMetadata, DelegateSplitter};
use crate::config::HeaderSplitterConfig;

/// Splits markdown at ATX headers and records the active header path.
///
/// Each chunk's metadata maps the configured header name (e.g. `"Header 1"`)
/// to the text of the header currently in scope at that level.
#[derive(Debug, Clone)]
pub struct MarkdownHeaderSplitter {
    /// (level, metadata name), level = number of `#`
    levels: Vec<(usize, String)>,
    strip_headers: bool,
}

impl MarkdownHeaderSplitter {
    /// Create a splitter from `(marker, name)` pairs such as `("##", "Header 2")`
    pub fn new<M, N>(headers: impl IntoIterator<Item = (M, N)>) -> Self
    where
        M: AsRef<str>,
        N: Into<String>,
    {
        let levels = headers
            .into_iter()
            .map(|(marker, name)| (marker.as_ref().trim().len(), name.into()))
            .collect();
        Self {
            levels,
            strip_headers: true,
        }
    }

    pub fn from_config(config: &HeaderSplitterConfig) -> Self {
        Self::new(config.headers.iter().map(|(m, n)| (m.as_str(), n.as_str())))
            .strip_headers(config.strip_headers)
    }

    /// Keep header lines in chunk content instead of removing them
    pub fn strip_headers(mut self, strip: bool) -> Self {
        self.strip_headers = strip;
        self
    }

    /// Split text into sections, one chunk per non-empty section
    pub fn split_text(&self, text: &str) -> Vec<Chunk> {
        let mut chunks = Vec::new();
        // (level, name, header text), shallowest first
        let mut active: Vec<(usize, &str, String)> = Vec::new();
        let mut current_lines: Vec<&str> = Vec::new();
        let mut fence: Option<&str> = None;

        for line in text.lines() {
            let trimmed = line.trim_start();

            if let Some(marker) = fence_marker(trimmed) {
                match fence {
                    Some(open) if marker == open => fence = None,
                    None => fence = Some(marker),
                    _ => {}
                }
                current_lines.push(line);
                continue;
            }

            if fence.is_none() {
                if let Some((level, name, title)) = self.parse_header(trimmed) {
                    flush_section(&mut chunks, &mut current_lines, &active);

                    active.retain(|(l, _, _)| *l < level);
                    active.push((level, name, title));

                    if !self.strip_headers {
                        current_lines.push(line);
                    }
                    continue;
                }
            }

            current_lines.push(line);
        }

        flush_section(&mut chunks, &mut current_lines, &active);
        chunks
    }

    /// Parse a configured ATX header: returns (level, name, text)
    fn parse_header<'a>(&'a self, line: &str) -> Option<(usize, &'a str, String)> {
        let level = line.chars().take_while(|c| *c == '#').count();
        if level == 0 {
            return None;
        }

        let rest = &line[level..];
        if !(rest.is_empty() || rest.starts_with(' ') || rest.starts_with('\t')) {
            return None;
        }

        let (_, name) = self.levels.iter().find(|(l, _)| *l == level)?;
        let title = rest.trim().trim_end_matches('#').trim();
        if title.is_empty() {
            return None;
        }

        Some((level, name.as_str(), title.to_string()))
    }
}

impl DelegateSplitter for MarkdownHeaderSplitter {
    fn split(&self, text: &str) -> anyhow::Result<Vec<Chunk>> {
        Ok(self.split_text(text))
    }
}

fn fence_marker(line: &str) -> Option<&'static str> {
    if line.starts_with("```") {
        Some("```")
    } else if line.starts_with("~~~") {
        Some("~~~")
    } else {
        None
    }
}

/// Emit the collected lines as one chunk tagged with the active headers
fn flush_section(
    chunks: &mut Vec<Chunk>,
    lines: &mut Vec<&str>,
    active: &[(usize, &str, String)],
) {
    let content = lines.join("\n");
    lines.clear();

    let content = content.trim();
    if content.is_empty() {
        return;
    }

    let metadata: ChunkMetadata = active
        .iter()
        .map(|(_, name, title)| (name.to_string(), Value::String(title.clone())))
        .collect();

    chunks.push(Chunk::with_metadata(content, metadata));
}
