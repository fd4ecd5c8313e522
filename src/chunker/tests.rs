use super::*;
use serde_json::json;

fn header_splitter() -> MarkdownHeaderSplitter {
    MarkdownHeaderSplitter::new([("#", "Header 1"), ("##", "Header 2"), ("###", "Header 3")])
}

// ========================================================================
// ParagraphSplitter
// ========================================================================

#[test]
fn test_paragraph_empty_text() {
    let splitter = ParagraphSplitter::new(100, 0);
    assert!(splitter.split_text("").is_empty());
    assert!(splitter.split_text("\n\n   \n").is_empty());
}

#[test]
fn test_paragraph_merges_small_paragraphs() {
    let splitter = ParagraphSplitter::new(100, 0);
    let chunks = splitter.split_text("alpha\n\nbeta\n\ngamma");

    // All should merge into one chunk since they're small
    assert_eq!(chunks, vec!["alpha\n\nbeta\n\ngamma".to_string()]);
}

#[test]
fn test_paragraph_splits_at_boundary() {
    let first = "x".repeat(60);
    let second = "y".repeat(60);
    let splitter = ParagraphSplitter::new(100, 0);

    let chunks = splitter.split_text(&format!("{first}\n\n{second}"));
    assert_eq!(chunks, vec![first, second]);
}

#[test]
fn test_paragraph_overlap_carries_trailing_paragraph() {
    let text = "aaaa\n\nbbbb\n\ncccc";
    // "aaaa\n\nbbbb" is 10 chars; adding cccc would make 16
    let splitter = ParagraphSplitter::new(12, 4);

    let chunks = splitter.split_text(text);
    assert_eq!(chunks, vec!["aaaa\n\nbbbb".to_string(), "bbbb\n\ncccc".to_string()]);
}

#[test]
fn test_paragraph_overlap_dropped_when_it_cannot_fit() {
    let text = format!("{}\n\n{}", "a".repeat(8), "b".repeat(9));
    let splitter = ParagraphSplitter::new(10, 8);

    let chunks = splitter.split_text(&text);
    assert_eq!(chunks, vec!["a".repeat(8), "b".repeat(9)]);
}

#[test]
fn test_paragraph_large_falls_back_to_lines() {
    let lines = vec!["line 1"; 50];
    let text = lines.join("\n");
    let splitter = ParagraphSplitter::new(40, 0);

    let chunks = splitter.split_text(&text);
    assert!(chunks.len() > 1, "Should split large paragraph by lines");
    for chunk in &chunks {
        assert!(chunk.chars().count() <= 40);
        assert!(chunk.lines().all(|l| l == "line 1"), "Lines must not be cut");
    }
}

#[test]
fn test_paragraph_never_cuts_a_line() {
    let long_line = "z".repeat(500);
    let text = format!("short\n{long_line}\nshort");
    let splitter = ParagraphSplitter::new(50, 0);

    let chunks = splitter.split_text(&text);
    assert!(chunks.contains(&long_line));
    assert_eq!(chunks.len(), 3);
}

#[test]
fn test_paragraph_token_line_survives() {
    let text = format!("{}\n⟦IMAGE_BLOCK_0⟧\n{}", "a".repeat(30), "b".repeat(30));
    let splitter = ParagraphSplitter::new(35, 0);

    let chunks = splitter.split_text(&text);
    assert!(chunks.iter().any(|c| c.contains("⟦IMAGE_BLOCK_0⟧")));
}

#[test]
fn test_paragraph_as_delegate() {
    let splitter = ParagraphSplitter::new(100, 0);
    let chunks = splitter.split("one\n\ntwo").unwrap();
    assert_eq!(chunks.len(), 1);
    assert!(chunks[0].metadata.is_empty());
}

// ========================================================================
// MarkdownHeaderSplitter
// ========================================================================

#[test]
fn test_header_tracks_hierarchy() {
    let text = "# Main\n\nIntro text.\n\n## Section 1\n\nBody one.\n\n## Section 2\n\nBody two.";
    let chunks = header_splitter().split_text(text);

    assert_eq!(chunks.len(), 3);
    assert_eq!(chunks[0].content, "Intro text.");
    assert_eq!(chunks[0].metadata.get("Header 1"), Some(&json!("Main")));
    assert!(chunks[0].metadata.get("Header 2").is_none());

    assert_eq!(chunks[1].content, "Body one.");
    assert_eq!(chunks[1].metadata.get("Header 2"), Some(&json!("Section 1")));

    assert_eq!(chunks[2].metadata.get("Header 1"), Some(&json!("Main")));
    assert_eq!(chunks[2].metadata.get("Header 2"), Some(&json!("Section 2")));
}

#[test]
fn test_header_shallower_header_clears_deeper_levels() {
    let text = "# A\n## A.1\nbody a1\n# B\nbody b";
    let chunks = header_splitter().split_text(text);

    assert_eq!(chunks.len(), 2);
    assert_eq!(chunks[1].content, "body b");
    assert_eq!(chunks[1].metadata.get("Header 1"), Some(&json!("B")));
    assert!(chunks[1].metadata.get("Header 2").is_none());
}

#[test]
fn test_header_text_before_first_header() {
    let chunks = header_splitter().split_text("preamble\n# Title\nbody");
    assert_eq!(chunks.len(), 2);
    assert_eq!(chunks[0].content, "preamble");
    assert!(chunks[0].metadata.is_empty());
}

#[test]
fn test_header_headings_only_produce_no_chunks() {
    let chunks = header_splitter().split_text("# One\n## Two\n### Three");
    assert!(chunks.is_empty());
}

#[test]
fn test_header_keep_header_lines() {
    let splitter = header_splitter().strip_headers(false);
    let chunks = splitter.split_text("# Title\nbody");

    assert_eq!(chunks.len(), 1);
    assert_eq!(chunks[0].content, "# Title\nbody");
}

#[test]
fn test_header_ignores_hashes_in_code_fence() {
    let text = "# Real\n```bash\n# not a header\necho hi\n```\nafter";
    let chunks = header_splitter().split_text(text);

    assert_eq!(chunks.len(), 1);
    assert!(chunks[0].content.contains("# not a header"));
    assert_eq!(chunks[0].metadata.get("Header 1"), Some(&json!("Real")));
}

#[test]
fn test_header_unconfigured_level_is_body_text() {
    let splitter = MarkdownHeaderSplitter::new([("#", "Header 1")]);
    let chunks = splitter.split_text("# Top\n## Not split\ntext");

    assert_eq!(chunks.len(), 1);
    assert_eq!(chunks[0].content, "## Not split\ntext");
}

// ========================================================================
// Adapters
// ========================================================================

#[test]
fn test_from_fn_delegate() {
    let splitter = from_fn(|text: &str| Ok(text.split('|').map(Chunk::new).collect()));
    let chunks = splitter.split("a|b|c").unwrap();
    assert_eq!(chunks.len(), 3);
    assert_eq!(chunks[2].content, "c");
}

#[test]
fn test_boxed_delegate() {
    let boxed: Box<dyn DelegateSplitter> = Box::new(ParagraphSplitter::new(10, 0));
    let chunks = boxed.split("hello").unwrap();
    assert_eq!(chunks, vec![Chunk::new("hello")]);
}

#[test]
fn test_chunk_is_blank() {
    assert!(Chunk::new("  \n ").is_blank());
    assert!(!Chunk::new(" x ").is_blank());
}
