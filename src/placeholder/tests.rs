use super::*;
use crate::markup::extract;

#[test]
fn test_substitute_without_blocks_is_passthrough() {
    let (text, map) = substitute("no images here", Vec::new());
    assert_eq!(text, "no images here");
    assert!(map.is_empty());
    assert!(map.locate("⟦IMAGE_BLOCK_0⟧").is_empty());
}

#[test]
fn test_substitute_wraps_token_in_newlines() {
    let source = "intro<!--IMAGE_START-->chart<!--IMAGE_END-->outro";
    let (text, map) = substitute(source, extract(source));

    assert_eq!(map.len(), 1);
    assert_eq!(text, format!("intro\n{}\noutro", map.token(0)));
    assert_eq!(map.token(0), "⟦IMAGE_BLOCK_0⟧");
}

#[test]
fn test_substitute_indexes_in_document_order() {
    let source = "a <!--IMAGE_START-->first<!--IMAGE_END--> b <!--IMAGE_START-->second<!--IMAGE_END--> c";
    let (text, map) = substitute(source, extract(source));

    let found = map.locate(&text);
    assert_eq!(found.len(), 2);
    assert_eq!(found[0].block.clean_text, "first");
    assert_eq!(found[1].block.clean_text, "second");
    assert!(found[0].end <= found[1].start);
    assert_eq!(&text[found[0].range()], map.token(0));
}

#[test]
fn test_substitute_duplicate_blocks_get_distinct_tokens() {
    let block = "<!--IMAGE_START-->same<!--IMAGE_END-->";
    let source = format!("{block} middle {block}");
    let (text, map) = substitute(&source, extract(&source));

    assert!(text.contains(&map.token(0)));
    assert!(text.contains(&map.token(1)));
    assert!(!text.contains("IMAGE_START"));
}

#[test]
fn test_substitute_falls_back_when_offsets_are_stale() {
    let source = "xx <!--IMAGE_START-->pic<!--IMAGE_END--> yy";
    let mut blocks = extract(source);
    blocks[0].start_offset = 0;
    blocks[0].end_offset = 3;

    let (text, map) = substitute(source, blocks);
    assert_eq!(text, format!("xx \n{}\n yy", map.token(0)));
}

#[test]
fn test_get_round_trips_tokens() {
    let source = "<!--IMAGE_START-->one<!--IMAGE_END--><!--IMAGE_START-->two<!--IMAGE_END-->";
    let (_, map) = substitute(source, extract(source));

    let order: Vec<(String, &str)> = map.iter().map(|(t, b)| (t, b.clean_text.as_str())).collect();
    assert_eq!(order, vec![(map.token(0), "one"), (map.token(1), "two")]);

    for (token, block) in map.iter() {
        assert_eq!(map.get(&token), Some(block));
        assert_eq!(map.get(&format!("\n{token}\n")), Some(block));
    }
    assert!(map.get("⟦IMAGE_BLOCK_7⟧").is_none());
    assert!(map.get("IMAGE_BLOCK_0").is_none());
}

#[test]
fn test_sentinel_collision_is_salted() {
    let source = "literal ⟦IMAGE_BLOCK_0⟧ in prose\n<!--IMAGE_START-->real<!--IMAGE_END-->";
    let (text, map) = substitute(source, extract(source));

    assert_eq!(map.token(0), "⟦IMAGE_BLOCK_0_0⟧");
    let found = map.locate(&text);
    assert_eq!(found.len(), 1, "literal sentinel text must not be treated as a token");
    assert_eq!(found[0].block.clean_text, "real");
    assert!(text.contains("literal ⟦IMAGE_BLOCK_0⟧ in prose"));
}

#[test]
fn test_locate_ignores_unknown_index() {
    let source = "<!--IMAGE_START-->one<!--IMAGE_END-->";
    let (_, map) = substitute(source, extract(source));
    assert!(map.locate("see ⟦IMAGE_BLOCK_5⟧").is_empty());
}
