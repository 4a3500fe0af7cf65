use super::*;

fn card(front: &str, back: &str) -> Card {
    Card::new(front.to_string(), back.to_string())
}

#[test]
fn test_parse_keeps_all_well_formed_rows() {
    // The requested count is backend policy; the parser keeps whatever
    // well-formed rows actually arrived.
    let raw = "Q1,A1\nQ2,A2\nQ3,A3\nQ4,A4extra,ignored\nbad";
    let cards = parse_rows(raw);

    assert_eq!(
        cards,
        vec![
            card("Q1", "A1"),
            card("Q2", "A2"),
            card("Q3", "A3"),
            // Third column dropped, first two kept.
            card("Q4", "A4extra"),
            // "bad" had only one column and was dropped entirely.
        ]
    );
}

#[test]
fn test_parse_drops_leading_header_line() {
    // An exact `front,back` first line is a header echoed by the backend,
    // not a card.
    let cards = parse_rows("front,back\nQ1,A1\nQ2,A2");
    assert_eq!(cards, vec![card("Q1", "A1"), card("Q2", "A2")]);
}

#[test]
fn test_parse_keeps_header_tokens_appearing_later() {
    // Only the first line gets the header treatment; a literal repeat
    // further down is a (degenerate) data row.
    let cards = parse_rows("Q1,A1\nfront,back");
    assert_eq!(cards, vec![card("Q1", "A1"), card("front", "back")]);
}

#[test]
fn test_parse_header_only_response_yields_nothing() {
    assert!(parse_rows("front,back").is_empty());
    assert!(parse_rows("front,back\n").is_empty());
}

#[test]
fn test_parse_skips_blank_lines() {
    let cards = parse_rows("\n\nQ1,A1\n\n   \nQ2,A2\n");
    assert_eq!(cards, vec![card("Q1", "A1"), card("Q2", "A2")]);
}

#[test]
fn test_parse_unusable_response_yields_nothing() {
    assert!(parse_rows("").is_empty());
    assert!(parse_rows("no delimiters here\njust prose").is_empty());
}

#[test]
fn test_tabular_of_no_cards_is_bare_header() {
    assert_eq!(to_tabular(&[]), "front,back\n");
}

#[test]
fn test_tabular_round_trips_through_parse() {
    let cards = vec![card("Q1", "A1"), card("Q2", "A2")];
    assert_eq!(parse_rows(&to_tabular(&cards)), cards);
}

#[test]
fn test_merge_appends_after_existing() {
    let existing = vec![card("E1", "A"), card("E2", "B")];
    let merged = merge(&existing, vec![card("N1", "C"), card("N2", "D")]);

    assert_eq!(
        merged,
        vec![card("E1", "A"), card("E2", "B"), card("N1", "C"), card("N2", "D")]
    );
}

#[test]
fn test_merge_never_yields_a_fully_blank_card() {
    let existing = vec![card("", "  "), card("Q", "")];
    let merged = merge(&existing, vec![card(" ", ""), card("", "A")]);

    assert_eq!(merged, vec![card("Q", ""), card("", "A")]);
}

#[test]
fn test_build_request_without_context() {
    let messages = build_request("Chemistry basics", None);

    assert_eq!(messages.len(), 2);
    assert_eq!(messages[0].role, "system");
    assert!(messages[0].content.contains("exactly 3 cards"));
    assert!(messages[0].content.contains("front,back"));
    assert_eq!(messages[1].role, "user");
    assert!(messages[1].content.contains("Chemistry basics"));
}

#[test]
fn test_build_request_includes_existing_cards_as_examples() {
    let tabular = to_tabular(&[card("Q1", "A1")]);
    let messages = build_request("More of these", Some(&tabular));

    assert_eq!(messages.len(), 3);
    assert_eq!(messages[1].role, "user");
    assert!(messages[1].content.contains("Q1,A1"));
    assert!(messages[2].content.contains("More of these"));
}

#[test]
fn test_request_count_policy_ignores_prompt_counts() {
    // "exactly 3" is fixed policy even when the prompt asks for more.
    let messages = build_request("Create 10 flashcards about Chemistry", None);
    assert!(messages[0].content.contains("exactly 3 cards"));
}
