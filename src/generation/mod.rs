use reqwest::blocking::Client;

use self::api::{
    complete,
    BackendConfig,
    ChatMessage,
};
use crate::core::{
    Card,
    KiokuError,
};

pub mod api;

#[cfg(test)]
mod pipeline_tests;

/// Fixed request policy, independent of any count the user's prompt mentions.
pub const CARDS_PER_REQUEST: usize = 3;

pub const TABULAR_HEADER: &str = "front,back";

fn system_prompt() -> String {
    format!(
        "You are a helpful flashcard generator. \
         Generate flashcards in CSV format with '{}' as headers. \
         Each card should have a question on the front and the answer on the back. \
         Generate exactly {} cards for each request. \
         Strictly follow the CSV format.",
        TABULAR_HEADER, CARDS_PER_REQUEST
    )
}

/// Role-tagged messages for one generation request. Existing cards, when
/// supplied, ride along as in-context example data.
pub fn build_request(prompt: &str, existing_tabular: Option<&str>) -> Vec<ChatMessage> {
    let mut messages = vec![ChatMessage::system(system_prompt())];

    if let Some(existing) = existing_tabular {
        messages.push(ChatMessage::user(format!(
            "Use these existing flashcards as examples when generating new ones:\n{}",
            existing
        )));
    }

    messages.push(ChatMessage::user(format!(
        "Generate new flashcards based on the following prompt:\n{}",
        prompt
    )));

    messages
}

/// Coerces freeform backend output into two-column rows. Per line: fewer
/// than two comma-separated fields drops the line, more than two keeps only
/// the first two. A first line that is exactly the `front,back` header is
/// treated as a header, not data.
pub fn parse_rows(raw: &str) -> Vec<Card> {
    let mut cards = Vec::new();

    for (i, line) in raw.lines().filter(|line| !line.trim().is_empty()).enumerate() {
        let fields: Vec<&str> = line.split(',').collect();
        if fields.len() < 2 {
            continue;
        }
        if i == 0 && line == TABULAR_HEADER {
            continue;
        }
        cards.push(Card::new(fields[0].to_string(), fields[1].to_string()));
    }

    cards
}

/// The wire form shown to the backend and returned by the standalone
/// generation surface: header row plus one naive comma-joined line per card.
pub fn to_tabular(cards: &[Card]) -> String {
    let mut out = String::from(TABULAR_HEADER);
    out.push('\n');
    for card in cards {
        out.push_str(&card.front);
        out.push(',');
        out.push_str(&card.back);
        out.push('\n');
    }
    out
}

/// Appends new cards after the existing ones, both in arrival order, then
/// drops any card that is blank on both sides.
pub fn merge(existing: &[Card], new_cards: Vec<Card>) -> Vec<Card> {
    existing
        .iter()
        .cloned()
        .chain(new_cards)
        .filter(|card| !card.is_blank())
        .collect()
}

/// One generation attempt: build the request, call the backend once, and
/// normalize whatever came back. A backend that returns no choices produces
/// zero cards rather than an error; transport failures are returned to the
/// caller, who decides whether to surface them.
pub fn generate(
    client: &Client,
    config: &BackendConfig,
    prompt: &str,
    existing: &[Card],
) -> Result<Vec<Card>, KiokuError> {
    let context = if existing.is_empty() { None } else { Some(to_tabular(existing)) };
    let messages = build_request(prompt, context.as_deref());

    let raw = complete(client, config, &messages)?;
    match raw {
        Some(raw) => Ok(parse_rows(&raw)),
        None => {
            log::warn!("Backend returned no choices; no new cards produced");
            Ok(Vec::new())
        }
    }
}

/// Standalone generation surface: prompt in, normalized tabular text out.
/// Zero choices or zero usable rows yields the bare header line.
pub fn generate_tabular(
    client: &Client,
    config: &BackendConfig,
    prompt: &str,
) -> Result<String, KiokuError> {
    let cards = generate(client, config, prompt, &[])?;
    Ok(to_tabular(&cards))
}

/// The caller-facing operation behind "generate cards for this deck": the
/// merged list on success, the error otherwise. An empty prompt is a no-op.
/// Persisting the result is a separate, explicit save.
pub fn add_generated_cards(
    client: &Client,
    config: &BackendConfig,
    prompt: &str,
    existing: &[Card],
) -> Result<Vec<Card>, KiokuError> {
    if prompt.trim().is_empty() {
        return Ok(existing.to_vec());
    }

    let new_cards = generate(client, config, prompt, existing)?;
    Ok(merge(existing, new_cards))
}
