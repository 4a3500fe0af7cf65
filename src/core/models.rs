use std::collections::HashMap;

use serde::{
    Deserialize,
    Serialize,
};

/// A single study unit. Cards have no identifier of their own; identity is
/// positional within the deck that holds them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Card {
    pub front: String,
    pub back: String,
}

impl Card {
    pub fn new(front: String, back: String) -> Self {
        Card { front, back }
    }

    /// Blank on both sides after trimming. Such cards are never persisted
    /// or displayed.
    pub fn is_blank(&self) -> bool {
        self.front.trim().is_empty() && self.back.trim().is_empty()
    }
}

/// Every loaded deck, keyed by deck name (the CSV file stem).
pub type DeckMap = HashMap<String, Vec<Card>>;
