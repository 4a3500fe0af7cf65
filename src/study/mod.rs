use crate::core::{
    Card,
    DeckMap,
};

pub const SELECT_DECK_MESSAGE: &str = "Please select a deck";
pub const EMPTY_DECK_MESSAGE: &str = "This deck is empty. Add cards to it first.";
pub const EMPTY_POSITION: &str = "0/0";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Next,
    Previous,
}

/// What a front end renders after any study operation: the text of the
/// showing face plus a 1-based "position/total" label.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardView {
    pub content: String,
    pub position: String,
}

impl CardView {
    fn placeholder(message: &str) -> Self {
        CardView { content: message.to_string(), position: EMPTY_POSITION.to_string() }
    }

    fn card(content: &str, index: usize, total: usize) -> Self {
        CardView { content: content.to_string(), position: format!("{}/{}", index + 1, total) }
    }
}

/// Navigation state for one study session. An explicit value object: callers
/// hold it and pass the current deck map into each operation, so nothing is
/// shared behind the scenes. Reset on every deck switch; never persisted.
#[derive(Debug, Clone)]
pub struct StudySession {
    deck: Option<String>,
    index: usize,
    showing_front: bool,
}

impl Default for StudySession {
    fn default() -> Self {
        StudySession { deck: None, index: 0, showing_front: true }
    }
}

impl StudySession {
    pub fn new() -> Self {
        StudySession::default()
    }

    /// Switches the session to the named deck, resetting to the front of its
    /// first card. A blank or unknown name leaves the session untouched and
    /// returns the select-a-deck placeholder.
    pub fn select(&mut self, decks: &DeckMap, name: &str) -> CardView {
        let cards = match deck_lookup(decks, name) {
            Some(cards) => cards,
            None => return CardView::placeholder(SELECT_DECK_MESSAGE),
        };

        self.deck = Some(name.to_string());
        self.index = 0;
        self.showing_front = true;

        if cards.is_empty() {
            return CardView::placeholder(EMPTY_DECK_MESSAGE);
        }
        CardView::card(&cards[0].front, 0, cards.len())
    }

    /// Toggles the showing face of the current card. Position is unchanged.
    pub fn flip(&mut self, decks: &DeckMap) -> CardView {
        let cards = match self.current_deck(decks) {
            Some(cards) => cards,
            None => return CardView::placeholder(SELECT_DECK_MESSAGE),
        };
        if cards.is_empty() {
            return CardView::placeholder(EMPTY_DECK_MESSAGE);
        }

        // The deck may have shrunk since select if it was edited mid-session.
        self.index = self.index.min(cards.len() - 1);
        self.showing_front = !self.showing_front;

        let card = &cards[self.index];
        let content = if self.showing_front { &card.front } else { &card.back };
        CardView::card(content, self.index, cards.len())
    }

    /// Steps to the adjacent card, wrapping around at both ends, and resets
    /// the face to front.
    pub fn navigate(&mut self, decks: &DeckMap, direction: Direction) -> CardView {
        let cards = match self.current_deck(decks) {
            Some(cards) => cards,
            None => return CardView::placeholder(SELECT_DECK_MESSAGE),
        };
        if cards.is_empty() {
            return CardView::placeholder(EMPTY_DECK_MESSAGE);
        }

        let len = cards.len();
        self.index = self.index.min(len - 1);
        self.index = match direction {
            Direction::Next => (self.index + 1) % len,
            Direction::Previous => (self.index + len - 1) % len,
        };
        self.showing_front = true;

        CardView::card(&cards[self.index].front, self.index, len)
    }

    pub fn selected_deck(&self) -> Option<&str> {
        self.deck.as_deref()
    }

    fn current_deck<'a>(&self, decks: &'a DeckMap) -> Option<&'a Vec<Card>> {
        self.deck.as_deref().and_then(|name| decks.get(name))
    }
}

fn deck_lookup<'a>(decks: &'a DeckMap, name: &str) -> Option<&'a Vec<Card>> {
    if name.trim().is_empty() {
        return None;
    }
    decks.get(name)
}
