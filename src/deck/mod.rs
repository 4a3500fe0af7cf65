use std::{
    fs,
    io,
    path::{
        Path,
        PathBuf,
    },
};

use crate::{
    core::{
        Card,
        DeckMap,
        KiokuError,
    },
    persistence::default_deck_dir,
};

pub const FRONT_COLUMN: &str = "front";
pub const BACK_COLUMN: &str = "back";

/// Owns the directory of persisted decks, one CSV file per deck. The file
/// stem is the deck name; the header row is `front,back`.
#[derive(Debug, Clone)]
pub struct DeckStore {
    dir: PathBuf,
}

impl DeckStore {
    pub fn new(dir: PathBuf) -> Self {
        DeckStore { dir }
    }

    pub fn open_default() -> Self {
        DeckStore::new(default_deck_dir())
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Names of all persisted decks, sorted. A missing deck directory is the
    /// same as having no decks.
    pub fn list_decks(&self) -> Result<Vec<String>, KiokuError> {
        if !self.dir.exists() {
            return Ok(Vec::new());
        }

        let mut names = Vec::new();
        for entry in fs::read_dir(&self.dir)? {
            let path = entry?.path();
            if path.extension().and_then(|ext| ext.to_str()) != Some("csv") {
                continue;
            }
            if let Some(stem) = path.file_stem().and_then(|stem| stem.to_str()) {
                names.push(stem.to_string());
            }
        }

        names.sort();
        Ok(names)
    }

    /// Reads every deck in the directory. Files whose header lacks a `front`
    /// or `back` column are foreign/corrupt and get skipped, not reported.
    pub fn load_all(&self) -> Result<DeckMap, KiokuError> {
        let mut decks = DeckMap::new();

        for name in self.list_decks()? {
            match self.read_deck_file(&self.deck_path(&name))? {
                Some(cards) => {
                    decks.insert(name, cards);
                }
                None => {
                    log::warn!(
                        "Skipping '{}': missing '{}'/'{}' columns",
                        name,
                        FRONT_COLUMN,
                        BACK_COLUMN
                    );
                }
            }
        }

        Ok(decks)
    }

    /// Single-deck read. `None` means the deck does not exist (or its file is
    /// not a deck); an existing deck with zero cards is `Some(vec![])`.
    pub fn load(&self, name: &str) -> Result<Option<Vec<Card>>, KiokuError> {
        let path = self.deck_path(name);
        if !path.exists() {
            return Ok(None);
        }
        self.read_deck_file(&path)
    }

    /// Full replacement write. The content is written to a sibling temp file
    /// and renamed into place, so the prior file survives any failed write.
    pub fn save(&self, name: &str, cards: &[Card]) -> Result<(), KiokuError> {
        if name.trim().is_empty() {
            return Err(KiokuError::BlankDeckName);
        }

        fs::create_dir_all(&self.dir)?;

        let mut writer = csv::Writer::from_writer(Vec::new());
        writer.write_record([FRONT_COLUMN, BACK_COLUMN])?;
        for card in cards {
            if card.is_blank() {
                continue;
            }
            writer.write_record([card.front.as_str(), card.back.as_str()])?;
        }
        let bytes = writer
            .into_inner()
            .map_err(|e| KiokuError::Custom(format!("CSV buffer flush failed: {}", e)))?;

        let path = self.deck_path(name);
        let tmp_path = path.with_extension("csv.tmp");
        fs::write(&tmp_path, &bytes)?;
        fs::rename(&tmp_path, &path)?;
        Ok(())
    }

    /// Creates an empty deck. Same blank-name rule as `save`.
    pub fn create(&self, name: &str) -> Result<(), KiokuError> {
        self.save(name, &[])
    }

    /// Removes the deck file. Silently succeeds if it never existed.
    pub fn delete(&self, name: &str) -> Result<(), KiokuError> {
        match fs::remove_file(self.deck_path(name)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    fn deck_path(&self, name: &str) -> PathBuf {
        self.dir.join(format!("{}.csv", name))
    }

    /// `Ok(None)` when the header is missing either required column. Columns
    /// are selected by header name, so extra columns and reordering are fine.
    fn read_deck_file(&self, path: &Path) -> Result<Option<Vec<Card>>, KiokuError> {
        let content = fs::read_to_string(path)?;
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(content.as_bytes());

        let headers = match reader.headers() {
            Ok(headers) => headers.clone(),
            Err(e) => {
                log::warn!("Unreadable header in {:?}: {}", path, e);
                return Ok(None);
            }
        };

        let front_idx = headers.iter().position(|h| h == FRONT_COLUMN);
        let back_idx = headers.iter().position(|h| h == BACK_COLUMN);
        let (front_idx, back_idx) = match (front_idx, back_idx) {
            (Some(f), Some(b)) => (f, b),
            _ => return Ok(None),
        };

        let mut cards = Vec::new();
        for result in reader.records() {
            let record = match result {
                Ok(record) => record,
                Err(e) => {
                    log::warn!("Skipping malformed row in {:?}: {}", path, e);
                    continue;
                }
            };

            let card = Card::new(
                record.get(front_idx).unwrap_or("").to_string(),
                record.get(back_idx).unwrap_or("").to_string(),
            );
            if card.is_blank() {
                continue;
            }
            cards.push(card);
        }

        Ok(Some(cards))
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use tempfile::tempdir;

    use super::*;

    fn card(front: &str, back: &str) -> Card {
        Card::new(front.to_string(), back.to_string())
    }

    #[test]
    fn test_save_load_round_trip() {
        let dir = tempdir().unwrap();
        let store = DeckStore::new(dir.path().to_path_buf());

        let cards = vec![card("France?", "Paris"), card("Japan?", "Tokyo")];
        store.save("Capitals", &cards).unwrap();

        assert_eq!(store.load("Capitals").unwrap(), Some(cards));
        assert_eq!(store.list_decks().unwrap(), vec!["Capitals".to_string()]);
    }

    #[test]
    fn test_save_is_idempotent() {
        let dir = tempdir().unwrap();
        let store = DeckStore::new(dir.path().to_path_buf());

        let cards = vec![card("Q", "A")];
        store.save("deck", &cards).unwrap();
        let first = fs::read_to_string(dir.path().join("deck.csv")).unwrap();

        store.save("deck", &cards).unwrap();
        let second = fs::read_to_string(dir.path().join("deck.csv")).unwrap();

        assert_eq!(first, second);
    }

    #[test]
    fn test_save_replaces_prior_content() {
        let dir = tempdir().unwrap();
        let store = DeckStore::new(dir.path().to_path_buf());

        store.save("deck", &[card("old", "card"), card("other", "card")]).unwrap();
        store.save("deck", &[card("new", "card")]).unwrap();

        assert_eq!(store.load("deck").unwrap(), Some(vec![card("new", "card")]));
    }

    #[test]
    fn test_empty_deck_is_distinct_from_missing_deck() {
        let dir = tempdir().unwrap();
        let store = DeckStore::new(dir.path().to_path_buf());

        store.create("empty").unwrap();

        assert_eq!(store.load("empty").unwrap(), Some(Vec::new()));
        assert_eq!(store.load("missing").unwrap(), None);
    }

    #[test]
    fn test_blank_deck_name_is_rejected() {
        let dir = tempdir().unwrap();
        let store = DeckStore::new(dir.path().to_path_buf());

        assert!(matches!(store.save("", &[]), Err(KiokuError::BlankDeckName)));
        assert!(matches!(store.save("   ", &[]), Err(KiokuError::BlankDeckName)));
    }

    #[test]
    fn test_blank_cards_are_not_persisted() {
        let dir = tempdir().unwrap();
        let store = DeckStore::new(dir.path().to_path_buf());

        store.save("deck", &[card("", "  "), card("Q", ""), card("", "A")]).unwrap();

        assert_eq!(store.load("deck").unwrap(), Some(vec![card("Q", ""), card("", "A")]));
    }

    #[test]
    fn test_load_all_skips_files_without_required_columns() {
        let dir = tempdir().unwrap();
        let store = DeckStore::new(dir.path().to_path_buf());

        store.save("good", &[card("Q", "A")]).unwrap();
        fs::write(dir.path().join("foreign.csv"), "name,value\nx,1\n").unwrap();

        let decks = store.load_all().unwrap();
        assert_eq!(decks.len(), 1);
        assert!(decks.contains_key("good"));
    }

    #[test]
    fn test_load_selects_columns_by_header_name() {
        let dir = tempdir().unwrap();
        let store = DeckStore::new(dir.path().to_path_buf());

        fs::write(dir.path().join("deck.csv"), "notes,back,front\nignored,A,Q\n").unwrap();

        assert_eq!(store.load("deck").unwrap(), Some(vec![card("Q", "A")]));
    }

    #[test]
    fn test_round_trip_preserves_commas_in_fields() {
        let dir = tempdir().unwrap();
        let store = DeckStore::new(dir.path().to_path_buf());

        let cards = vec![card("Largest city, by population?", "Tokyo, Japan")];
        store.save("deck", &cards).unwrap();

        assert_eq!(store.load("deck").unwrap(), Some(cards));
    }

    #[test]
    fn test_delete_missing_deck_is_ok() {
        let dir = tempdir().unwrap();
        let store = DeckStore::new(dir.path().to_path_buf());

        store.delete("never-existed").unwrap();

        store.save("deck", &[]).unwrap();
        store.delete("deck").unwrap();
        assert_eq!(store.load("deck").unwrap(), None);
    }

    #[test]
    fn test_list_decks_on_missing_directory() {
        let dir = tempdir().unwrap();
        let store = DeckStore::new(dir.path().join("not-created-yet"));

        assert!(store.list_decks().unwrap().is_empty());
        assert!(store.load_all().unwrap().is_empty());
    }
}
