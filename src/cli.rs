use std::{
    io::{
        self,
        BufRead,
        Write,
    },
    path::PathBuf,
};

use clap::{
    Parser,
    Subcommand,
};

use crate::{
    core::{
        Card,
        KiokuError,
    },
    deck::DeckStore,
    generation::{
        self,
        api::{
            http_client,
            BackendConfig,
        },
    },
    study::{
        CardView,
        Direction,
        StudySession,
    },
};

#[derive(Parser)]
#[command(name = "kioku", about = "Flashcard decks with AI-generated cards", version)]
pub struct Cli {
    /// Directory holding deck CSV files (default: KIOKU_DATA_DIR or the
    /// per-user data dir)
    #[arg(long, global = true)]
    dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List all decks
    List,

    /// Create a new empty deck
    Create {
        name: String,
    },

    /// Delete a deck (no-op if it doesn't exist)
    Delete {
        name: String,
    },

    /// Print a deck's cards
    Show {
        name: String,
    },

    /// Append one card to a deck and save it
    Add {
        name: String,
        front: String,
        back: String,
    },

    /// Study a deck interactively (f = flip, n = next, p = previous, q = quit)
    Study {
        name: String,
    },

    /// Generate cards from a prompt and merge them into a deck
    Generate {
        name: String,
        /// What flashcards to generate
        prompt: String,
        /// Persist the merged deck instead of only printing it
        #[arg(long)]
        save: bool,
    },
}

impl Cli {
    pub fn run(self) -> Result<(), KiokuError> {
        let dir = self
            .dir
            .or_else(|| std::env::var_os("KIOKU_DATA_DIR").map(PathBuf::from));
        let store = match dir {
            Some(dir) => DeckStore::new(dir),
            None => DeckStore::open_default(),
        };

        match self.command {
            Command::List => cmd_list(&store),
            Command::Create { name } => cmd_create(&store, &name),
            Command::Delete { name } => cmd_delete(&store, &name),
            Command::Show { name } => cmd_show(&store, &name),
            Command::Add { name, front, back } => cmd_add(&store, &name, front, back),
            Command::Study { name } => cmd_study(&store, &name),
            Command::Generate { name, prompt, save } => cmd_generate(&store, &name, &prompt, save),
        }
    }
}

fn cmd_list(store: &DeckStore) -> Result<(), KiokuError> {
    let names = store.list_decks()?;
    if names.is_empty() {
        println!("No decks in {:?}", store.dir());
        return Ok(());
    }
    for name in names {
        println!("{}", name);
    }
    Ok(())
}

fn cmd_create(store: &DeckStore, name: &str) -> Result<(), KiokuError> {
    store.create(name)?;
    println!("Created deck '{}'", name);
    Ok(())
}

fn cmd_delete(store: &DeckStore, name: &str) -> Result<(), KiokuError> {
    store.delete(name)?;
    println!("Deleted deck '{}'", name);
    Ok(())
}

fn cmd_show(store: &DeckStore, name: &str) -> Result<(), KiokuError> {
    let cards = match store.load(name)? {
        Some(cards) => cards,
        None => {
            println!("No deck named '{}'", name);
            return Ok(());
        }
    };

    if cards.is_empty() {
        println!("Deck '{}' is empty", name);
        return Ok(());
    }

    print_cards(&cards);
    println!("{} cards", cards.len());
    Ok(())
}

fn cmd_add(store: &DeckStore, name: &str, front: String, back: String) -> Result<(), KiokuError> {
    let card = Card::new(front, back);
    if card.is_blank() {
        return Err(KiokuError::BlankCard);
    }

    let mut cards = store.load(name)?.unwrap_or_default();
    cards.push(card);
    store.save(name, &cards)?;

    println!("Deck '{}' now has {} cards", name, cards.len());
    Ok(())
}

fn cmd_study(store: &DeckStore, name: &str) -> Result<(), KiokuError> {
    let decks = store.load_all()?;
    let mut session = StudySession::new();

    print_view(&session.select(&decks, name));
    if session.selected_deck().is_none() {
        return Ok(());
    }

    let stdin = io::stdin();
    loop {
        print!("> ");
        io::stdout().flush()?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }

        let view = match line.trim() {
            "f" | "flip" => session.flip(&decks),
            "n" | "next" => session.navigate(&decks, Direction::Next),
            "p" | "prev" | "previous" => session.navigate(&decks, Direction::Previous),
            "q" | "quit" => break,
            "" => continue,
            other => {
                println!("Unknown command '{}' (f = flip, n = next, p = previous, q = quit)", other);
                continue;
            }
        };
        print_view(&view);
    }

    Ok(())
}

fn cmd_generate(store: &DeckStore, name: &str, prompt: &str, save: bool) -> Result<(), KiokuError> {
    let existing = store.load(name)?.unwrap_or_default();

    let client = http_client()?;
    let config = BackendConfig::from_env();
    let merged = generation::add_generated_cards(&client, &config, prompt, &existing)?;

    let added = merged.len().saturating_sub(existing.len());
    println!("Generated {} new cards for '{}'", added, name);
    print_cards(&merged);

    if save {
        store.save(name, &merged)?;
        println!("Saved deck '{}'", name);
    } else {
        println!("(dry run; pass --save to persist)");
    }
    Ok(())
}

fn print_view(view: &CardView) {
    println!("[{}] {}", view.position, view.content);
}

fn print_cards(cards: &[Card]) {
    let width = cards.iter().map(|card| card.front.chars().count()).max().unwrap_or(0);
    for card in cards {
        println!("  {:<width$}  |  {}", card.front, card.back, width = width);
    }
}
