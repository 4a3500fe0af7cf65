pub mod cli;
pub mod core;
pub mod deck;
pub mod generation;
pub mod persistence;
pub mod study;

pub use crate::core::{
    Card,
    DeckMap,
    KiokuError,
};
