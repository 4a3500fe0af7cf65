pub mod errors;
pub mod models;

pub use errors::KiokuError;
pub use models::{
    Card,
    DeckMap,
};
