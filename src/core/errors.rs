use thiserror::Error;

#[derive(Error, Debug)]
pub enum KiokuError {
    #[error("I/O error: {0}")]
    Io(Box<std::io::Error>),

    #[error("CSV error: {0}")]
    Csv(Box<csv::Error>),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Request error: {0}")]
    Reqwest(Box<reqwest::Error>),

    #[error("Deck name must not be blank")]
    BlankDeckName,

    #[error("Card needs at least one non-blank side")]
    BlankCard,

    #[error("KiokuError: {0}")]
    Custom(String),
}

impl From<std::io::Error> for KiokuError {
    fn from(error: std::io::Error) -> Self {
        KiokuError::Io(Box::new(error))
    }
}

impl From<csv::Error> for KiokuError {
    fn from(error: csv::Error) -> Self {
        KiokuError::Csv(Box::new(error))
    }
}

impl From<reqwest::Error> for KiokuError {
    fn from(error: reqwest::Error) -> Self {
        KiokuError::Reqwest(Box::new(error))
    }
}
