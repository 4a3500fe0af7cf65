use std::{
    fs,
    path::PathBuf,
};

const APP_NAME: &str = "kioku";

pub fn get_app_data_dir() -> PathBuf {
    if let Some(data_dir) = dirs::data_local_dir() {
        let app_dir = data_dir.join(APP_NAME);
        let _ = fs::create_dir_all(&app_dir);
        app_dir
    } else {
        PathBuf::from(".")
    }
}

/// Default location for deck CSV files.
pub fn default_deck_dir() -> PathBuf {
    get_app_data_dir().join("decks")
}
