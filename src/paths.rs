//! XDG-compliant path resolution.
//!
//! The default database lives at `$XDG_DATA_HOME/gyanrich/gyanrich.db`
//! (`~/.local/share/gyanrich/gyanrich.db`). `GYANRICH_DB` overrides it.

use std::env;
use std::path::PathBuf;

const APP_DIR: &str = "gyanrich";
const DB_FILE: &str = "gyanrich.db";

fn non_blank(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.trim().is_empty())
}

/// Get the data directory.
///
/// Falls back to the current directory when neither `XDG_DATA_HOME` nor
/// `HOME` is set.
pub fn get_data_dir() -> PathBuf {
    let data_home = non_blank("XDG_DATA_HOME")
        .map(PathBuf::from)
        .or_else(|| non_blank("HOME").map(|home| PathBuf::from(home).join(".local/share")))
        .unwrap_or_else(|| PathBuf::from("."));

    data_home.join(APP_DIR)
}

/// Get the database file path.
pub fn get_db_path() -> PathBuf {
    non_blank("GYANRICH_DB")
        .map(PathBuf::from)
        .unwrap_or_else(|| get_data_dir().join(DB_FILE))
}
