//! Watchlist loading: one ticker symbol per line.

use std::fs;
use std::path::Path;

pub fn parse_watchlist(content: &str) -> Vec<String> {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

/// A missing watchlist file is recoverable: the run degrades to a no-op.
pub fn load_watchlist(path: &Path) -> Vec<String> {
    match fs::read_to_string(path) {
        Ok(content) => parse_watchlist(&content),
        Err(e) => {
            eprintln!("warning: could not read {} ({e})", path.display());
            Vec::new()
        }
    }
}
