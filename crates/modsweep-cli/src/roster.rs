//! Device roster loading
//!
//! Line-oriented host list: one identifier per line, in file order, with
//! blank lines and `#` comments skipped. Duplicates are preserved as given.

use std::path::{Path, PathBuf};

use thiserror::Error;

/// Roster problems are fatal startup conditions
#[derive(Error, Debug)]
pub enum RosterError {
    /// File missing or unreadable
    #[error("failed to read roster {path}: {source}")]
    Unreadable {
        /// Roster path as given
        path: PathBuf,
        /// Underlying I/O error
        source: std::io::Error,
    },

    /// File readable but holds no hosts
    #[error("no hosts found in roster {path}")]
    Empty {
        /// Roster path as given
        path: PathBuf,
    },
}

/// Load the ordered host list from a roster file
///
/// # Errors
/// Returns `RosterError` when the file cannot be read or yields no hosts.
pub fn load_roster(path: &Path) -> Result<Vec<String>, RosterError> {
    let contents = std::fs::read_to_string(path).map_err(|source| RosterError::Unreadable {
        path: path.to_path_buf(),
        source,
    })?;

    let hosts: Vec<String> = contents
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(ToString::to_string)
        .collect();

    if hosts.is_empty() {
        return Err(RosterError::Empty {
            path: path.to_path_buf(),
        });
    }

    Ok(hosts)
}
