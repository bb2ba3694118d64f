//! Append-only log of rows whose lookup found nothing.
//!
//! One `title\tyear` line per failure. The file is never read back, truncated
//! or rotated; each append opens and closes it.

use std::fs::OpenOptions;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use crate::models::ErrorLogEntry;

pub const DEFAULT_ERROR_LOG: &str = "INCOMPLETE_MOVIES.txt";

#[derive(Clone, Debug)]
pub struct IncompleteLog {
    path: PathBuf,
}

impl IncompleteLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn append(&self, entry: &ErrorLogEntry) -> io::Result<()> {
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        writeln!(file, "{}", entry.to_line())
    }
}

impl Default for IncompleteLog {
    fn default() -> Self {
        Self::new(DEFAULT_ERROR_LOG)
    }
}
