//! Run configuration assembled from the command line.

use std::io;
use std::path::{Path, PathBuf};

use crate::error_log::DEFAULT_ERROR_LOG;
use crate::lookup::DelayRange;
use crate::models::LinkStyle;

/// Where the rendered CSV goes.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OutputTarget {
    #[default]
    Clipboard,
    Stdout,
}

#[derive(Clone, Debug)]
pub struct RunConfig {
    pub text_file: PathBuf,
    /// Appending mode off: write the header row
    pub include_header: bool,
    pub link_style: LinkStyle,
    pub error_log: PathBuf,
    pub delay: DelayRange,
    pub output: OutputTarget,
    pub log_only: bool,
}

impl RunConfig {
    pub fn new(text_file: impl Into<PathBuf>) -> Self {
        Self {
            text_file: text_file.into(),
            include_header: true,
            link_style: LinkStyle::default(),
            error_log: PathBuf::from(DEFAULT_ERROR_LOG),
            delay: DelayRange::default(),
            output: OutputTarget::default(),
            log_only: false,
        }
    }
}

/// Only `.txt` lists are accepted. A file named just `.txt` counts.
pub fn is_text_file(path: &Path) -> bool {
    path.to_str().map_or(false, |s| s.ends_with(".txt"))
}

/// User-facing message for a list that could not be read.
pub fn read_error_message(path: &Path, err: &io::Error) -> String {
    match err.kind() {
        io::ErrorKind::NotFound => format!("INVALID ARGUMENT: No such file - {}", path.display()),
        _ => format!("INVALID ARGUMENT: Cannot read {} - {}", path.display(), err),
    }
}
