//! CSV rendering and delivery.

use anyhow::{Context, Result};

use crate::models::{CsvRow, EnrichedRecord};

pub const CSV_HEADER: [&str; 4] = ["year", "title", "quality", "IMDB"];

/// Render records as CSV, `year,title,quality,IMDB`.
///
/// Fields are quoted only when they need it; absent values are empty cells.
pub fn to_csv(records: &[EnrichedRecord], include_header: bool) -> Result<String> {
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(Vec::new());

    if include_header {
        writer.write_record(CSV_HEADER)?;
    }
    for record in records {
        writer.serialize(CsvRow::from(record))?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| anyhow::anyhow!("Failed to flush CSV buffer: {}", e))?;
    String::from_utf8(bytes).context("CSV output was not valid UTF-8")
}

pub const SUCCESS_MESSAGE: &str = "SUCCESS: CSV results copied to your clipboard.";

/// X11 and Wayland serve the selection from the process that set it, so
/// on Linux the contents vanish unless this process keeps running.
pub const HOLDS_SELECTION: bool = cfg!(target_os = "linux");

/// Message printed once the clipboard is open and about to receive the CSV.
pub fn delivery_message(holds_selection: bool) -> String {
    if holds_selection {
        format!(
            "{}\nKeeping the clipboard alive until something else is copied (Ctrl-C to quit).",
            SUCCESS_MESSAGE
        )
    } else {
        SUCCESS_MESSAGE.to_string()
    }
}

/// Place text on the system clipboard.
///
/// `on_ready` runs after the clipboard opened and right before the write.
/// On Linux the write blocks until another program takes the selection.
pub fn copy_to_clipboard(text: &str, on_ready: impl FnOnce()) -> Result<()> {
    let mut clipboard = arboard::Clipboard::new().context("Failed to open system clipboard")?;
    on_ready();

    #[cfg(target_os = "linux")]
    {
        use arboard::SetExtLinux;
        clipboard
            .set()
            .wait()
            .text(text.to_owned())
            .context("Failed to copy CSV to clipboard")?;
    }

    #[cfg(not(target_os = "linux"))]
    clipboard
        .set_text(text.to_owned())
        .context("Failed to copy CSV to clipboard")?;

    Ok(())
}
