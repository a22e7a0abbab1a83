use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum MatchError {
    /// A requested column is absent from the header row.
    #[error("{source_name}: no column named '{field}' on header row {header_row} (found: {})", found_labels(.available))]
    MissingField {
        field: String,
        source_name: String,
        header_row: u32,
        available: Vec<String>,
    },

    /// Spreadsheet could not be opened, or the configured sheet is missing.
    #[error("cannot read spreadsheet {}: {reason}", .path.display())]
    UnreadableTabularSource { path: PathBuf, reason: String },

    /// Document could not be opened or a page could not be read.
    #[error("cannot read document {}: {reason}", .path.display())]
    UnreadableDocumentSource { path: PathBuf, reason: String },

    /// A field-list entry is empty after trimming (1-based position).
    #[error("field list entry {position} is empty")]
    EmptyFieldName { position: usize },

    /// Two field names map onto the same output sheet label.
    #[error("fields '{first}' and '{second}' both map to output sheet '{label}'")]
    LabelCollision {
        label: String,
        first: String,
        second: String,
    },

    /// Output workbook could not be written.
    #[error("cannot write results to {}: {reason}", .path.display())]
    OutputWrite { path: PathBuf, reason: String },

    /// Destination would overwrite one of the inputs.
    #[error("output path {} is one of the input files", .path.display())]
    DestinationConflict { path: PathBuf },

    /// Configuration parse / validation error.
    #[error("config error: {0}")]
    Config(String),
}

fn found_labels(labels: &[String]) -> String {
    if labels.is_empty() {
        "no labels".to_string()
    } else {
        labels
            .iter()
            .map(|l| format!("'{l}'"))
            .collect::<Vec<_>>()
            .join(", ")
    }
}
