//! CLI Exit Code Registry
//!
//! This is the single source of truth for all CLI exit codes.
//! Exit codes are part of the shell contract. Scripts rely on them.
//!
//! | Code | Meaning                                           |
//! |------|---------------------------------------------------|
//! | 0    | Success                                           |
//! | 1    | General error (unspecified)                       |
//! | 2    | Usage or config error                             |
//! | 3    | Requested field not on the header row             |
//! | 4    | Spreadsheet or document could not be read         |
//! | 5    | Output could not be written / would clobber input |
//! | 6    | Field list invalid (empty name, label collision)  |

use packmatch_recon::MatchError;

/// Success - command completed without errors.
pub const EXIT_SUCCESS: u8 = 0;

/// General error - unspecified failure.
/// Avoid using this; prefer a specific error code.
pub const EXIT_ERROR: u8 = 1;

/// Usage error - bad arguments, unreadable or invalid config.
pub const EXIT_USAGE: u8 = 2;

/// A requested field is not among the header labels.
pub const EXIT_MISSING_FIELD: u8 = 3;

/// Spreadsheet or PDF could not be opened or parsed.
pub const EXIT_UNREADABLE_INPUT: u8 = 4;

/// Result workbook could not be written, or would overwrite an input.
pub const EXIT_OUTPUT: u8 = 5;

/// Field list rejected before any file was read.
pub const EXIT_FIELD_LIST: u8 = 6;

/// Map an engine error to its exit code.
pub fn match_exit_code(err: &MatchError) -> u8 {
    match err {
        MatchError::MissingField { .. } => EXIT_MISSING_FIELD,
        MatchError::UnreadableTabularSource { .. } | MatchError::UnreadableDocumentSource { .. } => {
            EXIT_UNREADABLE_INPUT
        }
        MatchError::OutputWrite { .. } | MatchError::DestinationConflict { .. } => EXIT_OUTPUT,
        MatchError::EmptyFieldName { .. } | MatchError::LabelCollision { .. } => EXIT_FIELD_LIST,
        MatchError::Config(_) => EXIT_USAGE,
    }
}

/// Stable machine-readable name for an engine error.
pub fn match_error_kind(err: &MatchError) -> &'static str {
    match err {
        MatchError::MissingField { .. } => "missing_field",
        MatchError::UnreadableTabularSource { .. } => "unreadable_tabular_source",
        MatchError::UnreadableDocumentSource { .. } => "unreadable_document_source",
        MatchError::EmptyFieldName { .. } => "empty_field_name",
        MatchError::LabelCollision { .. } => "label_collision",
        MatchError::OutputWrite { .. } => "output_write",
        MatchError::DestinationConflict { .. } => "destination_conflict",
        MatchError::Config(_) => "config",
    }
}

/// Structured error output for `--json` mode.
#[derive(Debug, serde::Serialize)]
pub struct ErrorOutput {
    pub error: String,
    pub message: String,
    pub exit_code: u8,
}

impl ErrorOutput {
    pub fn new(error: impl Into<String>, message: impl Into<String>, exit_code: u8) -> Self {
        Self {
            error: error.into(),
            message: message.into(),
            exit_code,
        }
    }

    /// Print to stderr (human-readable by default).
    pub fn print(&self, json: bool) {
        if json {
            if let Ok(output) = serde_json::to_string(self) {
                eprintln!("{}", output);
            }
        } else {
            eprintln!("error: {}", self.message);
        }
    }
}
