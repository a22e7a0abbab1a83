use std::collections::BTreeSet;
use std::fmt;
use std::path::PathBuf;

use serde::Serialize;

// ---------------------------------------------------------------------------
// Input
// ---------------------------------------------------------------------------

/// A single cell as read from the spreadsheet, before normalization.
#[derive(Debug, Clone, PartialEq)]
pub enum RawValue {
    Empty,
    Text(String),
    Float(f64),
    Int(i64),
    Bool(bool),
}

impl RawValue {
    /// Missing cells never reach the normalizer. Only a truly empty string
    /// counts; whitespace-only text is a value and is normalized like any
    /// other.
    pub fn is_missing(&self) -> bool {
        match self {
            Self::Empty => true,
            Self::Text(s) => s.is_empty(),
            Self::Float(n) => n.is_nan(),
            Self::Int(_) | Self::Bool(_) => false,
        }
    }
}

impl From<&str> for RawValue {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<f64> for RawValue {
    fn from(n: f64) -> Self {
        Self::Float(n)
    }
}

impl From<i64> for RawValue {
    fn from(n: i64) -> Self {
        Self::Int(n)
    }
}

/// Format a float without locale grouping; integral values drop the
/// fractional part.
pub fn format_number(n: f64) -> String {
    if n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        format!("{}", n)
    }
}

impl fmt::Display for RawValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => Ok(()),
            Self::Text(s) => f.write_str(s),
            Self::Float(n) => f.write_str(&format_number(*n)),
            Self::Int(n) => write!(f, "{n}"),
            Self::Bool(b) => f.write_str(if *b { "TRUE" } else { "FALSE" }),
        }
    }
}

// ---------------------------------------------------------------------------
// Per-field results
// ---------------------------------------------------------------------------

/// Distinct normalized tokens for one requested field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldTokens {
    pub field: String,
    pub weight: bool,
    pub tokens: BTreeSet<String>,
}

/// Tokens of one field that were found in the document text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldMatches {
    pub field: String,
    pub weight: bool,
    pub token_count: usize,
    pub matched: BTreeSet<String>,
}

/// One output sheet: which field it holds and the label it is written under.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SheetPlan {
    pub field: String,
    pub label: String,
}

// ---------------------------------------------------------------------------
// Run lifecycle
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    Idle,
    FieldsParsed,
    FieldsExtracted,
    TextExtracted,
    Matched,
    Written,
    Done,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Idle => write!(f, "idle"),
            Self::FieldsParsed => write!(f, "fields_parsed"),
            Self::FieldsExtracted => write!(f, "fields_extracted"),
            Self::TextExtracted => write!(f, "text_extracted"),
            Self::Matched => write!(f, "matched"),
            Self::Written => write!(f, "written"),
            Self::Done => write!(f, "done"),
        }
    }
}

/// What a finished run produced.
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub output: PathBuf,
    pub stage: Stage,
    pub document_chars: usize,
    pub fields: Vec<FieldMatches>,
}

impl RunReport {
    pub fn total_matched(&self) -> usize {
        self.fields.iter().map(|f| f.matched.len()).sum()
    }
}
