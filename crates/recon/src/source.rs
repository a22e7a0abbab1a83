//! Capabilities the engine needs from its inputs and output, plus the
//! extraction steps built on top of them.

use std::collections::BTreeSet;
use std::path::Path;

use tracing::debug;

use crate::config::MatchConfig;
use crate::error::MatchError;
use crate::model::{FieldMatches, FieldTokens, RawValue, SheetPlan};
use crate::normalize::{collapse_dash_joins, normalize};

// ---------------------------------------------------------------------------
// Traits
// ---------------------------------------------------------------------------

/// A header row plus the data rows below it.
pub trait TabularSource {
    /// Human-readable origin used in error messages (usually the file path).
    fn source_name(&self) -> String;

    /// One-based row the labels were read from.
    fn header_row(&self) -> u32;

    /// Column labels in sheet order.
    fn columns(&self) -> Vec<String>;

    /// Cells below the header for the column labelled `name`, or `None`
    /// when no such column exists.
    fn column(&self, name: &str) -> Option<Vec<RawValue>>;
}

/// A paginated document that can yield its text page by page.
pub trait DocumentSource {
    fn page_texts(&self) -> Result<Vec<String>, MatchError>;
}

/// Persists the per-field match results.
pub trait ResultSink {
    fn write_results(
        &self,
        sheets: &[SheetPlan],
        results: &[FieldMatches],
        destination: &Path,
    ) -> Result<(), MatchError>;
}

// ---------------------------------------------------------------------------
// Extraction
// ---------------------------------------------------------------------------

/// Pull every requested column and reduce it to its distinct tokens.
///
/// All names are checked against the header before any column is read, so a
/// single unknown name fails the whole request.
pub fn extract_fields(
    source: &dyn TabularSource,
    fields: &[String],
    config: &MatchConfig,
) -> Result<Vec<FieldTokens>, MatchError> {
    let columns = source.columns();
    if let Some(missing) = fields.iter().find(|f| !columns.contains(f)) {
        return Err(MatchError::MissingField {
            field: missing.clone(),
            source_name: source.source_name(),
            header_row: source.header_row(),
            available: columns,
        });
    }

    let mut out = Vec::with_capacity(fields.len());
    for field in fields {
        let cells = source.column(field).ok_or_else(|| MatchError::MissingField {
            field: field.clone(),
            source_name: source.source_name(),
            header_row: source.header_row(),
            available: columns.clone(),
        })?;

        let weight = config.fields.is_weight_field(field);
        let tokens: BTreeSet<String> = cells
            .iter()
            .filter(|cell| !cell.is_missing())
            .map(|cell| normalize(cell, weight, &config.fields.weight_suffix))
            .collect();

        debug!(
            field = %field,
            weight,
            cells = cells.len(),
            tokens = tokens.len(),
            "extracted column"
        );

        out.push(FieldTokens {
            field: field.clone(),
            weight,
            tokens,
        });
    }

    Ok(out)
}

/// Concatenate all pages (no separator) and rejoin split dashes.
pub fn extract_text(document: &dyn DocumentSource) -> Result<String, MatchError> {
    let pages = document.page_texts()?;
    debug!(pages = pages.len(), "read document pages");
    Ok(collapse_dash_joins(&pages.concat()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    struct MemSheet {
        columns: Vec<String>,
        data: HashMap<String, Vec<RawValue>>,
    }

    impl MemSheet {
        fn new(columns: &[(&str, Vec<RawValue>)]) -> Self {
            Self {
                columns: columns.iter().map(|(n, _)| n.to_string()).collect(),
                data: columns
                    .iter()
                    .map(|(n, v)| (n.to_string(), v.clone()))
                    .collect(),
            }
        }
    }

    impl TabularSource for MemSheet {
        fn source_name(&self) -> String {
            "mem.xlsx".into()
        }
        fn header_row(&self) -> u32 {
            13
        }
        fn columns(&self) -> Vec<String> {
            self.columns.clone()
        }
        fn column(&self, name: &str) -> Option<Vec<RawValue>> {
            self.data.get(name).cloned()
        }
    }

    struct MemDoc(Vec<&'static str>);

    impl DocumentSource for MemDoc {
        fn page_texts(&self) -> Result<Vec<String>, MatchError> {
            Ok(self.0.iter().map(|p| p.to_string()).collect())
        }
    }

    fn fields(names: &[&str]) -> Vec<String> {
        names.iter().map(|n| n.to_string()).collect()
    }

    #[test]
    fn part_numbers_collapse_to_one_token() {
        let sheet = MemSheet::new(&[(
            "Part No",
            vec!["AB-123".into(), "AB -123".into(), " AB- 123 ".into()],
        )]);
        let out = extract_fields(&sheet, &fields(&["Part No"]), &MatchConfig::default()).unwrap();
        assert_eq!(out.len(), 1);
        assert!(!out[0].weight);
        assert_eq!(out[0].tokens, BTreeSet::from(["AB-123".to_string()]));
    }

    #[test]
    fn weight_column_gets_units() {
        let sheet = MemSheet::new(&[(
            "NW(KG)",
            vec![RawValue::Float(2.0), RawValue::Float(2.5), "n/a".into()],
        )]);
        let out = extract_fields(&sheet, &fields(&["NW(KG)"]), &MatchConfig::default()).unwrap();
        assert!(out[0].weight);
        let expected: BTreeSet<String> =
            ["2KG", "2.5KG", "n/aKG"].iter().map(|s| s.to_string()).collect();
        assert_eq!(out[0].tokens, expected);
    }

    #[test]
    fn missing_cells_dropped_and_duplicates_merged() {
        let sheet = MemSheet::new(&[(
            "Part No",
            vec![
                "X1".into(),
                RawValue::Empty,
                "".into(),
                "X1".into(),
                RawValue::Float(f64::NAN),
            ],
        )]);
        let out = extract_fields(&sheet, &fields(&["Part No"]), &MatchConfig::default()).unwrap();
        assert_eq!(out[0].tokens, BTreeSet::from(["X1".to_string()]));
    }

    #[test]
    fn blank_weight_cell_becomes_bare_suffix() {
        let sheet = MemSheet::new(&[("NW(KG)", vec!["   ".into(), RawValue::Float(2.0)])]);
        let out = extract_fields(&sheet, &fields(&["NW(KG)"]), &MatchConfig::default()).unwrap();
        let expected: BTreeSet<String> = ["KG", "2KG"].iter().map(|s| s.to_string()).collect();
        assert_eq!(out[0].tokens, expected);
    }

    #[test]
    fn blank_plain_cell_becomes_empty_token() {
        let sheet = MemSheet::new(&[("Part No", vec!["  ".into(), "X1".into()])]);
        let out = extract_fields(&sheet, &fields(&["Part No"]), &MatchConfig::default()).unwrap();
        let expected: BTreeSet<String> = ["", "X1"].iter().map(|s| s.to_string()).collect();
        assert_eq!(out[0].tokens, expected);
    }

    #[test]
    fn unknown_field_fails_whole_request() {
        let sheet = MemSheet::new(&[("Part No", vec!["X1".into()])]);
        let err = extract_fields(
            &sheet,
            &fields(&["Part No", "part no"]),
            &MatchConfig::default(),
        )
        .unwrap_err();
        match err {
            MatchError::MissingField { field, available, header_row, .. } => {
                assert_eq!(field, "part no");
                assert_eq!(available, vec!["Part No"]);
                assert_eq!(header_row, 13);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn fields_keep_request_order() {
        let sheet = MemSheet::new(&[
            ("Part No", vec!["X1".into()]),
            ("NW(KG)", vec![RawValue::Int(3)]),
        ]);
        let out = extract_fields(
            &sheet,
            &fields(&["NW(KG)", "Part No"]),
            &MatchConfig::default(),
        )
        .unwrap();
        assert_eq!(out[0].field, "NW(KG)");
        assert_eq!(out[1].field, "Part No");
    }

    #[test]
    fn pages_join_without_separator() {
        let doc = MemDoc(vec!["Invoice AB-", "123 total 4", " KG"]);
        assert_eq!(extract_text(&doc).unwrap(), "Invoice AB-123 total 4 KG");
    }

    #[test]
    fn document_dash_repair_crosses_pages() {
        let doc = MemDoc(vec!["Ref CD- ", "77"]);
        assert_eq!(extract_text(&doc).unwrap(), "Ref CD-77");
    }
}
