use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::config::OutputConfig;
use crate::error::MatchError;
use crate::model::SheetPlan;

/// Longest sheet name the xlsx format accepts.
pub const MAX_SHEET_NAME_CHARS: usize = 31;

const ILLEGAL_SHEET_CHARS: [char; 7] = ['[', ']', ':', '*', '?', '/', '\\'];

/// Turn a field name into a legal sheet name.
pub fn sheet_label(field: &str) -> String {
    let cleaned: String = field
        .chars()
        .map(|c| if ILLEGAL_SHEET_CHARS.contains(&c) { '_' } else { c })
        .collect();
    let cleaned = cleaned.trim_matches('\'');
    let label: String = cleaned.chars().take(MAX_SHEET_NAME_CHARS).collect();
    if label.is_empty() {
        "_".to_string()
    } else {
        label
    }
}

/// Assign each field its sheet label, rejecting two fields that would land
/// on the same sheet. Sheet names are compared case-insensitively.
pub fn plan_sheets(fields: &[String]) -> Result<Vec<SheetPlan>, MatchError> {
    let mut seen: HashMap<String, &str> = HashMap::new();
    let mut plans = Vec::with_capacity(fields.len());

    for field in fields {
        let label = sheet_label(field);
        if let Some(first) = seen.insert(label.to_lowercase(), field) {
            return Err(MatchError::LabelCollision {
                label,
                first: first.to_string(),
                second: field.clone(),
            });
        }
        plans.push(SheetPlan {
            field: field.clone(),
            label,
        });
    }

    Ok(plans)
}

/// `<spreadsheet stem><separator><document stem><suffix>.xlsx`, placed next
/// to the spreadsheet.
pub fn default_output_path(
    tabular: &Path,
    document: &Path,
    naming: &OutputConfig,
) -> PathBuf {
    let dir = tabular.parent().unwrap_or_else(|| Path::new(""));
    let name = format!(
        "{}{}{}{}.xlsx",
        file_stem(tabular),
        naming.separator,
        file_stem(document),
        naming.suffix
    );
    dir.join(name)
}

fn file_stem(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "input".to_string())
}

/// Refuse a destination that is one of the inputs.
pub fn check_destination(
    destination: &Path,
    inputs: &[&Path],
) -> Result<(), MatchError> {
    let dest = resolve(destination);
    if inputs.iter().any(|input| resolve(input) == dest) {
        return Err(MatchError::DestinationConflict {
            path: destination.to_path_buf(),
        });
    }
    Ok(())
}

fn resolve(path: &Path) -> PathBuf {
    std::fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf())
}
