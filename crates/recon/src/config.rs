use serde::{Deserialize, Serialize};

use crate::error::MatchError;
use crate::fields::parse_field_list;

// ---------------------------------------------------------------------------
// Top-level config
// ---------------------------------------------------------------------------

/// Run parameters. Passed into every run explicitly; nothing here is global.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct MatchConfig {
    #[serde(default)]
    pub source: SourceConfig,
    #[serde(default)]
    pub fields: FieldsConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

// ---------------------------------------------------------------------------
// Source
// ---------------------------------------------------------------------------

/// Where the header and data live in the spreadsheet.
///
/// Both values are positional: nothing checks that `header_row` actually
/// holds a header. A misaligned offset reads the wrong labels and surfaces
/// as `MissingField`.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct SourceConfig {
    /// Zero-based sheet index.
    #[serde(default = "default_sheet_index")]
    pub sheet_index: usize,
    /// One-based header row; rows above it are ignored.
    #[serde(default = "default_header_row")]
    pub header_row: u32,
}

fn default_sheet_index() -> usize {
    1
}

fn default_header_row() -> u32 {
    13
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            sheet_index: default_sheet_index(),
            header_row: default_header_row(),
        }
    }
}

// ---------------------------------------------------------------------------
// Fields
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct FieldsConfig {
    /// Field list used when the caller does not supply one.
    #[serde(default = "default_field_list")]
    pub default: String,
    /// Substring (case-insensitive) that marks a field as weight-like.
    #[serde(default = "default_weight_marker")]
    pub weight_marker: String,
    /// Unit appended to every weight token.
    #[serde(default = "default_weight_suffix")]
    pub weight_suffix: String,
}

fn default_field_list() -> String {
    "Part No,NW(KG)".into()
}

fn default_weight_marker() -> String {
    "KG".into()
}

fn default_weight_suffix() -> String {
    "KG".into()
}

impl Default for FieldsConfig {
    fn default() -> Self {
        Self {
            default: default_field_list(),
            weight_marker: default_weight_marker(),
            weight_suffix: default_weight_suffix(),
        }
    }
}

impl FieldsConfig {
    pub fn is_weight_field(&self, field: &str) -> bool {
        field
            .to_lowercase()
            .contains(&self.weight_marker.to_lowercase())
    }
}

// ---------------------------------------------------------------------------
// Output naming
// ---------------------------------------------------------------------------

/// Default output name: `<spreadsheet><separator><document><suffix>.xlsx`.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct OutputConfig {
    #[serde(default = "default_separator")]
    pub separator: String,
    #[serde(default = "default_suffix")]
    pub suffix: String,
}

fn default_separator() -> String {
    "_VS_".into()
}

fn default_suffix() -> String {
    "_匹配结果".into()
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            separator: default_separator(),
            suffix: default_suffix(),
        }
    }
}

// ---------------------------------------------------------------------------
// Parse + Validate
// ---------------------------------------------------------------------------

impl MatchConfig {
    pub fn from_toml(input: &str) -> Result<Self, MatchError> {
        let config: MatchConfig =
            toml::from_str(input).map_err(|e| MatchError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_toml(&self) -> Result<String, MatchError> {
        toml::to_string_pretty(self).map_err(|e| MatchError::Config(e.to_string()))
    }

    pub fn validate(&self) -> Result<(), MatchError> {
        if self.source.header_row == 0 {
            return Err(MatchError::Config(
                "source.header_row is 1-based and must be at least 1".into(),
            ));
        }

        if self.fields.weight_marker.trim().is_empty() {
            return Err(MatchError::Config("fields.weight_marker must not be empty".into()));
        }

        parse_field_list(&self.fields.default).map_err(|e| {
            MatchError::Config(format!("fields.default is not a valid field list: {e}"))
        })?;

        for (key, value) in [
            ("output.separator", &self.output.separator),
            ("output.suffix", &self.output.suffix),
        ] {
            if value.contains(|c: char| c == '/' || c == '\\') || value.contains("..") {
                return Err(MatchError::Config(format!(
                    "{key} must not contain path components, got '{value}'"
                )));
            }
        }

        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_toml_gives_defaults() {
        let config = MatchConfig::from_toml("").unwrap();
        assert_eq!(config.source.sheet_index, 1);
        assert_eq!(config.source.header_row, 13);
        assert_eq!(config.fields.default, "Part No,NW(KG)");
        assert_eq!(config.fields.weight_suffix, "KG");
        assert_eq!(config.output.separator, "_VS_");
        assert_eq!(config.output.suffix, "_匹配结果");
    }

    #[test]
    fn partial_sections_keep_other_defaults() {
        let config = MatchConfig::from_toml(
            r#"
[source]
header_row = 12

[output]
suffix = "_matched"
"#,
        )
        .unwrap();
        assert_eq!(config.source.header_row, 12);
        assert_eq!(config.source.sheet_index, 1);
        assert_eq!(config.output.suffix, "_matched");
        assert_eq!(config.output.separator, "_VS_");
    }

    #[test]
    fn zero_header_row_rejected() {
        let err = MatchConfig::from_toml("[source]\nheader_row = 0\n").unwrap_err();
        assert!(matches!(err, MatchError::Config(msg) if msg.contains("header_row")));
    }

    #[test]
    fn unknown_key_rejected() {
        let err = MatchConfig::from_toml("[source]\nheader = 3\n").unwrap_err();
        assert!(matches!(err, MatchError::Config(_)));
    }

    #[test]
    fn path_separator_in_suffix_rejected() {
        let err = MatchConfig::from_toml("[output]\nsuffix = \"/../x\"\n").unwrap_err();
        assert!(matches!(err, MatchError::Config(msg) if msg.contains("output.suffix")));
    }

    #[test]
    fn bad_default_field_list_rejected() {
        let err = MatchConfig::from_toml("[fields]\ndefault = \"Part No,,NW(KG)\"\n").unwrap_err();
        assert!(matches!(err, MatchError::Config(msg) if msg.contains("fields.default")));
    }

    #[test]
    fn weight_marker_is_case_insensitive() {
        let fields = FieldsConfig::default();
        assert!(fields.is_weight_field("NW(KG)"));
        assert!(fields.is_weight_field("gross kg"));
        assert!(!fields.is_weight_field("Part No"));
    }

    #[test]
    fn toml_round_trip_of_defaults() {
        let text = MatchConfig::default().to_toml().unwrap();
        let back = MatchConfig::from_toml(&text).unwrap();
        assert_eq!(back.source.header_row, 13);
        assert_eq!(back.fields.default, "Part No,NW(KG)");
    }
}
