//! `packmatch compare`, `columns` and `config`: a thin shell over the engine.

use std::path::{Path, PathBuf};

use packmatch_io::{compare, header_columns};
use packmatch_recon::engine::MatchRequest;
use packmatch_recon::{MatchConfig, MatchError, RunReport};

use crate::exit_codes::{match_error_kind, match_exit_code, ErrorOutput, EXIT_USAGE};
use crate::CliError;

/// Config from `--config` / `PACKMATCH_CONFIG`, or the built-in defaults.
fn load_config(path: Option<&Path>) -> Result<MatchConfig, CliError> {
    let Some(path) = path else {
        return Ok(MatchConfig::default());
    };
    let text = std::fs::read_to_string(path)
        .map_err(|e| CliError::args(format!("cannot read config {}: {e}", path.display())))?;
    let config = MatchConfig::from_toml(&text)
        .map_err(|e| CliError::args(format!("{}: {e}", path.display())))?;
    tracing::debug!(path = %path.display(), "loaded config");
    Ok(config)
}

/// Turn an engine error into a CLI error, printing it as JSON when asked.
fn match_err(err: MatchError, json: bool) -> CliError {
    let code = match_exit_code(&err);
    if json {
        ErrorOutput::new(match_error_kind(&err), err.to_string(), code).print(true);
        return CliError::silent(code);
    }

    let hint = match &err {
        MatchError::MissingField { .. } => Some(
            "field names are case-sensitive; run `packmatch columns <spreadsheet>` to see the header labels",
        ),
        MatchError::LabelCollision { .. } => {
            Some("sheet names are limited to 31 characters; shorten or drop one of the fields")
        }
        MatchError::DestinationConflict { .. } => Some("choose a different --output path"),
        _ => None,
    };

    let cli_err = CliError {
        code,
        message: err.to_string(),
        hint: None,
    };
    match hint {
        Some(h) => cli_err.with_hint(h),
        None => cli_err,
    }
}

pub fn cmd_compare(
    spreadsheet: PathBuf,
    document: PathBuf,
    fields: Option<String>,
    output: Option<PathBuf>,
    config_path: Option<PathBuf>,
    json: bool,
    quiet: bool,
) -> Result<(), CliError> {
    let config = load_config(config_path.as_deref())?;

    let request = MatchRequest {
        tabular_path: spreadsheet,
        document_path: document,
        fields,
        output,
    };

    let report = compare(&config, &request).map_err(|e| match_err(e, json))?;

    if json {
        let text = serde_json::to_string_pretty(&report)
            .map_err(|e| CliError::general(format!("JSON serialization error: {e}")))?;
        println!("{text}");
    } else {
        if !quiet {
            print_summary(&report);
        }
        println!("{}", report.output.display());
    }
    Ok(())
}

fn print_summary(report: &RunReport) {
    for field in &report.fields {
        eprintln!(
            "{}: {} of {} value(s) found in document",
            field.field,
            field.matched.len(),
            field.token_count
        );
    }
    eprintln!("wrote {}", report.output.display());
}

pub fn cmd_columns(
    spreadsheet: PathBuf,
    config_path: Option<PathBuf>,
    json: bool,
) -> Result<(), CliError> {
    let config = load_config(config_path.as_deref())?;
    let columns = header_columns(&spreadsheet, &config).map_err(|e| match_err(e, json))?;

    if json {
        let text = serde_json::to_string(&columns)
            .map_err(|e| CliError::general(format!("JSON serialization error: {e}")))?;
        println!("{text}");
        return Ok(());
    }

    if columns.is_empty() {
        return Err(CliError {
            code: EXIT_USAGE,
            message: format!(
                "no labels on header row {} of sheet index {}",
                config.source.header_row, config.source.sheet_index
            ),
            hint: Some("adjust [source] header_row / sheet_index in the config".into()),
        });
    }
    for label in &columns {
        println!("{label}");
    }
    Ok(())
}

pub fn cmd_config(config_path: Option<PathBuf>) -> Result<(), CliError> {
    let config = load_config(config_path.as_deref())?;
    let text = config
        .to_toml()
        .map_err(|e| CliError::general(e.to_string()))?;
    print!("{text}");
    Ok(())
}
