use std::path::{Path, PathBuf};

use tracing::{info, warn};

use crate::config::MatchConfig;
use crate::error::MatchError;
use crate::fields::parse_field_list;
use crate::matcher::match_field;
use crate::model::{FieldMatches, RunReport, Stage};
use crate::output::{check_destination, default_output_path, plan_sheets};
use crate::source::{extract_fields, extract_text, DocumentSource, ResultSink, TabularSource};

/// One reconciliation request as a shell hands it over.
#[derive(Debug, Clone)]
pub struct MatchRequest {
    pub tabular_path: PathBuf,
    pub document_path: PathBuf,
    /// `None` falls back to `config.fields.default`.
    pub fields: Option<String>,
    /// `None` derives the path from the two input names.
    pub output: Option<PathBuf>,
}

impl MatchRequest {
    pub fn new(tabular_path: impl Into<PathBuf>, document_path: impl Into<PathBuf>) -> Self {
        Self {
            tabular_path: tabular_path.into(),
            document_path: document_path.into(),
            fields: None,
            output: None,
        }
    }

    pub fn with_fields(mut self, fields: impl Into<String>) -> Self {
        self.fields = Some(fields.into());
        self
    }

    pub fn with_output(mut self, output: impl Into<PathBuf>) -> Self {
        self.output = Some(output.into());
        self
    }

    /// Explicit destination, or the one derived from the input names.
    pub fn destination(&self, config: &MatchConfig) -> PathBuf {
        self.output.clone().unwrap_or_else(|| {
            default_output_path(&self.tabular_path, &self.document_path, &config.output)
        })
    }
}

/// Opens the inputs named by a request. Implemented by the IO layer; each
/// source is opened only when its stage is reached.
pub trait SourceOpener {
    fn open_tabular(
        &self,
        path: &Path,
        config: &MatchConfig,
    ) -> Result<Box<dyn TabularSource>, MatchError>;

    fn open_document(&self, path: &Path) -> Result<Box<dyn DocumentSource>, MatchError>;
}

struct Progress {
    stage: Stage,
}

impl Progress {
    fn advance(&mut self, next: Stage) {
        info!(from = %self.stage, to = %next, "stage");
        self.stage = next;
    }
}

/// Run one pass: parse fields, extract columns, read the document, match,
/// write. The first failure ends the run.
pub fn run(
    config: &MatchConfig,
    request: &MatchRequest,
    opener: &dyn SourceOpener,
    sink: &dyn ResultSink,
) -> Result<RunReport, MatchError> {
    let mut progress = Progress { stage: Stage::Idle };
    let result = run_stages(config, request, opener, sink, &mut progress);
    if let Err(ref err) = result {
        warn!(stage = %progress.stage, error = %err, "run failed");
    }
    result
}

fn run_stages(
    config: &MatchConfig,
    request: &MatchRequest,
    opener: &dyn SourceOpener,
    sink: &dyn ResultSink,
    progress: &mut Progress,
) -> Result<RunReport, MatchError> {
    let field_list = request
        .fields
        .as_deref()
        .unwrap_or(config.fields.default.as_str());
    let fields = parse_field_list(field_list)?;
    let sheets = plan_sheets(&fields)?;

    let destination = request.destination(config);
    check_destination(
        &destination,
        &[request.tabular_path.as_path(), request.document_path.as_path()],
    )?;
    progress.advance(Stage::FieldsParsed);

    let tokens = {
        let tabular = opener.open_tabular(&request.tabular_path, config)?;
        extract_fields(tabular.as_ref(), &fields, config)?
    };
    progress.advance(Stage::FieldsExtracted);

    let blob = {
        let document = opener.open_document(&request.document_path)?;
        extract_text(document.as_ref())?
    };
    progress.advance(Stage::TextExtracted);

    let results: Vec<FieldMatches> = tokens.iter().map(|t| match_field(t, &blob)).collect();
    for r in &results {
        info!(
            field = %r.field,
            tokens = r.token_count,
            matched = r.matched.len(),
            "matched field"
        );
    }
    progress.advance(Stage::Matched);

    sink.write_results(&sheets, &results, &destination)?;
    progress.advance(Stage::Written);

    progress.advance(Stage::Done);
    Ok(RunReport {
        output: destination,
        stage: progress.stage,
        document_chars: blob.chars().count(),
        fields: results,
    })
}
