// File-backed wiring for the matching engine: the entry point shells call.

use std::path::{Path, PathBuf};

use packmatch_recon::config::MatchConfig;
use packmatch_recon::engine::{MatchRequest, SourceOpener};
use packmatch_recon::model::{FieldMatches, RunReport, SheetPlan};
use packmatch_recon::source::{DocumentSource, ResultSink, TabularSource};
use packmatch_recon::MatchError;
use tracing::info;

use crate::pdf::PdfDocument;
use crate::xlsx::{export_matches, XlsxSheet};

/// Opens spreadsheets with calamine and PDFs with pdf-extract.
#[derive(Debug, Default, Clone, Copy)]
pub struct FileOpener;

impl SourceOpener for FileOpener {
    fn open_tabular(
        &self,
        path: &Path,
        config: &MatchConfig,
    ) -> Result<Box<dyn TabularSource>, MatchError> {
        Ok(Box::new(XlsxSheet::open(path, &config.source)?))
    }

    fn open_document(&self, path: &Path) -> Result<Box<dyn DocumentSource>, MatchError> {
        Ok(Box::new(PdfDocument::open(path)?))
    }
}

/// Writes results as an xlsx workbook.
#[derive(Debug, Default, Clone, Copy)]
pub struct XlsxResultWriter;

impl ResultSink for XlsxResultWriter {
    fn write_results(
        &self,
        sheets: &[SheetPlan],
        results: &[FieldMatches],
        destination: &Path,
    ) -> Result<(), MatchError> {
        export_matches(sheets, results, destination).map(|_| ())
    }
}

/// Run one reconciliation against files on disk.
pub fn compare(config: &MatchConfig, request: &MatchRequest) -> Result<RunReport, MatchError> {
    let report = packmatch_recon::run(config, request, &FileOpener, &XlsxResultWriter)?;
    info!(
        output = %report.output.display(),
        matched = report.total_matched(),
        "comparison finished"
    );
    Ok(report)
}

/// Shell contract: two paths and a field list in, the output path out.
pub fn compare_files(
    tabular: &Path,
    document: &Path,
    fields: &str,
    output: Option<&Path>,
    config: &MatchConfig,
) -> Result<PathBuf, MatchError> {
    let mut request = MatchRequest::new(tabular, document).with_fields(fields);
    request.output = output.map(Path::to_path_buf);
    compare(config, &request).map(|report| report.output)
}

/// Labels on the configured header row, for checking the offset before a
/// run.
pub fn header_columns(path: &Path, config: &MatchConfig) -> Result<Vec<String>, MatchError> {
    Ok(XlsxSheet::open(path, &config.source)?.columns())
}
