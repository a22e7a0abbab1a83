// PDF text extraction (text layer only, no OCR)

use std::panic::{self, AssertUnwindSafe};
use std::path::{Path, PathBuf};

use packmatch_recon::source::DocumentSource;
use packmatch_recon::MatchError;
use tracing::{debug, warn};

/// A PDF held in memory. The file handle is released as soon as `open`
/// has read the bytes.
#[derive(Debug, Clone)]
pub struct PdfDocument {
    path: PathBuf,
    bytes: Vec<u8>,
}

impl PdfDocument {
    pub fn open(path: &Path) -> Result<Self, MatchError> {
        let bytes = std::fs::read(path).map_err(|e| MatchError::UnreadableDocumentSource {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        Ok(Self {
            path: path.to_path_buf(),
            bytes,
        })
    }

    pub fn from_bytes(path: impl Into<PathBuf>, bytes: Vec<u8>) -> Self {
        Self {
            path: path.into(),
            bytes,
        }
    }

    fn unreadable(&self, reason: impl Into<String>) -> MatchError {
        MatchError::UnreadableDocumentSource {
            path: self.path.clone(),
            reason: reason.into(),
        }
    }
}

impl DocumentSource for PdfDocument {
    /// Text of every page, in page order. Any failure, including a panic
    /// inside the parser on a malformed file, fails the whole document.
    fn page_texts(&self) -> Result<Vec<String>, MatchError> {
        let bytes = &self.bytes;
        let outcome = catch_parser_panic(|| pdf_extract::extract_text_from_mem_by_pages(bytes));

        let pages = match outcome {
            Ok(Ok(pages)) => pages,
            Ok(Err(e)) => return Err(self.unreadable(e.to_string())),
            Err(msg) => {
                return Err(self.unreadable(format!("PDF parser aborted on malformed input: {msg}")))
            }
        };

        let chars: usize = pages.iter().map(|p| p.chars().count()).sum();
        debug!(path = %self.path.display(), pages = pages.len(), chars, "extracted PDF text");
        if pages.iter().all(|p| p.trim().is_empty()) {
            warn!(
                path = %self.path.display(),
                "PDF has no text layer; nothing can match (scanned document?)"
            );
        }
        Ok(pages)
    }
}

/// Run `f`, turning a panic into its message. The default hook is swapped
/// out for the duration so the panic lands in the debug log instead of
/// stderr; the previous hook is restored before returning.
fn catch_parser_panic<T>(f: impl FnOnce() -> T) -> Result<T, String> {
    let previous = panic::take_hook();
    panic::set_hook(Box::new(|info| debug!(panic = %info, "PDF parser panicked")));
    let outcome = panic::catch_unwind(AssertUnwindSafe(f));
    panic::set_hook(previous);

    outcome.map_err(|payload| {
        payload
            .downcast_ref::<&str>()
            .map(|s| s.to_string())
            .or_else(|| payload.downcast_ref::<String>().cloned())
            .unwrap_or_else(|| "unknown panic".to_string())
    })
}
