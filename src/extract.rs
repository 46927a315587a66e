use std::path::Path;

use tracing::{debug, info, warn};

use crate::backend::{LopdfBackend, PdfBackend, PdfDocument};
use crate::error::{BackendError, ExtractError};
use crate::types::ExtractionResult;

/// Below this many extracted characters a document is assumed to be scanned.
pub const DEFAULT_SCANNED_THRESHOLD: usize = 50;

/// Builder for configuring PDF extraction options.
///
/// # Examples
///
/// ```no_run
/// use pdf_text_helper::PdfExtractor;
///
/// let result = PdfExtractor::builder()
///     .scanned_threshold(100)
///     .build()
///     .extract("report.pdf", Some("secret"));
/// println!("{}", result.message());
/// ```
#[derive(Debug, Clone)]
pub struct PdfExtractorBuilder<B = LopdfBackend> {
    backend: B,
    scanned_threshold: usize,
}

impl Default for PdfExtractorBuilder<LopdfBackend> {
    fn default() -> Self {
        Self {
            backend: LopdfBackend,
            scanned_threshold: DEFAULT_SCANNED_THRESHOLD,
        }
    }
}

impl PdfExtractorBuilder<LopdfBackend> {
    /// Create a new builder with default settings.
    pub fn new() -> Self {
        Self::default()
    }
}

impl<B> PdfExtractorBuilder<B> {
    /// Swap the parsing backend.
    pub fn backend<C: PdfBackend>(self, backend: C) -> PdfExtractorBuilder<C> {
        PdfExtractorBuilder {
            backend,
            scanned_threshold: self.scanned_threshold,
        }
    }

    /// Set the character count under which a success is flagged as a
    /// possible scanned document.
    pub fn scanned_threshold(mut self, chars: usize) -> Self {
        self.scanned_threshold = chars;
        self
    }

    /// Build the extractor configuration.
    pub fn build(self) -> PdfExtractor<B> {
        PdfExtractor {
            backend: self.backend,
            scanned_threshold: self.scanned_threshold,
        }
    }
}

/// PDF text extractor.
///
/// # Examples
///
/// ```no_run
/// use pdf_text_helper::PdfExtractor;
///
/// let result = PdfExtractor::default().extract("file.pdf", None);
/// if result.is_success() {
///     println!("{}", result.content());
/// }
/// ```
#[derive(Debug, Clone)]
pub struct PdfExtractor<B = LopdfBackend> {
    backend: B,
    scanned_threshold: usize,
}

impl Default for PdfExtractor<LopdfBackend> {
    fn default() -> Self {
        PdfExtractorBuilder::new().build()
    }
}

impl PdfExtractor<LopdfBackend> {
    /// Create a builder for configuring extraction options.
    pub fn builder() -> PdfExtractorBuilder<LopdfBackend> {
        PdfExtractorBuilder::new()
    }
}

impl<B: PdfBackend> PdfExtractor<B> {
    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Extract the text of every page of the PDF at `path`.
    ///
    /// Never fails: every problem is folded into the returned
    /// [`ExtractionResult`]. An empty password counts as no password.
    pub fn extract<P: AsRef<Path>>(&self, path: P, password: Option<&str>) -> ExtractionResult {
        let path = path.as_ref();
        let password = password.filter(|p| !p.is_empty());

        let file_name = match validate_path(path) {
            Ok(name) => name,
            Err(e) => {
                warn!("rejected {:?}: {}", path, e);
                return ExtractionResult::failure(e, None);
            }
        };

        match self.extract_document(path, &file_name, password) {
            Ok(result) => result,
            Err(e) => {
                let error = classify_backend_error(&e, &file_name);
                warn!("extraction of {} failed: {} ({})", file_name, error, e);
                ExtractionResult::failure(error, Some(file_name))
            }
        }
    }

    // The document is dropped, and thereby closed, on every return below.
    fn extract_document(
        &self,
        path: &Path,
        file_name: &str,
        password: Option<&str>,
    ) -> Result<ExtractionResult, BackendError> {
        let doc = match self.backend.open(path, password) {
            Ok(doc) => doc,
            Err(BackendError::PasswordRequired) if password.is_none() => {
                info!("{} is encrypted, password required", file_name);
                return Ok(ExtractionResult::password_required(file_name.to_string()));
            }
            Err(e) => return Err(e),
        };

        if doc.is_encrypted() && password.is_none() {
            info!("{} is encrypted, password required", file_name);
            return Ok(ExtractionResult::password_required(file_name.to_string()));
        }

        let page_count = doc.page_count();
        debug!("{} has {} pages", file_name, page_count);

        if page_count == 0 {
            let error = ExtractError::NoPages {
                name: file_name.to_string(),
            };
            warn!("{}", error);
            return Ok(ExtractionResult::failure(error, Some(file_name.to_string())));
        }

        let mut blocks = Vec::with_capacity(page_count);
        let mut text_len = 0;
        for index in 0..page_count {
            let text = doc.page_text(index)?;
            text_len += text.chars().count();
            blocks.push(format!("[Page {}]\n{}", index + 1, text));
        }

        let message = if text_len < self.scanned_threshold {
            warn!(
                "{} yielded only {} characters, possibly a scanned document",
                file_name, text_len
            );
            "warning: this PDF may be a scanned (image-only) document, very little text was extracted"
                .to_string()
        } else {
            format!("successfully extracted {} pages", page_count)
        };

        info!("extracted {} pages from {}", page_count, file_name);
        Ok(ExtractionResult::success(
            file_name.to_string(),
            blocks.join("\n\n"),
            page_count,
            message,
        ))
    }
}

/// Check existence, file type and extension, returning the base name.
fn validate_path(path: &Path) -> Result<String, ExtractError> {
    if !path.exists() {
        return Err(ExtractError::PathNotFound {
            path: path.to_path_buf(),
        });
    }

    if !path.is_file() {
        return Err(ExtractError::NotAFile {
            path: path.to_path_buf(),
        });
    }

    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();

    let is_pdf = path
        .extension()
        .is_some_and(|ext| ext.to_string_lossy().eq_ignore_ascii_case("pdf"));
    if !is_pdf {
        return Err(ExtractError::InvalidExtension { name });
    }

    Ok(name)
}

/// Translate a backend error into a user-facing failure.
///
/// Best effort only: the backends expose free-text errors, so this sniffs the
/// lowercased message for known substrings. Unrecognised text is passed
/// through unchanged as [`ExtractError::Library`].
pub fn classify_backend_error(error: &BackendError, file_name: &str) -> ExtractError {
    const PASSWORD_MARKERS: &[&str] = &["password", "encrypted"];
    const CORRUPTION_MARKERS: &[&str] = &[
        "cannot open",
        "damaged",
        "invalid file header",
        "xref",
        "trailer",
    ];

    let raw = error.message();
    let lower = raw.to_lowercase();

    if PASSWORD_MARKERS.iter().any(|m| lower.contains(m)) {
        ExtractError::WrongPassword
    } else if CORRUPTION_MARKERS.iter().any(|m| lower.contains(m)) {
        ExtractError::CorruptedFile {
            name: file_name.to_string(),
        }
    } else {
        ExtractError::Library(raw.to_string())
    }
}

/// Extract a PDF with the default lopdf backend.
///
/// This is a convenience function equivalent to
/// `PdfExtractor::default().extract(path, password)`.
pub fn extract<P: AsRef<Path>>(path: P, password: Option<&str>) -> ExtractionResult {
    PdfExtractor::default().extract(path, password)
}
