//! PDF page text extraction helper
//!
//! Opens a PDF through a pluggable backend (lopdf by default), optionally
//! decrypts it, joins the per-page text into labeled blocks and renders a
//! plain-text report. The interactive password retry is modelled by
//! [`Session`].

mod backend;
mod error;
mod extract;
mod report;
mod session;
mod types;

// Re-export error types
pub use error::{BackendError, ExtractError, ReportError};

// Re-export backend seam
pub use backend::{LopdfBackend, LopdfDocument, PdfBackend, PdfDocument};

// Re-export extraction API
pub use extract::{
    DEFAULT_SCANNED_THRESHOLD, PdfExtractor, PdfExtractorBuilder, classify_backend_error, extract,
};

// Re-export reporting and orchestration
pub use report::{SEPARATOR, render_report, report};
pub use session::{PasswordPrompt, Session, SessionState};

// Re-export public types
pub use types::{ExtractionResult, Outcome};
