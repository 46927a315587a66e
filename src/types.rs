use crate::error::ExtractError;

/// Tri-state result of one extraction attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Success { content: String, page_count: usize },
    /// The document is encrypted and no password was supplied.
    NeedsPassword,
    Failure(ExtractError),
}

/// Output of [`crate::PdfExtractor::extract`].
///
/// Built once and never mutated; the reporter consumes it by reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractionResult {
    outcome: Outcome,
    message: String,
    file_name: Option<String>,
}

impl ExtractionResult {
    pub(crate) fn success(
        file_name: String,
        content: String,
        page_count: usize,
        message: String,
    ) -> Self {
        ExtractionResult {
            outcome: Outcome::Success {
                content,
                page_count,
            },
            message,
            file_name: Some(file_name),
        }
    }

    pub(crate) fn password_required(file_name: String) -> Self {
        ExtractionResult {
            outcome: Outcome::NeedsPassword,
            message: "PDF file is encrypted".to_string(),
            file_name: Some(file_name),
        }
    }

    /// `file_name` is `None` when path validation itself failed.
    pub(crate) fn failure(error: ExtractError, file_name: Option<String>) -> Self {
        ExtractionResult {
            message: error.to_string(),
            outcome: Outcome::Failure(error),
            file_name,
        }
    }

    pub fn outcome(&self) -> &Outcome {
        &self.outcome
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn file_name(&self) -> Option<&str> {
        self.file_name.as_deref()
    }

    /// Joined page blocks, empty unless the outcome is a success.
    pub fn content(&self) -> &str {
        match &self.outcome {
            Outcome::Success { content, .. } => content,
            _ => "",
        }
    }

    pub fn page_count(&self) -> usize {
        match &self.outcome {
            Outcome::Success { page_count, .. } => *page_count,
            _ => 0,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self.outcome, Outcome::Success { .. })
    }

    pub fn needs_password(&self) -> bool {
        matches!(self.outcome, Outcome::NeedsPassword)
    }

    pub fn error(&self) -> Option<&ExtractError> {
        match &self.outcome {
            Outcome::Failure(e) => Some(e),
            _ => None,
        }
    }
}
