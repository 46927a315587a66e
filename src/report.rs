use std::fs;
use std::io::Write;
use std::path::Path;

use tracing::info;

use crate::error::ReportError;
use crate::types::{ExtractionResult, Outcome};

/// Fixed-width rule framing the report.
pub const SEPARATOR: &str = "==================================================";

/// Render the full text report for a successful result.
///
/// Returns `None` for the needs-password and failure outcomes, which only
/// ever get a one-line diagnostic.
pub fn render_report(result: &ExtractionResult) -> Option<String> {
    let Outcome::Success {
        content,
        page_count,
    } = result.outcome()
    else {
        return None;
    };

    let lines = [
        SEPARATOR.to_string(),
        format!("PDF file: {}", result.file_name().unwrap_or_default()),
        format!("Total pages: {}", page_count),
        SEPARATOR.to_string(),
        String::new(),
        content.clone(),
        String::new(),
        SEPARATOR.to_string(),
        "Extraction complete".to_string(),
        SEPARATOR.to_string(),
    ];

    Some(lines.join("\n"))
}

/// Print or save the outcome of an extraction.
///
/// `console` receives diagnostics and confirmations, and the report body
/// itself when no `output` path is given. With an `output` path the body is
/// written only to that file.
pub fn report<W: Write>(
    result: &ExtractionResult,
    output: Option<&Path>,
    console: &mut W,
) -> Result<(), ReportError> {
    let Some(text) = render_report(result) else {
        match result.outcome() {
            Outcome::NeedsPassword => {
                writeln!(console, "⚠ PDF file is encrypted, please enter the password")?
            }
            _ => writeln!(console, "✗ {}", result.message())?,
        }
        return Ok(());
    };

    match output {
        Some(path) => {
            fs::write(path, &text).map_err(|source| ReportError::Io {
                path: path.to_path_buf(),
                source,
            })?;
            info!("report written to {:?}", path);
            writeln!(console, "✓ Content saved to: {}", path.display())?;
        }
        None => writeln!(console, "{}", text)?,
    }

    Ok(())
}
