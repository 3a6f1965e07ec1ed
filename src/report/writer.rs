// src/report/writer.rs
// =============================================================================
// Renders a report and saves it to disk.
//
// Steps:
// 1. Render the report with the configured ReportFormat (JUnit XML or JSON)
// 2. Echo the rendered text to the build log
// 3. Write it to the destination file
//
// A failed write is returned as a WriteError - never a panic. The pipeline
// turns it into an overall failure.
// =============================================================================

use std::io::Write;
use std::path::Path;

use super::VerificationReport;
use crate::error::WriteError;

/// A way of turning a report into text
///
/// Implementations must be pure: the same report always renders the same text.
pub trait ReportFormat: Send + Sync {
    fn render(&self, report: &VerificationReport) -> String;

    /// Short name used in log messages
    fn name(&self) -> &'static str;
}

/// Renders reports with a ReportFormat and persists them
pub struct ReportWriter {
    format: Box<dyn ReportFormat>,
}

impl ReportWriter {
    pub fn new(format: Box<dyn ReportFormat>) -> Self {
        ReportWriter { format }
    }

    pub fn render(&self, report: &VerificationReport) -> String {
        self.format.render(report)
    }

    // Renders, logs and writes the report
    //
    // The log sink is best effort: failing to echo does not stop the write.
    pub fn write(
        &self,
        report: &VerificationReport,
        destination: &Path,
        log: &mut dyn Write,
    ) -> Result<(), WriteError> {
        let rendered = self.render(report);
        let _ = writeln!(log, "{}", rendered);

        tracing::debug!(
            format = self.format.name(),
            destination = %destination.display(),
            bytes = rendered.len(),
            "writing report"
        );

        std::fs::write(destination, rendered.as_bytes()).map_err(|source| WriteError {
            destination: destination.to_path_buf(),
            source,
        })?;

        let _ = writeln!(log, "Wrote report {}", destination.display());
        Ok(())
    }
}

impl Default for ReportWriter {
    fn default() -> Self {
        ReportWriter::new(Box::new(super::JunitXml))
    }
}
