//! Shortlist selection and export
//!
//! Filters screened candidates by a score threshold and packages the
//! shortlist (resume copies, CSV, summary) into a timestamped directory a
//! recruiter can hand off as-is.

use crate::error::{Result, ScreenerError};
use crate::output::report::{format_record_line, CsvFormatter, OutputFormatter};
use crate::screening::pipeline::{ScreeningOutcome, ScreeningRecord};
use chrono::Local;
use log::{info, warn};
use std::path::{Path, PathBuf};

/// Records at or above the threshold, preserving the outcome's ranking.
/// Candidates whose extraction failed are never selected.
pub fn select_candidates(outcome: &ScreeningOutcome, threshold: f64) -> Vec<&ScreeningRecord> {
    outcome
        .records
        .iter()
        .filter(|record| !record.candidate.failed() && record.score.total >= threshold)
        .collect()
}

/// Result of a shortlist export.
#[derive(Debug)]
pub struct ShortlistSummary {
    pub directory: PathBuf,
    pub selected: usize,
    pub resumes_copied: usize,
}

pub struct ShortlistExporter {
    resume_dir: PathBuf,
    output_root: PathBuf,
}

impl ShortlistExporter {
    pub fn new(resume_dir: impl Into<PathBuf>, output_root: impl Into<PathBuf>) -> Self {
        Self {
            resume_dir: resume_dir.into(),
            output_root: output_root.into(),
        }
    }

    /// Export candidates scoring at or above `threshold` into a new
    /// `selected_candidates_{threshold}pct_{timestamp}` directory containing
    /// the shortlist CSV, a plain-text summary, and copies of the resumes.
    pub async fn export(
        &self,
        outcome: &ScreeningOutcome,
        threshold: f64,
    ) -> Result<ShortlistSummary> {
        if !(0.0..=100.0).contains(&threshold) {
            return Err(ScreenerError::InvalidInput(format!(
                "Selection threshold must be between 0 and 100, got {}",
                threshold
            )));
        }

        let selected = select_candidates(outcome, threshold);
        let timestamp = Local::now().format("%Y%m%d_%H%M%S");
        let dir = self.output_root.join(format!(
            "selected_candidates_{:.0}pct_{}",
            threshold, timestamp
        ));
        tokio::fs::create_dir_all(&dir).await?;

        let filtered = ScreeningOutcome {
            requirements: outcome.requirements.clone(),
            records: selected.iter().map(|r| (*r).clone()).collect(),
            total_candidates: selected.len(),
            extraction_failures: 0,
            average_score: outcome.average_score,
        };
        let csv = CsvFormatter.format_outcome(&filtered)?;
        tokio::fs::write(dir.join("shortlist.csv"), csv).await?;

        let summary = self.render_summary(outcome, &selected, threshold);
        tokio::fs::write(dir.join("selection_summary.txt"), summary).await?;

        let mut copied = 0;
        for record in &selected {
            let source = self.resume_dir.join(&record.candidate.source_file);
            match copy_resume(&source, &dir).await {
                Ok(()) => copied += 1,
                Err(e) => warn!(
                    "Could not copy resume '{}' into shortlist: {}",
                    source.display(),
                    e
                ),
            }
        }

        info!(
            "Exported {} candidates ({} resumes copied) to {}",
            selected.len(),
            copied,
            dir.display()
        );

        Ok(ShortlistSummary {
            directory: dir,
            selected: selected.len(),
            resumes_copied: copied,
        })
    }

    fn render_summary(
        &self,
        outcome: &ScreeningOutcome,
        selected: &[&ScreeningRecord],
        threshold: f64,
    ) -> String {
        let mut text = String::new();
        text.push_str(&format!(
            "Candidate selection — threshold {:.0}%\n",
            threshold
        ));
        text.push_str(&format!(
            "Generated: {}\n\n",
            Local::now().format("%Y-%m-%d %H:%M:%S")
        ));
        text.push_str(&format!(
            "Screened: {} candidates ({} extraction failures)\n",
            outcome.total_candidates, outcome.extraction_failures
        ));
        text.push_str(&format!(
            "Selected: {} candidates at or above {:.0}%\n\n",
            selected.len(),
            threshold
        ));

        if selected.is_empty() {
            text.push_str("No candidates met the threshold.\n");
        } else {
            for (idx, record) in selected.iter().enumerate() {
                text.push_str(&format_record_line(idx + 1, record));
                text.push('\n');
            }
        }
        text
    }
}

async fn copy_resume(source: &Path, dir: &Path) -> Result<()> {
    let file_name = source.file_name().ok_or_else(|| {
        ScreenerError::InvalidInput(format!("Invalid resume path: {}", source.display()))
    })?;
    tokio::fs::copy(source, dir.join(file_name)).await?;
    Ok(())
}
