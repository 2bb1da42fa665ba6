//! Screening report formatters with multiple output formats

use crate::config::OutputFormat;
use crate::error::Result;
use crate::screening::pipeline::{ScreeningOutcome, ScreeningRecord};
use chrono::{DateTime, Utc};
use colored::{Color, Colorize};
use serde::Serialize;
use std::path::Path;

/// Trait for rendering a screening outcome into a presentable string
pub trait OutputFormatter {
    fn format_outcome(&self, outcome: &ScreeningOutcome) -> Result<String>;
    fn supports_format(&self) -> OutputFormat;
}

/// Console formatter with colors and a ranked summary table
pub struct ConsoleFormatter {
    use_colors: bool,
    detailed: bool,
}

/// CSV formatter for spreadsheet handoff to recruiters
pub struct CsvFormatter;

/// JSON formatter for API integration and structured data
pub struct JsonFormatter {
    pretty: bool,
}

impl ConsoleFormatter {
    pub fn new(use_colors: bool, detailed: bool) -> Self {
        Self {
            use_colors,
            detailed,
        }
    }

    fn colorize(&self, text: &str, color: Color) -> String {
        if self.use_colors {
            text.color(color).bold().to_string()
        } else {
            text.to_string()
        }
    }

    fn score_color(score: f64) -> Color {
        match score {
            s if s >= 75.0 => Color::Green,
            s if s >= 50.0 => Color::Yellow,
            _ => Color::Red,
        }
    }

    fn score_verdict(score: f64) -> &'static str {
        match score {
            s if s >= 85.0 => "Excellent fit",
            s if s >= 70.0 => "Strong fit",
            s if s >= 50.0 => "Moderate fit",
            s if s >= 30.0 => "Weak fit",
            _ => "Poor fit",
        }
    }
}

impl OutputFormatter for ConsoleFormatter {
    fn format_outcome(&self, outcome: &ScreeningOutcome) -> Result<String> {
        let mut output = String::new();

        output.push_str(&format!(
            "\n{}\n",
            self.colorize("📋 CANDIDATE SCREENING RESULTS", Color::Cyan)
        ));
        output.push_str(&format!(
            "Requirements: {} required, {} nice-to-have ({})\n",
            outcome.requirements.required.len(),
            outcome.requirements.nice_to_have.len(),
            outcome.requirements.source_format
        ));
        output.push_str(&format!(
            "Candidates: {} screened, {} extraction failures | Average score: {:.2}\n\n",
            outcome.total_candidates, outcome.extraction_failures, outcome.average_score
        ));

        for (rank, record) in outcome.records.iter().enumerate() {
            let score_text = format!("{:.2}", record.score.total);
            let colored_score = self.colorize(&score_text, Self::score_color(record.score.total));

            if record.candidate.failed() {
                output.push_str(&format!(
                    "{}. {} ({}) — {}\n",
                    rank + 1,
                    record.candidate.display_name(),
                    record.candidate.source_file,
                    self.colorize("extraction failed", Color::Red)
                ));
                if let Some(reason) = &record.candidate.extraction_error {
                    output.push_str(&format!("   Reason: {}\n", reason));
                }
                continue;
            }

            output.push_str(&format!(
                "{}. {} ({}) — {} [{}]\n",
                rank + 1,
                record.candidate.display_name(),
                record.candidate.source_file,
                colored_score,
                Self::score_verdict(record.score.total)
            ));
            output.push_str(&format!("   {}\n", record.score.explanation));

            if self.detailed {
                if !record.matching.matched.is_empty() {
                    output.push_str(&format!(
                        "   ✅ Matched: {}\n",
                        self.colorize(&join_skills(&record.matching.matched), Color::Green)
                    ));
                }
                if !record.matching.missing.is_empty() {
                    output.push_str(&format!(
                        "   ❌ Missing: {}\n",
                        self.colorize(&join_skills(&record.matching.missing), Color::Red)
                    ));
                }
                if !record.matching.nice_to_have_matched.is_empty() {
                    output.push_str(&format!(
                        "   ⭐ Nice-to-have: {}\n",
                        join_skills(&record.matching.nice_to_have_matched)
                    ));
                }
                if !record.matching.extra.is_empty() {
                    output.push_str(&format!(
                        "   ➕ Bonus: {}\n",
                        join_skills(&record.matching.extra)
                    ));
                }
            }
        }

        if let Some(top) = outcome.top_candidate() {
            output.push_str(&format!(
                "\n🏆 Top candidate: {} ({:.2})\n",
                self.colorize(&top.candidate.display_name(), Color::Green),
                top.score.total
            ));
        }

        Ok(output)
    }

    fn supports_format(&self) -> OutputFormat {
        OutputFormat::Console
    }
}

impl OutputFormatter for CsvFormatter {
    fn format_outcome(&self, outcome: &ScreeningOutcome) -> Result<String> {
        let mut output = String::new();
        output.push_str(
            "rank,candidate_id,name,source_file,total_score,base_score,bonus_score,\
             matched_skills,missing_skills,nice_to_have_matched,bonus_skills,status\n",
        );

        for (rank, record) in outcome.records.iter().enumerate() {
            let status = match &record.candidate.extraction_error {
                Some(reason) => format!("failed: {}", reason),
                None => "ok".to_string(),
            };
            let fields = [
                (rank + 1).to_string(),
                record.candidate.candidate_id.clone(),
                record.candidate.display_name(),
                record.candidate.source_file.clone(),
                format!("{:.2}", record.score.total),
                format!("{:.2}", record.score.base),
                format!("{:.2}", record.score.bonus),
                join_skills(&record.matching.matched),
                join_skills(&record.matching.missing),
                join_skills(&record.matching.nice_to_have_matched),
                join_skills(&record.matching.extra),
                status,
            ];
            let row: Vec<String> = fields.iter().map(|f| csv_escape(f)).collect();
            output.push_str(&row.join(","));
            output.push('\n');
        }

        Ok(output)
    }

    fn supports_format(&self) -> OutputFormat {
        OutputFormat::Csv
    }
}

impl JsonFormatter {
    pub fn new(pretty: bool) -> Self {
        Self { pretty }
    }
}

impl OutputFormatter for JsonFormatter {
    fn format_outcome(&self, outcome: &ScreeningOutcome) -> Result<String> {
        let report = JsonReport {
            generated_at: Utc::now(),
            version: env!("CARGO_PKG_VERSION"),
            outcome,
        };
        let json = if self.pretty {
            serde_json::to_string_pretty(&report)?
        } else {
            serde_json::to_string(&report)?
        };
        Ok(json)
    }

    fn supports_format(&self) -> OutputFormat {
        OutputFormat::Json
    }
}

#[derive(Serialize)]
struct JsonReport<'a> {
    generated_at: DateTime<Utc>,
    version: &'static str,
    outcome: &'a ScreeningOutcome,
}

/// Render one record as a compact single line, used by the shortlist export.
pub fn format_record_line(rank: usize, record: &ScreeningRecord) -> String {
    format!(
        "{}. {} ({}) — {:.2}",
        rank,
        record.candidate.display_name(),
        record.candidate.source_file,
        record.score.total
    )
}

pub async fn save_report(content: &str, path: &Path) -> Result<()> {
    tokio::fs::write(path, content).await?;
    Ok(())
}

fn join_skills<'a, I>(skills: I) -> String
where
    I: IntoIterator<Item = &'a crate::screening::normalizer::SkillToken>,
{
    skills
        .into_iter()
        .map(|s| s.as_str())
        .collect::<Vec<_>>()
        .join("; ")
}

/// Quote a CSV field when it contains a delimiter, quote, or newline.
fn csv_escape(field: &str) -> String {
    if field.contains(',') || field.contains('"') || field.contains('\n') {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}
