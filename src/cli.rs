//! CLI interface for the resume screener

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "resume-screener")]
#[command(about = "AI-powered candidate screening against job requirements")]
#[command(long_about = "Screen a directory of resumes against job requirements, ranking candidates by skill fit with semantic matching")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Configuration file path
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Screen resumes against job requirements
    Screen {
        /// Path to requirements file (TXT, MD): a skill list or a full job description
        #[arg(short, long)]
        requirements: PathBuf,

        /// Directory of resume files (PDF, TXT, MD)
        #[arg(short = 'd', long)]
        resumes: PathBuf,

        /// Show matched/missing skill detail per candidate
        #[arg(long)]
        detailed: bool,

        /// Output format: console, csv, json
        #[arg(short, long, default_value = "console")]
        output: String,

        /// Save output to file
        #[arg(short, long)]
        save: Option<PathBuf>,

        /// Export candidates scoring at or above this threshold (0-100)
        #[arg(long)]
        select: Option<f64>,

        /// Directory for shortlist exports (defaults to current directory)
        #[arg(long)]
        export_dir: Option<PathBuf>,

        /// Skip semantic skill matching (exact and fuzzy matching only)
        #[arg(long)]
        no_semantic: bool,

        /// Override the number of resumes processed concurrently
        #[arg(long)]
        concurrency: Option<usize>,
    },

    /// Show configuration
    Config {
        #[command(subcommand)]
        action: Option<ConfigAction>,
    },
}

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Show current configuration
    Show,

    /// Print the configuration file path
    Path,

    /// Reset configuration to defaults
    Reset,
}

/// Parse and validate output format
pub fn parse_output_format(format: &str) -> Result<crate::config::OutputFormat, String> {
    match format.to_lowercase().as_str() {
        "console" => Ok(crate::config::OutputFormat::Console),
        "csv" => Ok(crate::config::OutputFormat::Csv),
        "json" => Ok(crate::config::OutputFormat::Json),
        _ => Err(format!(
            "Invalid output format: {}. Supported: console, csv, json",
            format
        )),
    }
}

/// Validate file extension
pub fn validate_file_extension(path: &PathBuf, allowed_extensions: &[&str]) -> Result<(), String> {
    match path.extension().and_then(|ext| ext.to_str()) {
        Some(ext) => {
            if allowed_extensions.contains(&ext.to_lowercase().as_str()) {
                Ok(())
            } else {
                Err(format!(
                    "Unsupported file extension: .{}. Allowed: {}",
                    ext,
                    allowed_extensions.join(", ")
                ))
            }
        }
        None => Err("File has no extension".to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::OutputFormat;

    #[test]
    fn test_parse_output_format() {
        assert_eq!(parse_output_format("console").unwrap(), OutputFormat::Console);
        assert_eq!(parse_output_format("CSV").unwrap(), OutputFormat::Csv);
        assert_eq!(parse_output_format("json").unwrap(), OutputFormat::Json);
        assert!(parse_output_format("html").is_err());
    }

    #[test]
    fn test_validate_file_extension() {
        assert!(validate_file_extension(&PathBuf::from("req.txt"), &["txt", "md"]).is_ok());
        assert!(validate_file_extension(&PathBuf::from("req.pdf"), &["txt", "md"]).is_err());
        assert!(validate_file_extension(&PathBuf::from("noext"), &["txt"]).is_err());
    }
}
