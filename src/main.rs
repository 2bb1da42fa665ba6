//! Resume screener: AI-powered candidate screening against job requirements

mod cli;
mod config;
mod error;
mod input;
mod oracle;
mod output;
mod screening;

use clap::Parser;
use cli::{Cli, Commands, ConfigAction};
use config::{Config, OutputFormat};
use error::{Result, ScreenerError};
use indicatif::{ProgressBar, ProgressStyle};
use input::manager::{collect_resume_files, InputManager};
use log::{error, info};
use oracle::client::HttpOracle;
use output::filter::ShortlistExporter;
use output::report::{ConsoleFormatter, CsvFormatter, JsonFormatter, OutputFormatter};
use screening::extractor::ResumeInput;
use screening::normalizer::SkillNormalizer;
use screening::pipeline::ScreeningPipeline;
use std::path::PathBuf;
use std::process;
use std::sync::Arc;

#[tokio::main]
async fn main() {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();

    // Load configuration
    let config = match &cli.config {
        Some(path) => Config::load_from(path),
        None => Config::load(),
    };
    let config = match config {
        Ok(config) => config,
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            process::exit(1);
        }
    };

    // Execute command
    if let Err(e) = run_command(cli.command, config).await {
        error!("Command failed: {}", e);
        // Usage errors exit distinctly from runtime failures
        process::exit(if e.is_fatal() { 2 } else { 1 });
    }
}

async fn run_command(command: Commands, mut config: Config) -> Result<()> {
    match command {
        Commands::Screen {
            requirements,
            resumes,
            detailed,
            output,
            save,
            select,
            export_dir,
            no_semantic,
            concurrency,
        } => {
            info!("Starting candidate screening");

            cli::validate_file_extension(&requirements, &["txt", "md"])
                .map_err(|e| ScreenerError::InvalidInput(format!("Requirements file: {}", e)))?;

            let output_format =
                cli::parse_output_format(&output).map_err(ScreenerError::InvalidInput)?;

            if let Some(n) = concurrency {
                config.screening.concurrency = n;
            }
            if no_semantic {
                config.screening.semantic_matching = false;
            }

            println!("🚀 Candidate screening");
            println!("📋 Requirements: {}", requirements.display());
            println!("📁 Resumes: {}", resumes.display());
            println!("🔧 Output Format: {:?}", output_format);
            if no_semantic {
                println!("⚠️  Semantic matching disabled");
            }

            // Read inputs before touching the network
            let mut input_manager = InputManager::new();
            let requirements_text = input_manager.extract_text(&requirements).await?;

            let resume_files = collect_resume_files(&resumes)?;
            if resume_files.is_empty() {
                return Err(ScreenerError::EmptyInput(format!(
                    "No supported resume files (pdf, txt, md) found in {}",
                    resumes.display()
                )));
            }

            println!("\n📂 Reading {} resume files...", resume_files.len());
            let progress = ProgressBar::new(resume_files.len() as u64);
            progress.set_style(
                ProgressStyle::with_template("{bar:40.cyan/blue} {pos}/{len} {msg}")
                    .unwrap_or_else(|_| ProgressStyle::default_bar()),
            );

            let mut inputs: Vec<ResumeInput> = Vec::with_capacity(resume_files.len());
            for file in &resume_files {
                progress.set_message(
                    file.file_name()
                        .map(|n| n.to_string_lossy().to_string())
                        .unwrap_or_default(),
                );
                inputs.push(input_manager.load_resume(file).await);
                progress.inc(1);
            }
            progress.finish_and_clear();

            // Wire up the pipeline
            let oracle = Arc::new(HttpOracle::from_config(&config.oracle)?);
            let normalizer = Arc::new(SkillNormalizer::new(config.aliases.clone()));
            let pipeline = ScreeningPipeline::new(oracle, normalizer, &config.screening)?;

            println!("🔍 Screening {} candidates...", inputs.len());
            let outcome = pipeline.run(&requirements_text, inputs).await?;

            let use_colors = config.output.color && save.is_none();
            let formatted = match output_format {
                OutputFormat::Console => {
                    ConsoleFormatter::new(use_colors, detailed).format_outcome(&outcome)?
                }
                OutputFormat::Csv => CsvFormatter.format_outcome(&outcome)?,
                OutputFormat::Json => JsonFormatter::new(true).format_outcome(&outcome)?,
            };

            match &save {
                Some(path) => {
                    output::report::save_report(&formatted, path).await?;
                    println!("💾 Report saved to {}", path.display());
                }
                None => println!("{}", formatted),
            }

            if let Some(threshold) = select {
                let export_root = export_dir.unwrap_or_else(|| PathBuf::from("."));
                let exporter = ShortlistExporter::new(&resumes, export_root);
                let summary = exporter.export(&outcome, threshold).await?;
                println!(
                    "📦 Exported {} candidates ({} resumes) to {}",
                    summary.selected,
                    summary.resumes_copied,
                    summary.directory.display()
                );
            }
        }

        Commands::Config { action } => match action {
            Some(ConfigAction::Show) | None => {
                println!("⚙️  Current Configuration\n");
                println!("Config file: {}", Config::config_path().display());
                println!("Oracle endpoint: {}", config.oracle.endpoint);
                println!("Oracle model: {}", config.oracle.model);
                println!("API key env var: {}", config.oracle.api_key_env);
                println!("\nScoring Weights:");
                println!("  Required match: {:.1}%", config.screening.match_weight * 100.0);
                println!("  Bonus skills: {:.1}%", config.screening.bonus_weight * 100.0);
                println!("  Max bonus skills: {}", config.screening.max_bonus_skills);
                println!("\nProcessing:");
                println!("  Concurrency: {}", config.screening.concurrency);
                println!("  Resume timeout: {}s", config.screening.resume_timeout_secs);
                println!("  Semantic matching: {}", config.screening.semantic_matching);
                println!("  Fuzzy threshold: {:.2}", config.screening.fuzzy_threshold);
            }

            Some(ConfigAction::Path) => {
                println!("{}", Config::config_path().display());
            }

            Some(ConfigAction::Reset) => {
                println!("🔄 Resetting configuration to defaults...");
                let default_config = Config::default();
                default_config.save()?;
                println!("✅ Configuration reset successfully!");
            }
        },
    }

    Ok(())
}
