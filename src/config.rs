//! Configuration management for the resume screener

use crate::error::{Result, ScreenerError};
use crate::screening::normalizer::SkillNormalizer;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub oracle: OracleConfig,
    pub screening: ScreeningConfig,
    pub output: OutputConfig,
    /// Skill alias table: surface form -> canonical form.
    pub aliases: BTreeMap<String, String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OracleConfig {
    /// Chat-completions endpoint URL.
    pub endpoint: String,
    pub model: String,
    /// Name of the environment variable holding the API key.
    pub api_key_env: String,
    pub request_timeout_secs: u64,
    pub max_retries: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScreeningConfig {
    /// Weight of required-skill coverage in the final score.
    pub match_weight: f64,
    /// Weight of the extra-skill bonus in the final score.
    pub bonus_weight: f64,
    /// Extra skills counted toward the bonus are capped at this many.
    pub max_bonus_skills: usize,
    /// Resumes processed concurrently against the oracle.
    pub concurrency: usize,
    /// Per-resume extraction timeout.
    pub resume_timeout_secs: u64,
    /// Jaro-Winkler similarity threshold for degraded matching.
    pub fuzzy_threshold: f64,
    /// Whether the matching oracle is consulted for synonym matches.
    pub semantic_matching: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    pub format: OutputFormat,
    pub color: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum OutputFormat {
    Console,
    Csv,
    Json,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            oracle: OracleConfig {
                endpoint: "https://api.openai.com/v1/chat/completions".to_string(),
                model: "gpt-4o-mini".to_string(),
                api_key_env: "OPENAI_API_KEY".to_string(),
                request_timeout_secs: 120,
                max_retries: 3,
            },
            screening: ScreeningConfig {
                match_weight: 0.7,
                bonus_weight: 0.3,
                max_bonus_skills: 10,
                concurrency: 5,
                resume_timeout_secs: 60,
                fuzzy_threshold: 0.92,
                semantic_matching: true,
            },
            output: OutputConfig {
                format: OutputFormat::Console,
                color: true,
            },
            aliases: SkillNormalizer::default_aliases(),
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path();

        if config_path.exists() {
            Self::load_from(&config_path)
        } else {
            let config = Self::default();
            config.save()?;
            Ok(config)
        }
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content).map_err(|e| {
            ScreenerError::Configuration(format!("Failed to parse config: {}", e))
        })?;
        Ok(config)
    }

    pub fn save(&self) -> Result<()> {
        let config_path = Self::config_path();

        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self).map_err(|e| {
            ScreenerError::Configuration(format!("Failed to serialize config: {}", e))
        })?;

        std::fs::write(&config_path, content)?;
        Ok(())
    }

    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| dirs::home_dir().unwrap_or_else(|| PathBuf::from(".")))
            .join("resume-screener")
            .join("config.toml")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_roundtrips_through_toml() {
        let config = Config::default();
        let serialized = toml::to_string_pretty(&config).unwrap();
        let parsed: Config = toml::from_str(&serialized).unwrap();
        assert_eq!(parsed.screening.match_weight, 0.7);
        assert_eq!(parsed.screening.bonus_weight, 0.3);
        assert_eq!(parsed.screening.max_bonus_skills, 10);
        assert_eq!(parsed.aliases.get("js").map(String::as_str), Some("javascript"));
    }

    #[test]
    fn test_default_weights_are_valid() {
        let config = Config::default();
        assert!((config.screening.match_weight + config.screening.bonus_weight - 1.0).abs() < 1e-9);
    }
}
