//! Network-backed skill oracle
//!
//! Talks to an OpenAI-compatible chat-completions endpoint. All retry and
//! response-parsing logic lives here so the rest of the crate only sees the
//! [`SkillOracle`] trait.

use crate::config::OracleConfig;
use crate::error::{Result, ScreenerError};
use crate::oracle::prompts::PromptTemplates;
use crate::oracle::{RequirementsExtraction, ResumeExtraction, SkillOracle};
use async_trait::async_trait;
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    temperature: f32,
    messages: Vec<ChatMessage<'a>>,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChatChoiceMessage {
    content: String,
}

/// Skill oracle backed by a chat-completions API.
pub struct HttpOracle {
    client: reqwest::Client,
    endpoint: String,
    model: String,
    api_key: String,
    max_retries: u32,
    templates: PromptTemplates,
}

impl HttpOracle {
    pub fn from_config(config: &OracleConfig) -> Result<Self> {
        let api_key = std::env::var(&config.api_key_env).map_err(|_| {
            ScreenerError::Configuration(format!(
                "API key environment variable '{}' is not set",
                config.api_key_env
            ))
        })?;

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()?;

        Ok(Self {
            client,
            endpoint: config.endpoint.clone(),
            model: config.model.clone(),
            api_key,
            max_retries: config.max_retries,
            templates: PromptTemplates::default(),
        })
    }

    /// Make one chat-completions call, retrying on 429 and 5xx responses
    /// with exponential backoff.
    async fn call(&self, system: &str, user: &str) -> Result<String> {
        let request_body = ChatRequest {
            model: &self.model,
            temperature: 0.0,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: system,
                },
                ChatMessage {
                    role: "user",
                    content: user,
                },
            ],
        };

        let mut last_error: Option<ScreenerError> = None;

        for attempt in 0..self.max_retries {
            if attempt > 0 {
                // Exponential backoff: 1s, 2s, 4s
                let delay = Duration::from_millis(1000 * (1 << (attempt - 1)));
                warn!(
                    "Oracle call attempt {} failed, retrying after {}ms",
                    attempt,
                    delay.as_millis()
                );
                tokio::time::sleep(delay).await;
            }

            let response = self
                .client
                .post(&self.endpoint)
                .bearer_auth(&self.api_key)
                .json(&request_body)
                .send()
                .await;

            let response = match response {
                Ok(r) => r,
                Err(e) => {
                    last_error = Some(ScreenerError::OracleUnavailable(e.to_string()));
                    continue;
                }
            };

            let status = response.status();

            if status.as_u16() == 429 || status.is_server_error() {
                let body = response.text().await.unwrap_or_default();
                warn!("Oracle endpoint returned {}: {}", status, body);
                last_error = Some(ScreenerError::OracleUnavailable(format!(
                    "status {}: {}",
                    status, body
                )));
                continue;
            }

            if !status.is_success() {
                let body = response.text().await.unwrap_or_default();
                return Err(ScreenerError::OracleUnavailable(format!(
                    "status {}: {}",
                    status, body
                )));
            }

            let parsed: ChatResponse = response.json().await?;
            let content = parsed
                .choices
                .into_iter()
                .next()
                .map(|c| c.message.content)
                .ok_or_else(|| {
                    ScreenerError::Extraction("oracle returned no completion choices".to_string())
                })?;

            debug!("Oracle call succeeded ({} chars)", content.len());
            return Ok(content);
        }

        Err(last_error.unwrap_or_else(|| {
            ScreenerError::OracleUnavailable(format!(
                "gave up after {} retries",
                self.max_retries
            ))
        }))
    }
}

#[async_trait]
impl SkillOracle for HttpOracle {
    async fn extract_requirements(&self, text: &str) -> Result<RequirementsExtraction> {
        let user = self.templates.render_requirements_user(text);
        let response = self.call(&self.templates.requirements_system, &user).await?;
        let extraction = parse_requirements_response(&response);

        if extraction.is_empty() {
            return Err(ScreenerError::Extraction(
                "oracle returned no skills for the job description".to_string(),
            ));
        }
        Ok(extraction)
    }

    async fn extract_resume(&self, text: &str) -> Result<ResumeExtraction> {
        let user = self.templates.render_resume_user(text);
        let response = self.call(&self.templates.resume_system, &user).await?;
        Ok(parse_resume_response(&response))
    }

    async fn skills_match(
        &self,
        required_skill: &str,
        candidate_skills: &[String],
    ) -> Result<bool> {
        let user = self
            .templates
            .render_matching_user(required_skill, &candidate_skills.join(", "));
        let response = self.call(&self.templates.matching_system, &user).await?;
        parse_yes_no(&response).ok_or_else(|| {
            ScreenerError::Extraction(format!(
                "oracle returned a non-verdict for '{}': {}",
                required_skill, response
            ))
        })
    }
}

/// Parse a `REQUIRED:` / `NICE_TO_HAVE:` response body.
pub fn parse_requirements_response(response: &str) -> RequirementsExtraction {
    let mut extraction = RequirementsExtraction::default();

    for line in response.lines() {
        let line = line.trim();
        if let Some(rest) = line.strip_prefix("REQUIRED:") {
            extraction.required = split_skill_list(rest);
        } else if let Some(rest) = line.strip_prefix("NICE_TO_HAVE:") {
            extraction.nice_to_have = split_skill_list(rest);
        }
    }

    extraction
}

/// Parse a `NAME:` / `SKILLS:` response body.
pub fn parse_resume_response(response: &str) -> ResumeExtraction {
    let mut extraction = ResumeExtraction::default();

    for line in response.lines() {
        let line = line.trim();
        if let Some(rest) = line.strip_prefix("NAME:") {
            let name = rest.trim();
            if !name.is_empty() && !name.eq_ignore_ascii_case("unknown") {
                extraction.name = Some(name.to_string());
            }
        } else if let Some(rest) = line.strip_prefix("SKILLS:") {
            extraction.skills = split_skill_list(rest);
        }
    }

    extraction
}

/// Parse a one-word YES/NO verdict. Returns None when the oracle rambled.
pub fn parse_yes_no(response: &str) -> Option<bool> {
    let first_word = response
        .trim()
        .split_whitespace()
        .next()?
        .trim_matches(|c: char| c.is_ascii_punctuation());

    if first_word.eq_ignore_ascii_case("yes") {
        Some(true)
    } else if first_word.eq_ignore_ascii_case("no") {
        Some(false)
    } else {
        None
    }
}

fn split_skill_list(raw: &str) -> Vec<String> {
    let raw = raw.trim().trim_matches(|c| c == '[' || c == ']');
    if raw.is_empty() || raw.eq_ignore_ascii_case("none") {
        return Vec::new();
    }

    raw.split(',')
        .map(|s| s.trim().to_lowercase())
        .filter(|s| !s.is_empty())
        .collect()
}
