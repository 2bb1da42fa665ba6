//! Deterministic, table-driven skill oracle for tests
//!
//! Runs the full pipeline without network access. Responses are looked up by
//! substring markers in the input text, calls are counted so tests can assert
//! cache behavior, and failures can be injected per marker.

use crate::error::{Result, ScreenerError};
use crate::oracle::{RequirementsExtraction, ResumeExtraction, SkillOracle};
use async_trait::async_trait;
use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

#[derive(Default)]
pub struct StubOracle {
    requirements: Option<RequirementsExtraction>,
    resumes: Vec<(String, ResumeExtraction)>,
    synonyms: HashSet<(String, String)>,
    fail_markers: Vec<String>,
    delay: Option<(String, Duration)>,
    matching_fails: bool,
    requirements_calls: AtomicUsize,
    resume_calls: AtomicUsize,
    match_calls: AtomicUsize,
}

impl StubOracle {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fixed response for every requirements-extraction call.
    pub fn with_requirements(
        mut self,
        required: &[&str],
        nice_to_have: &[&str],
    ) -> Self {
        self.requirements = Some(RequirementsExtraction {
            required: required.iter().map(|s| s.to_string()).collect(),
            nice_to_have: nice_to_have.iter().map(|s| s.to_string()).collect(),
        });
        self
    }

    /// Resume response for any input text containing `marker`.
    pub fn with_resume(mut self, marker: &str, name: Option<&str>, skills: &[&str]) -> Self {
        self.resumes.push((
            marker.to_string(),
            ResumeExtraction {
                name: name.map(|n| n.to_string()),
                skills: skills.iter().map(|s| s.to_string()).collect(),
            },
        ));
        self
    }

    /// Declare that `candidate_skill` implies `required_skill`.
    pub fn with_synonym(mut self, required_skill: &str, candidate_skill: &str) -> Self {
        self.synonyms
            .insert((required_skill.to_string(), candidate_skill.to_string()));
        self
    }

    /// Inject an extraction failure for any input containing `marker`.
    pub fn with_failure(mut self, marker: &str) -> Self {
        self.fail_markers.push(marker.to_string());
        self
    }

    /// Sleep before answering when the input contains `marker`, for timeout tests.
    pub fn with_delay(mut self, marker: &str, delay: Duration) -> Self {
        self.delay = Some((marker.to_string(), delay));
        self
    }

    /// Make every `skills_match` call fail, forcing degraded matching.
    pub fn with_matching_failure(mut self) -> Self {
        self.matching_fails = true;
        self
    }

    pub fn requirements_calls(&self) -> usize {
        self.requirements_calls.load(Ordering::SeqCst)
    }

    pub fn resume_calls(&self) -> usize {
        self.resume_calls.load(Ordering::SeqCst)
    }

    pub fn match_calls(&self) -> usize {
        self.match_calls.load(Ordering::SeqCst)
    }

    fn check_failure(&self, text: &str) -> Result<()> {
        for marker in &self.fail_markers {
            if text.contains(marker.as_str()) {
                return Err(ScreenerError::Extraction(format!(
                    "injected failure for '{}'",
                    marker
                )));
            }
        }
        Ok(())
    }

    async fn maybe_delay(&self, text: &str) {
        if let Some((marker, delay)) = &self.delay {
            if text.contains(marker.as_str()) {
                tokio::time::sleep(*delay).await;
            }
        }
    }
}

#[async_trait]
impl SkillOracle for StubOracle {
    async fn extract_requirements(&self, text: &str) -> Result<RequirementsExtraction> {
        self.requirements_calls.fetch_add(1, Ordering::SeqCst);
        self.check_failure(text)?;

        match &self.requirements {
            Some(extraction) => Ok(extraction.clone()),
            None => Err(ScreenerError::Extraction(
                "stub has no requirements table".to_string(),
            )),
        }
    }

    async fn extract_resume(&self, text: &str) -> Result<ResumeExtraction> {
        self.resume_calls.fetch_add(1, Ordering::SeqCst);
        self.maybe_delay(text).await;
        self.check_failure(text)?;

        for (marker, extraction) in &self.resumes {
            if text.contains(marker.as_str()) {
                return Ok(extraction.clone());
            }
        }

        // Unlisted inputs parse as a literal comma/newline separated list,
        // which keeps simple tests free of table setup.
        let skills = text
            .split(|c| c == ',' || c == '\n')
            .map(|s| s.trim().to_lowercase())
            .filter(|s| !s.is_empty())
            .collect();

        Ok(ResumeExtraction { name: None, skills })
    }

    async fn skills_match(
        &self,
        required_skill: &str,
        candidate_skills: &[String],
    ) -> Result<bool> {
        self.match_calls.fetch_add(1, Ordering::SeqCst);

        if self.matching_fails {
            return Err(ScreenerError::OracleUnavailable(
                "injected matching outage".to_string(),
            ));
        }

        Ok(candidate_skills.iter().any(|candidate| {
            self.synonyms
                .contains(&(required_skill.to_string(), candidate.clone()))
        }))
    }
}
