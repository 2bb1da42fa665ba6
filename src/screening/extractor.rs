//! Concurrent per-resume skill extraction
//!
//! Each resume is handed to the oracle independently under a bounded
//! concurrency budget (the oracle is rate limited) and a per-resume timeout.
//! One bad resume never takes the batch down: failures are folded into the
//! candidate's record and carried downstream.

use crate::oracle::SkillOracle;
use crate::screening::normalizer::{SkillNormalizer, SkillToken};
use log::{info, warn};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Semaphore;

/// A resume already converted to text by the input layer.
#[derive(Debug, Clone)]
pub struct ResumeInput {
    pub id: String,
    pub source_file: String,
    pub text: String,
}

impl ResumeInput {
    pub fn new(
        id: impl Into<String>,
        source_file: impl Into<String>,
        text: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            source_file: source_file.into(),
            text: text.into(),
        }
    }
}

/// The skills extracted for one candidate. Immutable once produced; when
/// `extraction_error` is set, `skills` is empty and the candidate is still
/// carried downstream for reporting.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CandidateSkillSet {
    pub candidate_id: String,
    pub name: Option<String>,
    pub skills: BTreeSet<SkillToken>,
    pub source_file: String,
    pub extraction_error: Option<String>,
}

impl CandidateSkillSet {
    fn from_error(input: &ResumeInput, reason: String) -> Self {
        Self {
            candidate_id: input.id.clone(),
            name: None,
            skills: BTreeSet::new(),
            source_file: input.source_file.clone(),
            extraction_error: Some(reason),
        }
    }

    pub fn failed(&self) -> bool {
        self.extraction_error.is_some()
    }

    pub fn display_name(&self) -> String {
        self.name
            .clone()
            .unwrap_or_else(|| self.candidate_id.clone())
    }
}

/// Runs resume skill extraction with bounded parallelism.
pub struct SkillExtractionOrchestrator {
    normalizer: Arc<SkillNormalizer>,
    concurrency: usize,
    timeout: Duration,
}

impl SkillExtractionOrchestrator {
    pub fn new(normalizer: Arc<SkillNormalizer>, concurrency: usize, timeout: Duration) -> Self {
        Self {
            normalizer,
            concurrency: concurrency.max(1),
            timeout,
        }
    }

    /// Extract a skill set for every resume, one output per input in input
    /// order. Individual failures (empty text, oracle error, timeout) become
    /// `extraction_error` on that candidate only.
    pub async fn extract_all(
        &self,
        oracle: Arc<dyn SkillOracle>,
        resumes: Vec<ResumeInput>,
    ) -> Vec<CandidateSkillSet> {
        info!(
            "Extracting skills from {} resume(s), concurrency {}",
            resumes.len(),
            self.concurrency
        );

        let semaphore = Arc::new(Semaphore::new(self.concurrency));
        let mut handles = Vec::with_capacity(resumes.len());

        for input in resumes {
            let semaphore = Arc::clone(&semaphore);
            let oracle = Arc::clone(&oracle);
            let normalizer = Arc::clone(&self.normalizer);
            let timeout = self.timeout;

            // Keep the identity outside the task so a panicked task can
            // still be reported against its candidate
            let candidate_id = input.id.clone();
            let source_file = input.source_file.clone();
            let handle = tokio::spawn(async move {
                // Closed only when the semaphore is dropped, which cannot
                // happen while this task holds a clone
                let _permit = semaphore.acquire().await.expect("semaphore closed");
                extract_one(oracle.as_ref(), &normalizer, &input, timeout).await
            });
            handles.push((candidate_id, source_file, handle));
        }

        let mut results = Vec::with_capacity(handles.len());
        for (candidate_id, source_file, handle) in handles {
            match handle.await {
                Ok(candidate) => results.push(candidate),
                Err(e) => {
                    warn!("extraction task for '{}' failed: {}", source_file, e);
                    results.push(CandidateSkillSet {
                        candidate_id,
                        name: None,
                        skills: BTreeSet::new(),
                        source_file,
                        extraction_error: Some(format!("extraction task failed: {}", e)),
                    });
                }
            }
        }
        results
    }
}

async fn extract_one(
    oracle: &dyn SkillOracle,
    normalizer: &SkillNormalizer,
    input: &ResumeInput,
    timeout: Duration,
) -> CandidateSkillSet {
    if input.text.trim().is_empty() {
        warn!("Resume '{}' has no text", input.source_file);
        return CandidateSkillSet::from_error(input, "resume text is empty".to_string());
    }

    let extraction = match tokio::time::timeout(timeout, oracle.extract_resume(&input.text)).await
    {
        Ok(Ok(extraction)) => extraction,
        Ok(Err(e)) => {
            warn!("Extraction failed for '{}': {}", input.source_file, e);
            return CandidateSkillSet::from_error(input, e.to_string());
        }
        Err(_) => {
            warn!(
                "Extraction timed out for '{}' after {:?}",
                input.source_file, timeout
            );
            return CandidateSkillSet::from_error(
                input,
                format!("extraction timed out after {}s", timeout.as_secs()),
            );
        }
    };

    let skills: BTreeSet<SkillToken> = extraction
        .skills
        .iter()
        .map(|s| normalizer.normalize(s))
        .filter(|t| !t.is_empty())
        .collect();

    info!(
        "Extracted {} skills from '{}'",
        skills.len(),
        input.source_file
    );

    CandidateSkillSet {
        candidate_id: input.id.clone(),
        name: extraction.name,
        skills,
        source_file: input.source_file.clone(),
        extraction_error: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::oracle::stub::StubOracle;

    fn orchestrator(concurrency: usize) -> SkillExtractionOrchestrator {
        SkillExtractionOrchestrator::new(
            Arc::new(SkillNormalizer::default()),
            concurrency,
            Duration::from_secs(5),
        )
    }

    fn inputs(texts: &[&str]) -> Vec<ResumeInput> {
        texts
            .iter()
            .enumerate()
            .map(|(i, text)| {
                ResumeInput::new(format!("c{}", i + 1), format!("resume_{}.pdf", i + 1), *text)
            })
            .collect()
    }

    #[tokio::test]
    async fn test_fault_isolation() {
        let oracle = Arc::new(StubOracle::new().with_failure("BROKEN"));
        let resumes = inputs(&[
            "python, sql",
            "java, spring",
            "BROKEN",
            "rust, tokio",
            "go, kubernetes",
        ]);

        let results = orchestrator(3).extract_all(oracle, resumes).await;

        assert_eq!(results.len(), 5);
        assert!(results[2].extraction_error.is_some());
        assert!(results[2].skills.is_empty());
        for (i, candidate) in results.iter().enumerate() {
            if i != 2 {
                assert!(candidate.extraction_error.is_none());
                assert!(!candidate.skills.is_empty());
            }
        }
        // Results stay traceable to their inputs
        assert_eq!(results[2].candidate_id, "c3");
        assert_eq!(results[4].candidate_id, "c5");
    }

    #[tokio::test]
    async fn test_empty_text_is_not_fatal() {
        let oracle = Arc::new(StubOracle::new());
        let results = orchestrator(2)
            .extract_all(oracle.clone(), inputs(&["  ", "python"]))
            .await;

        assert_eq!(results.len(), 2);
        assert!(results[0].extraction_error.is_some());
        assert!(results[1].extraction_error.is_none());
        // Empty text never reaches the oracle
        assert_eq!(oracle.resume_calls(), 1);
    }

    #[tokio::test]
    async fn test_timeout_treated_as_extraction_error() {
        let oracle = Arc::new(
            StubOracle::new().with_delay("slow", Duration::from_secs(30)),
        );
        let orchestrator = SkillExtractionOrchestrator::new(
            Arc::new(SkillNormalizer::default()),
            2,
            Duration::from_millis(50),
        );

        let results = orchestrator
            .extract_all(oracle, inputs(&["slow resume", "python"]))
            .await;

        assert!(results[0]
            .extraction_error
            .as_deref()
            .unwrap()
            .contains("timed out"));
        assert!(results[1].extraction_error.is_none());
    }

    #[tokio::test]
    async fn test_panicked_task_keeps_candidate_identity() {
        use crate::error::Result;
        use crate::oracle::{RequirementsExtraction, ResumeExtraction};
        use async_trait::async_trait;

        struct PanickingOracle;

        #[async_trait]
        impl SkillOracle for PanickingOracle {
            async fn extract_requirements(&self, _text: &str) -> Result<RequirementsExtraction> {
                unreachable!("not used in this test")
            }

            async fn extract_resume(&self, text: &str) -> Result<ResumeExtraction> {
                if text.contains("BOOM") {
                    panic!("stub oracle panic");
                }
                Ok(ResumeExtraction {
                    name: None,
                    skills: vec!["python".to_string()],
                })
            }

            async fn skills_match(
                &self,
                _required_skill: &str,
                _candidate_skills: &[String],
            ) -> Result<bool> {
                Ok(false)
            }
        }

        let results = orchestrator(2)
            .extract_all(Arc::new(PanickingOracle), inputs(&["BOOM", "python"]))
            .await;

        assert_eq!(results.len(), 2);
        assert_eq!(results[0].candidate_id, "c1");
        assert_eq!(results[0].source_file, "resume_1.pdf");
        assert!(results[0]
            .extraction_error
            .as_deref()
            .unwrap()
            .contains("task failed"));
        assert_eq!(results[1].candidate_id, "c2");
        assert!(results[1].extraction_error.is_none());
    }

    #[tokio::test]
    async fn test_skills_are_normalized() {
        let oracle =
            Arc::new(StubOracle::new().with_resume("jane", Some("Jane"), &["JS", " Python ", "k8s"]));
        let results = orchestrator(1)
            .extract_all(oracle, inputs(&["resume of jane"]))
            .await;

        let skills: Vec<&str> = results[0].skills.iter().map(|t| t.as_str()).collect();
        assert_eq!(skills, vec!["javascript", "kubernetes", "python"]);
    }
}
