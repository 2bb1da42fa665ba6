//! Screening pipeline composition
//!
//! Parses requirements once, extracts candidate skills in parallel, matches
//! and scores every candidate, and returns a deterministically ordered
//! result set. Fatal errors (blank requirements, bad weights) abort before
//! any partial results exist; per-resume errors ride along in the records.

use crate::config::ScreeningConfig;
use crate::error::{Result, ScreenerError};
use crate::oracle::SkillOracle;
use crate::screening::extractor::{CandidateSkillSet, ResumeInput, SkillExtractionOrchestrator};
use crate::screening::matcher::{MatchResult, SkillMatcher};
use crate::screening::normalizer::SkillNormalizer;
use crate::screening::requirements::{RequiredSkillSet, RequirementsParser};
use crate::screening::scoring::{FitScore, FitScoreCalculator, ScoreWeights};
use log::{info, warn};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;

/// One screened candidate: who they are, what matched, and how they scored.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScreeningRecord {
    pub candidate: CandidateSkillSet,
    pub matching: MatchResult,
    pub score: FitScore,
}

/// The full result of a screening run, ordered by descending fit score with
/// ties broken by submission order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScreeningOutcome {
    pub requirements: RequiredSkillSet,
    pub records: Vec<ScreeningRecord>,
    pub total_candidates: usize,
    pub extraction_failures: usize,
    /// Mean total score across successfully extracted candidates.
    pub average_score: f64,
}

impl ScreeningOutcome {
    pub fn top_candidate(&self) -> Option<&ScreeningRecord> {
        self.records.first()
    }
}

pub struct ScreeningPipeline {
    oracle: Arc<dyn SkillOracle>,
    parser: RequirementsParser,
    orchestrator: SkillExtractionOrchestrator,
    matcher: SkillMatcher,
    calculator: FitScoreCalculator,
    semantic_matching: bool,
}

impl ScreeningPipeline {
    /// Build a pipeline. Fails with `InvalidWeights` before any processing
    /// when the configured weights are unusable.
    pub fn new(
        oracle: Arc<dyn SkillOracle>,
        normalizer: Arc<SkillNormalizer>,
        config: &ScreeningConfig,
    ) -> Result<Self> {
        let weights = ScoreWeights {
            match_weight: config.match_weight,
            bonus_weight: config.bonus_weight,
            max_bonus_skills: config.max_bonus_skills,
        };
        let calculator = FitScoreCalculator::new(weights)?;

        Ok(Self {
            oracle,
            parser: RequirementsParser::new(Arc::clone(&normalizer)),
            orchestrator: SkillExtractionOrchestrator::new(
                normalizer,
                config.concurrency,
                Duration::from_secs(config.resume_timeout_secs),
            ),
            matcher: SkillMatcher::new(config.fuzzy_threshold),
            calculator,
            semantic_matching: config.semantic_matching,
        })
    }

    /// Screen every resume against the requirements document.
    ///
    /// Every submitted resume yields exactly one record, even if only to
    /// report that it could not be screened.
    pub async fn run(
        &self,
        requirements_text: &str,
        resumes: Vec<ResumeInput>,
    ) -> Result<ScreeningOutcome> {
        if requirements_text.trim().is_empty() {
            return Err(ScreenerError::EmptyInput(
                "requirements text is empty".to_string(),
            ));
        }
        if resumes.is_empty() {
            return Err(ScreenerError::EmptyInput("no resumes to screen".to_string()));
        }

        // The match cache is scoped to a single run
        self.matcher.clear_cache();

        let requirements = self.parse_requirements(requirements_text).await?;
        info!(
            "Screening {} resume(s) against {} required skills",
            resumes.len(),
            requirements.required_count()
        );

        let candidates = self
            .orchestrator
            .extract_all(Arc::clone(&self.oracle), resumes)
            .await;

        let matching_oracle: Option<&dyn SkillOracle> = if self.semantic_matching {
            Some(self.oracle.as_ref())
        } else {
            None
        };

        let mut records = Vec::with_capacity(candidates.len());
        for candidate in candidates {
            let record = match &candidate.extraction_error {
                Some(reason) => {
                    let reason = reason.clone();
                    ScreeningRecord {
                        matching: MatchResult::all_missing(&requirements),
                        score: FitScore::failed(&reason),
                        candidate,
                    }
                }
                None => {
                    let matching = self
                        .matcher
                        .match_skills(matching_oracle, &requirements, &candidate)
                        .await;
                    let score = self
                        .calculator
                        .score(&matching, requirements.required_count());
                    ScreeningRecord {
                        candidate,
                        matching,
                        score,
                    }
                }
            };
            records.push(record);
        }

        // Stable sort: ties keep submission order, so identical inputs
        // always produce identical output order
        records.sort_by(|a, b| b.score.total.total_cmp(&a.score.total));

        let total_candidates = records.len();
        let extraction_failures = records
            .iter()
            .filter(|r| r.candidate.extraction_error.is_some())
            .count();
        let successful = total_candidates - extraction_failures;
        let average_score = if successful == 0 {
            0.0
        } else {
            records
                .iter()
                .filter(|r| r.candidate.extraction_error.is_none())
                .map(|r| r.score.total)
                .sum::<f64>()
                / successful as f64
        };

        Ok(ScreeningOutcome {
            requirements,
            records,
            total_candidates,
            extraction_failures,
            average_score,
        })
    }

    /// Parse the requirements, falling back to treating the whole document
    /// as a flat list when prose extraction fails recoverably.
    async fn parse_requirements(&self, requirements_text: &str) -> Result<RequiredSkillSet> {
        match self.parser.parse(requirements_text, self.oracle.as_ref()).await {
            Ok(requirements) => Ok(requirements),
            Err(e @ (ScreenerError::Extraction(_) | ScreenerError::OracleUnavailable(_))) => {
                warn!(
                    "Requirements extraction failed ({}), falling back to flat list parsing",
                    e
                );
                self.parser.parse_simple_list(requirements_text)
            }
            Err(e) => Err(e),
        }
    }
}
