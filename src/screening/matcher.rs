//! Skill matching with memoization
//!
//! Exact normalized equality always matches; the optional matching oracle
//! only ever adds matches (synonyms, a framework implying its language).
//! Results are memoized per normalized (requirements, candidate) pair so two
//! candidates with identical skill sets cost one computation and receive
//! identical results.

use crate::oracle::SkillOracle;
use crate::screening::extractor::CandidateSkillSet;
use crate::screening::normalizer::SkillToken;
use crate::screening::requirements::RequiredSkillSet;
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};
use std::sync::Mutex;
use strsim::jaro_winkler;

/// Outcome of matching one candidate against the requirements.
///
/// Invariants: `matched` and `missing` partition `required` exactly;
/// `extra` is the candidate's skills outside required and nice-to-have;
/// nice-to-have matches are informational and never counted as extra.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchResult {
    pub matched: BTreeSet<SkillToken>,
    pub missing: BTreeSet<SkillToken>,
    pub nice_to_have_matched: BTreeSet<SkillToken>,
    pub extra: BTreeSet<SkillToken>,
}

impl MatchResult {
    /// The result for a candidate whose extraction failed: nothing matched,
    /// everything missing, nothing extra.
    pub fn all_missing(required: &RequiredSkillSet) -> Self {
        Self {
            matched: BTreeSet::new(),
            missing: required.required.clone(),
            nice_to_have_matched: BTreeSet::new(),
            extra: BTreeSet::new(),
        }
    }
}

type CacheKey = (Vec<SkillToken>, Vec<SkillToken>);

/// Matches candidate skill sets against requirements, memoizing results for
/// the lifetime of one pipeline run.
pub struct SkillMatcher {
    cache: Mutex<HashMap<CacheKey, MatchResult>>,
    fuzzy_threshold: f64,
}

impl SkillMatcher {
    pub fn new(fuzzy_threshold: f64) -> Self {
        Self {
            cache: Mutex::new(HashMap::new()),
            fuzzy_threshold,
        }
    }

    /// Drop all memoized results. Called at the start of every pipeline run.
    pub fn clear_cache(&self) {
        self.cache.lock().expect("cache poisoned").clear();
    }

    pub fn cache_len(&self) -> usize {
        self.cache.lock().expect("cache poisoned").len()
    }

    /// Match a candidate against the requirements. A cached pair returns the
    /// stored result without recomputation or any oracle call. Pass `None`
    /// for the oracle to run in exact/fuzzy-only mode.
    pub async fn match_skills(
        &self,
        oracle: Option<&dyn SkillOracle>,
        required: &RequiredSkillSet,
        candidate: &CandidateSkillSet,
    ) -> MatchResult {
        let key: CacheKey = (
            required.all_skills().into_iter().collect(),
            candidate.skills.iter().cloned().collect(),
        );

        if let Some(cached) = self.cache.lock().expect("cache poisoned").get(&key) {
            debug!("Match cache hit for candidate '{}'", candidate.candidate_id);
            return cached.clone();
        }

        let result = self.compute(oracle, required, candidate).await;

        // Concurrent computes for the same key may race; both produce the
        // same pure result, so last-write-wins is safe
        self.cache
            .lock()
            .expect("cache poisoned")
            .insert(key, result.clone());

        result
    }

    async fn compute(
        &self,
        oracle: Option<&dyn SkillOracle>,
        required: &RequiredSkillSet,
        candidate: &CandidateSkillSet,
    ) -> MatchResult {
        let candidate_list: Vec<String> = candidate
            .skills
            .iter()
            .map(|t| t.as_str().to_string())
            .collect();

        let mut matched = BTreeSet::new();
        let mut missing = BTreeSet::new();
        let mut degraded = oracle.is_none();

        for skill in &required.required {
            // Exact normalized equality always matches, whatever the oracle
            // would say about it
            if candidate.skills.contains(skill) {
                matched.insert(skill.clone());
                continue;
            }

            let mut is_match = false;

            if let (false, Some(oracle)) = (degraded, oracle) {
                match oracle.skills_match(skill.as_str(), &candidate_list).await {
                    Ok(verdict) => is_match = verdict,
                    Err(e) => {
                        warn!(
                            "Matching oracle unavailable for '{}', degrading to fuzzy matching: {}",
                            skill, e
                        );
                        degraded = true;
                    }
                }
            }

            if !is_match && degraded {
                is_match = self.fuzzy_match(skill, &candidate.skills);
            }

            if is_match {
                matched.insert(skill.clone());
            } else {
                missing.insert(skill.clone());
            }
        }

        let nice_to_have_matched: BTreeSet<SkillToken> = required
            .nice_to_have
            .intersection(&candidate.skills)
            .cloned()
            .collect();

        let all_required = required.all_skills();
        let extra: BTreeSet<SkillToken> = candidate
            .skills
            .difference(&all_required)
            .cloned()
            .collect();

        MatchResult {
            matched,
            missing,
            nice_to_have_matched,
            extra,
        }
    }

    fn fuzzy_match(&self, skill: &SkillToken, candidate_skills: &BTreeSet<SkillToken>) -> bool {
        candidate_skills
            .iter()
            .any(|c| jaro_winkler(skill.as_str(), c.as_str()) >= self.fuzzy_threshold)
    }
}
