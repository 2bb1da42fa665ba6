//! Deterministic fit scoring
//!
//! A pure function from a match outcome to a weighted score: required-skill
//! coverage forms the base, extra skills add a capped bonus. Identical
//! inputs always produce identical scores.

use crate::error::{Result, ScreenerError};
use crate::screening::matcher::MatchResult;
use log::warn;
use serde::{Deserialize, Serialize};

/// Weights for combining base coverage and extra-skill bonus.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ScoreWeights {
    pub match_weight: f64,
    pub bonus_weight: f64,
    pub max_bonus_skills: usize,
}

impl Default for ScoreWeights {
    fn default() -> Self {
        Self {
            match_weight: 0.7,
            bonus_weight: 0.3,
            max_bonus_skills: 10,
        }
    }
}

impl ScoreWeights {
    /// Weights must be non-negative and sum to 1.0.
    pub fn validate(&self) -> Result<()> {
        if self.match_weight < 0.0 || self.bonus_weight < 0.0 {
            return Err(ScreenerError::InvalidWeights(format!(
                "weights must be non-negative, got match={} bonus={}",
                self.match_weight, self.bonus_weight
            )));
        }
        let sum = self.match_weight + self.bonus_weight;
        if (sum - 1.0).abs() > 1e-6 {
            return Err(ScreenerError::InvalidWeights(format!(
                "weights must sum to 1.0, got {}",
                sum
            )));
        }
        Ok(())
    }
}

/// A candidate's fit score on a 0-100 scale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FitScore {
    pub base: f64,
    pub bonus: f64,
    pub total: f64,
    /// Set when the requirements contained no required skills, which makes
    /// the base score meaningless rather than zero-worthy.
    pub no_required_skills: bool,
    pub explanation: String,
}

impl FitScore {
    /// The score assigned to candidates whose resume could not be processed.
    pub fn failed(reason: &str) -> Self {
        Self {
            base: 0.0,
            bonus: 0.0,
            total: 0.0,
            no_required_skills: false,
            explanation: format!("Resume processing failed: {}", reason),
        }
    }
}

/// Computes fit scores from match results. Weight validation happens at
/// construction, before any candidate is processed.
pub struct FitScoreCalculator {
    weights: ScoreWeights,
}

impl FitScoreCalculator {
    pub fn new(weights: ScoreWeights) -> Result<Self> {
        weights.validate()?;
        Ok(Self { weights })
    }

    /// Score one match outcome. Total and side-effect free.
    ///
    /// `base = 100 * matched / required_count`,
    /// `bonus = 100 * min(extra, cap) / cap`,
    /// `total = base * match_weight + bonus * bonus_weight`, clamped to [0, 100].
    pub fn score(&self, result: &MatchResult, required_count: usize) -> FitScore {
        if required_count == 0 {
            warn!("No required skills to calculate fit against");
            return FitScore {
                base: 0.0,
                bonus: 0.0,
                total: 0.0,
                no_required_skills: true,
                explanation: "No required skills defined".to_string(),
            };
        }

        let base = 100.0 * result.matched.len() as f64 / required_count as f64;

        let cap = self.weights.max_bonus_skills;
        let counted_extra = result.extra.len().min(cap);
        let bonus = if cap == 0 {
            0.0
        } else {
            100.0 * counted_extra as f64 / cap as f64
        };

        let total = (base * self.weights.match_weight + bonus * self.weights.bonus_weight)
            .clamp(0.0, 100.0);

        let explanation = format!(
            "Matched {}/{} required skills ({:.1}% base score). \
             Has {} additional relevant skills ({:.1}% bonus). \
             Final weighted score: {:.1}%",
            result.matched.len(),
            required_count,
            base,
            counted_extra,
            bonus,
            total
        );

        FitScore {
            base: round2(base),
            bonus: round2(bonus),
            total: round2(total),
            no_required_skills: false,
            explanation,
        }
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
