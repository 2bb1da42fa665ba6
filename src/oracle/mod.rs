//! External skill oracle abstraction
//!
//! The screener consumes an LLM-style capability for three things: pulling a
//! required/nice-to-have skill partition out of a prose job description,
//! pulling a candidate name and skill list out of resume text, and judging
//! whether a candidate's skills imply a required skill (synonyms, a framework
//! implying its base language). The oracle is untrusted and replaceable:
//! [`client::HttpOracle`] talks to a real endpoint, [`stub::StubOracle`] is a
//! deterministic table for tests.

use crate::error::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

pub mod client;
pub mod prompts;
pub mod stub;

/// Structured result of parsing a job description.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RequirementsExtraction {
    pub required: Vec<String>,
    pub nice_to_have: Vec<String>,
}

impl RequirementsExtraction {
    pub fn is_empty(&self) -> bool {
        self.required.is_empty() && self.nice_to_have.is_empty()
    }
}

/// Structured result of parsing a resume.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ResumeExtraction {
    pub name: Option<String>,
    pub skills: Vec<String>,
}

/// The skill-identification capability consumed by the screening pipeline.
///
/// Implementations must be callable per-resume and per-requirements-document
/// with no ordering assumptions between calls.
#[async_trait]
pub trait SkillOracle: Send + Sync {
    /// Extract technical skills from a prose job description, partitioned
    /// into required and nice-to-have.
    async fn extract_requirements(&self, text: &str) -> Result<RequirementsExtraction>;

    /// Extract the candidate name and skill list from resume text.
    async fn extract_resume(&self, text: &str) -> Result<ResumeExtraction>;

    /// Judge whether the candidate's skill set includes or implies the given
    /// required skill. Optional capability: callers degrade to normalized
    /// equality matching when this errors.
    async fn skills_match(&self, required_skill: &str, candidate_skills: &[String])
        -> Result<bool>;
}
