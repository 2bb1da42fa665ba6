//! Job requirements parsing
//!
//! Requirements documents arrive in two shapes: a flat skill list
//! (newline/comma separated) or a free-form prose job description. The flat
//! path is fully offline; the prose path delegates skill identification to
//! the oracle.

use crate::error::{Result, ScreenerError};
use crate::oracle::SkillOracle;
use crate::screening::normalizer::{SkillNormalizer, SkillToken};
use log::{info, warn};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::sync::Arc;

/// Documents longer than this are assumed to be prose job descriptions.
const JD_LENGTH_THRESHOLD: usize = 600;
/// Lists are made of short lines; prose is not.
const SHORT_LINE_AVG: usize = 50;
/// Three or more sentence endings reads as prose.
const SENTENCE_MARK_THRESHOLD: usize = 3;

const JD_INDICATORS: &[&str] = &[
    "job title",
    "job summary",
    "responsibilities",
    "qualifications",
    "we are looking",
    "the ideal candidate",
    "years of experience",
    "bachelor",
    "degree",
    "role",
    "position",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SourceFormat {
    SimpleList,
    JobDescription,
}

impl fmt::Display for SourceFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SourceFormat::SimpleList => f.write_str("skill list"),
            SourceFormat::JobDescription => f.write_str("job description"),
        }
    }
}

/// The skill requirements for a role, parsed once per run and immutable
/// afterwards. `required` and `nice_to_have` are disjoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequiredSkillSet {
    pub required: BTreeSet<SkillToken>,
    pub nice_to_have: BTreeSet<SkillToken>,
    pub source_format: SourceFormat,
    pub raw_text: String,
}

impl RequiredSkillSet {
    /// Union of required and nice-to-have skills.
    pub fn all_skills(&self) -> BTreeSet<SkillToken> {
        self.required.union(&self.nice_to_have).cloned().collect()
    }

    pub fn required_count(&self) -> usize {
        self.required.len()
    }
}

pub struct RequirementsParser {
    normalizer: Arc<SkillNormalizer>,
    bullet_regex: Regex,
}

impl RequirementsParser {
    pub fn new(normalizer: Arc<SkillNormalizer>) -> Self {
        let bullet_regex =
            Regex::new(r"^[\*\-•·#]+\s*").expect("Invalid bullet regex");
        Self {
            normalizer,
            bullet_regex,
        }
    }

    /// Parse a requirements document, delegating prose extraction to the
    /// oracle. Fails with `EmptyInput` on blank input and `Extraction` when
    /// the oracle cannot produce any skills.
    pub async fn parse(
        &self,
        raw_text: &str,
        oracle: &dyn SkillOracle,
    ) -> Result<RequiredSkillSet> {
        if raw_text.trim().is_empty() {
            return Err(ScreenerError::EmptyInput(
                "requirements text is empty".to_string(),
            ));
        }

        match self.detect_format(raw_text) {
            SourceFormat::SimpleList => {
                info!("Detected simple skill list format");
                self.parse_simple_list(raw_text)
            }
            SourceFormat::JobDescription => {
                info!("Detected job description format, extracting skills via oracle");
                self.parse_job_description(raw_text, oracle).await
            }
        }
    }

    /// Classify a requirements document. This is a heuristic, not a parser:
    /// prose indicators, document length and sentence density vote for a job
    /// description, short comma/newline separated lines vote for a list.
    pub fn detect_format(&self, content: &str) -> SourceFormat {
        let lower = content.to_lowercase();
        let indicator_count = JD_INDICATORS
            .iter()
            .filter(|marker| lower.contains(*marker))
            .count();
        if indicator_count >= 2 {
            return SourceFormat::JobDescription;
        }

        if content.chars().count() > JD_LENGTH_THRESHOLD {
            return SourceFormat::JobDescription;
        }

        if sentence_mark_count(content) >= SENTENCE_MARK_THRESHOLD {
            return SourceFormat::JobDescription;
        }

        let lines: Vec<&str> = content
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .collect();
        if !lines.is_empty() {
            let avg_len = lines.iter().map(|l| l.chars().count()).sum::<usize>() / lines.len();
            if avg_len < SHORT_LINE_AVG {
                return SourceFormat::SimpleList;
            }
        }

        if content.contains(',') && content.chars().count() < 500 {
            return SourceFormat::SimpleList;
        }

        SourceFormat::JobDescription
    }

    /// Offline path: split on newlines and commas, strip bullets and comment
    /// markers, normalize and deduplicate. Every token becomes required.
    pub fn parse_simple_list(&self, raw_text: &str) -> Result<RequiredSkillSet> {
        if raw_text.trim().is_empty() {
            return Err(ScreenerError::EmptyInput(
                "requirements text is empty".to_string(),
            ));
        }

        let mut required = BTreeSet::new();
        for piece in raw_text.split(|c| c == ',' || c == '\n') {
            let piece = piece.trim();
            if piece.starts_with('#') {
                continue;
            }
            let piece = self.bullet_regex.replace(piece, "");
            let token = self.normalizer.normalize(&piece);
            // Only empty tokens are noise; "c" and "r" are real skills
            if !token.is_empty() {
                required.insert(token);
            }
        }

        if required.is_empty() {
            return Err(ScreenerError::Extraction(
                "no skills found in requirements list".to_string(),
            ));
        }

        Ok(RequiredSkillSet {
            required,
            nice_to_have: BTreeSet::new(),
            source_format: SourceFormat::SimpleList,
            raw_text: raw_text.to_string(),
        })
    }

    async fn parse_job_description(
        &self,
        raw_text: &str,
        oracle: &dyn SkillOracle,
    ) -> Result<RequiredSkillSet> {
        let extraction = oracle.extract_requirements(raw_text).await?;

        let required: BTreeSet<SkillToken> = extraction
            .required
            .iter()
            .map(|s| self.normalizer.normalize(s))
            .filter(|t| !t.is_empty())
            .collect();

        // Duplicates across the two sets resolve in favor of required
        let nice_to_have: BTreeSet<SkillToken> = extraction
            .nice_to_have
            .iter()
            .map(|s| self.normalizer.normalize(s))
            .filter(|t| !t.is_empty() && !required.contains(t))
            .collect();

        if required.is_empty() && nice_to_have.is_empty() {
            return Err(ScreenerError::Extraction(
                "oracle returned no skills for the job description".to_string(),
            ));
        }

        if required.is_empty() {
            warn!("Job description yielded only nice-to-have skills");
        }

        info!(
            "Extracted {} required and {} nice-to-have skills",
            required.len(),
            nice_to_have.len()
        );

        Ok(RequiredSkillSet {
            required,
            nice_to_have,
            source_format: SourceFormat::JobDescription,
            raw_text: raw_text.to_string(),
        })
    }
}

fn sentence_mark_count(content: &str) -> usize {
    let chars: Vec<char> = content.chars().collect();
    chars
        .iter()
        .enumerate()
        .filter(|(i, c)| {
            matches!(c, '.' | '!' | '?')
                && chars
                    .get(i + 1)
                    .map_or(true, |next| next.is_whitespace())
        })
        .count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::oracle::stub::StubOracle;

    fn parser() -> RequirementsParser {
        RequirementsParser::new(Arc::new(SkillNormalizer::default()))
    }

    #[test]
    fn test_detect_simple_list() {
        let p = parser();
        assert_eq!(p.detect_format("python\njava\nsql"), SourceFormat::SimpleList);
        assert_eq!(
            p.detect_format("python, java, sql, docker"),
            SourceFormat::SimpleList
        );
    }

    #[test]
    fn test_detect_job_description() {
        let p = parser();
        let jd = "We are looking for a backend engineer. The ideal candidate has \
                  5 years of experience with Java and Spring Boot. Responsibilities \
                  include designing APIs.";
        assert_eq!(p.detect_format(jd), SourceFormat::JobDescription);
    }

    #[test]
    fn test_long_text_is_job_description() {
        let p = parser();
        let long_text = "word ".repeat(200);
        assert_eq!(p.detect_format(&long_text), SourceFormat::JobDescription);
    }

    #[test]
    fn test_parse_simple_list() {
        let p = parser();
        let result = p.parse_simple_list("Python\n- Java\n* SQL\n# a comment\n\n").unwrap();
        let skills: Vec<&str> = result.required.iter().map(|t| t.as_str()).collect();
        assert!(skills.contains(&"python"));
        assert!(skills.contains(&"java"));
        assert!(skills.contains(&"sql"));
        assert!(!skills.contains(&"a comment"));
        assert!(result.nice_to_have.is_empty());
        assert_eq!(result.source_format, SourceFormat::SimpleList);
    }

    #[test]
    fn test_single_character_skills_survive() {
        let p = parser();
        let result = p.parse_simple_list("c\npython\nr").unwrap();
        let skills: Vec<&str> = result.required.iter().map(|t| t.as_str()).collect();
        assert_eq!(skills, vec!["c", "python", "r"]);
    }

    #[test]
    fn test_bullet_only_lines_are_dropped() {
        let p = parser();
        let result = p.parse_simple_list("python\n-\n*\nsql").unwrap();
        assert_eq!(result.required.len(), 2);
    }

    #[test]
    fn test_empty_input_fails() {
        let p = parser();
        let result = p.parse_simple_list("   \n  ");
        assert!(matches!(result, Err(ScreenerError::EmptyInput(_))));
    }

    #[tokio::test]
    async fn test_empty_input_fails_before_oracle() {
        let p = parser();
        let oracle = StubOracle::new();
        let result = p.parse("", &oracle).await;
        assert!(matches!(result, Err(ScreenerError::EmptyInput(_))));
        assert_eq!(oracle.requirements_calls(), 0);
    }

    #[tokio::test]
    async fn test_job_description_path() {
        let p = parser();
        let oracle = StubOracle::new()
            .with_requirements(&["Java", "spring boot"], &["kafka", "JAVA"]);
        let jd = "We are looking for a Java engineer. The ideal candidate knows \
                  Spring Boot. Kafka is a plus. Responsibilities include on-call.";

        let result = p.parse(jd, &oracle).await.unwrap();
        assert_eq!(result.source_format, SourceFormat::JobDescription);
        assert!(result.required.iter().any(|t| t.as_str() == "java"));
        assert!(result.required.iter().any(|t| t.as_str() == "spring boot"));
        // "JAVA" deduplicates into required, never nice-to-have
        assert!(result.nice_to_have.iter().all(|t| t.as_str() != "java"));
        assert!(result.nice_to_have.iter().any(|t| t.as_str() == "kafka"));
    }

    #[tokio::test]
    async fn test_oracle_failure_surfaces_as_extraction_error() {
        let p = parser();
        let oracle = StubOracle::new().with_failure("on-call");
        let jd = "We are looking for an engineer. The ideal candidate is senior. \
                  Responsibilities include on-call rotations.";

        let result = p.parse(jd, &oracle).await;
        assert!(matches!(result, Err(ScreenerError::Extraction(_))));
    }
}
