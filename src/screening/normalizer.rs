//! Skill string canonicalization
//!
//! Every component compares skills by their normalized form, so this is the
//! single place where surface variation (case, whitespace, punctuation,
//! common aliases) is folded away.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// A canonical, normalized skill identifier.
///
/// Two tokens are equal iff they denote the same skill after normalization.
/// Tokens are only created through [`SkillNormalizer::normalize`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SkillToken(String);

impl SkillToken {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for SkillToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Canonicalizes skill strings so equal skills compare equal regardless of
/// surface form.
pub struct SkillNormalizer {
    aliases: BTreeMap<String, String>,
}

impl SkillNormalizer {
    pub fn new(aliases: BTreeMap<String, String>) -> Self {
        Self { aliases }
    }

    /// Normalize a raw skill string into a canonical token.
    ///
    /// Lower-cases, trims, collapses internal whitespace, strips surrounding
    /// punctuation and applies the alias table. Total and idempotent:
    /// `normalize(normalize(x)) == normalize(x)` for all inputs.
    pub fn normalize(&self, raw: &str) -> SkillToken {
        let lowered = raw.to_lowercase();

        // Strip punctuation from the edges only. '+' and '#' are part of
        // skill names like "c++" and "c#" and must survive.
        let stripped = lowered
            .trim()
            .trim_matches(|c: char| c.is_ascii_punctuation() && c != '+' && c != '#');

        let collapsed = stripped.split_whitespace().collect::<Vec<_>>().join(" ");

        match self.aliases.get(&collapsed) {
            Some(canonical) => SkillToken(canonical.clone()),
            None => SkillToken(collapsed),
        }
    }

    /// The built-in alias table. Alias values are themselves canonical forms,
    /// which keeps normalization idempotent.
    pub fn default_aliases() -> BTreeMap<String, String> {
        let pairs = [
            ("js", "javascript"),
            ("ts", "typescript"),
            ("py", "python"),
            ("python3", "python"),
            ("golang", "go"),
            ("k8s", "kubernetes"),
            ("postgres", "postgresql"),
            ("ml", "machine learning"),
            ("tf", "tensorflow"),
            ("node", "node.js"),
            ("nodejs", "node.js"),
            ("amazon web services", "aws"),
            ("gcp", "google cloud"),
            ("ci/cd", "cicd"),
            ("restful", "rest api"),
        ];

        pairs
            .iter()
            .map(|(a, c)| (a.to_string(), c.to_string()))
            .collect()
    }
}

impl Default for SkillNormalizer {
    fn default() -> Self {
        Self::new(Self::default_aliases())
    }
}
