//! Core screening pipeline
//!
//! Requirements interpretation, per-resume skill extraction, cached skill
//! matching and deterministic fit scoring.

pub mod extractor;
pub mod matcher;
pub mod normalizer;
pub mod pipeline;
pub mod requirements;
pub mod scoring;
