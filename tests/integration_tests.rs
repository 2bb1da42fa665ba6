//! Integration tests for the resume screener

use resume_screener::config::ScreeningConfig;
use resume_screener::input::manager::{collect_resume_files, InputManager};
use resume_screener::oracle::stub::StubOracle;
use resume_screener::screening::extractor::ResumeInput;
use resume_screener::screening::normalizer::SkillNormalizer;
use resume_screener::screening::pipeline::ScreeningPipeline;
use resume_screener::screening::requirements::SourceFormat;
use resume_screener::ScreenerError;
use std::path::Path;
use std::sync::Arc;

fn test_config() -> ScreeningConfig {
    ScreeningConfig {
        match_weight: 0.7,
        bonus_weight: 0.3,
        max_bonus_skills: 10,
        concurrency: 4,
        resume_timeout_secs: 5,
        fuzzy_threshold: 0.92,
        semantic_matching: true,
    }
}

fn pipeline_with(oracle: Arc<StubOracle>) -> ScreeningPipeline {
    let normalizer = Arc::new(SkillNormalizer::default());
    ScreeningPipeline::new(oracle, normalizer, &test_config()).expect("valid test config")
}

// --- Input layer ---

#[tokio::test]
async fn test_text_extraction_from_txt() {
    let mut manager = InputManager::new();
    let path = Path::new("tests/fixtures/sample_resume.txt");

    let result = manager.extract_text(path).await;
    assert!(result.is_ok());

    let text = result.unwrap();
    assert!(text.contains("John Doe"));
    assert!(text.contains("Python"));
    assert!(text.contains("Kubernetes"));
}

#[tokio::test]
async fn test_text_extraction_from_markdown() {
    let mut manager = InputManager::new();
    let path = Path::new("tests/fixtures/sample_resume.md");

    let result = manager.extract_text(path).await;
    assert!(result.is_ok());

    let text = result.unwrap();
    assert!(text.contains("John Doe"));
    assert!(text.contains("Python"));
    // Should not contain markdown formatting
    assert!(!text.contains("**"));
    assert!(!text.contains("##"));
}

#[tokio::test]
async fn test_caching_functionality() {
    let mut manager = InputManager::new();
    let path = Path::new("tests/fixtures/sample_resume.txt");

    let text1 = manager.extract_text(path).await.unwrap();
    assert_eq!(manager.cache_size(), 1);

    let text2 = manager.extract_text(path).await.unwrap();
    assert_eq!(text1, text2);
    assert_eq!(manager.cache_size(), 1);
}

#[tokio::test]
async fn test_unsupported_file_type() {
    let mut manager = InputManager::new();
    let path = Path::new("tests/fixtures/unsupported.xyz");

    let result = manager.extract_text(path).await;
    assert!(result.is_err());
}

#[tokio::test]
async fn test_nonexistent_file() {
    let mut manager = InputManager::new();
    let path = Path::new("tests/fixtures/nonexistent.txt");

    let result = manager.extract_text(path).await;
    assert!(result.is_err());
}

#[test]
fn test_collect_resume_files_sorted_and_filtered() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("zoe.txt"), "zoe").unwrap();
    std::fs::write(dir.path().join("adam.md"), "adam").unwrap();
    std::fs::write(dir.path().join("notes.xyz"), "skip").unwrap();

    let files = collect_resume_files(dir.path()).unwrap();
    let names: Vec<String> = files
        .iter()
        .map(|p| p.file_name().unwrap().to_string_lossy().to_string())
        .collect();
    assert_eq!(names, vec!["adam.md", "zoe.txt"]);
}

// --- Screening pipeline ---

#[tokio::test]
async fn test_screen_single_candidate_scoring() {
    // Three required skills, candidate matches two and brings one bonus skill:
    // base 66.67, bonus 10.00, total 49.67 with the default weights.
    let oracle = Arc::new(
        StubOracle::new().with_resume("ALICE", Some("Alice"), &["Python", "SQL", "Docker"]),
    );
    let pipeline = pipeline_with(oracle.clone());

    let resumes = vec![ResumeInput::new("alice", "alice.txt", "ALICE resume body")];
    let outcome = pipeline.run("python\njava\nsql", resumes).await.unwrap();

    assert_eq!(outcome.total_candidates, 1);
    assert_eq!(outcome.extraction_failures, 0);
    // A short comma-separated list is parsed locally, never through the oracle
    assert_eq!(oracle.requirements_calls(), 0);

    let record = &outcome.records[0];
    assert_eq!(record.candidate.name.as_deref(), Some("Alice"));
    assert_eq!(record.matching.matched.len(), 2);
    assert_eq!(record.matching.missing.len(), 1);
    assert_eq!(record.matching.extra.len(), 1);
    assert_eq!(record.score.base, 66.67);
    assert_eq!(record.score.bonus, 10.0);
    assert_eq!(record.score.total, 49.67);
}

#[tokio::test]
async fn test_screen_empty_requirements_fails_before_processing() {
    let oracle = Arc::new(StubOracle::new());
    let pipeline = pipeline_with(oracle.clone());

    let resumes = vec![ResumeInput::new("c1", "c1.txt", "some resume text")];
    let result = pipeline.run("   \n  ", resumes).await;

    assert!(matches!(result, Err(ScreenerError::EmptyInput(_))));
    assert_eq!(oracle.resume_calls(), 0);
}

#[tokio::test]
async fn test_screen_no_resumes_fails() {
    let oracle = Arc::new(StubOracle::new());
    let pipeline = pipeline_with(oracle);

    let result = pipeline.run("python", vec![]).await;
    assert!(matches!(result, Err(ScreenerError::EmptyInput(_))));
}

#[tokio::test]
async fn test_screen_orders_by_descending_score_with_stable_ties() {
    let oracle = Arc::new(
        StubOracle::new()
            .with_resume("LOW", None, &["python"])
            .with_resume("HIGH_A", None, &["python", "sql"])
            .with_resume("HIGH_B", None, &["python", "sql"]),
    );
    let pipeline = pipeline_with(oracle);

    let resumes = vec![
        ResumeInput::new("c1", "c1.txt", "LOW"),
        ResumeInput::new("c2", "c2.txt", "HIGH_A"),
        ResumeInput::new("c3", "c3.txt", "HIGH_B"),
    ];
    let outcome = pipeline.run("python, sql", resumes).await.unwrap();

    let ids: Vec<&str> = outcome
        .records
        .iter()
        .map(|r| r.candidate.candidate_id.as_str())
        .collect();
    // Equal scores keep submission order
    assert_eq!(ids, vec!["c2", "c3", "c1"]);
    assert_eq!(outcome.top_candidate().unwrap().candidate.candidate_id, "c2");
}

#[tokio::test]
async fn test_screen_isolates_extraction_failures() {
    let oracle = Arc::new(
        StubOracle::new()
            .with_resume("GOOD", Some("Good"), &["python"])
            .with_failure("BROKEN"),
    );
    let pipeline = pipeline_with(oracle);

    let resumes = vec![
        ResumeInput::new("c1", "c1.txt", "GOOD"),
        ResumeInput::new("c2", "c2.txt", "BROKEN"),
    ];
    let outcome = pipeline.run("python", resumes).await.unwrap();

    assert_eq!(outcome.total_candidates, 2);
    assert_eq!(outcome.extraction_failures, 1);

    let good = outcome
        .records
        .iter()
        .find(|r| r.candidate.candidate_id == "c1")
        .unwrap();
    assert!(!good.candidate.failed());
    assert_eq!(good.score.total, 70.0);

    let broken = outcome
        .records
        .iter()
        .find(|r| r.candidate.candidate_id == "c2")
        .unwrap();
    assert!(broken.candidate.failed());
    assert_eq!(broken.score.total, 0.0);
    // The failure must not drag down the average of successful candidates
    assert_eq!(outcome.average_score, 70.0);
}

#[tokio::test]
async fn test_screen_uses_oracle_synonyms() {
    let oracle = Arc::new(
        StubOracle::new()
            .with_resume("KATE", Some("Kate"), &["React.js"])
            .with_synonym("react", "react.js"),
    );
    let pipeline = pipeline_with(oracle);

    let resumes = vec![ResumeInput::new("kate", "kate.txt", "KATE")];
    let outcome = pipeline.run("react", resumes).await.unwrap();

    let record = &outcome.records[0];
    assert_eq!(record.matching.matched.len(), 1);
    assert!(record.matching.missing.is_empty());
    assert_eq!(record.score.total, 70.0);
}

#[tokio::test]
async fn test_screen_degrades_when_matching_oracle_fails() {
    // Exact matches survive a matching-oracle outage
    let oracle = Arc::new(
        StubOracle::new()
            .with_resume("SAM", Some("Sam"), &["Python", "Go"])
            .with_matching_failure(),
    );
    let pipeline = pipeline_with(oracle);

    let resumes = vec![ResumeInput::new("sam", "sam.txt", "SAM")];
    let outcome = pipeline.run("python, rust", resumes).await.unwrap();

    let record = &outcome.records[0];
    assert_eq!(record.matching.matched.len(), 1);
    assert_eq!(record.matching.missing.len(), 1);
}

#[tokio::test]
async fn test_screen_falls_back_to_flat_list_when_prose_extraction_fails() {
    let mut manager = InputManager::new();
    let requirements = manager
        .extract_text(Path::new("tests/fixtures/job_description.txt"))
        .await
        .unwrap();

    // The document classifies as a job description, but the oracle refuses
    // it; the run must still complete by re-parsing it as a flat list.
    let oracle = Arc::new(
        StubOracle::new()
            .with_failure("streaming systems")
            .with_resume("DANA", Some("Dana"), &["Python", "SQL"]),
    );
    let pipeline = pipeline_with(oracle.clone());

    let resumes = vec![ResumeInput::new("dana", "dana.txt", "DANA")];
    let outcome = pipeline.run(&requirements, resumes).await.unwrap();

    assert_eq!(oracle.requirements_calls(), 1);
    assert_eq!(
        outcome.requirements.source_format,
        SourceFormat::SimpleList
    );
    assert!(!outcome.requirements.required.is_empty());
    assert_eq!(outcome.total_candidates, 1);
    assert!(!outcome.records[0].candidate.failed());
}

#[tokio::test]
async fn test_screen_from_fixture_files() {
    let mut manager = InputManager::new();
    let requirements = manager
        .extract_text(Path::new("tests/fixtures/requirements_list.txt"))
        .await
        .unwrap();
    let resume = manager
        .load_resume(Path::new("tests/fixtures/sample_resume.txt"))
        .await;

    let oracle = Arc::new(StubOracle::new().with_resume(
        "John Doe",
        Some("John Doe"),
        &["Python", "SQL", "Docker", "Kubernetes", "React"],
    ));
    let pipeline = pipeline_with(oracle.clone());

    let outcome = pipeline.run(&requirements, vec![resume]).await.unwrap();

    // Comment line in the fixture is ignored, leaving three required skills
    assert_eq!(outcome.requirements.required.len(), 3);
    assert_eq!(oracle.requirements_calls(), 0);

    let record = &outcome.records[0];
    assert_eq!(record.candidate.candidate_id, "sample_resume");
    assert!(record.matching.missing.is_empty());
    assert_eq!(record.score.base, 100.0);
    assert_eq!(record.matching.extra.len(), 2);
}
