//! Input manager for resume directories and requirements files

use crate::error::{Result, ScreenerError};
use crate::input::extractor::{
    FileType, MarkdownExtractor, PdfExtractor, PlainTextExtractor, TextExtractor,
};
use crate::screening::extractor::ResumeInput;
use log::{info, warn};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Collect supported resume files from a directory in sorted order, so runs
/// over the same directory are deterministic.
pub fn collect_resume_files(dir: &Path) -> Result<Vec<PathBuf>> {
    if !dir.is_dir() {
        return Err(ScreenerError::InvalidInput(format!(
            "Resume directory does not exist: {}",
            dir.display()
        )));
    }

    let mut files: Vec<PathBuf> = std::fs::read_dir(dir)?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| path.is_file() && FileType::from_path(path).is_supported())
        .collect();
    files.sort();

    Ok(files)
}

pub struct InputManager {
    cache: HashMap<String, String>,
    enable_cache: bool,
}

impl Default for InputManager {
    fn default() -> Self {
        Self::new()
    }
}

impl InputManager {
    pub fn new() -> Self {
        Self {
            cache: HashMap::new(),
            enable_cache: true,
        }
    }

    pub fn with_cache(mut self, enable: bool) -> Self {
        self.enable_cache = enable;
        self
    }

    /// Extract text from one file, routed by type, with a path-keyed cache.
    pub async fn extract_text(&mut self, path: &Path) -> Result<String> {
        let path_str = path.to_string_lossy().to_string();

        if self.enable_cache {
            if let Some(cached) = self.cache.get(&path_str) {
                info!("Using cached text for: {}", path.display());
                return Ok(cached.clone());
            }
        }

        if !path.exists() {
            return Err(ScreenerError::InvalidInput(format!(
                "File does not exist: {}",
                path.display()
            )));
        }

        let text = match FileType::from_path(path) {
            FileType::Pdf => {
                info!("Extracting text from PDF: {}", path.display());
                PdfExtractor.extract(path).await?
            }
            FileType::Text => PlainTextExtractor.extract(path).await?,
            FileType::Markdown => {
                info!("Processing markdown file: {}", path.display());
                MarkdownExtractor.extract(path).await?
            }
            FileType::Unknown => {
                return Err(ScreenerError::UnsupportedFormat(format!(
                    "Unsupported file type: {}",
                    path.display()
                )));
            }
        };

        if self.enable_cache {
            self.cache.insert(path_str, text.clone());
        }

        Ok(text)
    }

    /// Turn one resume file into a pipeline input. Extraction failures yield
    /// an input with empty text (the pipeline carries the candidate with an
    /// extraction error) rather than aborting the batch.
    pub async fn load_resume(&mut self, path: &Path) -> ResumeInput {
        let id = path
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_else(|| path.to_string_lossy().to_string());
        let source_file = path
            .file_name()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_else(|| path.to_string_lossy().to_string());

        match self.extract_text(path).await {
            Ok(text) => ResumeInput::new(id, source_file, text),
            Err(e) => {
                warn!("Could not read resume '{}': {}", path.display(), e);
                ResumeInput::new(id, source_file, "")
            }
        }
    }

    pub fn clear_cache(&mut self) {
        self.cache.clear();
    }

    pub fn cache_size(&self) -> usize {
        self.cache.len()
    }
}
