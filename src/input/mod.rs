//! Input processing module
//! Resume directory scanning, text extraction, and caching

pub mod extractor;
pub mod manager;
