//! Resume screener library

pub mod cli;
pub mod config;
pub mod error;
pub mod input;
pub mod oracle;
pub mod output;
pub mod screening;

pub use config::Config;
pub use error::{Result, ScreenerError};
pub use screening::pipeline::{ScreeningOutcome, ScreeningPipeline, ScreeningRecord};
