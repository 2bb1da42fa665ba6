//! Output module
//! Console, CSV, and JSON report rendering plus shortlist export

pub mod filter;
pub mod report;
