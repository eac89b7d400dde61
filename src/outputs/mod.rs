//! Rendering of pipeline results.
//!
//! # Submodules
//!
//! - [`console`]: line-oriented text, printed as each item finishes
//! - [`json`]: a single [`RunReport`](crate::models::RunReport) document
//!
//! Both write to any [`std::io::Write`], normally stdout. Logs go to stderr
//! so the two never interleave.

pub mod console;
pub mod json;
