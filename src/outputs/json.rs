//! JSON report output.
//!
//! The whole run is serialized as one pretty-printed [`RunReport`] after the
//! last item finishes:
//!
//! ```text
//! {
//!   "section_url": "https://news.naver.com/main/main.naver",
//!   "generated_at": "2025-05-06T08:00:00Z",
//!   "items": [
//!     { "title": "...", "url": "...", "thumbnail_url": null,
//!       "article": "...", "summary": { "status": "summarized", "detail": "..." } }
//!   ]
//! }
//! ```

use crate::models::RunReport;
use std::error::Error;
use std::io::Write;
use tracing::{info, instrument};

/// Write `report` to `out` as pretty JSON followed by a newline.
#[instrument(level = "info", skip_all, fields(items = report.items.len()))]
pub fn write_report<W: Write>(out: &mut W, report: &RunReport) -> Result<(), Box<dyn Error>> {
    serde_json::to_writer_pretty(&mut *out, report)?;
    writeln!(out)?;
    info!("Wrote JSON report");
    Ok(())
}
