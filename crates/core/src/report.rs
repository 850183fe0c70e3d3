//! Session report assembly and parsing.

use chrono::{DateTime, Utc};
use okuma_seyri_protocol::{ReadingStats, ReportMeta, SessionReport};
use thiserror::Error;

use crate::session::ReadingSession;

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("invalid report JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("sampleCount is {declared} but {actual} samples are present")]
    SampleCountMismatch { declared: usize, actual: usize },
}

/// Snapshot a session into its downloadable form.
pub fn build_report(
    session: &ReadingSession,
    created_at: DateTime<Utc>,
    now_ms: u64,
) -> SessionReport {
    SessionReport {
        meta: ReportMeta {
            created_at,
            note: session.config().note.clone(),
        },
        reading: ReadingStats {
            duration_sec: session.duration_sec(now_ms),
            sample_count: session.sample_count(),
            counters: session.counters(),
        },
        samples: session.samples().to_vec(),
        blocks: session.blocks().to_vec(),
    }
}

pub fn to_json_pretty(report: &SessionReport) -> Result<String, ReportError> {
    Ok(serde_json::to_string_pretty(report)?)
}

/// Parse a report and check that the declared sample count matches.
pub fn parse_report(data: &[u8]) -> Result<SessionReport, ReportError> {
    let report: SessionReport = serde_json::from_slice(data)?;
    if report.reading.sample_count != report.samples.len() {
        return Err(ReportError::SampleCountMismatch {
            declared: report.reading.sample_count,
            actual: report.samples.len(),
        });
    }
    Ok(report)
}
