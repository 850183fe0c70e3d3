use okuma_seyri_protocol::GazeEstimate;
use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum JsonTraceError {
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("trace contains no estimates")]
    Empty,
}

/// Only the sample list of a session report matters for replay.
#[derive(Deserialize)]
struct ReportSamples {
    samples: Vec<GazeEstimate>,
}

/// Parse a JSON array of `{t, x, y, w?, h?}` estimates.
pub fn parse_json_trace(data: &[u8]) -> Result<Vec<GazeEstimate>, JsonTraceError> {
    let estimates: Vec<GazeEstimate> = serde_json::from_slice(data)?;
    non_empty(estimates)
}

/// Pull the recorded samples out of a session report so they can be
/// replayed against another layout. The stored `blockId` is ignored.
pub fn parse_report_samples(data: &[u8]) -> Result<Vec<GazeEstimate>, JsonTraceError> {
    let report: ReportSamples = serde_json::from_slice(data)?;
    non_empty(report.samples)
}

fn non_empty(estimates: Vec<GazeEstimate>) -> Result<Vec<GazeEstimate>, JsonTraceError> {
    if estimates.is_empty() {
        return Err(JsonTraceError::Empty);
    }
    Ok(estimates)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_estimate_array() {
        let trace =
            parse_json_trace(br#"[{"t":1,"x":2.5,"y":3.5,"w":800,"h":600},{"t":2,"x":0,"y":9}]"#)
                .unwrap();
        assert_eq!(trace.len(), 2);
        assert_eq!(trace[0].viewport.width, 800);
        assert_eq!(trace[1].y, 9.0);
    }

    #[test]
    fn reads_samples_from_report() {
        let data = br#"{"meta": {}, "samples": [
            {"t": 10, "x": 100, "y": 200, "blockId": 3, "w": 1024, "h": 768}
        ]}"#;
        let trace = parse_report_samples(data).unwrap();
        assert_eq!(trace[0].t, 10);
        assert_eq!(trace[0].y, 200.0);
        assert_eq!(trace[0].viewport.height, 768);
    }

    #[test]
    fn empty_array_is_rejected() {
        assert!(matches!(parse_json_trace(b"[]"), Err(JsonTraceError::Empty)));
    }
}
