pub mod csv_trace;
pub mod json_trace;

use okuma_seyri_protocol::GazeEstimate;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TraceParseError {
    #[error("json: {0}")]
    Json(#[from] json_trace::JsonTraceError),
    #[error("csv: {0}")]
    Csv(#[from] csv_trace::CsvTraceError),
}

/// Auto-detect the trace format and parse it.
///
/// Detection strategy:
/// 1. A top-level JSON array is a list of estimates.
/// 2. A JSON object with `samples` is a session report; its samples are
///    replayed.
/// 3. Anything else is treated as CSV.
pub fn parse_trace_auto(data: &[u8]) -> Result<Vec<GazeEstimate>, TraceParseError> {
    if let Ok(value) = serde_json::from_slice::<serde_json::Value>(data) {
        if value.is_array() {
            return Ok(json_trace::parse_json_trace(data)?);
        }
        if value.get("samples").is_some_and(serde_json::Value::is_array) {
            return Ok(json_trace::parse_report_samples(data)?);
        }
    }
    Ok(csv_trace::parse_csv_trace(data)?)
}
