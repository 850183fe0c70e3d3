use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::block::TextBlock;
use crate::counters::ReadingCounters;
use crate::sample::GazeSample;

/// File name the browser host offers when downloading a report.
pub const REPORT_FILE_NAME: &str = "okumaseyri_demo.json";

/// Disclaimer stored with every report.
pub const DEFAULT_NOTE: &str = "Okuma Seyri demo verisi. Tanı amaçlı değildir.";

/// The downloadable artifact of one reading session.
///
/// ```text
/// { "meta":    { "createdAt", "note" },
///   "reading": { "durationSec", "sampleCount", "lineChanges", "lineBack", "lineSkip" },
///   "samples": [ { "t", "x", "y", "blockId", "w", "h" }, ... ],
///   "blocks":  [ { "id", "top", "bottom", "text" }, ... ] }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionReport {
    pub meta: ReportMeta,
    pub reading: ReadingStats,
    pub samples: Vec<GazeSample>,
    /// Block layout the samples were classified against. Older reports do
    /// not carry it.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub blocks: Vec<TextBlock>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportMeta {
    pub created_at: DateTime<Utc>,
    pub note: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReadingStats {
    /// Elapsed reading time, `null` when reading never started.
    pub duration_sec: Option<f64>,
    pub sample_count: usize,
    #[serde(flatten)]
    pub counters: ReadingCounters,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reading_stats_are_flat() {
        let stats = ReadingStats {
            duration_sec: None,
            sample_count: 3,
            counters: ReadingCounters {
                line_changes: 2,
                line_back: 1,
                line_skip: 0,
            },
        };
        let json = serde_json::to_value(stats).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "durationSec": null,
                "sampleCount": 3,
                "lineChanges": 2,
                "lineBack": 1,
                "lineSkip": 0
            })
        );
    }

    #[test]
    fn blocks_are_optional_on_read() {
        let json = r#"{
            "meta": {"createdAt": "2024-03-01T10:00:00.000Z", "note": "x"},
            "reading": {"durationSec": 1.5, "sampleCount": 0,
                        "lineChanges": 0, "lineBack": 0, "lineSkip": 0},
            "samples": []
        }"#;
        let report: SessionReport = serde_json::from_str(json).unwrap();
        assert!(report.blocks.is_empty());
        assert_eq!(report.reading.duration_sec, Some(1.5));
    }
}
