use serde::{Deserialize, Serialize};

use crate::block::BlockId;
use crate::types::ViewportSize;

/// One raw estimate delivered by the gaze source callback.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GazeEstimate {
    /// Capture time in milliseconds since the Unix epoch.
    pub t: u64,
    pub x: f64,
    pub y: f64,
    #[serde(flatten)]
    pub viewport: ViewportSize,
}

impl GazeEstimate {
    pub fn new(t: u64, x: f64, y: f64, viewport: ViewportSize) -> Self {
        Self { t, x, y, viewport }
    }
}

/// A stored gaze observation, as written to the session report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GazeSample {
    pub t: u64,
    pub x: i64,
    pub y: i64,
    /// Block the raw `y` fell into, `null` when it matched none.
    #[serde(rename = "blockId")]
    pub block_id: Option<BlockId>,
    #[serde(flatten)]
    pub viewport: ViewportSize,
}

impl GazeSample {
    /// Build the stored form of an estimate. Coordinates are rounded the way
    /// browsers round them (`Math.round`: halves go toward +infinity).
    pub fn from_estimate(estimate: &GazeEstimate, block_id: Option<BlockId>) -> Self {
        Self {
            t: estimate.t,
            x: round_half_up(estimate.x),
            y: round_half_up(estimate.y),
            block_id,
            viewport: estimate.viewport,
        }
    }
}

fn round_half_up(v: f64) -> i64 {
    (v + 0.5).floor() as i64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rounds_like_math_round() {
        assert_eq!(round_half_up(2.5), 3);
        assert_eq!(round_half_up(-2.5), -2);
        assert_eq!(round_half_up(-2.6), -3);
        assert_eq!(round_half_up(10.49), 10);
    }

    #[test]
    fn sample_wire_format() {
        let est = GazeEstimate::new(1_700_000_000_000, 412.6, 99.5, ViewportSize::new(1280, 720));
        let sample = GazeSample::from_estimate(&est, None);
        let json = serde_json::to_value(sample).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "t": 1_700_000_000_000u64,
                "x": 413,
                "y": 100,
                "blockId": null,
                "w": 1280,
                "h": 720
            })
        );
    }

    #[test]
    fn estimate_without_viewport_defaults_to_zero() {
        let est: GazeEstimate = serde_json::from_str(r#"{"t":5,"x":1.0,"y":2.0}"#).unwrap();
        assert_eq!(est.viewport, ViewportSize::default());
    }
}
