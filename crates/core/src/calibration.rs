//! Click-through calibration schedule.
//!
//! Targets sit on a grid of viewport fractions (3x3 by default), visited row
//! by row. Each target needs a fixed number of clicks; every click yields a
//! screen position the host feeds to the gaze model as a training point.

use okuma_seyri_protocol::{Point, ViewportSize};
use serde::{Deserialize, Serialize};

use crate::config::CalibrationConfig;

/// The target the user should click next.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CalibrationTarget {
    /// 0-based position in the schedule.
    pub index: usize,
    pub total: usize,
    /// Where to draw the target, in screen pixels.
    pub position: Point,
    pub clicks: u32,
    pub required: u32,
}

/// What a click produced.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CalibrationClick {
    /// Training point to hand to the gaze model.
    pub record: Point,
    /// The click completed its target and the schedule moved on.
    pub advanced: bool,
    /// The click completed the last target.
    pub finished: bool,
}

#[derive(Debug, Clone)]
pub struct Calibration {
    fractions: Vec<(f64, f64)>,
    required: u32,
    viewport: ViewportSize,
    index: usize,
    clicks: u32,
}

impl Calibration {
    pub fn new(config: &CalibrationConfig, viewport: ViewportSize) -> Self {
        let fractions = config
            .grid
            .iter()
            .flat_map(|&fy| config.grid.iter().map(move |&fx| (fx, fy)))
            .collect();
        Self {
            fractions,
            required: config.clicks_per_point.max(1),
            viewport,
            index: 0,
            clicks: 0,
        }
    }

    /// Track a window resize; later targets use the new size.
    pub fn set_viewport(&mut self, viewport: ViewportSize) {
        self.viewport = viewport;
    }

    pub fn total(&self) -> usize {
        self.fractions.len()
    }

    pub fn is_finished(&self) -> bool {
        self.index >= self.fractions.len()
    }

    pub fn current(&self) -> Option<CalibrationTarget> {
        let &(fx, fy) = self.fractions.get(self.index)?;
        Some(CalibrationTarget {
            index: self.index,
            total: self.total(),
            position: self.viewport.at_fraction(fx, fy),
            clicks: self.clicks,
            required: self.required,
        })
    }

    /// Register a click on the current target. `None` once finished.
    pub fn click(&mut self) -> Option<CalibrationClick> {
        let target = self.current()?;
        self.clicks += 1;
        let advanced = self.clicks >= self.required;
        if advanced {
            self.index += 1;
            self.clicks = 0;
            log::debug!("calibration target {}/{} done", self.index, self.total());
        }
        Some(CalibrationClick {
            record: target.position,
            advanced,
            finished: self.is_finished(),
        })
    }

    pub fn restart(&mut self) {
        self.index = 0;
        self.clicks = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn calibration() -> Calibration {
        Calibration::new(&CalibrationConfig::default(), ViewportSize::new(1000, 800))
    }

    #[test]
    fn default_grid_is_nine_points_row_major() {
        let cal = calibration();
        assert_eq!(cal.total(), 9);
        let first = cal.current().unwrap();
        assert!((first.position.x - 150.0).abs() < 1e-9);
        assert!((first.position.y - 120.0).abs() < 1e-9);
        assert_eq!(first.required, 5);
    }

    #[test]
    fn five_clicks_per_target() {
        let mut cal = calibration();
        for _ in 0..4 {
            let click = cal.click().unwrap();
            assert!(!click.advanced);
        }
        let fifth = cal.click().unwrap();
        assert!(fifth.advanced);
        assert!(!fifth.finished);
        assert!((fifth.record.x - 150.0).abs() < 1e-9);

        let second = cal.current().unwrap();
        assert_eq!(second.index, 1);
        assert_eq!(second.clicks, 0);
        assert!((second.position.x - 500.0).abs() < 1e-9);
        assert!((second.position.y - 120.0).abs() < 1e-9);
    }

    #[test]
    fn finishes_after_all_targets() {
        let mut cal = calibration();
        let mut last = None;
        for _ in 0..45 {
            last = cal.click();
        }
        assert!(last.unwrap().finished);
        assert!(cal.is_finished());
        assert!(cal.current().is_none());
        assert!(cal.click().is_none());

        cal.restart();
        assert_eq!(cal.current().unwrap().index, 0);
    }

    #[test]
    fn positions_follow_viewport_changes() {
        let mut cal = calibration();
        cal.set_viewport(ViewportSize::new(2000, 1000));
        let target = cal.current().unwrap();
        assert!((target.position.x - 300.0).abs() < 1e-9);
        assert!((target.position.y - 150.0).abs() < 1e-9);
    }
}
