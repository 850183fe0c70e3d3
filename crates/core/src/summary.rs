use std::collections::BTreeMap;

use okuma_seyri_protocol::{BlockId, GazeSample, ReadingCounters, SessionReport};
use serde::{Deserialize, Serialize};

use crate::transition::TransitionTracker;

/// Samples that landed on one block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockDwell {
    pub block_id: BlockId,
    pub samples: usize,
    pub first_t: u64,
    pub last_t: u64,
}

/// Offline view of a recorded sample list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReadingSummary {
    pub sample_count: usize,
    pub unknown_samples: usize,
    /// Counters recomputed from the stored `blockId`s.
    pub counters: ReadingCounters,
    /// One entry per block that received samples, by ascending id.
    pub dwell: Vec<BlockDwell>,
}

impl ReadingSummary {
    pub fn from_samples(samples: &[GazeSample]) -> Self {
        let mut tracker = TransitionTracker::new();
        let mut dwell: BTreeMap<BlockId, BlockDwell> = BTreeMap::new();
        let mut unknown_samples = 0;

        for sample in samples {
            tracker.observe(sample.block_id);
            let Some(block_id) = sample.block_id else {
                unknown_samples += 1;
                continue;
            };
            dwell
                .entry(block_id)
                .and_modify(|d| {
                    d.samples += 1;
                    d.first_t = d.first_t.min(sample.t);
                    d.last_t = d.last_t.max(sample.t);
                })
                .or_insert(BlockDwell {
                    block_id,
                    samples: 1,
                    first_t: sample.t,
                    last_t: sample.t,
                });
        }

        Self {
            sample_count: samples.len(),
            unknown_samples,
            counters: tracker.counters(),
            dwell: dwell.into_values().collect(),
        }
    }

    pub fn from_report(report: &SessionReport) -> Self {
        Self::from_samples(&report.samples)
    }

    /// Share of samples that matched no block, in `[0, 1]`.
    pub fn unknown_ratio(&self) -> f64 {
        if self.sample_count == 0 {
            0.0
        } else {
            self.unknown_samples as f64 / self.sample_count as f64
        }
    }

    /// Samples on the busiest block.
    pub fn max_dwell(&self) -> usize {
        self.dwell.iter().map(|d| d.samples).max().unwrap_or(0)
    }

    pub fn dwell_for(&self, block_id: BlockId) -> usize {
        self.dwell
            .iter()
            .find(|d| d.block_id == block_id)
            .map_or(0, |d| d.samples)
    }

    /// Whether the stored counters agree with a recomputation. They differ
    /// when the buffer evicted early samples during recording.
    pub fn matches(&self, report: &SessionReport) -> bool {
        self.counters == report.reading.counters
    }
}
