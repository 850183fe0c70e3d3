use chrono::{DateTime, Utc};
use okuma_seyri_protocol::{
    BlockId, GazeEstimate, GazeSample, ReadingCounters, SessionReport, TextBlock,
};
use serde::{Deserialize, Serialize};

use crate::buffer::SampleBuffer;
use crate::classifier::classify_block;
use crate::config::{ConfigError, TrackerConfig};
use crate::layout::{LayoutError, LayoutProvider};
use crate::mapper::map_blocks;
use crate::report::build_report;
use crate::transition::{Transition, TransitionTracker};

/// Result of feeding one estimate to a running session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SampleOutcome {
    pub block_id: Option<BlockId>,
    pub transition: Transition,
}

/// All state of one reader: the mapped blocks, the transition tracker, the
/// sample buffer and the reading clock.
///
/// The host owns the session and hands every gaze estimate to
/// [`ReadingSession::on_estimate`]. Estimates are only recorded between
/// [`start`](Self::start) and [`stop`](Self::stop).
#[derive(Debug, Clone)]
pub struct ReadingSession {
    config: TrackerConfig,
    blocks: Vec<TextBlock>,
    tracker: TransitionTracker,
    buffer: SampleBuffer,
    reading: bool,
    started_at: Option<u64>,
    stopped_at: Option<u64>,
}

impl ReadingSession {
    pub fn new(config: TrackerConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let buffer = SampleBuffer::new(config.max_samples);
        Ok(Self {
            config,
            blocks: Vec::new(),
            tracker: TransitionTracker::new(),
            buffer,
            reading: false,
            started_at: None,
            stopped_at: None,
        })
    }

    pub fn config(&self) -> &TrackerConfig {
        &self.config
    }

    /// Begin a reading session at `now_ms` over a freshly mapped block list.
    /// Clears samples and counters from any previous session.
    ///
    /// Block ids are reassigned from list order, since the tracker reads
    /// them as line positions.
    pub fn start(&mut self, mut blocks: Vec<TextBlock>, now_ms: u64) {
        renumber(&mut blocks);
        self.blocks = blocks;
        self.tracker.reset();
        self.buffer.clear();
        self.reading = true;
        self.started_at = Some(now_ms);
        self.stopped_at = None;
        log::info!("reading started over {} blocks", self.blocks.len());
    }

    /// Map the configured container and start reading.
    pub fn start_with<P>(&mut self, provider: &P, now_ms: u64) -> Result<(), LayoutError>
    where
        P: LayoutProvider + ?Sized,
    {
        let blocks = map_blocks(provider, &self.config.container_id)?;
        self.start(blocks, now_ms);
        Ok(())
    }

    /// Replace the block list, keeping samples and counters. Ids are
    /// reassigned from list order as in [`start`](Self::start).
    pub fn remap(&mut self, mut blocks: Vec<TextBlock>) {
        renumber(&mut blocks);
        log::debug!("remapped: {} -> {} blocks", self.blocks.len(), blocks.len());
        self.blocks = blocks;
    }

    /// Re-read the configured container from `provider`. Returns the new
    /// block count.
    pub fn remap_with<P>(&mut self, provider: &P) -> Result<usize, LayoutError>
    where
        P: LayoutProvider + ?Sized,
    {
        let blocks = map_blocks(provider, &self.config.container_id)?;
        let count = blocks.len();
        self.remap(blocks);
        Ok(count)
    }

    /// Stop reading. Returns the elapsed seconds, or `None` when no reading
    /// was in progress.
    pub fn stop(&mut self, now_ms: u64) -> Option<f64> {
        if !self.reading {
            return None;
        }
        self.reading = false;
        self.stopped_at = Some(now_ms);
        let duration = self.duration_sec(now_ms);
        log::info!(
            "reading stopped after {:.1}s, {} samples",
            duration.unwrap_or(0.0),
            self.buffer.len()
        );
        duration
    }

    /// Classify and record one estimate. Returns `None` while not reading,
    /// and for estimates without finite coordinates (those are dropped).
    pub fn on_estimate(&mut self, estimate: &GazeEstimate) -> Option<SampleOutcome> {
        if !self.reading {
            return None;
        }
        if !(estimate.x.is_finite() && estimate.y.is_finite()) {
            log::debug!("dropped non-finite estimate at t={}", estimate.t);
            return None;
        }
        let block_id = classify_block(estimate.y, &self.blocks);
        let transition = self.tracker.observe(block_id);
        self.buffer.push(GazeSample::from_estimate(estimate, block_id));
        Some(SampleOutcome {
            block_id,
            transition,
        })
    }

    pub fn is_reading(&self) -> bool {
        self.reading
    }

    pub fn blocks(&self) -> &[TextBlock] {
        &self.blocks
    }

    pub fn counters(&self) -> ReadingCounters {
        self.tracker.counters()
    }

    pub fn last_block(&self) -> Option<BlockId> {
        self.tracker.last_block()
    }

    pub fn samples(&self) -> &SampleBuffer {
        &self.buffer
    }

    pub fn sample_count(&self) -> usize {
        self.buffer.len()
    }

    /// The latest samples, as many as the config's `recent_samples`.
    pub fn recent(&self) -> Vec<GazeSample> {
        self.buffer.recent(self.config.recent_samples)
    }

    pub fn started_at(&self) -> Option<u64> {
        self.started_at
    }

    /// Seconds since reading started; frozen once stopped. `None` if reading
    /// never started.
    ///
    /// A plain `now - start` would keep growing after stop, so a report
    /// downloaded later would overstate the reading time. Stopping pins it.
    pub fn duration_sec(&self, now_ms: u64) -> Option<f64> {
        let start = self.started_at?;
        let end = self.stopped_at.unwrap_or(now_ms);
        Some(end.saturating_sub(start) as f64 / 1000.0)
    }

    pub fn report(&self, created_at: DateTime<Utc>, now_ms: u64) -> SessionReport {
        build_report(self, created_at, now_ms)
    }
}

/// Make every block's id equal its index in the list.
fn renumber(blocks: &mut [TextBlock]) {
    let mut changed = 0;
    for (index, block) in blocks.iter_mut().enumerate() {
        if block.id != index {
            block.id = index;
            changed += 1;
        }
    }
    if changed > 0 {
        log::warn!("reassigned {changed} block ids to match document order");
    }
}
