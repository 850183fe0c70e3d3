//! Line transition tracking.
//!
//! Counts assume block ids grow top to bottom (document order equals visual
//! order). Content reordered after mapping makes the back/skip counts
//! meaningless without any error being raised.

use okuma_seyri_protocol::{BlockId, ReadingCounters};
use serde::{Deserialize, Serialize};

/// What one classified sample did to the reading position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Transition {
    /// No block matched; the tracker was left untouched.
    Unknown,
    /// First classified sample of the session.
    Baseline,
    /// Same block as before.
    Stay,
    /// Moved to the next block.
    Advance,
    /// Moved to an earlier block.
    Regress,
    /// Moved forward past at least one block.
    Skip,
}

impl Transition {
    /// Whether this transition counts as a line change.
    pub fn is_change(self) -> bool {
        matches!(self, Self::Advance | Self::Regress | Self::Skip)
    }
}

/// Remembers the last known block and accumulates [`ReadingCounters`].
///
/// There is no smoothing: noise flipping between two neighbouring blocks
/// is counted as repeated line changes.
#[derive(Debug, Clone, Default)]
pub struct TransitionTracker {
    last_block: Option<BlockId>,
    counters: ReadingCounters,
}

impl TransitionTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn observe(&mut self, current: Option<BlockId>) -> Transition {
        let Some(current) = current else {
            return Transition::Unknown;
        };
        let Some(previous) = self.last_block else {
            self.last_block = Some(current);
            return Transition::Baseline;
        };
        if current == previous {
            return Transition::Stay;
        }

        self.counters.line_changes += 1;
        let transition = if current < previous {
            self.counters.line_back += 1;
            Transition::Regress
        } else if current > previous + 1 {
            self.counters.line_skip += 1;
            Transition::Skip
        } else {
            Transition::Advance
        };
        self.last_block = Some(current);
        log::trace!("block {previous} -> {current}: {transition:?}");
        transition
    }

    pub fn last_block(&self) -> Option<BlockId> {
        self.last_block
    }

    pub fn counters(&self) -> ReadingCounters {
        self.counters
    }

    pub fn reset(&mut self) {
        self.last_block = None;
        self.counters.reset();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn feed(ids: &[Option<BlockId>]) -> (TransitionTracker, Vec<Transition>) {
        let mut tracker = TransitionTracker::new();
        let transitions = ids.iter().map(|id| tracker.observe(*id)).collect();
        (tracker, transitions)
    }

    #[test]
    fn mixed_sequence_counts() {
        let (tracker, transitions) =
            feed(&[Some(2), Some(2), Some(5), Some(5), Some(1), Some(7)]);
        // 2 (baseline), 2->5 skip, 5->1 back, 1->7 skip.
        assert_eq!(
            tracker.counters(),
            ReadingCounters {
                line_changes: 3,
                line_back: 1,
                line_skip: 2,
            }
        );
        assert_eq!(
            transitions,
            vec![
                Transition::Baseline,
                Transition::Stay,
                Transition::Skip,
                Transition::Stay,
                Transition::Regress,
                Transition::Skip,
            ]
        );
        assert_eq!(tracker.last_block(), Some(7));
    }

    #[test]
    fn unknown_samples_are_transparent() {
        let (with_unknown, _) = feed(&[Some(3), None, None, Some(3), Some(6)]);
        let (without, _) = feed(&[Some(3), Some(3), Some(6)]);
        assert_eq!(with_unknown.counters(), without.counters());
        assert_eq!(with_unknown.last_block(), without.last_block());
    }

    #[test]
    fn leading_unknowns_do_not_set_baseline() {
        let (tracker, transitions) = feed(&[None, Some(4), Some(5)]);
        assert_eq!(
            transitions,
            vec![Transition::Unknown, Transition::Baseline, Transition::Advance]
        );
        assert_eq!(tracker.counters().line_changes, 1);
        assert_eq!(tracker.counters().line_skip, 0);
    }

    #[test]
    fn adjacent_flicker_inflates_changes() {
        let (tracker, _) = feed(&[Some(0), Some(1), Some(0), Some(1)]);
        assert_eq!(tracker.counters().line_changes, 3);
        assert_eq!(tracker.counters().line_back, 1);
    }

    #[test]
    fn reset_clears_baseline() {
        let (mut tracker, _) = feed(&[Some(0), Some(3)]);
        tracker.reset();
        assert_eq!(tracker.last_block(), None);
        assert_eq!(tracker.counters(), ReadingCounters::default());
        assert_eq!(tracker.observe(Some(9)), Transition::Baseline);
    }
}
