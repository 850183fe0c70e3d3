use std::cell::RefCell;
use std::rc::Rc;

use okuma_seyri_protocol::{GazeEstimate, TextBlock};

use crate::config::{ConfigError, TrackerConfig};
use crate::session::ReadingSession;
use crate::source::{GazeHub, GazeSource};

/// Run a recorded trace through a fresh session, the same way live
/// estimates reach it: through a [`GazeHub`] subscription.
///
/// Reading starts at the earliest timestamp and stops at the latest.
pub fn replay_trace(
    config: TrackerConfig,
    blocks: Vec<TextBlock>,
    trace: &[GazeEstimate],
) -> Result<ReadingSession, ConfigError> {
    let mut session = ReadingSession::new(config)?;
    let start = trace.iter().map(|e| e.t).min().unwrap_or(0);
    let end = trace.iter().map(|e| e.t).max().unwrap_or(start);
    session.start(blocks, start);

    let shared = Rc::new(RefCell::new(session));
    let mut hub = GazeHub::new();
    let sink = Rc::clone(&shared);
    let subscription = hub.subscribe(Box::new(move |estimate: &GazeEstimate| {
        sink.borrow_mut().on_estimate(estimate);
    }));
    for estimate in trace {
        hub.publish(estimate);
    }
    hub.unsubscribe(subscription);
    drop(hub);

    let mut session = match Rc::try_unwrap(shared) {
        Ok(cell) => cell.into_inner(),
        Err(shared) => {
            let session = shared.borrow().clone();
            session
        }
    };
    session.stop(end);
    log::debug!(
        "replayed {} estimates, {} recorded",
        trace.len(),
        session.sample_count()
    );
    Ok(session)
}

#[cfg(test)]
mod tests {
    use super::*;
    use okuma_seyri_protocol::{ReadingCounters, ViewportSize};

    #[test]
    fn replay_matches_direct_feeding() {
        let blocks: Vec<_> = (0..4)
            .map(|i| {
                let top = f64::from(i) * 100.0;
                TextBlock::new(i as usize, top, top + 80.0, "")
            })
            .collect();
        let vp = ViewportSize::new(800, 600);
        let trace: Vec<_> = [10.0, 90.0, 110.0, 350.0, 20.0]
            .iter()
            .enumerate()
            .map(|(i, &y)| GazeEstimate::new(500 + i as u64 * 40, 0.0, y, vp))
            .collect();

        let session = replay_trace(TrackerConfig::default(), blocks, &trace).unwrap();
        // 0, unknown, 1, 3 (skip), 0 (back)
        assert_eq!(
            session.counters(),
            ReadingCounters {
                line_changes: 3,
                line_back: 1,
                line_skip: 1,
            }
        );
        assert_eq!(session.sample_count(), 5);
        assert!(!session.is_reading());
        assert_eq!(session.duration_sec(0), Some(0.16));
    }

    #[test]
    fn empty_trace_yields_empty_session() {
        let session = replay_trace(TrackerConfig::default(), Vec::new(), &[]).unwrap();
        assert_eq!(session.sample_count(), 0);
        assert_eq!(session.duration_sec(0), Some(0.0));
    }
}
