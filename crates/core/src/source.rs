//! Gaze source subscription.
//!
//! The eye tracker calls back once per estimate. Handlers registered here
//! run synchronously, in subscription order, and finish before the next
//! estimate is published; `publish` takes `&mut self`, so a handler cannot
//! publish into the hub it is running on.

use okuma_seyri_protocol::GazeEstimate;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

pub type GazeHandler = Box<dyn FnMut(&GazeEstimate)>;

/// Something that delivers gaze estimates to subscribers.
pub trait GazeSource {
    fn subscribe(&mut self, handler: GazeHandler) -> SubscriptionId;

    /// Stop delivering to `id`. Returns `false` if it was not subscribed.
    fn unsubscribe(&mut self, id: SubscriptionId) -> bool;
}

/// In-process fan-out of gaze estimates.
#[derive(Default)]
pub struct GazeHub {
    handlers: Vec<(SubscriptionId, GazeHandler)>,
    next_id: u64,
    published: u64,
}

impl GazeHub {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn publish(&mut self, estimate: &GazeEstimate) {
        self.published += 1;
        for (_, handler) in &mut self.handlers {
            handler(estimate);
        }
    }

    /// Trackers report `null` when no face is found; those are dropped.
    pub fn publish_optional(&mut self, estimate: Option<&GazeEstimate>) {
        if let Some(estimate) = estimate {
            self.publish(estimate);
        }
    }

    pub fn subscriber_count(&self) -> usize {
        self.handlers.len()
    }

    pub fn published(&self) -> u64 {
        self.published
    }
}

impl GazeSource for GazeHub {
    fn subscribe(&mut self, handler: GazeHandler) -> SubscriptionId {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.handlers.push((id, handler));
        id
    }

    fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.handlers.len();
        self.handlers.retain(|(sid, _)| *sid != id);
        self.handlers.len() != before
    }
}

impl std::fmt::Debug for GazeHub {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GazeHub")
            .field("subscribers", &self.handlers.len())
            .field("published", &self.published)
            .finish()
    }
}
