use std::collections::VecDeque;

use okuma_seyri_protocol::GazeSample;

/// Bounded sample store; pushing past capacity evicts the oldest sample.
#[derive(Debug, Clone)]
pub struct SampleBuffer {
    samples: VecDeque<GazeSample>,
    capacity: usize,
    evicted: u64,
}

impl SampleBuffer {
    /// A `capacity` of zero is treated as one.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            samples: VecDeque::with_capacity(capacity.min(1024)),
            capacity,
            evicted: 0,
        }
    }

    pub fn push(&mut self, sample: GazeSample) {
        self.samples.push_back(sample);
        while self.samples.len() > self.capacity {
            self.samples.pop_front();
            self.evicted += 1;
        }
    }

    pub fn clear(&mut self) {
        self.samples.clear();
        self.evicted = 0;
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Samples dropped since the last clear.
    pub fn evicted(&self) -> u64 {
        self.evicted
    }

    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &GazeSample> + ExactSizeIterator {
        self.samples.iter()
    }

    /// The last `n` samples, oldest first.
    pub fn recent(&self, n: usize) -> Vec<GazeSample> {
        let skip = self.samples.len().saturating_sub(n);
        self.samples.iter().skip(skip).copied().collect()
    }

    pub fn to_vec(&self) -> Vec<GazeSample> {
        self.samples.iter().copied().collect()
    }
}
