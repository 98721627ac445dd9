//! # Pitch History Module
//!
//! Fixed-capacity FIFO of per-tick pitch samples for the scrolling
//! history display. One entry is appended every tick, `Some(frequency)`
//! or `None` for a silent frame; pushing past capacity discards the
//! oldest entry.

use std::collections::VecDeque;

/// Rolling window of the most recent pitch samples.
#[derive(Debug, Clone)]
pub struct HistoryBuffer {
    samples: VecDeque<Option<f32>>,
    capacity: usize,
}

impl HistoryBuffer {
    pub fn new(capacity: usize) -> Self {
        Self {
            samples: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Appends one sample, dropping the oldest if the buffer is full.
    pub fn push(&mut self, sample: Option<f32>) {
        if self.samples.len() == self.capacity {
            self.samples.pop_front();
        }
        self.samples.push_back(sample);
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

    /// Samples in arrival order, oldest first.
    pub fn iter(&self) -> impl Iterator<Item = Option<f32>> + '_ {
        self.samples.iter().copied()
    }

    /// Samples mapped to a normalized vertical position in `[0, 1]`.
    ///
    /// Frequencies are linearly scaled from `[min_freq, max_freq]` and
    /// clamped; `None` stays `None` so the renderer draws a gap.
    pub fn normalized(
        &self,
        min_freq: f32,
        max_freq: f32,
    ) -> impl Iterator<Item = Option<f32>> + '_ {
        let span = max_freq - min_freq;
        self.samples.iter().map(move |sample| {
            sample.map(|freq| ((freq - min_freq) / span).clamp(0.0, 1.0))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fifo_discards_the_oldest_past_capacity() {
        let mut history = HistoryBuffer::new(800);
        for i in 0..801 {
            history.push(Some(i as f32));
        }
        assert_eq!(history.len(), 800);
        let samples: Vec<_> = history.iter().collect();
        // The first pushed value is gone; the rest keep their order.
        assert_eq!(samples[0], Some(1.0));
        assert_eq!(samples[799], Some(800.0));
        for window in samples.windows(2) {
            assert!(window[0].unwrap() < window[1].unwrap());
        }
    }

    #[test]
    fn normalization_maps_range_and_keeps_gaps() {
        let mut history = HistoryBuffer::new(8);
        history.push(Some(80.0));
        history.push(Some(790.0));
        history.push(Some(1500.0));
        history.push(None);
        history.push(Some(5000.0)); // out of range, clamped
        let normalized: Vec<_> = history.normalized(80.0, 1500.0).collect();
        assert_eq!(normalized[0], Some(0.0));
        assert!((normalized[1].unwrap() - 0.5).abs() < 1e-3);
        assert_eq!(normalized[2], Some(1.0));
        assert_eq!(normalized[3], None);
        assert_eq!(normalized[4], Some(1.0));
    }
}
