// src/display/history.rs
use std::collections::VecDeque;
use std::time::Duration;

const BARS: [char; 8] = ['▁', '▂', '▃', '▄', '▅', '▆', '▇', '█'];

/// Bounded response-time history for one probe.
#[derive(Debug, Clone)]
pub struct History {
    capacity: usize,
    samples: VecDeque<Duration>,
}

impl History {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            samples: VecDeque::with_capacity(capacity),
        }
    }

    pub fn push(&mut self, sample: Duration) {
        if self.capacity == 0 {
            return;
        }
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

    pub fn max(&self) -> Option<Duration> {
        self.samples.iter().max().copied()
    }

    /// Oldest-first sparkline scaled to the largest sample.
    pub fn sparkline(&self) -> String {
        let max = match self.max() {
            Some(max) if !max.is_zero() => max.as_secs_f64(),
            Some(_) => return BARS[0].to_string().repeat(self.samples.len()),
            None => return String::new(),
        };

        self.samples
            .iter()
            .map(|sample| {
                let level = (sample.as_secs_f64() / max * (BARS.len() - 1) as f64).round();
                BARS[(level as usize).min(BARS.len() - 1)]
            })
            .collect()
    }
}
