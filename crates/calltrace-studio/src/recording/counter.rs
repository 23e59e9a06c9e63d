//! Named counters and their sampled values.

use super::{CounterId, Timestamp};

/// One sampled value of a counter
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CounterSample {
    pub time: Timestamp,
    pub value: f64,
}

impl CounterSample {
    pub fn new(time: Timestamp, value: f64) -> Self {
        Self { time, value }
    }
}

/// A declared counter with its samples in submission order.
///
/// The running bounds start at zero rather than at the first sample, so a
/// counter that only ever reports positive values has `min_value() == 0.0`.
#[derive(Debug, Clone)]
pub struct CounterIdentity {
    id: CounterId,
    label: String,
    samples: Vec<CounterSample>,
    max_value: f64,
    min_value: f64,
}

impl CounterIdentity {
    pub fn new(id: CounterId, label: impl Into<String>) -> Self {
        Self {
            id,
            label: label.into(),
            samples: Vec::new(),
            max_value: 0.0,
            min_value: 0.0,
        }
    }

    pub fn id(&self) -> CounterId {
        self.id
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn samples(&self) -> &[CounterSample] {
        &self.samples
    }

    pub fn max_value(&self) -> f64 {
        self.max_value
    }

    pub fn min_value(&self) -> f64 {
        self.min_value
    }

    pub fn add_sample(&mut self, sample: CounterSample) {
        self.max_value = self.max_value.max(sample.value);
        self.min_value = self.min_value.min(sample.value);
        self.samples.push(sample);
    }
}
