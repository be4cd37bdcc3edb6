//! Rolling telemetry series

use std::collections::VecDeque;

use crate::domain::Telemetry;

pub const DEFAULT_CAPACITY: usize = 60;

#[derive(Clone, Debug)]
pub struct TelemetryHistory {
    cpu: VecDeque<u64>,
    ram: VecDeque<u64>,
    net: VecDeque<u64>,
    capacity: usize,
}

impl TelemetryHistory {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            cpu: VecDeque::with_capacity(capacity),
            ram: VecDeque::with_capacity(capacity),
            net: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    pub fn record(&mut self, sample: Telemetry) {
        for (series, value) in [
            (&mut self.cpu, sample.cpu),
            (&mut self.ram, sample.ram),
            (&mut self.net, sample.net),
        ] {
            series.push_back(value);
            if series.len() > self.capacity {
                series.pop_front();
            }
        }
    }

    pub fn len(&self) -> usize {
        self.cpu.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cpu.is_empty()
    }

    pub fn latest(&self) -> Option<Telemetry> {
        Some(Telemetry {
            cpu: *self.cpu.back()?,
            ram: *self.ram.back()?,
            net: *self.net.back()?,
        })
    }

    pub fn cpu(&self) -> Vec<u64> {
        self.cpu.iter().copied().collect()
    }

    pub fn ram(&self) -> Vec<u64> {
        self.ram.iter().copied().collect()
    }

    pub fn net(&self) -> Vec<u64> {
        self.net.iter().copied().collect()
    }
}

impl Default for TelemetryHistory {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

/// Ok / failed service call tally
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CallCounters {
    pub ok: u64,
    pub failed: u64,
    /// Whether the most recent call failed
    pub last_failed: bool,
}

impl CallCounters {
    pub fn success(&mut self) {
        self.ok += 1;
        self.last_failed = false;
    }

    pub fn failure(&mut self) {
        self.failed += 1;
        self.last_failed = true;
    }

    pub fn total(&self) -> u64 {
        self.ok + self.failed
    }
}
