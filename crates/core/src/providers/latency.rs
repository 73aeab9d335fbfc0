use std::collections::VecDeque;
use std::time::Duration;

use parking_lot::Mutex;
use rand::Rng;

use super::traits::LatencyModel;

/// Uniformly random delay in `[min, max]`, the dashboard's 2–5 second wait.
pub struct UniformLatency {
    min: Duration,
    max: Duration,
}

impl UniformLatency {
    /// Bounds are swapped if given in the wrong order.
    pub fn new(min: Duration, max: Duration) -> Self {
        if min <= max {
            Self { min, max }
        } else {
            Self { min: max, max: min }
        }
    }

    pub fn from_millis(min_ms: u64, max_ms: u64) -> Self {
        Self::new(Duration::from_millis(min_ms), Duration::from_millis(max_ms))
    }
}

impl Default for UniformLatency {
    fn default() -> Self {
        Self::from_millis(2000, 5000)
    }
}

impl LatencyModel for UniformLatency {
    fn name(&self) -> &str {
        "uniform"
    }

    fn next_delay(&self) -> Duration {
        let min = self.min.as_millis() as u64;
        let max = self.max.as_millis() as u64;
        Duration::from_millis(rand::thread_rng().gen_range(min..=max))
    }
}

/// Same delay every run.
pub struct FixedLatency(pub Duration);

impl LatencyModel for FixedLatency {
    fn name(&self) -> &str {
        "fixed"
    }

    fn next_delay(&self) -> Duration {
        self.0
    }
}

/// Replays a scripted list of delays, one per run, then repeats the last one.
///
/// Lets tests decide which of two overlapping runs fires its timer first.
pub struct SequenceLatency {
    delays: Mutex<VecDeque<Duration>>,
    last: Mutex<Duration>,
}

impl SequenceLatency {
    pub fn new(delays: impl IntoIterator<Item = Duration>) -> Self {
        Self {
            delays: Mutex::new(delays.into_iter().collect()),
            last: Mutex::new(Duration::ZERO),
        }
    }
}

impl LatencyModel for SequenceLatency {
    fn name(&self) -> &str {
        "sequence"
    }

    fn next_delay(&self) -> Duration {
        let mut last = self.last.lock();
        if let Some(next) = self.delays.lock().pop_front() {
            *last = next;
        }
        *last
    }
}
