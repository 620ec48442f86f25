//! Frame clocks and deferred starts.
//!
//! A [`FrameClock`] yields the time elapsed since the previous frame. The
//! scheduler's [`run`](super::scheduler::Scheduler::run) loop pulls from it
//! until nothing is left to animate or the clock runs dry.

use std::thread;
use std::time::{Duration, Instant};

use super::types::NodeId;

/// Source of frame deltas, in seconds.
pub trait FrameClock {
    /// Seconds since the previous frame, or `None` when the clock has stopped.
    fn next_frame(&mut self) -> Option<f64>;
}

impl<F> FrameClock for F
where
    F: FnMut() -> Option<f64>,
{
    fn next_frame(&mut self) -> Option<f64> {
        self()
    }
}

/// Deterministic clock that advances by a constant step.
#[derive(Debug, Clone)]
pub struct FixedStepClock {
    step: f64,
    remaining: Option<u64>,
}

impl FixedStepClock {
    pub fn new(step: f64) -> Self {
        Self {
            step,
            remaining: None,
        }
    }

    pub fn with_frame_rate(frame_rate: f64) -> Self {
        Self::new(1.0 / frame_rate)
    }

    /// Stop after `frames` frames.
    pub fn limit(mut self, frames: u64) -> Self {
        self.remaining = Some(frames);
        self
    }

    pub fn step(&self) -> f64 {
        self.step
    }
}

impl FrameClock for FixedStepClock {
    fn next_frame(&mut self) -> Option<f64> {
        match &mut self.remaining {
            Some(0) => None,
            Some(n) => {
                *n -= 1;
                Some(self.step)
            }
            None => Some(self.step),
        }
    }
}

/// Wall-clock frame pacing. Sleeps until the next frame boundary and
/// reports the measured delta.
#[derive(Debug, Clone)]
pub struct SystemFrameClock {
    interval: Duration,
    last: Option<Instant>,
}

impl SystemFrameClock {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            last: None,
        }
    }

    pub fn with_frame_rate(frame_rate: f64) -> Self {
        Self::new(Duration::from_secs_f64(1.0 / frame_rate))
    }
}

impl FrameClock for SystemFrameClock {
    fn next_frame(&mut self) -> Option<f64> {
        let now = Instant::now();
        let last = *self.last.get_or_insert(now);
        let due = last + self.interval;
        if due > now {
            thread::sleep(due - now);
        }
        let now = Instant::now();
        self.last = Some(now);
        Some(now.duration_since(last).as_secs_f64())
    }
}

/// Auto-starts waiting for the next tick.
///
/// Every new node is scheduled here so it starts on the tick after it was
/// built unless the caller drives it first.
#[derive(Debug, Default)]
pub(crate) struct DeferredStarts {
    pending: Vec<(NodeId, f64)>,
}

impl DeferredStarts {
    pub(crate) fn schedule(&mut self, node: NodeId, due: f64) {
        self.cancel(node);
        self.pending.push((node, due));
    }

    pub(crate) fn cancel(&mut self, node: NodeId) -> bool {
        let before = self.pending.len();
        self.pending.retain(|(id, _)| *id != node);
        self.pending.len() != before
    }

    pub(crate) fn is_scheduled(&self, node: NodeId) -> bool {
        self.pending.iter().any(|(id, _)| *id == node)
    }

    /// Remove and return every start due at `now`, in scheduling order.
    pub(crate) fn take_due(&mut self, now: f64) -> Vec<NodeId> {
        let mut due = Vec::new();
        self.pending.retain(|(id, at)| {
            if *at <= now {
                due.push(*id);
                false
            } else {
                true
            }
        });
        due
    }

    pub(crate) fn len(&self) -> usize {
        self.pending.len()
    }
}
