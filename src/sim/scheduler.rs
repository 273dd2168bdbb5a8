//! Deferred one-shot effects on a logical millisecond clock
//!
//! Tasks are plain data naming *what* should happen and to *which* entity,
//! never closures. The consumer re-checks entity liveness when a task fires,
//! so a target destroyed by a bullet simply ignores its own expiry.
//!
//! [`Scheduler::cancel_all`] drops everything and bumps the epoch, so handles
//! issued before a reset can never match or cancel a later task.

use super::state::EntityId;

/// Work to perform when a timer comes due
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Deferred {
    /// Bullet outlived its range without hitting anything
    BulletTimeout(EntityId),
    /// Arena target was never shot
    TargetExpiry(EntityId),
    /// Magazine refill
    ReloadComplete,
    /// Clear the HUD feedback colour
    FeedbackPulseEnd,
    /// Remove an opened gate
    GateDespawn(EntityId),
}

/// Identifies one scheduled task
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerHandle {
    seq: u64,
    epoch: u32,
}

#[derive(Debug, Clone)]
struct Scheduled {
    due_ms: f64,
    seq: u64,
    task: Deferred,
}

#[derive(Debug, Clone, Default)]
pub struct Scheduler {
    now_ms: f64,
    next_seq: u64,
    epoch: u32,
    pending: Vec<Scheduled>,
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fresh scheduler that continues an older one's epoch sequence
    pub fn with_epoch(epoch: u32) -> Self {
        Self {
            epoch,
            ..Self::default()
        }
    }

    /// Logical time in milliseconds
    pub fn now_ms(&self) -> f64 {
        self.now_ms
    }

    pub fn epoch(&self) -> u32 {
        self.epoch
    }

    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    pub fn is_pending(&self, handle: TimerHandle) -> bool {
        handle.epoch == self.epoch && self.pending.iter().any(|s| s.seq == handle.seq)
    }

    /// Run `task` once after `delay_ms`
    pub fn schedule(&mut self, delay_ms: f64, task: Deferred) -> TimerHandle {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.pending.push(Scheduled {
            due_ms: self.now_ms + delay_ms.max(0.0),
            seq,
            task,
        });
        log::trace!("Scheduled {:?} in {:.0}ms (#{})", task, delay_ms, seq);
        TimerHandle {
            seq,
            epoch: self.epoch,
        }
    }

    /// Cancel one task. Returns false if it already fired or belongs to an
    /// earlier epoch.
    pub fn cancel(&mut self, handle: TimerHandle) -> bool {
        if handle.epoch != self.epoch {
            return false;
        }
        let before = self.pending.len();
        self.pending.retain(|s| s.seq != handle.seq);
        self.pending.len() != before
    }

    /// Drop every pending task and invalidate all outstanding handles
    pub fn cancel_all(&mut self) -> usize {
        let dropped = self.pending.len();
        self.pending.clear();
        self.epoch = self.epoch.wrapping_add(1);
        if dropped > 0 {
            log::debug!("Cancelled {} pending timers (epoch {})", dropped, self.epoch);
        }
        dropped
    }

    /// Advance the clock and return every task now due, oldest deadline first
    /// (ties broken by scheduling order)
    pub fn advance(&mut self, dt_ms: f64) -> Vec<Deferred> {
        self.now_ms += dt_ms.max(0.0);
        let now = self.now_ms;

        let mut due: Vec<Scheduled> = Vec::new();
        self.pending.retain(|s| {
            if s.due_ms <= now {
                due.push(s.clone());
                false
            } else {
                true
            }
        });
        due.sort_by(|a, b| a.due_ms.total_cmp(&b.due_ms).then(a.seq.cmp(&b.seq)));
        due.into_iter().map(|s| s.task).collect()
    }
}
