//! Ammunition: a finite magazine with a timed refill, or unlimited shots
//!
//! This type only tracks counts. The reload *timer* belongs to the scheduler;
//! see `shooting::start_reload`.

use serde::{Deserialize, Serialize};

/// Answer to "may I fire?"
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShotPermit {
    /// A round was spent; `emptied` is set when it was the last one
    Granted { emptied: bool },
    /// Magazine is empty and no reload is running
    Empty,
    /// A reload is in flight
    Reloading,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ammo {
    /// `None` means unlimited
    max: Option<u32>,
    rounds: u32,
    reloading: bool,
}

impl Ammo {
    pub fn unlimited() -> Self {
        Self {
            max: None,
            rounds: 0,
            reloading: false,
        }
    }

    pub fn magazine(max: u32) -> Self {
        Self {
            max: Some(max),
            rounds: max,
            reloading: false,
        }
    }

    /// Rounds left, `None` when unlimited
    pub fn rounds(&self) -> Option<u32> {
        self.max.map(|_| self.rounds)
    }

    pub fn max(&self) -> Option<u32> {
        self.max
    }

    pub fn is_reloading(&self) -> bool {
        self.reloading
    }

    pub fn is_full(&self) -> bool {
        self.max.is_none_or(|max| self.rounds >= max)
    }

    /// Spend one round if allowed
    pub fn take_shot(&mut self) -> ShotPermit {
        if self.reloading {
            return ShotPermit::Reloading;
        }
        if self.max.is_none() {
            return ShotPermit::Granted { emptied: false };
        }
        if self.rounds == 0 {
            return ShotPermit::Empty;
        }
        self.rounds -= 1;
        ShotPermit::Granted {
            emptied: self.rounds == 0,
        }
    }

    /// Flag a reload as started. Returns false when one is already running or
    /// shots are unlimited.
    pub fn begin_reload(&mut self) -> bool {
        if self.reloading || self.max.is_none() {
            return false;
        }
        self.reloading = true;
        true
    }

    /// Refill the magazine. Returns false if no reload was in flight.
    pub fn finish_reload(&mut self) -> bool {
        match (self.reloading, self.max) {
            (true, Some(max)) => {
                self.rounds = max;
                self.reloading = false;
                true
            }
            _ => false,
        }
    }
}
