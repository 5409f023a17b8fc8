//! Heating cycle countdown
//!
//! The cycle measures time at temperature, not wall-clock time since start:
//! a tick only counts when the cycle is active and the average temperature
//! is at or above the melting threshold. A sensor fault counts as below.

use crate::traits::SensorError;

/// Countdown state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct CycleState {
    /// Countdown is running (or waiting for temperature)
    pub active: bool,
    /// Seconds at temperature still required
    pub remaining_s: u32,
    /// Full cycle length (seconds)
    pub target_duration_s: u32,
}

/// Emitted once when the countdown reaches zero
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct CycleComplete;

/// Countdown gated on the melting threshold
#[derive(Debug, Clone)]
pub struct CycleTimer {
    state: CycleState,
    threshold_x10: i16,
}

impl CycleTimer {
    /// Create an inactive timer
    ///
    /// # Arguments
    /// - `target_duration_s`: Seconds at temperature per cycle
    /// - `threshold_x10`: Melting threshold in 0.1°C units
    pub const fn new(target_duration_s: u32, threshold_x10: i16) -> Self {
        Self {
            state: CycleState {
                active: false,
                remaining_s: target_duration_s,
                target_duration_s,
            },
            threshold_x10,
        }
    }

    /// Reset to the full duration and activate
    pub fn start(&mut self) {
        self.state.remaining_s = self.state.target_duration_s;
        self.state.active = true;
        info!("Cycle started: {}s at temperature", self.state.target_duration_s);
    }

    /// Deactivate without completing
    pub fn cancel(&mut self) {
        if self.state.active {
            info!("Cycle stopped with {}s remaining", self.state.remaining_s);
        }
        self.state.active = false;
    }

    /// Advance by one tick
    ///
    /// Decrements by exactly one second when active and `avg_x10` is at or
    /// above the threshold. Returns [`CycleComplete`] on the tick that
    /// reaches zero; the timer is inactive afterwards.
    pub fn advance(&mut self, avg_x10: Result<i16, SensorError>) -> Option<CycleComplete> {
        if !self.state.active {
            return None;
        }

        match avg_x10 {
            Ok(avg) if avg >= self.threshold_x10 => {}
            _ => return None,
        }

        self.state.remaining_s = self.state.remaining_s.saturating_sub(1);

        if self.state.remaining_s == 0 {
            self.state.active = false;
            info!("Cycle complete");
            return Some(CycleComplete);
        }

        None
    }

    /// Check if a temperature reading lets the countdown run
    pub fn at_temperature(&self, avg_x10: Result<i16, SensorError>) -> bool {
        matches!(avg_x10, Ok(avg) if avg >= self.threshold_x10)
    }

    /// Current countdown state
    pub fn state(&self) -> CycleState {
        self.state
    }

    /// Check if a cycle is in progress
    pub fn is_active(&self) -> bool {
        self.state.active
    }

    /// Seconds still required at temperature
    pub fn remaining_s(&self) -> u32 {
        self.state.remaining_s
    }
}
