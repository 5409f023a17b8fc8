//! Timing and threshold configuration
//!
//! Configuration is fixed at build time. The firmware generates a
//! `PressConfig` constant from `press.toml`; host code and tests use
//! [`PressConfig::DEFAULT`].

use crate::sensor::{MAX_PLAUSIBLE_X10, MIN_PLAUSIBLE_X10};

/// Controller configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PressConfig {
    /// Milliseconds between periodic re-renders and cycle timer ticks
    pub refresh_interval_ms: u32,
    /// Window after an accepted encoder edge during which further edges are ignored
    pub settle_ms: u32,
    /// Time at temperature for one pressing cycle (seconds)
    pub cycle_duration_s: u32,
    /// Average temperature at which the cycle countdown runs (°C)
    pub melting_threshold_c: i16,
    /// Extra attempts per thermocouple read before reporting a fault
    pub sensor_retries: u8,
    /// Button contact debounce (ms)
    pub button_debounce_ms: u32,
    /// Hold time that classifies a press as long (ms)
    pub long_press_ms: u32,
    /// Window for a second click to form a double press (ms)
    pub double_press_ms: u32,
    /// Force the heater off above this temperature (°C), disabled when `None`
    pub overtemp_cutoff_c: Option<i16>,
    /// Consecutive sensor faults that force the heater off, disabled when `None`
    pub max_sensor_faults: Option<u8>,
}

impl PressConfig {
    /// Defaults matching the reference press
    pub const DEFAULT: Self = Self {
        refresh_interval_ms: 1000,
        settle_ms: 500,
        cycle_duration_s: 300,
        melting_threshold_c: 180,
        sensor_retries: 1,
        button_debounce_ms: 20,
        long_press_ms: 1000,
        double_press_ms: 300,
        overtemp_cutoff_c: None,
        max_sensor_faults: None,
    };

    /// Melting threshold in 0.1°C units
    pub const fn melting_threshold_x10(&self) -> i16 {
        self.melting_threshold_c.saturating_mul(10)
    }

    /// Over-temperature cutoff in 0.1°C units
    pub const fn overtemp_cutoff_x10(&self) -> Option<i16> {
        match self.overtemp_cutoff_c {
            Some(c) => Some(c.saturating_mul(10)),
            None => None,
        }
    }

    /// Check the configuration for values the controller cannot run with
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.refresh_interval_ms == 0 {
            return Err(ConfigError::ZeroRefreshInterval);
        }

        if self.cycle_duration_s == 0 {
            return Err(ConfigError::ZeroCycleDuration);
        }

        let threshold = self.melting_threshold_x10();
        if !(MIN_PLAUSIBLE_X10..=MAX_PLAUSIBLE_X10).contains(&threshold) {
            return Err(ConfigError::ThresholdOutOfRange);
        }

        if let Some(cutoff) = self.overtemp_cutoff_x10() {
            if cutoff <= threshold || cutoff > MAX_PLAUSIBLE_X10 {
                return Err(ConfigError::CutoffNotAboveThreshold);
            }
        }

        if self.long_press_ms <= self.button_debounce_ms {
            return Err(ConfigError::LongPressTooShort);
        }

        if self.max_sensor_faults == Some(0) {
            return Err(ConfigError::ZeroFaultBudget);
        }

        Ok(())
    }
}

impl Default for PressConfig {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Configuration validation errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// Refresh interval of zero would spin the refresh path every poll
    ZeroRefreshInterval,
    /// A cycle of zero seconds completes before it starts
    ZeroCycleDuration,
    /// Melting threshold outside the plausible sensor range
    ThresholdOutOfRange,
    /// Over-temperature cutoff at or below the melting threshold
    CutoffNotAboveThreshold,
    /// Long press shorter than the contact debounce
    LongPressTooShort,
    /// Sensor fault budget of zero
    ZeroFaultBudget,
}
