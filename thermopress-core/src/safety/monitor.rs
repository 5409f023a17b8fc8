//! Safety monitor implementation
//!
//! Watches for over-temperature and for a run of failed sensor reads while
//! the heater is on. A trip is a request to force the heater off; the
//! scheduler carries it out through the menu engine.
//!
//! Both checks are off unless configured.

use crate::config::PressConfig;
use crate::sensor::{SensorFault, TemperatureSample};

/// Reason for a safety trip
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TripReason {
    /// A channel read above the cutoff (0.1°C)
    OverTemperature { temp_x10: i16 },
    /// Too many consecutive failed samples while heating
    SensorFaults { count: u8 },
}

/// Safety condition status
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SafetyStatus {
    /// All conditions normal
    Ok,
    /// Heater must be switched off
    Trip(TripReason),
}

/// Heater cutoff logic
#[derive(Debug, Clone)]
pub struct SafetyMonitor {
    /// Cutoff temperature (0.1°C), disabled when `None`
    cutoff_x10: Option<i16>,
    /// Fault run that trips, disabled when `None`
    max_faults: Option<u8>,
    /// Faults seen in a row while heating
    consecutive_faults: u8,
}

impl SafetyMonitor {
    /// Create a monitor from the press configuration
    pub fn new(config: &PressConfig) -> Self {
        Self {
            cutoff_x10: config.overtemp_cutoff_x10(),
            max_faults: config.max_sensor_faults.map(|n| n.max(1)),
            consecutive_faults: 0,
        }
    }

    /// Whether the refresh tick should sample even when the screen does not
    pub fn wants_sample(&self, heater_on: bool) -> bool {
        heater_on && (self.cutoff_x10.is_some() || self.max_faults.is_some())
    }

    /// Evaluate one sample
    ///
    /// Samples taken with the heater off never trip and clear the fault run.
    pub fn evaluate(
        &mut self,
        heater_on: bool,
        sample: &Result<TemperatureSample, SensorFault>,
    ) -> SafetyStatus {
        if !heater_on {
            self.consecutive_faults = 0;
            return SafetyStatus::Ok;
        }

        match sample {
            Ok(s) => {
                self.consecutive_faults = 0;
                match self.cutoff_x10 {
                    Some(cutoff) if s.max_x10() > cutoff => {
                        SafetyStatus::Trip(TripReason::OverTemperature {
                            temp_x10: s.max_x10(),
                        })
                    }
                    _ => SafetyStatus::Ok,
                }
            }
            Err(_) => {
                self.consecutive_faults = self.consecutive_faults.saturating_add(1);
                match self.max_faults {
                    Some(max) if self.consecutive_faults >= max => {
                        let count = self.consecutive_faults;
                        self.consecutive_faults = 0;
                        SafetyStatus::Trip(TripReason::SensorFaults { count })
                    }
                    _ => SafetyStatus::Ok,
                }
            }
        }
    }

    /// Faults seen in a row while heating
    pub fn consecutive_faults(&self) -> u8 {
        self.consecutive_faults
    }
}
