//! Thermocouple sampling
//!
//! The press has two thermocouples, one per platen. A sample is only valid
//! when both channels read successfully; a failing channel is reported as an
//! explicit [`SensorFault`] so it can never be mistaken for a temperature.

use crate::traits::{SensorError, TemperatureSensor};

/// Lowest reading accepted as real (-50.0°C)
pub const MIN_PLAUSIBLE_X10: i16 = -500;

/// Highest reading accepted as real (1100.0°C)
pub const MAX_PLAUSIBLE_X10: i16 = 11_000;

/// Both thermocouple readings taken together
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TemperatureSample {
    /// Channel 0 temperature (0.1°C)
    pub temp0_x10: i16,
    /// Channel 1 temperature (0.1°C)
    pub temp1_x10: i16,
}

impl TemperatureSample {
    /// Average of both channels (0.1°C), rounded toward negative infinity
    pub fn avg_x10(&self) -> i16 {
        (self.temp0_x10 as i32 + self.temp1_x10 as i32).div_euclid(2) as i16
    }

    /// Highest of both channels (0.1°C)
    pub fn max_x10(&self) -> i16 {
        self.temp0_x10.max(self.temp1_x10)
    }
}

/// A failed read on one channel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SensorFault {
    /// Channel index (0 or 1)
    pub channel: u8,
    /// What went wrong
    pub error: SensorError,
}

impl From<SensorFault> for SensorError {
    fn from(fault: SensorFault) -> Self {
        fault.error
    }
}

/// Reject readings the press cannot physically produce
pub fn check_plausible(temp_x10: i16) -> Result<i16, SensorError> {
    if (MIN_PLAUSIBLE_X10..=MAX_PLAUSIBLE_X10).contains(&temp_x10) {
        Ok(temp_x10)
    } else {
        Err(SensorError::OutOfRange)
    }
}

/// The two thermocouple channels
pub struct ThermocouplePair<A, B> {
    sensor0: A,
    sensor1: B,
    retries: u8,
}

impl<A: TemperatureSensor, B: TemperatureSensor> ThermocouplePair<A, B> {
    /// Create a pair
    ///
    /// # Arguments
    /// - `retries`: Extra attempts per channel before a fault is reported
    pub fn new(sensor0: A, sensor1: B, retries: u8) -> Self {
        Self {
            sensor0,
            sensor1,
            retries,
        }
    }

    /// Read both channels
    ///
    /// Channel 0 is read first; if it fails, channel 1 is not touched.
    pub fn sample(&mut self) -> Result<TemperatureSample, SensorFault> {
        let temp0_x10 = read_with_retry(&mut self.sensor0, self.retries)
            .map_err(|error| SensorFault { channel: 0, error })?;
        let temp1_x10 = read_with_retry(&mut self.sensor1, self.retries)
            .map_err(|error| SensorFault { channel: 1, error })?;

        Ok(TemperatureSample {
            temp0_x10,
            temp1_x10,
        })
    }

    /// Get access to channel 0
    pub fn sensor0(&self) -> &A {
        &self.sensor0
    }

    /// Get access to channel 1
    pub fn sensor1(&self) -> &B {
        &self.sensor1
    }
}

fn read_with_retry<S: TemperatureSensor>(sensor: &mut S, retries: u8) -> Result<i16, SensorError> {
    let mut attempt = 0;
    loop {
        match sensor.read_celsius_x10().and_then(check_plausible) {
            Ok(temp) => return Ok(temp),
            Err(e) if attempt >= retries => {
                warn!("Sensor read failed after {} attempts: {:?}", attempt + 1, e);
                return Err(e);
            }
            Err(_) => attempt += 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Mock sensor replaying a script of results, repeating the last one
    struct ScriptedSensor {
        script: &'static [Result<i16, SensorError>],
        reads: usize,
    }

    impl ScriptedSensor {
        fn new(script: &'static [Result<i16, SensorError>]) -> Self {
            Self { script, reads: 0 }
        }
    }

    impl TemperatureSensor for ScriptedSensor {
        fn read_celsius_x10(&mut self) -> Result<i16, SensorError> {
            let index = self.reads.min(self.script.len() - 1);
            self.reads += 1;
            self.script[index]
        }
    }

    #[test]
    fn test_sample_average() {
        let mut pair = ThermocouplePair::new(
            ScriptedSensor::new(&[Ok(1850)]),
            ScriptedSensor::new(&[Ok(1900)]),
            1,
        );
        let sample = pair.sample().unwrap();
        assert_eq!(sample.temp0_x10, 1850);
        assert_eq!(sample.temp1_x10, 1900);
        assert_eq!(sample.avg_x10(), 1875);
        assert_eq!(sample.max_x10(), 1900);
    }

    #[test]
    fn test_average_rounds_down() {
        let warm = TemperatureSample {
            temp0_x10: 1801,
            temp1_x10: 1800,
        };
        assert_eq!(warm.avg_x10(), 1800);

        let cold = TemperatureSample {
            temp0_x10: -401,
            temp1_x10: -400,
        };
        assert_eq!(cold.avg_x10(), -401);
    }

    #[test]
    fn test_retry_recovers() {
        let mut pair = ThermocouplePair::new(
            ScriptedSensor::new(&[Err(SensorError::Communication), Ok(1000)]),
            ScriptedSensor::new(&[Ok(1000)]),
            1,
        );
        assert!(pair.sample().is_ok());
        assert_eq!(pair.sensor0().reads, 2);
    }

    #[test]
    fn test_fault_reports_channel() {
        let mut pair = ThermocouplePair::new(
            ScriptedSensor::new(&[Ok(1000)]),
            ScriptedSensor::new(&[Err(SensorError::OpenCircuit)]),
            1,
        );
        assert_eq!(
            pair.sample(),
            Err(SensorFault {
                channel: 1,
                error: SensorError::OpenCircuit,
            })
        );
        // One read plus one retry
        assert_eq!(pair.sensor1().reads, 2);
    }

    #[test]
    fn test_no_retry() {
        let mut pair = ThermocouplePair::new(
            ScriptedSensor::new(&[Err(SensorError::ShortCircuit), Ok(1000)]),
            ScriptedSensor::new(&[Ok(1000)]),
            0,
        );
        assert_eq!(pair.sample().map_err(SensorError::from), Err(SensorError::ShortCircuit));
        assert_eq!(pair.sensor1().reads, 0);
    }

    #[test]
    fn test_implausible_reading() {
        assert_eq!(check_plausible(11_001), Err(SensorError::OutOfRange));
        assert_eq!(check_plausible(-501), Err(SensorError::OutOfRange));
        assert_eq!(check_plausible(0), Ok(0));

        let mut pair = ThermocouplePair::new(
            ScriptedSensor::new(&[Ok(20_000)]),
            ScriptedSensor::new(&[Ok(1000)]),
            1,
        );
        assert_eq!(
            pair.sample().unwrap_err(),
            SensorFault {
                channel: 0,
                error: SensorError::OutOfRange,
            }
        );
    }
}
