//! Heater output and thermocouple traits

/// Errors that can occur with temperature sensing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SensorError {
    /// Thermocouple disconnected (open circuit flag set by the converter)
    OpenCircuit,
    /// Thermocouple shorted to ground or supply
    ShortCircuit,
    /// Reading outside the plausible range for the press
    OutOfRange,
    /// Bus transaction with the converter failed
    Communication,
}

/// Trait for temperature sensors
///
/// Implementations handle the specific converter (MAX6675, MAX31855, NTC
/// divider, ...). Readings use 0.1°C fixed point: 185.5°C is returned as 1855.
pub trait TemperatureSensor {
    /// Read the current temperature in tenths of a degree Celsius
    ///
    /// Takes `&mut self` because a read is a bus transaction.
    fn read_celsius_x10(&mut self) -> Result<i16, SensorError>;

    /// Read the current temperature in whole degrees Celsius
    fn read_celsius(&mut self) -> Result<i16, SensorError> {
        self.read_celsius_x10().map(|t| t / 10)
    }
}

/// Trait for the heater output line
///
/// One digital output: active drives the SSR and the "hot" indicator.
pub trait HeaterOutput {
    /// Drive the output on or off
    fn set_on(&mut self, on: bool);

    /// Check if the output is currently driven on
    fn is_on(&self) -> bool;
}
