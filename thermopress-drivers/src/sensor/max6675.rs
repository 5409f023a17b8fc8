//! MAX6675 K-type thermocouple converter
//!
//! The chip answers every chip-select with one 16-bit big-endian frame:
//!
//! | bit   | meaning                           |
//! |-------|-----------------------------------|
//! | 15    | dummy sign bit, always 0          |
//! | 14..3 | temperature, 0.25°C per count     |
//! | 2     | thermocouple input open           |
//! | 1     | device ID, always 0               |
//! | 0     | three-state                       |
//!
//! A conversion takes up to 220 ms; reading faster returns the previous
//! result, which is fine for a one-second refresh.

use embedded_hal::spi::SpiDevice;
use thermopress_core::traits::{SensorError, TemperatureSensor};

const SIGN_BIT: u16 = 1 << 15;
const OPEN_BIT: u16 = 1 << 2;
const ID_BIT: u16 = 1 << 1;

/// MAX6675 errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Max6675Error<E> {
    /// SPI transfer failed
    Spi(E),
    /// No thermocouple connected
    OpenThermocouple,
    /// Frame with fixed-zero bits set (bus floating or no chip)
    BadFrame(u16),
}

impl<E> From<Max6675Error<E>> for SensorError {
    fn from(e: Max6675Error<E>) -> Self {
        match e {
            Max6675Error::Spi(_) | Max6675Error::BadFrame(_) => SensorError::Communication,
            Max6675Error::OpenThermocouple => SensorError::OpenCircuit,
        }
    }
}

/// Decode a raw frame into 0.1°C units
pub fn decode<E>(frame: u16) -> Result<i16, Max6675Error<E>> {
    if frame & (SIGN_BIT | ID_BIT) != 0 {
        return Err(Max6675Error::BadFrame(frame));
    }
    if frame & OPEN_BIT != 0 {
        return Err(Max6675Error::OpenThermocouple);
    }

    let quarters = u32::from((frame >> 3) & 0x0FFF);
    // Rounded to the nearest 0.1°C; 4095 quarters is 10237.5, well within i16
    Ok(((quarters * 10 + 2) / 4) as i16)
}

/// One MAX6675 on its own chip select
pub struct Max6675<SPI> {
    spi: SPI,
}

impl<SPI: SpiDevice> Max6675<SPI> {
    /// Create a driver for the chip behind `spi`
    pub fn new(spi: SPI) -> Self {
        Self { spi }
    }

    /// Read one raw frame
    pub fn read_frame(&mut self) -> Result<u16, Max6675Error<SPI::Error>> {
        let mut buf = [0u8; 2];
        self.spi.read(&mut buf).map_err(Max6675Error::Spi)?;
        Ok(u16::from_be_bytes(buf))
    }

    /// Read the temperature in 0.1°C units
    pub fn read(&mut self) -> Result<i16, Max6675Error<SPI::Error>> {
        decode(self.read_frame()?)
    }

    /// Release the SPI device
    pub fn release(self) -> SPI {
        self.spi
    }
}

impl<SPI: SpiDevice> TemperatureSensor for Max6675<SPI> {
    fn read_celsius_x10(&mut self) -> Result<i16, SensorError> {
        Ok(self.read()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use embedded_hal::spi::{ErrorKind, ErrorType, Operation};

    /// Mock SPI device answering every read with a fixed frame
    struct MockSpi {
        frame: Result<u16, ErrorKind>,
        reads: u32,
    }

    impl MockSpi {
        fn new(frame: u16) -> Self {
            Self {
                frame: Ok(frame),
                reads: 0,
            }
        }
    }

    impl ErrorType for MockSpi {
        type Error = ErrorKind;
    }

    impl SpiDevice for MockSpi {
        fn transaction(&mut self, operations: &mut [Operation<'_, u8>]) -> Result<(), ErrorKind> {
            let frame = self.frame?;
            for op in operations.iter_mut() {
                if let Operation::Read(buf) = op {
                    buf.copy_from_slice(&frame.to_be_bytes()[..buf.len()]);
                    self.reads += 1;
                }
            }
            Ok(())
        }
    }

    fn frame_for_quarters(quarters: u16) -> u16 {
        quarters << 3
    }

    fn decode(frame: u16) -> Result<i16, Max6675Error<()>> {
        super::decode(frame)
    }

    #[test]
    fn test_decode_temperatures() {
        assert_eq!(decode(frame_for_quarters(0)), Ok(0));
        // 25.0°C = 100 quarters
        assert_eq!(decode(frame_for_quarters(100)), Ok(250));
        // 185.25°C = 741 quarters, rounds to 185.3
        assert_eq!(decode(frame_for_quarters(741)), Ok(1853));
        // 185.75°C rounds to 185.8
        assert_eq!(decode(frame_for_quarters(743)), Ok(1858));
        // Full scale
        assert_eq!(decode(frame_for_quarters(4095)), Ok(10238));
    }

    #[test]
    fn test_open_thermocouple() {
        let frame = frame_for_quarters(100) | OPEN_BIT;
        assert_eq!(decode(frame), Err(Max6675Error::OpenThermocouple));
    }

    #[test]
    fn test_floating_bus_rejected() {
        assert_eq!(decode(0xFFFF), Err(Max6675Error::BadFrame(0xFFFF)));
    }

    #[test]
    fn test_sensor_trait() {
        let mut sensor = Max6675::new(MockSpi::new(frame_for_quarters(760)));
        assert_eq!(sensor.read_celsius_x10(), Ok(1900));
        assert_eq!(sensor.read_celsius(), Ok(190));
        assert_eq!(sensor.release().reads, 2);
    }

    #[test]
    fn test_errors_map_to_sensor_errors() {
        let mut open = Max6675::new(MockSpi::new(OPEN_BIT));
        assert_eq!(open.read_celsius_x10(), Err(SensorError::OpenCircuit));

        let mut broken = Max6675::new(MockSpi {
            frame: Err(ErrorKind::Other),
            reads: 0,
        });
        assert_eq!(broken.read(), Err(Max6675Error::Spi(ErrorKind::Other)));
        assert_eq!(broken.read_celsius_x10(), Err(SensorError::Communication));
    }
}
