//! GPIO heater output
//!
//! Drives the solid state relay and the heater indicator LED together, so
//! the LED always shows what the relay has been told.

use embedded_hal::digital::OutputPin;
use thermopress_core::traits::HeaterOutput;

/// SSR and indicator LED on two GPIO pins
///
/// Pin errors are dropped: on the supported HALs GPIO writes are infallible.
pub struct GpioHeater<P, L> {
    ssr: P,
    led: L,
    /// If true, heater ON = SSR pin LOW
    inverted: bool,
    /// Current logical state (true = heater on)
    on: bool,
}

impl<P: OutputPin, L: OutputPin> GpioHeater<P, L> {
    /// Create a heater output, driven off immediately
    ///
    /// # Arguments
    /// - `ssr`: Relay control pin
    /// - `led`: Indicator LED pin (always active-high)
    /// - `inverted`: If true, the relay is ON when its pin is LOW
    pub fn new(ssr: P, led: L, inverted: bool) -> Self {
        let mut heater = Self {
            ssr,
            led,
            inverted,
            on: false,
        };
        heater.set_on(false);
        heater
    }

    /// Create a heater with an active-high relay
    pub fn new_active_high(ssr: P, led: L) -> Self {
        Self::new(ssr, led, false)
    }

    /// Release the pins
    pub fn release(self) -> (P, L) {
        (self.ssr, self.led)
    }
}

impl<P: OutputPin, L: OutputPin> HeaterOutput for GpioHeater<P, L> {
    fn set_on(&mut self, on: bool) {
        self.on = on;

        let _ = if on != self.inverted {
            self.ssr.set_high()
        } else {
            self.ssr.set_low()
        };

        let _ = if on { self.led.set_high() } else { self.led.set_low() };
    }

    fn is_on(&self) -> bool {
        self.on
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::convert::Infallible;
    use embedded_hal::digital::ErrorType;

    /// Mock GPIO pin for testing
    #[derive(Default)]
    struct MockPin {
        high: bool,
    }

    impl ErrorType for MockPin {
        type Error = Infallible;
    }

    impl OutputPin for MockPin {
        fn set_high(&mut self) -> Result<(), Infallible> {
            self.high = true;
            Ok(())
        }

        fn set_low(&mut self) -> Result<(), Infallible> {
            self.high = false;
            Ok(())
        }
    }

    #[test]
    fn test_active_high_heater() {
        let mut heater = GpioHeater::new_active_high(MockPin::default(), MockPin::default());

        assert!(!heater.is_on());
        assert!(!heater.ssr.high);
        assert!(!heater.led.high);

        heater.set_on(true);
        assert!(heater.is_on());
        assert!(heater.ssr.high);
        assert!(heater.led.high);

        heater.set_on(false);
        let (ssr, led) = heater.release();
        assert!(!ssr.high);
        assert!(!led.high);
    }

    #[test]
    fn test_inverted_relay_keeps_led_polarity() {
        let mut heater = GpioHeater::new(MockPin::default(), MockPin::default(), true);

        // Off: relay pin high, LED dark
        assert!(heater.ssr.high);
        assert!(!heater.led.high);

        heater.set_on(true);
        assert!(!heater.ssr.high);
        assert!(heater.led.high);
    }

    #[test]
    fn test_constructor_forces_off() {
        let heater = GpioHeater::new_active_high(MockPin { high: true }, MockPin { high: true });
        assert!(!heater.ssr.high);
        assert!(!heater.led.high);
    }
}
