//! Rotary encoder and push button on GPIO inputs
//!
//! Only samples levels; edge detection and debouncing live in the core
//! decoders so they can run on any timebase.

use embedded_hal::digital::InputPin;
use thermopress_core::traits::{InputLevels, InputSource};

/// Encoder clock, direction and push-button pins
///
/// The button is wired to ground with a pull-up, so low means pressed.
/// A failed pin read repeats the last good level.
pub struct EncoderPins<CLK, DT, BTN> {
    clk: CLK,
    dt: DT,
    button: BTN,
    last: InputLevels,
}

impl<CLK: InputPin, DT: InputPin, BTN: InputPin> EncoderPins<CLK, DT, BTN> {
    /// Wrap the three input pins
    pub fn new(clk: CLK, dt: DT, button: BTN) -> Self {
        Self {
            clk,
            dt,
            button,
            last: InputLevels::default(),
        }
    }
}

impl<CLK: InputPin, DT: InputPin, BTN: InputPin> InputSource for EncoderPins<CLK, DT, BTN> {
    fn read(&mut self) -> InputLevels {
        let levels = InputLevels {
            clk: self.clk.is_high().unwrap_or(self.last.clk),
            dt: self.dt.is_high().unwrap_or(self.last.dt),
            button: self.button.is_low().unwrap_or(self.last.button),
        };
        self.last = levels;
        levels
    }
}
