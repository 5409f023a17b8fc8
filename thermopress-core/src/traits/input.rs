//! Raw input line trait

/// Logical levels of the three input lines at one instant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct InputLevels {
    /// Encoder clock line (A)
    pub clk: bool,
    /// Encoder direction line (B)
    pub dt: bool,
    /// Push button, `true` while held down (already polarity-corrected)
    pub button: bool,
}

/// Trait for the raw encoder and button lines
///
/// Implementations only sample pins. Edge detection, debouncing and press
/// classification happen in [`crate::input`].
pub trait InputSource {
    /// Sample all three lines
    fn read(&mut self) -> InputLevels;
}
