//! Discrete input events

/// Events produced by the encoder and its push button
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum InputEvent {
    /// One detent toward the top of the screen
    RotateUp,
    /// One detent toward the bottom of the screen
    RotateDown,
    /// Single click
    Press,
    /// Two clicks in quick succession
    DoublePress,
    /// Button held past the long-press time
    LongPress,
}

impl InputEvent {
    /// Returns true if this is a rotation event
    pub fn is_rotation(&self) -> bool {
        matches!(self, InputEvent::RotateUp | InputEvent::RotateDown)
    }

    /// Returns true if this is a button event
    pub fn is_button(&self) -> bool {
        !self.is_rotation()
    }

    /// Selection delta for a rotation: +1 down, -1 up, 0 otherwise
    pub fn rotation_delta(&self) -> i8 {
        match self {
            InputEvent::RotateDown => 1,
            InputEvent::RotateUp => -1,
            _ => 0,
        }
    }
}
