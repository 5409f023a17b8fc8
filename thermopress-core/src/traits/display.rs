//! Character display trait
//!
//! The display is a 4-row, 20-column text surface. The sink owns clearing,
//! cursor placement and drawing the selection marker in column 0; the menu
//! only hands it finished frames.

use crate::display::RenderFrame;

/// Trait for the character display
pub trait DisplaySink {
    /// Bus or driver error type
    type Error;

    /// Draw a complete frame, marker included
    fn show(&mut self, frame: &RenderFrame) -> Result<(), Self::Error>;

    /// Move the selection marker without redrawing the frame content
    ///
    /// The default implementation falls back to a full redraw.
    fn move_marker(&mut self, frame: &RenderFrame, _previous_row: u8) -> Result<(), Self::Error> {
        self.show(frame)
    }
}
