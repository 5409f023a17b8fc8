//! Rotary encoder decoding
//!
//! Rotation is read from the clock line A and the direction line B. On every
//! change of A, B differing from A means one detent down, B equal to A means
//! one detent up. After an accepted edge further changes are absorbed until
//! the settle window has passed; the loop never blocks while waiting.

use super::events::InputEvent;

/// Edge detector with a timestamp settle window
#[derive(Debug, Clone)]
pub struct RotaryDecoder {
    settle_ms: u64,
    last_clk: Option<bool>,
    last_edge_ms: Option<u64>,
    glitches: u32,
}

impl RotaryDecoder {
    /// Create a decoder
    ///
    /// The first sample only establishes the clock level.
    pub const fn new(settle_ms: u32) -> Self {
        Self {
            settle_ms: settle_ms as u64,
            last_clk: None,
            last_edge_ms: None,
            glitches: 0,
        }
    }

    /// Feed the current line levels
    ///
    /// Returns a rotation event when an edge on A is accepted.
    pub fn update(&mut self, now_ms: u64, clk: bool, dt: bool) -> Option<InputEvent> {
        let previous = self.last_clk.replace(clk)?;
        if previous == clk {
            return None;
        }

        if let Some(last) = self.last_edge_ms {
            if now_ms.saturating_sub(last) < self.settle_ms {
                self.glitches = self.glitches.wrapping_add(1);
                trace!("Encoder edge absorbed ({} total)", self.glitches);
                return None;
            }
        }

        self.last_edge_ms = Some(now_ms);

        if dt != clk {
            Some(InputEvent::RotateDown)
        } else {
            Some(InputEvent::RotateUp)
        }
    }

    /// Number of edges absorbed by the settle window
    pub fn glitches(&self) -> u32 {
        self.glitches
    }
}
