//! Push button classification
//!
//! Turns the raw button level into single, double and long presses.
//! A single press is only reported once the double-press window has run
//! out, so a double press never also yields a single one.

use super::events::InputEvent;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Idle,
    /// Button down since `since`, after `clicks` completed clicks
    Down { since: u64, clicks: u8 },
    /// First click released at `at`, waiting for a second
    Up { at: u64 },
    /// Long press reported, waiting for release
    Held,
}

/// Debounced button with press pattern detection
#[derive(Debug, Clone)]
pub struct ButtonClassifier {
    debounce_ms: u64,
    long_press_ms: u64,
    double_press_ms: u64,
    raw: bool,
    raw_since: u64,
    stable: bool,
    phase: Phase,
}

impl ButtonClassifier {
    /// Create a classifier for a released button
    pub const fn new(debounce_ms: u32, long_press_ms: u32, double_press_ms: u32) -> Self {
        Self {
            debounce_ms: debounce_ms as u64,
            long_press_ms: long_press_ms as u64,
            double_press_ms: double_press_ms as u64,
            raw: false,
            raw_since: 0,
            stable: false,
            phase: Phase::Idle,
        }
    }

    /// Feed the current button level (`true` = pressed)
    pub fn update(&mut self, now_ms: u64, pressed: bool) -> Option<InputEvent> {
        if pressed != self.raw {
            self.raw = pressed;
            self.raw_since = now_ms;
        }

        let edge = if self.raw != self.stable
            && now_ms.saturating_sub(self.raw_since) >= self.debounce_ms
        {
            self.stable = self.raw;
            Some(self.stable)
        } else {
            None
        };

        match (self.phase, edge) {
            (Phase::Idle, Some(true)) => {
                self.phase = Phase::Down {
                    since: now_ms,
                    clicks: 0,
                };
                None
            }
            (Phase::Up { .. }, Some(true)) => {
                self.phase = Phase::Down {
                    since: now_ms,
                    clicks: 1,
                };
                None
            }
            (Phase::Down { clicks, .. }, Some(false)) => {
                if clicks >= 1 {
                    self.phase = Phase::Idle;
                    Some(InputEvent::DoublePress)
                } else {
                    self.phase = Phase::Up { at: now_ms };
                    None
                }
            }
            (Phase::Down { since, .. }, None)
                if now_ms.saturating_sub(since) >= self.long_press_ms =>
            {
                self.phase = Phase::Held;
                Some(InputEvent::LongPress)
            }
            (Phase::Up { at }, None) if now_ms.saturating_sub(at) >= self.double_press_ms => {
                self.phase = Phase::Idle;
                Some(InputEvent::Press)
            }
            (Phase::Held, Some(false)) => {
                self.phase = Phase::Idle;
                None
            }
            _ => None,
        }
    }

    /// Check if the debounced button is down
    pub fn is_pressed(&self) -> bool {
        self.stable
    }
}
