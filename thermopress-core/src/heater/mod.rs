//! Heater controller
//!
//! Single authority over the heater output. The heater is binary: no
//! closed-loop regulation happens here, only explicit on/off requests from
//! the menu, the cycle completion path and the safety monitor.

use crate::traits::HeaterOutput;

/// Owns the heater output and keeps it in step with the logical state
pub struct HeaterController<H> {
    output: H,
    on: bool,
}

impl<H: HeaterOutput> HeaterController<H> {
    /// Take ownership of the output and force it off
    pub fn new(mut output: H) -> Self {
        output.set_on(false);
        Self { output, on: false }
    }

    /// Switch the heater on
    pub fn turn_on(&mut self) {
        self.set(true);
    }

    /// Switch the heater off
    pub fn turn_off(&mut self) {
        self.set(false);
    }

    /// Invert the heater state, returning the new state
    pub fn toggle(&mut self) -> bool {
        self.set(!self.on);
        self.on
    }

    /// Check if the heater is on
    pub fn is_on(&self) -> bool {
        self.on
    }

    /// Get access to the underlying output
    pub fn output(&self) -> &H {
        &self.output
    }

    fn set(&mut self, on: bool) {
        if on != self.on {
            info!("Heater {}", if on { "on" } else { "off" });
        }
        self.on = on;
        // Written even when unchanged so the pin cannot drift from `on`
        self.output.set_on(on);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Mock output recording every write
    struct MockOutput {
        on: bool,
        writes: u32,
    }

    impl HeaterOutput for MockOutput {
        fn set_on(&mut self, on: bool) {
            self.on = on;
            self.writes += 1;
        }

        fn is_on(&self) -> bool {
            self.on
        }
    }

    fn controller() -> HeaterController<MockOutput> {
        HeaterController::new(MockOutput {
            on: true,
            writes: 0,
        })
    }

    #[test]
    fn test_starts_off() {
        let heater = controller();
        assert!(!heater.is_on());
        assert!(!heater.output().is_on());
        assert_eq!(heater.output().writes, 1);
    }

    #[test]
    fn test_on_off() {
        let mut heater = controller();

        heater.turn_on();
        assert!(heater.is_on());
        assert!(heater.output().is_on());

        heater.turn_off();
        assert!(!heater.is_on());
        assert!(!heater.output().is_on());
    }

    #[test]
    fn test_toggle() {
        let mut heater = controller();

        assert!(heater.toggle());
        assert!(heater.output().is_on());

        assert!(!heater.toggle());
        assert!(!heater.output().is_on());
    }

    #[test]
    fn test_idempotent_off() {
        let mut heater = controller();
        heater.turn_off();
        heater.turn_off();
        assert!(!heater.is_on());
        assert!(!heater.output().is_on());
    }
}
