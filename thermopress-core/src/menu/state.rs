//! Menu states and the press transition table
//!
//! Every state owns a fixed row range the marker may occupy. The press
//! table below is the only place that decides what a button press does.

/// Menu states
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum MenuState {
    /// Top level: start a cycle or open the manual menu
    Home,
    /// Manual control: temperatures, heater toggle, back
    Manual,
    /// Live temperature readout
    Temps,
    /// Cycle in progress
    Cycle,
}

/// Static properties of a menu state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Layout {
    /// First selectable row
    pub sel_min: u8,
    /// Last selectable row
    pub sel_max: u8,
    /// Row selected on entry
    pub entry_selection: u8,
    /// Whether the screen is re-rendered on every refresh tick
    pub needs_refresh: bool,
}

/// What a press does in a given state and row
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Action {
    /// Reset the cycle, heater on, show the cycle screen
    StartCycle,
    /// Show the manual menu
    OpenManual,
    /// Show the temperature readout
    OpenTemps,
    /// Flip the heater and redraw the manual menu
    ToggleHeater,
    /// Return to the home menu
    GoHome,
    /// Leave the readout for the manual menu
    BackToManual,
    /// Heater off, cycle stopped, back to home
    CancelCycle,
}

impl MenuState {
    /// Row range, entry row and refresh policy
    pub const fn layout(self) -> Layout {
        match self {
            MenuState::Home => Layout {
                sel_min: 1,
                sel_max: 2,
                entry_selection: 1,
                needs_refresh: false,
            },
            MenuState::Manual => Layout {
                sel_min: 1,
                sel_max: 3,
                entry_selection: 1,
                needs_refresh: false,
            },
            MenuState::Temps => Layout {
                sel_min: 3,
                sel_max: 3,
                entry_selection: 3,
                needs_refresh: true,
            },
            MenuState::Cycle => Layout {
                sel_min: 3,
                sel_max: 3,
                entry_selection: 3,
                needs_refresh: true,
            },
        }
    }

    /// Check if a row is selectable in this state
    pub fn is_selectable(self, row: u8) -> bool {
        let layout = self.layout();
        (layout.sel_min..=layout.sel_max).contains(&row)
    }

    /// Look up the press action for a row
    ///
    /// `None` means the row is not selectable here, which the engine
    /// treats as a logic fault.
    pub fn action_for(self, selection: u8) -> Option<Action> {
        use Action::*;
        use MenuState::*;

        match (self, selection) {
            (Home, 1) => Some(StartCycle),
            (Home, 2) => Some(OpenManual),

            (Manual, 1) => Some(OpenTemps),
            (Manual, 2) => Some(ToggleHeater),
            (Manual, 3) => Some(GoHome),

            (Temps, 3) => Some(BackToManual),

            (Cycle, 3) => Some(CancelCycle),

            _ => None,
        }
    }
}

/// Step a selection one row, wrapping at the ends of the range
pub fn step_selection(layout: Layout, selection: u8, delta: i8) -> u8 {
    if delta > 0 {
        if selection >= layout.sel_max {
            layout.sel_min
        } else {
            selection + 1
        }
    } else if delta < 0 {
        if selection <= layout.sel_min {
            layout.sel_max
        } else {
            selection - 1
        }
    } else {
        selection
    }
}
