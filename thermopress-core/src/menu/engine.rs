//! Menu engine: transitions, selection and screen rendering

use crate::cycle::CycleTimer;
use crate::display::{Celsius, MinSec, RenderFrame, DEGREE};
use crate::heater::HeaterController;
use crate::sensor::{SensorFault, TemperatureSample, ThermocouplePair};
use crate::traits::{HeaterOutput, SensorError, TemperatureSensor};

use super::state::{step_selection, Action, MenuState};

const RULE: &str = "--------------------";
const HOME_TITLE: &str = "---- Heat press ----";
const MANUAL_TITLE: &str = "------ Manual ------";

/// Result of one sensor sample as the renderer sees it
pub type SampleResult = Result<TemperatureSample, SensorFault>;

/// Menu errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum MenuError {
    /// A press landed on a row with no entry in the transition table
    InvalidSelection {
        /// State at the time of the press
        state: MenuState,
        /// Offending row
        selection: u8,
    },
}

/// Components the menu drives, borrowed for one call
pub struct MenuContext<'a, H, A, B> {
    /// Heater authority
    pub heater: &'a mut HeaterController<H>,
    /// Cycle countdown
    pub cycle: &'a mut CycleTimer,
    /// Thermocouples
    pub sensors: &'a mut ThermocouplePair<A, B>,
}

/// The menu state machine
#[derive(Debug, Clone)]
pub struct MenuEngine {
    state: MenuState,
    selection: u8,
    needs_refresh: bool,
    frame: RenderFrame,
}

impl Default for MenuEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl MenuEngine {
    /// Create an engine sitting on the home screen
    ///
    /// Nothing is rendered until the first [`enter`](Self::enter).
    pub fn new() -> Self {
        let layout = MenuState::Home.layout();
        Self {
            state: MenuState::Home,
            selection: layout.entry_selection,
            needs_refresh: layout.needs_refresh,
            frame: RenderFrame::new(),
        }
    }

    /// Current state
    pub fn state(&self) -> MenuState {
        self.state
    }

    /// Current selection row
    pub fn selection(&self) -> u8 {
        self.selection
    }

    /// Whether the refresh tick re-renders this state
    pub fn needs_refresh(&self) -> bool {
        self.needs_refresh
    }

    /// Whether rendering this state consumes a temperature sample
    pub fn needs_sample(&self) -> bool {
        matches!(self.state, MenuState::Temps | MenuState::Cycle)
    }

    /// Last rendered frame
    pub fn frame(&self) -> &RenderFrame {
        &self.frame
    }

    /// Switch to a state and render it
    ///
    /// Resets the selection to the state's entry row and applies its
    /// refresh policy.
    pub fn enter<H, A, B>(&mut self, state: MenuState, ctx: &mut MenuContext<'_, H, A, B>) -> &RenderFrame
    where
        H: HeaterOutput,
        A: TemperatureSensor,
        B: TemperatureSensor,
    {
        if state != self.state {
            debug!("Menu {:?} -> {:?}", self.state, state);
        }
        let layout = state.layout();
        self.state = state;
        self.selection = layout.entry_selection;
        self.needs_refresh = layout.needs_refresh;
        self.render(ctx)
    }

    /// Move the selection one row
    ///
    /// Positive `delta` moves down, negative moves up; both wrap within the
    /// state's range. Only the marker row of the last frame changes.
    pub fn handle_rotate(&mut self, delta: i8) -> &RenderFrame {
        self.selection = step_selection(self.state.layout(), self.selection, delta);
        self.frame.set_selected_row(self.selection);
        trace!("Selection {}", self.selection);
        &self.frame
    }

    /// Apply the press action for the current row
    pub fn handle_press<H, A, B>(
        &mut self,
        ctx: &mut MenuContext<'_, H, A, B>,
    ) -> Result<&RenderFrame, MenuError>
    where
        H: HeaterOutput,
        A: TemperatureSensor,
        B: TemperatureSensor,
    {
        let action = self
            .state
            .action_for(self.selection)
            .ok_or(MenuError::InvalidSelection {
                state: self.state,
                selection: self.selection,
            })?;

        debug!("Press {:?}/{} -> {:?}", self.state, self.selection, action);

        let frame = match action {
            Action::StartCycle => {
                ctx.cycle.start();
                ctx.heater.turn_on();
                self.enter(MenuState::Cycle, ctx)
            }
            Action::OpenManual | Action::BackToManual => self.enter(MenuState::Manual, ctx),
            Action::OpenTemps => self.enter(MenuState::Temps, ctx),
            Action::ToggleHeater => {
                ctx.heater.toggle();
                self.enter(MenuState::Manual, ctx)
            }
            Action::GoHome => self.enter(MenuState::Home, ctx),
            Action::CancelCycle => self.complete_cycle(ctx),
        };

        Ok(frame)
    }

    /// End the cycle exactly as the cancel row does
    ///
    /// Used for both user cancel and countdown completion.
    pub fn complete_cycle<H, A, B>(&mut self, ctx: &mut MenuContext<'_, H, A, B>) -> &RenderFrame
    where
        H: HeaterOutput,
        A: TemperatureSensor,
        B: TemperatureSensor,
    {
        ctx.heater.turn_off();
        ctx.cycle.cancel();
        self.enter(MenuState::Home, ctx)
    }

    /// Render the current state, sampling sensors where the state shows them
    pub fn render<H, A, B>(&mut self, ctx: &mut MenuContext<'_, H, A, B>) -> &RenderFrame
    where
        H: HeaterOutput,
        A: TemperatureSensor,
        B: TemperatureSensor,
    {
        let sample = if self.needs_sample() {
            Some(ctx.sensors.sample())
        } else {
            None
        };
        self.render_with(ctx, sample)
    }

    /// Render the current state from an already taken sample
    ///
    /// `sample` is ignored by states that show no temperatures. A state that
    /// shows temperatures but gets `None` renders as a fault.
    pub fn render_with<H, A, B>(
        &mut self,
        ctx: &MenuContext<'_, H, A, B>,
        sample: Option<SampleResult>,
    ) -> &RenderFrame
    where
        H: HeaterOutput,
    {
        let frame = &mut self.frame;
        let missing = Err(SensorFault {
            channel: 0,
            error: SensorError::Communication,
        });

        match self.state {
            MenuState::Home => {
                frame.set_line(0, HOME_TITLE);
                frame.set_line(1, "  Start cycle");
                frame.set_line(2, "  Manual");
                frame.set_line(3, RULE);
            }
            MenuState::Manual => {
                frame.set_line(0, MANUAL_TITLE);
                frame.set_line(1, "  Temps");
                if ctx.heater.is_on() {
                    frame.set_line(2, "  Turn heater off");
                } else {
                    frame.set_line(2, "  Turn heater on");
                }
                frame.set_line(3, "  Back");
            }
            MenuState::Temps => {
                render_temps(frame, sample.unwrap_or(missing));
                frame.set_line(3, "  Back");
            }
            MenuState::Cycle => {
                render_cycle(frame, ctx.cycle, ctx.heater.is_on(), sample.unwrap_or(missing));
                frame.set_line(3, "  Cancel");
            }
        }

        frame.set_selected_row(self.selection);
        &self.frame
    }
}

fn render_temps(frame: &mut RenderFrame, sample: SampleResult) {
    match sample {
        Ok(s) => {
            frame.set_line_fmt(0, format_args!("   Temp0: {}{}C", Celsius(s.temp0_x10), DEGREE));
            frame.set_line_fmt(1, format_args!("   Temp1: {}{}C", Celsius(s.temp1_x10), DEGREE));
            frame.set_line_fmt(2, format_args!("   Avg:   {}{}C", Celsius(s.avg_x10()), DEGREE));
        }
        Err(fault) => {
            for channel in 0..2u8 {
                let reading = if fault.channel == channel { "FAULT" } else { "--" };
                frame.set_line_fmt(channel as usize, format_args!("   Temp{}: {}", channel, reading));
            }
            frame.set_line_fmt(2, format_args!("   Avg:   FAULT ch{}", fault.channel));
        }
    }
}

fn render_cycle(frame: &mut RenderFrame, cycle: &CycleTimer, heater_on: bool, sample: SampleResult) {
    match sample {
        Ok(s) => {
            let avg = s.avg_x10();
            frame.set_line_fmt(0, format_args!("  Avg: {}{}C", Celsius(avg), DEGREE));
            if cycle.at_temperature(Ok(avg)) {
                frame.set_line_fmt(1, format_args!("  Time left {}", MinSec(cycle.remaining_s())));
            } else {
                frame.set_line(1, "  Heating up...");
            }
        }
        Err(fault) => {
            frame.set_line_fmt(0, format_args!("  Avg: FAULT ch{}", fault.channel));
            frame.set_line(1, "  Sensor fault");
        }
    }

    frame.set_line(2, if heater_on { "  Heater: on" } else { "  Heater: off" });
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    struct MockOutput(bool);

    impl HeaterOutput for MockOutput {
        fn set_on(&mut self, on: bool) {
            self.0 = on;
        }

        fn is_on(&self) -> bool {
            self.0
        }
    }

    /// Sensor with a settable reading
    struct FixedSensor(Result<i16, SensorError>);

    impl TemperatureSensor for FixedSensor {
        fn read_celsius_x10(&mut self) -> Result<i16, SensorError> {
            self.0
        }
    }

    struct Rig {
        heater: HeaterController<MockOutput>,
        cycle: CycleTimer,
        sensors: ThermocouplePair<FixedSensor, FixedSensor>,
    }

    impl Rig {
        fn new(t0: Result<i16, SensorError>, t1: Result<i16, SensorError>) -> Self {
            Self {
                heater: HeaterController::new(MockOutput(false)),
                cycle: CycleTimer::new(300, 1800),
                sensors: ThermocouplePair::new(FixedSensor(t0), FixedSensor(t1), 0),
            }
        }

        fn ctx(&mut self) -> MenuContext<'_, MockOutput, FixedSensor, FixedSensor> {
            MenuContext {
                heater: &mut self.heater,
                cycle: &mut self.cycle,
                sensors: &mut self.sensors,
            }
        }
    }

    fn home(rig: &mut Rig) -> MenuEngine {
        let mut engine = MenuEngine::new();
        engine.enter(MenuState::Home, &mut rig.ctx());
        engine
    }

    #[test]
    fn test_home_screen() {
        let mut rig = Rig::new(Ok(200), Ok(200));
        let engine = home(&mut rig);
        let frame = engine.frame();
        assert_eq!(frame.line(1), "  Start cycle");
        assert_eq!(frame.line(2), "  Manual");
        assert_eq!(frame.selected_row(), 1);
        assert!(!engine.needs_refresh());
    }

    #[test]
    fn test_start_cycle() {
        let mut rig = Rig::new(Ok(1500), Ok(1500));
        let mut engine = home(&mut rig);

        engine.handle_press(&mut rig.ctx()).unwrap();

        assert_eq!(engine.state(), MenuState::Cycle);
        assert!(engine.needs_refresh());
        assert!(rig.heater.is_on());
        assert!(rig.cycle.is_active());
        assert_eq!(rig.cycle.remaining_s(), 300);
        assert_eq!(engine.frame().line(1), "  Heating up...");
        assert_eq!(engine.frame().line(3), "  Cancel");
    }

    #[test]
    fn test_cycle_shows_countdown_at_temperature() {
        let mut rig = Rig::new(Ok(1850), Ok(1900));
        let mut engine = home(&mut rig);
        let frame = engine.handle_press(&mut rig.ctx()).unwrap();
        assert_eq!(frame.line(0), "  Avg: 187.5°C");
        assert_eq!(frame.line(1), "  Time left 05:00");
        assert_eq!(frame.line(2), "  Heater: on");
    }

    #[test]
    fn test_cycle_sensor_fault_shown() {
        let mut rig = Rig::new(Ok(1900), Err(SensorError::OpenCircuit));
        let mut engine = home(&mut rig);
        let frame = engine.handle_press(&mut rig.ctx()).unwrap();
        assert_eq!(frame.line(0), "  Avg: FAULT ch1");
        assert_eq!(frame.line(1), "  Sensor fault");
    }

    #[test]
    fn test_cancel_cycle() {
        let mut rig = Rig::new(Ok(1900), Ok(1900));
        let mut engine = home(&mut rig);
        engine.handle_press(&mut rig.ctx()).unwrap();

        engine.handle_press(&mut rig.ctx()).unwrap();

        assert_eq!(engine.state(), MenuState::Home);
        assert!(!engine.needs_refresh());
        assert!(!rig.heater.is_on());
        assert!(!rig.cycle.is_active());
    }

    #[test]
    fn test_completion_matches_cancel() {
        let mut rig = Rig::new(Ok(1900), Ok(1900));
        let mut engine = home(&mut rig);
        engine.handle_press(&mut rig.ctx()).unwrap();
        let cancelled = engine.handle_press(&mut rig.ctx()).unwrap().clone();
        let cancelled_state = (engine.state(), rig.heater.is_on(), rig.cycle.is_active());

        let mut rig = Rig::new(Ok(1900), Ok(1900));
        let mut engine = home(&mut rig);
        engine.handle_press(&mut rig.ctx()).unwrap();
        let completed = engine.complete_cycle(&mut rig.ctx()).clone();

        assert_eq!(cancelled, completed);
        assert_eq!(
            cancelled_state,
            (engine.state(), rig.heater.is_on(), rig.cycle.is_active())
        );
    }

    #[test]
    fn test_manual_toggle_label() {
        let mut rig = Rig::new(Ok(200), Ok(200));
        let mut engine = home(&mut rig);

        engine.handle_rotate(1);
        engine.handle_press(&mut rig.ctx()).unwrap();
        assert_eq!(engine.state(), MenuState::Manual);
        assert_eq!(engine.frame().line(2), "  Turn heater on");

        engine.handle_rotate(1);
        let frame = engine.handle_press(&mut rig.ctx()).unwrap();
        assert_eq!(frame.line(2), "  Turn heater off");
        assert!(rig.heater.is_on());
        assert_eq!(engine.state(), MenuState::Manual);

        engine.handle_rotate(1);
        let frame = engine.handle_press(&mut rig.ctx()).unwrap();
        assert_eq!(frame.line(2), "  Turn heater on");
        assert!(!rig.heater.is_on());
    }

    #[test]
    fn test_temps_screen_and_back() {
        let mut rig = Rig::new(Ok(215), Ok(-15));
        let mut engine = home(&mut rig);
        engine.handle_rotate(1);
        engine.handle_press(&mut rig.ctx()).unwrap();
        let frame = engine.handle_press(&mut rig.ctx()).unwrap();

        assert_eq!(frame.line(0), "   Temp0: 21.5°C");
        assert_eq!(frame.line(1), "   Temp1: -1.5°C");
        assert_eq!(frame.line(2), "   Avg:   10.0°C");
        assert_eq!(frame.selected_row(), 3);
        assert!(engine.needs_refresh());

        engine.handle_press(&mut rig.ctx()).unwrap();
        assert_eq!(engine.state(), MenuState::Manual);
        assert!(!engine.needs_refresh());
    }

    #[test]
    fn test_temps_fault_screen() {
        let mut rig = Rig::new(Err(SensorError::ShortCircuit), Ok(200));
        let mut engine = home(&mut rig);
        engine.enter(MenuState::Temps, &mut rig.ctx());
        let frame = engine.frame();
        assert_eq!(frame.line(0), "   Temp0: FAULT");
        assert_eq!(frame.line(1), "   Temp1: --");
        assert_eq!(frame.line(2), "   Avg:   FAULT ch0");
    }

    #[test]
    fn test_rotate_only_moves_marker() {
        let mut rig = Rig::new(Ok(200), Ok(200));
        let mut engine = home(&mut rig);
        let before = engine.frame().clone();
        let after = engine.handle_rotate(-1);
        assert_eq!(after.selected_row(), 2);
        for row in 0..4 {
            assert_eq!(after.line(row), before.line(row));
        }
    }

    #[test]
    fn test_invalid_selection() {
        let mut rig = Rig::new(Ok(200), Ok(200));
        let mut engine = home(&mut rig);
        engine.selection = 0;
        assert_eq!(
            engine.handle_press(&mut rig.ctx()),
            Err(MenuError::InvalidSelection {
                state: MenuState::Home,
                selection: 0,
            })
        );
        assert!(!rig.heater.is_on());
    }

    proptest! {
        #[test]
        fn prop_selection_in_bounds_after_rotations(
            path in prop::collection::vec(0u8..3, 0..8),
            turns in prop::collection::vec(prop::bool::ANY, 0..40),
        ) {
            let mut rig = Rig::new(Ok(1900), Ok(1900));
            let mut engine = home(&mut rig);

            // Walk the menu with presses on arbitrary rows first
            for extra in path {
                for _ in 0..extra {
                    engine.handle_rotate(1);
                }
                prop_assert!(engine.handle_press(&mut rig.ctx()).is_ok());
            }

            for down in turns {
                let marked = engine.handle_rotate(if down { 1 } else { -1 }).selected_row();
                prop_assert_eq!(marked, engine.selection());
                prop_assert!(engine.state().is_selectable(engine.selection()));
            }
        }
    }
}
