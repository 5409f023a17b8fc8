//! Polling loop
//!
//! One `poll` is one loop iteration: input first, then the refresh tick.
//! Nothing here blocks; debounce and timing are all timestamp based.

use crate::config::PressConfig;
use crate::cycle::{CycleState, CycleTimer};
use crate::display::RenderFrame;
use crate::heater::HeaterController;
use crate::input::{ButtonClassifier, InputEvent, RotaryDecoder};
use crate::menu::{MenuContext, MenuEngine, MenuState};
use crate::safety::{SafetyMonitor, SafetyStatus};
use crate::sensor::ThermocouplePair;
use crate::traits::{DisplaySink, HeaterOutput, InputSource, SensorError, TemperatureSensor};

/// Components the menu acts on
struct Plant<H, A, B> {
    heater: HeaterController<H>,
    cycle: CycleTimer,
    sensors: ThermocouplePair<A, B>,
}

impl<H, A, B> Plant<H, A, B> {
    fn ctx(&mut self) -> MenuContext<'_, H, A, B> {
        MenuContext {
            heater: &mut self.heater,
            cycle: &mut self.cycle,
            sensors: &mut self.sensors,
        }
    }
}

/// Top-level controller
///
/// Owns every component. Call [`start`](Self::start) once, then
/// [`poll`](Self::poll) as often as possible with a monotonic millisecond
/// timestamp.
pub struct Scheduler<H, A, B, D, I> {
    config: PressConfig,
    engine: MenuEngine,
    plant: Plant<H, A, B>,
    display: D,
    input: I,
    rotary: RotaryDecoder,
    button: ButtonClassifier,
    safety: SafetyMonitor,
    last_refresh_ms: u64,
    display_errors: u32,
    safety_trips: u32,
}

impl<H, A, B, D, I> Scheduler<H, A, B, D, I>
where
    H: HeaterOutput,
    A: TemperatureSensor,
    B: TemperatureSensor,
    D: DisplaySink,
    I: InputSource,
{
    /// Assemble the controller; the heater output is driven off here
    pub fn new(config: PressConfig, heater: H, sensor0: A, sensor1: B, display: D, input: I) -> Self {
        Self {
            engine: MenuEngine::new(),
            plant: Plant {
                heater: HeaterController::new(heater),
                cycle: CycleTimer::new(config.cycle_duration_s, config.melting_threshold_x10()),
                sensors: ThermocouplePair::new(sensor0, sensor1, config.sensor_retries),
            },
            display,
            input,
            rotary: RotaryDecoder::new(config.settle_ms),
            button: ButtonClassifier::new(
                config.button_debounce_ms,
                config.long_press_ms,
                config.double_press_ms,
            ),
            safety: SafetyMonitor::new(&config),
            last_refresh_ms: 0,
            display_errors: 0,
            safety_trips: 0,
            config,
        }
    }

    /// Show the home screen and start the refresh clock
    pub fn start(&mut self, now_ms: u64) {
        info!("Press controller starting");
        self.last_refresh_ms = now_ms;
        let frame = self.engine.enter(MenuState::Home, &mut self.plant.ctx());
        let result = self.display.show(frame);
        self.check_display(result);
    }

    /// Run one loop iteration
    pub fn poll(&mut self, now_ms: u64) {
        let levels = self.input.read();

        if let Some(event) = self.rotary.update(now_ms, levels.clk, levels.dt) {
            self.dispatch(event);
        }
        if let Some(event) = self.button.update(now_ms, levels.button) {
            self.dispatch(event);
        }

        let interval = u64::from(self.config.refresh_interval_ms);
        if now_ms >= self.last_refresh_ms.saturating_add(interval) {
            // Catch up one interval per poll, as a fixed-rate clock
            self.last_refresh_ms += interval;
            self.refresh();
        }
    }

    /// Apply one input event
    pub fn dispatch(&mut self, event: InputEvent) {
        match event {
            InputEvent::RotateUp | InputEvent::RotateDown => {
                let previous = self.engine.frame().selected_row();
                let frame = self.engine.handle_rotate(event.rotation_delta());
                let result = self.display.move_marker(frame, previous);
                self.check_display(result);
            }
            InputEvent::Press => {
                let display = &mut self.display;
                let outcome = self
                    .engine
                    .handle_press(&mut self.plant.ctx())
                    .map(|frame| display.show(frame));

                match outcome {
                    Ok(result) => self.check_display(result),
                    Err(e) => {
                        error!("Menu fault: {:?}", e);
                        self.end_cycle();
                    }
                }
            }
            InputEvent::DoublePress | InputEvent::LongPress => {
                debug!("Ignoring {:?}", event);
            }
        }
    }

    /// Periodic tick: safety, cycle countdown, live redraw
    fn refresh(&mut self) {
        let heater_on = self.plant.heater.is_on();
        let redraw = self.engine.needs_refresh();

        if !redraw && !self.safety.wants_sample(heater_on) {
            return;
        }

        let sample = self.plant.sensors.sample();

        if let SafetyStatus::Trip(reason) = self.safety.evaluate(heater_on, &sample) {
            error!("Safety trip: {:?}", reason);
            self.safety_trips = self.safety_trips.wrapping_add(1);

            if self.engine.state() == MenuState::Cycle {
                self.end_cycle();
                return;
            }

            self.plant.heater.turn_off();
            // Manual carries the heater label and must show the new state
            if !redraw {
                let frame = self.engine.render(&mut self.plant.ctx());
                let result = self.display.show(frame);
                self.check_display(result);
                return;
            }
        }

        if !redraw {
            return;
        }

        if self.engine.state() == MenuState::Cycle {
            let avg = sample.map(|s| s.avg_x10()).map_err(SensorError::from);
            if self.plant.cycle.advance(avg).is_some() {
                self.end_cycle();
                return;
            }
        }

        let frame = self.engine.render_with(&self.plant.ctx(), Some(sample));
        let result = self.display.show(frame);
        self.check_display(result);
    }

    /// Heater off, cycle stopped, home screen
    fn end_cycle(&mut self) {
        let frame = self.engine.complete_cycle(&mut self.plant.ctx());
        let result = self.display.show(frame);
        self.check_display(result);
    }

    fn check_display(&mut self, result: Result<(), D::Error>) {
        if result.is_err() {
            self.display_errors = self.display_errors.wrapping_add(1);
            warn!("Display update failed ({} total)", self.display_errors);
        }
    }

    /// Current menu state
    pub fn state(&self) -> MenuState {
        self.engine.state()
    }

    /// Current selection row
    pub fn selection(&self) -> u8 {
        self.engine.selection()
    }

    /// Last rendered frame
    pub fn frame(&self) -> &RenderFrame {
        self.engine.frame()
    }

    /// Check if the heater is on
    pub fn heater_on(&self) -> bool {
        self.plant.heater.is_on()
    }

    /// Countdown state
    pub fn cycle_state(&self) -> CycleState {
        self.plant.cycle.state()
    }

    /// Get access to the display
    pub fn display(&self) -> &D {
        &self.display
    }

    /// Get access to the heater output
    pub fn heater_output(&self) -> &H {
        self.plant.heater.output()
    }

    /// Encoder edges absorbed by the settle window
    pub fn glitches(&self) -> u32 {
        self.rotary.glitches()
    }

    /// Failed display writes since start
    pub fn display_errors(&self) -> u32 {
        self.display_errors
    }

    /// Safety trips since start
    pub fn safety_trips(&self) -> u32 {
        self.safety_trips
    }
}
