//! # Engine Module
//!
//! The real-time core. One [`Engine::tick`] per scheduler period:
//!
//! ```text
//! cooldown tick ─▶ refresh devices ─▶ (no device? publish status, stop)
//!                        │
//!                        ▼
//!     poll events ─▶ classify ─▶ Awaiting? ─yes─▶ capture + bind + persist
//!                                    │no
//!                                    ▼
//!                         resolve ─▶ dispatch (cooldown gated)
//!                        │
//!                        ▼
//!     analog driver (pointer + held scroll) ─▶ publish status
//! ```
//!
//! All engine state is owned by [`Engine`] and only mutated from the thread
//! calling `tick`, `handle_command` and `handle_signal`.

pub mod analog;
pub mod assignment;
pub mod dispatcher;
pub mod state;
pub mod status;

pub use dispatcher::DispatchOutcome;
pub use state::{Cooldown, EngineState, Mode};
pub use status::StatusSnapshot;

use tracing::{debug, info, warn};

use crate::config::Config;
use crate::control::{Command, Signal};
use crate::controller::axis::DEFAULT_DEADZONE;
use crate::controller::{classify, DeviceEnumerator, InputBackend, InputIdentifier};
use crate::mapping::MappingTable;
use crate::output::OutputSink;
use crate::store::{AutostartRegistrar, Settings, SettingsSink, SettingsSnapshot};
use assignment::DEFAULT_ASSIGNMENT_COOLDOWN_TICKS;
use dispatcher::DEFAULT_DISPATCH_COOLDOWN_TICKS;

/// Timing constants of the engine.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tuning {
    pub dispatch_cooldown_ticks: u32,
    pub assignment_cooldown_ticks: u32,
    pub deadzone: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            dispatch_cooldown_ticks: DEFAULT_DISPATCH_COOLDOWN_TICKS,
            assignment_cooldown_ticks: DEFAULT_ASSIGNMENT_COOLDOWN_TICKS,
            deadzone: DEFAULT_DEADZONE,
        }
    }
}

impl From<&Config> for Tuning {
    fn from(config: &Config) -> Self {
        Self {
            dispatch_cooldown_ticks: config.engine.dispatch_cooldown_ticks,
            assignment_cooldown_ticks: config.engine.assignment_cooldown_ticks,
            deadzone: config.analog.deadzone,
        }
    }
}

/// Whether the loop keeps running after a tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    Continue,
    Exit,
}

/// Polling and dispatch engine
pub struct Engine {
    state: EngineState,
    table: MappingTable,
    settings: Settings,
    enumerator: DeviceEnumerator,
    status: StatusSnapshot,
    tuning: Tuning,
    store: Box<dyn SettingsSink>,
    autostart: Box<dyn AutostartRegistrar>,
    exiting: bool,
}

impl Engine {
    /// Creates an engine from the persisted snapshot.
    pub fn new(
        snapshot: SettingsSnapshot,
        tuning: Tuning,
        store: Box<dyn SettingsSink>,
        autostart: Box<dyn AutostartRegistrar>,
    ) -> Self {
        let mut engine = Self {
            state: EngineState::new(),
            table: MappingTable::from_entries(snapshot.mapping),
            settings: snapshot.settings,
            enumerator: DeviceEnumerator::new(),
            status: StatusSnapshot::default(),
            tuning,
            store,
            autostart,
            exiting: false,
        };
        engine.refresh_status();
        engine
    }

    /// Runs one iteration of the polling loop.
    pub fn tick(&mut self, backend: &mut dyn InputBackend, output: &mut dyn OutputSink) -> TickOutcome {
        if self.exiting {
            return TickOutcome::Exit;
        }

        self.state.cooldown.tick();
        self.enumerator.refresh_if_changed(backend);

        if self.enumerator.count() == 0 {
            self.refresh_status();
            return TickOutcome::Continue;
        }

        for event in backend.poll_events() {
            let Some(identifier) = classify(&event) else {
                continue;
            };
            if self.handle_identifier(identifier, output) == TickOutcome::Exit {
                self.exiting = true;
                self.refresh_status();
                return TickOutcome::Exit;
            }
        }

        analog::drive(
            &*backend,
            output,
            &self.table,
            &self.settings,
            self.enumerator.devices(),
            self.tuning.deadzone,
        );

        self.refresh_status();
        TickOutcome::Continue
    }

    fn handle_identifier(&mut self, identifier: InputIdentifier, output: &mut dyn OutputSink) -> TickOutcome {
        debug!("Input {}", identifier);
        self.status.last_identifier = Some(identifier);

        if self.state.mode.is_awaiting() {
            let bound = assignment::capture(
                &mut self.state,
                &mut self.table,
                identifier,
                self.tuning.assignment_cooldown_ticks,
            );
            if bound.is_some() {
                self.persist();
            }
            return TickOutcome::Continue;
        }

        let Some(action) = self.table.resolve(&identifier) else {
            return TickOutcome::Continue;
        };

        match dispatcher::dispatch(
            &mut self.state,
            output,
            action,
            self.tuning.dispatch_cooldown_ticks,
        ) {
            DispatchOutcome::Dispatched => {
                self.status.last_action = Some(action);
                TickOutcome::Continue
            }
            DispatchOutcome::Refused => TickOutcome::Continue,
            DispatchOutcome::Exit => {
                info!("{} requested", action);
                self.status.last_action = Some(action);
                TickOutcome::Exit
            }
        }
    }

    /// Applies a front-end command.
    pub fn handle_command(&mut self, command: Command) {
        match command {
            Command::StartAssignment(action) => assignment::start_assignment(&mut self.state, action),
            Command::CancelAssignment => {
                assignment::cancel_assignment(&mut self.state);
            }
            Command::SetSpeed(speed) => {
                let before = self.settings.speed();
                let stored = self.settings.set_speed(speed);
                if stored != before {
                    info!("Pointer speed set to {}", stored);
                    self.persist();
                }
            }
            Command::SetScrollSpeed(speed) => {
                let before = self.settings.scroll_speed();
                let stored = self.settings.set_scroll_speed(speed);
                if stored != before {
                    info!("Scroll speed set to {}", stored);
                    self.persist();
                }
            }
            Command::SetAutostart(enabled) => match self.autostart.set_enabled(enabled) {
                Ok(()) => {
                    if self.settings.autostart != enabled {
                        self.settings.autostart = enabled;
                        self.persist();
                    }
                }
                Err(e) => warn!("Failed to change autostart: {}", e),
            },
        }
        self.refresh_status();
    }

    /// Applies a background signal. Repeated signals have no further effect.
    pub fn handle_signal(&mut self, signal: Signal, output: &mut dyn OutputSink) -> TickOutcome {
        match signal {
            Signal::Show => {
                if !self.status.visible {
                    info!("Show requested");
                    self.status.visible = true;
                }
            }
            Signal::RequestExit => {
                if !self.exiting {
                    info!("Exit requested");
                    self.exiting = true;
                    dispatcher::release_mouse(&mut self.state, output);
                }
            }
        }
        self.refresh_status();

        if self.exiting {
            TickOutcome::Exit
        } else {
            TickOutcome::Continue
        }
    }

    /// Releases held output. Safe to call more than once.
    pub fn shutdown(&mut self, output: &mut dyn OutputSink) {
        if self.state.drag_active || !self.exiting {
            dispatcher::release_mouse(&mut self.state, output);
        }
        self.exiting = true;
        self.refresh_status();
    }

    #[must_use]
    pub fn status(&self) -> &StatusSnapshot {
        &self.status
    }

    #[must_use]
    pub fn state(&self) -> &EngineState {
        &self.state
    }

    #[must_use]
    pub fn table(&self) -> &MappingTable {
        &self.table
    }

    #[must_use]
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    #[must_use]
    pub fn is_exiting(&self) -> bool {
        self.exiting
    }

    fn persist(&self) {
        self.store
            .submit(SettingsSnapshot::capture(&self.table, &self.settings));
    }

    fn refresh_status(&mut self) {
        self.status.connected_devices = self.enumerator.count();
        self.status.mode = self.state.mode;
        self.status.drag_active = self.state.drag_active;
        self.status.settings = self.settings;
        self.status.bindings = self.table.iter().copied().collect();
    }
}
