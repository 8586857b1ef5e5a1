//! # Control Module
//!
//! Everything that drives the engine from outside the tick:
//!
//! - [`Command`]s from a front end (assignment, speeds, autostart)
//! - [`Signal`]s from background tasks (`Show`, `RequestExit`)
//! - The fixed-cadence [`scheduler::Scheduler`]
//! - The main loop in [`runner`]
//! - A line-based stdin [`console`]
//!
//! Commands and signals travel over one-way unbounded channels and are
//! drained by the loop at the start of each tick, so the engine is never
//! mutated concurrently with a tick.

pub mod console;
pub mod runner;
pub mod scheduler;

pub use runner::run_loop;
pub use scheduler::Scheduler;

use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};

use crate::mapping::ActionName;

/// Front-end requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    StartAssignment(ActionName),
    CancelAssignment,
    /// Clamped into 5..=100
    SetSpeed(i64),
    /// Clamped into 1..=50
    SetScrollSpeed(i64),
    SetAutostart(bool),
}

/// Background signals. Repeats have no effect beyond the first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Signal {
    Show,
    RequestExit,
}

/// Sending half, cloneable into any task.
#[derive(Debug, Clone)]
pub struct ControlHandle {
    commands: UnboundedSender<Command>,
    signals: UnboundedSender<Signal>,
}

impl ControlHandle {
    /// Returns `false` once the loop has stopped.
    pub fn send_command(&self, command: Command) -> bool {
        self.commands.send(command).is_ok()
    }

    /// Returns `false` once the loop has stopped.
    pub fn send_signal(&self, signal: Signal) -> bool {
        self.signals.send(signal).is_ok()
    }
}

/// Receiving half, owned by the loop.
#[derive(Debug)]
pub struct ControlInbox {
    commands: UnboundedReceiver<Command>,
    signals: UnboundedReceiver<Signal>,
}

impl ControlInbox {
    /// Everything queued right now, without waiting.
    pub fn drain_commands(&mut self) -> Vec<Command> {
        let mut drained = Vec::new();
        while let Ok(command) = self.commands.try_recv() {
            drained.push(command);
        }
        drained
    }

    /// Everything queued right now, without waiting.
    pub fn drain_signals(&mut self) -> Vec<Signal> {
        let mut drained = Vec::new();
        while let Ok(signal) = self.signals.try_recv() {
            drained.push(signal);
        }
        drained
    }
}

/// Creates a connected handle/inbox pair.
#[must_use]
pub fn channel() -> (ControlHandle, ControlInbox) {
    let (command_tx, command_rx) = mpsc::unbounded_channel();
    let (signal_tx, signal_rx) = mpsc::unbounded_channel();
    (
        ControlHandle {
            commands: command_tx,
            signals: signal_tx,
        },
        ControlInbox {
            commands: command_rx,
            signals: signal_rx,
        },
    )
}
