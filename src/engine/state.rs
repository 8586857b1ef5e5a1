//! Engine state owned by the tick loop.

use std::fmt;

use crate::mapping::ActionName;

/// Whether discrete events are dispatched or captured as a new binding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    #[default]
    Normal,
    /// The next classified identifier is bound to `pending`.
    Awaiting { pending: ActionName },
}

impl Mode {
    #[must_use]
    pub fn is_awaiting(&self) -> bool {
        matches!(self, Mode::Awaiting { .. })
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mode::Normal => write!(f, "normal"),
            Mode::Awaiting { pending } => write!(f, "awaiting input for {}", pending),
        }
    }
}

/// Tick-counted debounce window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Cooldown {
    remaining: u32,
}

impl Cooldown {
    /// Decrements by one tick, stopping at zero.
    pub fn tick(&mut self) {
        self.remaining = self.remaining.saturating_sub(1);
    }

    /// Starts a new window of `ticks`, replacing any remaining one.
    pub fn set(&mut self, ticks: u32) {
        self.remaining = ticks;
    }

    #[must_use]
    pub fn remaining(&self) -> u32 {
        self.remaining
    }

    #[must_use]
    pub fn is_active(&self) -> bool {
        self.remaining > 0
    }
}

/// The single mutable record the tick loop threads through every stage.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EngineState {
    pub mode: Mode,
    pub cooldown: Cooldown,
    /// Left button held down by the drag toggle.
    pub drag_active: bool,
}

impl EngineState {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}
