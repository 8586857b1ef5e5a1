//! # Logical Actions
//!
//! The closed set of things a controller input can be bound to.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// A logical action a binding resolves to.
///
/// The display name is also the persisted name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ActionName {
    LeftClick,
    RightClick,
    MiddleClick,
    /// Toggles a held left button
    DragToggle,
    ScrollUp,
    ScrollDown,
    WindowsKey,
    EnterKey,
    TabKey,
    CloseApp,
}

impl ActionName {
    /// Every action, in display order.
    pub const ALL: [ActionName; 10] = [
        ActionName::LeftClick,
        ActionName::RightClick,
        ActionName::MiddleClick,
        ActionName::DragToggle,
        ActionName::ScrollUp,
        ActionName::ScrollDown,
        ActionName::WindowsKey,
        ActionName::EnterKey,
        ActionName::TabKey,
        ActionName::CloseApp,
    ];

    /// Display and persisted name.
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            ActionName::LeftClick => "Left Click",
            ActionName::RightClick => "Right Click",
            ActionName::MiddleClick => "Middle Click",
            ActionName::DragToggle => "Hold Click (Drag)",
            ActionName::ScrollUp => "Scroll Up",
            ActionName::ScrollDown => "Scroll Down",
            ActionName::WindowsKey => "Windows Key",
            ActionName::EnterKey => "Enter Key",
            ActionName::TabKey => "Tab Key",
            ActionName::CloseApp => "Close App",
        }
    }

    /// Continuous actions run every tick while their button is held and are
    /// never passed to the discrete dispatcher.
    #[must_use]
    pub fn is_continuous(&self) -> bool {
        matches!(self, ActionName::ScrollUp | ActionName::ScrollDown)
    }
}

impl fmt::Display for ActionName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Error returned for an unknown action name.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown action: {0:?}")]
pub struct UnknownActionError(pub String);

impl FromStr for ActionName {
    type Err = UnknownActionError;

    /// Parses a display name. Matching ignores case and surrounding spaces.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        ActionName::ALL
            .into_iter()
            .find(|action| action.label().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| UnknownActionError(s.to_string()))
    }
}
