//! # Input Events and Identifiers
//!
//! [`InputEvent`] is what a backend reports for one tick: a button edge or a
//! hat direction change on a given device. [`InputIdentifier`] is the stable
//! key derived from an event, used to look up bindings.
//!
//! ## Text Encoding
//!
//! Identifiers are persisted as short strings:
//!
//! | Identifier | Text |
//! |------------|------|
//! | Button 3 on device 0 | `ID0_BTN3` |
//! | Hat up on device 1 | `ID1_HAT(0, 1)` |
//!
//! ```
//! use gamepad_mouse::controller::InputIdentifier;
//!
//! let id: InputIdentifier = "ID0_BTN3".parse()?;
//! assert_eq!(id, InputIdentifier::button(0, 3));
//! assert_eq!(id.to_string(), "ID0_BTN3");
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// Direction reported by a hat (d-pad), with `y = 1` meaning up.
///
/// `(0, 0)` is the centered (released) position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct HatDirection {
    /// -1 = left, 0 = center, 1 = right
    pub x: i8,
    /// -1 = down, 0 = center, 1 = up
    pub y: i8,
}

impl HatDirection {
    /// Centered hat.
    pub const CENTER: HatDirection = HatDirection { x: 0, y: 0 };

    #[must_use]
    pub const fn new(x: i8, y: i8) -> Self {
        Self { x, y }
    }

    /// True for `(0, 0)`.
    #[must_use]
    pub fn is_center(&self) -> bool {
        self.x == 0 && self.y == 0
    }
}

impl fmt::Display for HatDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// One raw input change observed during a tick.
///
/// Produced fresh every tick by an [`InputBackend`](super::InputBackend) and
/// never retained.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputEvent {
    /// A button went down (`pressed = true`) or up.
    Button {
        device: usize,
        button: u16,
        pressed: bool,
    },
    /// A hat moved to a new direction (including back to center).
    Hat {
        device: usize,
        hat: u8,
        direction: HatDirection,
    },
}

impl InputEvent {
    /// Index of the device the event came from.
    #[must_use]
    pub fn device(&self) -> usize {
        match self {
            InputEvent::Button { device, .. } | InputEvent::Hat { device, .. } => *device,
        }
    }
}

/// Stable key for one physical control on one device.
///
/// Equality and hashing are structural. The same button on a controller that
/// reconnects at the same device index produces the same identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum InputIdentifier {
    /// A button, by its index on the device.
    Button { device: usize, button: u16 },
    /// A non-centered hat direction.
    Hat { device: usize, direction: HatDirection },
}

impl InputIdentifier {
    #[must_use]
    pub const fn button(device: usize, button: u16) -> Self {
        InputIdentifier::Button { device, button }
    }

    #[must_use]
    pub const fn hat(device: usize, x: i8, y: i8) -> Self {
        InputIdentifier::Hat {
            device,
            direction: HatDirection::new(x, y),
        }
    }

    #[must_use]
    pub fn device(&self) -> usize {
        match self {
            InputIdentifier::Button { device, .. } | InputIdentifier::Hat { device, .. } => *device,
        }
    }

    /// Button index when this identifier denotes a button.
    #[must_use]
    pub fn as_button(&self) -> Option<u16> {
        match self {
            InputIdentifier::Button { button, .. } => Some(*button),
            InputIdentifier::Hat { .. } => None,
        }
    }
}

impl fmt::Display for InputIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InputIdentifier::Button { device, button } => write!(f, "ID{}_BTN{}", device, button),
            InputIdentifier::Hat { device, direction } => write!(f, "ID{}_HAT{}", device, direction),
        }
    }
}

/// Error returned when identifier text cannot be parsed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid input identifier: {0:?}")]
pub struct ParseIdentifierError(pub String);

impl FromStr for InputIdentifier {
    type Err = ParseIdentifierError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ParseIdentifierError(s.to_string());

        let rest = s.strip_prefix("ID").ok_or_else(invalid)?;
        let (device, control) = rest.split_once('_').ok_or_else(invalid)?;
        let device: usize = device.parse().map_err(|_| invalid())?;

        if let Some(button) = control.strip_prefix("BTN") {
            let button: u16 = button.parse().map_err(|_| invalid())?;
            return Ok(InputIdentifier::button(device, button));
        }

        let tuple = control
            .strip_prefix("HAT(")
            .and_then(|t| t.strip_suffix(')'))
            .ok_or_else(invalid)?;
        let (x, y) = tuple.split_once(',').ok_or_else(invalid)?;
        let x: i8 = x.trim().parse().map_err(|_| invalid())?;
        let y: i8 = y.trim().parse().map_err(|_| invalid())?;

        // A centered hat is never bound.
        if x == 0 && y == 0 {
            return Err(invalid());
        }
        Ok(InputIdentifier::hat(device, x, y))
    }
}
