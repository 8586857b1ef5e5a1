//! # Event Classifier
//!
//! Turns raw [`InputEvent`]s into [`InputIdentifier`]s.
//!
//! Bindings are edge-triggered on press:
//!
//! | Event | Identifier |
//! |-------|------------|
//! | Button down | `Button { device, button }` |
//! | Button up | none |
//! | Hat to a non-centered direction | `Hat { device, direction }` |
//! | Hat back to center | none |
//!
//! Held-button state for continuous actions is polled separately by the
//! analog driver, not derived from these events.

use super::event::{InputEvent, InputIdentifier};

/// Classifies a raw event.
///
/// # Examples
///
/// ```
/// use gamepad_mouse::controller::{classify, HatDirection, InputEvent, InputIdentifier};
///
/// let press = InputEvent::Button { device: 0, button: 3, pressed: true };
/// assert_eq!(classify(&press), Some(InputIdentifier::button(0, 3)));
///
/// let center = InputEvent::Hat { device: 0, hat: 0, direction: HatDirection::CENTER };
/// assert_eq!(classify(&center), None);
/// ```
#[must_use]
pub fn classify(event: &InputEvent) -> Option<InputIdentifier> {
    match *event {
        InputEvent::Button {
            device,
            button,
            pressed: true,
        } => Some(InputIdentifier::Button { device, button }),
        InputEvent::Button { pressed: false, .. } => None,
        InputEvent::Hat {
            device, direction, ..
        } if !direction.is_center() => Some(InputIdentifier::Hat { device, direction }),
        InputEvent::Hat { .. } => None,
    }
}
