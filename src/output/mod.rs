//! # Output Module
//!
//! The OS input surface the engine produces calls into: relative pointer
//! motion, mouse buttons, key taps and wheel scrolling.
//!
//! The engine only talks to [`OutputSink`]; [`uinput::VirtualPointer`] is the
//! Linux implementation backed by a uinput virtual device.

pub mod uinput;

pub use uinput::VirtualPointer;

use crate::error::Result;

/// Mouse buttons the engine can press.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseButton {
    Left,
    Right,
    Middle,
}

/// Keys the engine can tap (press + release).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyTap {
    /// Super / Windows key
    Meta,
    Enter,
    Tab,
}

/// Trait for synthetic input operations
#[cfg_attr(test, mockall::automock)]
pub trait OutputSink {
    /// Moves the pointer by a relative offset.
    fn move_pointer(&mut self, dx: i32, dy: i32) -> Result<()>;

    /// Presses or releases a mouse button.
    fn mouse_button(&mut self, button: MouseButton, pressed: bool) -> Result<()>;

    /// Presses and releases a key.
    fn tap_key(&mut self, key: KeyTap) -> Result<()>;

    /// Scrolls the wheel by `amount` hi-res units (120 per notch); positive is up.
    fn scroll(&mut self, amount: i32) -> Result<()>;
}
