//! # Controller Module
//!
//! Game controller input handling.
//!
//! This module handles:
//! - Controller discovery and hot-plug detection ([`enumerator`])
//! - Raw input events and stable identifiers ([`event`])
//! - Edge-triggered classification of events ([`classifier`])
//! - Analog axis normalization and dead-zones ([`axis`])
//! - The Linux evdev backend ([`evdev_backend`])
//!
//! The engine only sees controllers through the [`InputBackend`] trait, so
//! the whole pipeline can be driven by a fake backend in tests.

pub mod axis;
pub mod classifier;
pub mod enumerator;
pub mod event;
pub mod evdev_backend;

pub use classifier::classify;
pub use enumerator::DeviceEnumerator;
pub use event::{HatDirection, InputEvent, InputIdentifier, ParseIdentifierError};
pub use evdev_backend::EvdevBackend;

/// Analog axis used for horizontal pointer motion.
pub const POINTER_AXIS_X: usize = 0;
/// Analog axis used for vertical pointer motion.
pub const POINTER_AXIS_Y: usize = 1;

/// A connected controller as seen by the engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceHandle {
    /// Position in the enumeration order; part of every identifier.
    pub index: usize,
    /// Human-readable device name.
    pub name: String,
    /// Device node the controller was opened from.
    pub path: String,
}

/// Source of controller state polled once per tick.
///
/// Implementations must never block: every method returns whatever state is
/// available right now.
pub trait InputBackend {
    /// Cheap live count used to detect hot-plug. Compared between ticks only.
    fn probe(&mut self) -> usize;

    /// (Re)opens all controllers. Device indices are positions in the result.
    fn enumerate(&mut self) -> Vec<DeviceHandle>;

    /// True when a device was lost since the last enumeration.
    fn is_stale(&self) -> bool {
        false
    }

    /// Button edges and hat changes since the previous call.
    fn poll_events(&mut self) -> Vec<InputEvent>;

    /// Current normalized (`-1.0..=1.0`) value of an analog axis.
    fn axis(&self, device: usize, axis: usize) -> f32;

    /// Live held state of a button.
    fn button_held(&self, device: usize, button: u16) -> bool;
}
