//! # Settings Store Module
//!
//! The persisted settings record: bindings plus pointer speed, scroll speed
//! and the autostart flag.
//!
//! This module handles:
//! - Range clamping of user settings ([`Settings`])
//! - Reading/writing the JSON settings file ([`json`])
//! - Fire-and-forget background writes ([`worker`])
//! - Autostart registration ([`autostart`])
//!
//! A missing or corrupt file never prevents startup: defaults are used and
//! the in-memory state stays authoritative for the session.

pub mod autostart;
pub mod json;
pub mod worker;

pub use autostart::{AutostartRegistrar, XdgAutostart};
pub use json::JsonFileStore;
pub use worker::{PersistenceSink, PersistenceWorker};

use crate::controller::InputIdentifier;
use crate::mapping::{ActionName, MappingTable};

/// Pointer speed range
pub const SPEED_MIN: u32 = 5;
/// Pointer speed range
pub const SPEED_MAX: u32 = 100;
/// Scroll speed range
pub const SCROLL_SPEED_MIN: u32 = 1;
/// Scroll speed range
pub const SCROLL_SPEED_MAX: u32 = 50;

/// Default pointer speed
pub const DEFAULT_SPEED: u32 = 15;
/// Default scroll speed
pub const DEFAULT_SCROLL_SPEED: u32 = 10;

/// User-adjustable scaling factors and the autostart flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Settings {
    speed: u32,
    scroll_speed: u32,
    pub autostart: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            speed: DEFAULT_SPEED,
            scroll_speed: DEFAULT_SCROLL_SPEED,
            autostart: false,
        }
    }
}

impl Settings {
    /// Builds settings, clamping both speeds into range.
    ///
    /// # Examples
    ///
    /// ```
    /// use gamepad_mouse::store::Settings;
    ///
    /// let settings = Settings::new(500, 0, false);
    /// assert_eq!(settings.speed(), 100);
    /// assert_eq!(settings.scroll_speed(), 1);
    /// ```
    #[must_use]
    pub fn new(speed: i64, scroll_speed: i64, autostart: bool) -> Self {
        let mut settings = Self {
            autostart,
            ..Self::default()
        };
        settings.set_speed(speed);
        settings.set_scroll_speed(scroll_speed);
        settings
    }

    /// Pointer speed multiplier (5..=100)
    #[must_use]
    pub fn speed(&self) -> u32 {
        self.speed
    }

    /// Scroll amount per tick (1..=50)
    #[must_use]
    pub fn scroll_speed(&self) -> u32 {
        self.scroll_speed
    }

    /// Sets the pointer speed, clamped into range. Returns the stored value.
    pub fn set_speed(&mut self, speed: i64) -> u32 {
        self.speed = speed.clamp(SPEED_MIN as i64, SPEED_MAX as i64) as u32;
        self.speed
    }

    /// Sets the scroll speed, clamped into range. Returns the stored value.
    pub fn set_scroll_speed(&mut self, scroll_speed: i64) -> u32 {
        self.scroll_speed = scroll_speed.clamp(SCROLL_SPEED_MIN as i64, SCROLL_SPEED_MAX as i64) as u32;
        self.scroll_speed
    }
}

/// Everything that is persisted, written in full on every change.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SettingsSnapshot {
    /// Bindings in table order
    pub mapping: Vec<(InputIdentifier, ActionName)>,
    pub settings: Settings,
}

impl SettingsSnapshot {
    /// Captures the current table and settings.
    #[must_use]
    pub fn capture(table: &MappingTable, settings: &Settings) -> Self {
        Self {
            mapping: table.iter().copied().collect(),
            settings: *settings,
        }
    }
}

/// Receiver of persistence writes.
///
/// Implementations must return immediately and must not fail the caller;
/// a lost write is recoverable, a stalled tick is not.
pub trait SettingsSink: Send {
    fn submit(&self, snapshot: SettingsSnapshot);
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_settings() {
        let settings = Settings::default();
        assert_eq!(settings.speed(), 15);
        assert_eq!(settings.scroll_speed(), 10);
        assert!(!settings.autostart);
    }

    #[test]
    fn test_speed_clamps() {
        let mut settings = Settings::default();
        assert_eq!(settings.set_speed(0), SPEED_MIN);
        assert_eq!(settings.set_speed(-20), SPEED_MIN);
        assert_eq!(settings.set_speed(101), SPEED_MAX);
        assert_eq!(settings.set_speed(42), 42);
        assert_eq!(settings.speed(), 42);
    }

    #[test]
    fn test_scroll_speed_clamps() {
        let mut settings = Settings::default();
        assert_eq!(settings.set_scroll_speed(0), SCROLL_SPEED_MIN);
        assert_eq!(settings.set_scroll_speed(51), SCROLL_SPEED_MAX);
        assert_eq!(settings.set_scroll_speed(i64::MAX), SCROLL_SPEED_MAX);
        assert_eq!(settings.set_scroll_speed(25), 25);
    }

    #[test]
    fn test_new_clamps_both_speeds() {
        let settings = Settings::new(3, 99, true);
        assert_eq!(settings.speed(), SPEED_MIN);
        assert_eq!(settings.scroll_speed(), SCROLL_SPEED_MAX);
        assert!(settings.autostart);
    }

    #[test]
    fn test_snapshot_capture_keeps_table_order() {
        let mut table = MappingTable::new();
        table.bind(InputIdentifier::button(0, 2), ActionName::EnterKey);
        table.bind(InputIdentifier::hat(0, 0, 1), ActionName::ScrollUp);

        let snapshot = SettingsSnapshot::capture(&table, &Settings::default());
        assert_eq!(
            snapshot.mapping,
            vec![
                (InputIdentifier::button(0, 2), ActionName::EnterKey),
                (InputIdentifier::hat(0, 0, 1), ActionName::ScrollUp),
            ]
        );
        assert_eq!(snapshot.settings, Settings::default());
    }
}
