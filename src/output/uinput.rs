//! # uinput Virtual Pointer
//!
//! Synthetic mouse and keyboard events through a uinput virtual device.
//!
//! ## Capabilities
//!
//! | Kind | Codes |
//! |------|-------|
//! | Keys | `BTN_LEFT`, `BTN_RIGHT`, `BTN_MIDDLE`, `KEY_LEFTMETA`, `KEY_ENTER`, `KEY_TAB` |
//! | Relative axes | `REL_X`, `REL_Y`, `REL_WHEEL`, `REL_WHEEL_HI_RES` |
//!
//! ## Wheel units
//!
//! Scroll amounts are in high-resolution wheel units, 120 per notch. Every
//! scroll emits `REL_WHEEL_HI_RES` with the amount as-is; a legacy
//! `REL_WHEEL` notch goes out each time the running total crosses a multiple
//! of 120, for clients that ignore the hi-res axis.
//!
//! Creating the device needs write access to `/dev/uinput`; without it the
//! application cannot work, so creation failure is reported as
//! [`GamepadMouseError::PermissionDenied`] when the OS says so.

use evdev::uinput::{VirtualDevice, VirtualDeviceBuilder};
use evdev::{AttributeSet, EventType, InputEvent, Key, RelativeAxisType};
use std::io;
use tracing::{debug, info};

use super::{KeyTap, MouseButton, OutputSink};
use crate::error::{GamepadMouseError, Result};

/// Name the virtual device registers with
pub const VIRTUAL_DEVICE_NAME: &str = "GamePad to Mouse Virtual Pointer";

const KEY_PRESSED: i32 = 1;
const KEY_RELEASED: i32 = 0;

/// High-resolution wheel units per notch
pub const WHEEL_UNITS_PER_NOTCH: i32 = 120;

fn button_key(button: MouseButton) -> Key {
    match button {
        MouseButton::Left => Key::BTN_LEFT,
        MouseButton::Right => Key::BTN_RIGHT,
        MouseButton::Middle => Key::BTN_MIDDLE,
    }
}

fn tap_key_code(key: KeyTap) -> Key {
    match key {
        KeyTap::Meta => Key::KEY_LEFTMETA,
        KeyTap::Enter => Key::KEY_ENTER,
        KeyTap::Tab => Key::KEY_TAB,
    }
}

fn key_event(key: Key, value: i32) -> InputEvent {
    InputEvent::new(EventType::KEY, key.code(), value)
}

fn rel_event(axis: RelativeAxisType, value: i32) -> InputEvent {
    InputEvent::new(EventType::RELATIVE, axis.0, value)
}

/// Events for a relative pointer move; zero components are omitted.
fn move_events(dx: i32, dy: i32) -> Vec<InputEvent> {
    let mut events = Vec::with_capacity(2);
    if dx != 0 {
        events.push(rel_event(RelativeAxisType::REL_X, dx));
    }
    if dy != 0 {
        events.push(rel_event(RelativeAxisType::REL_Y, dy));
    }
    events
}

/// Running remainder of hi-res wheel units not yet sent as a whole notch.
#[derive(Debug, Default)]
struct WheelCarry {
    remainder: i32,
}

impl WheelCarry {
    /// Events for one scroll of `amount` hi-res units.
    fn events(&mut self, amount: i32) -> Vec<InputEvent> {
        if amount == 0 {
            return Vec::new();
        }
        // Reversing direction drops the partial notch
        if self.remainder.signum() == -amount.signum() {
            self.remainder = 0;
        }
        self.remainder += amount;
        let notches = self.remainder / WHEEL_UNITS_PER_NOTCH;
        self.remainder -= notches * WHEEL_UNITS_PER_NOTCH;

        let mut events = Vec::with_capacity(2);
        if notches != 0 {
            events.push(rel_event(RelativeAxisType::REL_WHEEL, notches));
        }
        events.push(rel_event(RelativeAxisType::REL_WHEEL_HI_RES, amount));
        events
    }
}

fn map_build_error(context: &str, e: io::Error) -> GamepadMouseError {
    if e.kind() == io::ErrorKind::PermissionDenied {
        GamepadMouseError::PermissionDenied(format!(
            "{}: {} (is /dev/uinput writable by this user?)",
            context, e
        ))
    } else {
        GamepadMouseError::Output(format!("{}: {}", context, e))
    }
}

/// Virtual mouse + keyboard
pub struct VirtualPointer {
    device: VirtualDevice,
    wheel: WheelCarry,
}

impl std::fmt::Debug for VirtualPointer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VirtualPointer").finish_non_exhaustive()
    }
}

impl VirtualPointer {
    /// Create the virtual device
    ///
    /// # Errors
    ///
    /// - `PermissionDenied`: `/dev/uinput` is not accessible
    /// - `Output`: any other uinput failure
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use gamepad_mouse::output::{OutputSink, VirtualPointer};
    ///
    /// let mut pointer = VirtualPointer::create()?;
    /// pointer.move_pointer(10, 0)?;
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn create() -> Result<Self> {
        let mut keys = AttributeSet::<Key>::new();
        for button in [MouseButton::Left, MouseButton::Right, MouseButton::Middle] {
            keys.insert(button_key(button));
        }
        for key in [KeyTap::Meta, KeyTap::Enter, KeyTap::Tab] {
            keys.insert(tap_key_code(key));
        }

        let mut axes = AttributeSet::<RelativeAxisType>::new();
        axes.insert(RelativeAxisType::REL_X);
        axes.insert(RelativeAxisType::REL_Y);
        axes.insert(RelativeAxisType::REL_WHEEL);
        axes.insert(RelativeAxisType::REL_WHEEL_HI_RES);

        let device = VirtualDeviceBuilder::new()
            .map_err(|e| map_build_error("Failed to open uinput", e))?
            .name(VIRTUAL_DEVICE_NAME)
            .with_keys(&keys)
            .map_err(|e| map_build_error("Failed to set key capabilities", e))?
            .with_relative_axes(&axes)
            .map_err(|e| map_build_error("Failed to set relative axes", e))?
            .build()
            .map_err(|e| map_build_error("Failed to build uinput device", e))?;

        info!("Created virtual pointer device \"{}\"", VIRTUAL_DEVICE_NAME);
        Ok(Self {
            device,
            wheel: WheelCarry::default(),
        })
    }

    fn emit(&mut self, events: &[InputEvent]) -> Result<()> {
        if events.is_empty() {
            return Ok(());
        }
        // emit() appends the SYN_REPORT
        self.device
            .emit(events)
            .map_err(|e| GamepadMouseError::Output(format!("Failed to emit events: {}", e)))
    }
}

impl OutputSink for VirtualPointer {
    fn move_pointer(&mut self, dx: i32, dy: i32) -> Result<()> {
        self.emit(&move_events(dx, dy))
    }

    fn mouse_button(&mut self, button: MouseButton, pressed: bool) -> Result<()> {
        let value = if pressed { KEY_PRESSED } else { KEY_RELEASED };
        debug!("Mouse {:?} {}", button, if pressed { "down" } else { "up" });
        self.emit(&[key_event(button_key(button), value)])
    }

    fn tap_key(&mut self, key: KeyTap) -> Result<()> {
        let code = tap_key_code(key);
        debug!("Key tap {:?}", key);
        self.emit(&[key_event(code, KEY_PRESSED)])?;
        self.emit(&[key_event(code, KEY_RELEASED)])
    }

    fn scroll(&mut self, amount: i32) -> Result<()> {
        let events = self.wheel.events(amount);
        self.emit(&events)
    }
}
