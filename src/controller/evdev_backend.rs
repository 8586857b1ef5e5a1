//! # evdev Input Backend
//!
//! Reads game controllers through the Linux evdev interface.
//!
//! ## Controller Detection
//!
//! Every `/dev/input/event*` node is opened and kept when its supported keys
//! include a joystick or gamepad button (`BTN_TRIGGER` or `BTN_SOUTH`).
//! Nodes are sorted by path so device indices are deterministic.
//!
//! ## Polling
//!
//! The backend never reads the event stream. Each tick it takes an ioctl
//! snapshot of the key and absolute-axis state and diffs it against the
//! previous snapshot, which makes polling non-blocking by construction:
//!
//! | Source | Result |
//! |--------|--------|
//! | Key bit set → cleared | `Button { pressed: false }` |
//! | Key bit cleared → set | `Button { pressed: true }` |
//! | `ABS_HAT0X`/`ABS_HAT0Y` change | `Hat { direction }` |
//! | `ABS_X`, `ABS_Y` | analog axes 0 and 1 |
//!
//! ## Button Numbering
//!
//! Button indices follow the joydev convention: the device's keys from
//! `BTN_JOYSTICK` upward come first, then `BTN_MISC..BTN_JOYSTICK`.

use evdev::{AbsoluteAxisType, Device, Key};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use super::axis::AxisRange;
use super::event::{HatDirection, InputEvent};
use super::{DeviceHandle, InputBackend, POINTER_AXIS_X, POINTER_AXIS_Y};
use crate::error::{GamepadMouseError, Result};

/// Default directory scanned for input nodes
pub const DEFAULT_INPUT_DIR: &str = "/dev/input";

/// First key code that joydev treats as a joystick button.
const BTN_MISC: u16 = 0x100;
/// Start of the joystick button block.
const BTN_JOYSTICK: u16 = 0x120;

/// Absolute axes read for pointer motion, indexed by analog axis number.
const POINTER_AXES: [AbsoluteAxisType; 2] = [AbsoluteAxisType::ABS_X, AbsoluteAxisType::ABS_Y];

/// Last observed reading of one analog axis.
#[derive(Debug, Clone, Copy, Default)]
struct AxisReading {
    range: AxisRange,
    value: i32,
}

impl AxisReading {
    fn normalized(&self) -> f32 {
        self.range.normalize(self.value)
    }
}

/// One opened controller and its previous state snapshot.
struct Gamepad {
    device: Device,
    /// Button index → key code
    buttons: Vec<Key>,
    /// Held state per button index, from the last snapshot
    pressed: Vec<bool>,
    hat: HatDirection,
    axes: [AxisReading; 2],
    primed: bool,
    lost: bool,
}

impl Gamepad {
    fn new(device: Device) -> Self {
        let buttons = device
            .supported_keys()
            .map(|keys| button_layout(keys.iter()))
            .unwrap_or_default();
        let pressed = vec![false; buttons.len()];

        Self {
            device,
            buttons,
            pressed,
            hat: HatDirection::CENTER,
            axes: [AxisReading::default(); 2],
            primed: false,
            lost: false,
        }
    }

    /// Takes a state snapshot and appends the differences to `events`.
    fn poll(&mut self, index: usize, events: &mut Vec<InputEvent>) -> Result<()> {
        let keys = self
            .device
            .get_key_state()
            .map_err(|e| GamepadMouseError::Controller(format!("Failed to read key state: {}", e)))?;
        let abs = self
            .device
            .get_abs_state()
            .map_err(|e| GamepadMouseError::Controller(format!("Failed to read axis state: {}", e)))?;

        for (slot, axis) in POINTER_AXES.iter().enumerate() {
            let info = &abs[axis.0 as usize];
            self.axes[slot] = AxisReading {
                range: AxisRange::new(info.minimum, info.maximum),
                value: info.value,
            };
        }

        let hat = hat_direction(
            abs[AbsoluteAxisType::ABS_HAT0X.0 as usize].value,
            abs[AbsoluteAxisType::ABS_HAT0Y.0 as usize].value,
        );

        for (button, key) in self.buttons.iter().enumerate() {
            let now = keys.contains(*key);
            if self.primed && now != self.pressed[button] {
                events.push(InputEvent::Button {
                    device: index,
                    button: button as u16,
                    pressed: now,
                });
            }
            self.pressed[button] = now;
        }

        if self.primed && hat != self.hat {
            events.push(InputEvent::Hat {
                device: index,
                hat: 0,
                direction: hat,
            });
        }
        self.hat = hat;
        self.primed = true;

        Ok(())
    }
}

/// Controller input via `/dev/input/event*`.
pub struct EvdevBackend {
    input_dir: PathBuf,
    pads: Vec<Gamepad>,
    stale: bool,
}

impl std::fmt::Debug for EvdevBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EvdevBackend")
            .field("input_dir", &self.input_dir)
            .field("pads", &self.pads.len())
            .field("stale", &self.stale)
            .finish()
    }
}

impl Default for EvdevBackend {
    fn default() -> Self {
        Self::new(DEFAULT_INPUT_DIR)
    }
}

impl EvdevBackend {
    /// Creates a backend scanning `input_dir`. No device is opened until the
    /// first enumeration.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use gamepad_mouse::controller::{EvdevBackend, InputBackend};
    ///
    /// let mut backend = EvdevBackend::new("/dev/input");
    /// for device in backend.enumerate() {
    ///     println!("{}: {}", device.index, device.name);
    /// }
    /// ```
    pub fn new(input_dir: impl AsRef<Path>) -> Self {
        Self {
            input_dir: input_dir.as_ref().to_path_buf(),
            pads: Vec::new(),
            stale: false,
        }
    }

    /// Event node paths in `input_dir`, sorted.
    fn event_nodes(&self) -> Vec<PathBuf> {
        let entries = match std::fs::read_dir(&self.input_dir) {
            Ok(entries) => entries,
            Err(e) => {
                debug!("Failed to read {}: {}", self.input_dir.display(), e);
                return Vec::new();
            }
        };

        let mut nodes: Vec<PathBuf> = entries
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|path| {
                path.file_name()
                    .map(|name| name.to_string_lossy().starts_with("event"))
                    .unwrap_or(false)
            })
            .collect();

        // Sort entries for deterministic device indices
        nodes.sort();
        nodes
    }
}

impl InputBackend for EvdevBackend {
    fn probe(&mut self) -> usize {
        self.event_nodes().len()
    }

    fn enumerate(&mut self) -> Vec<DeviceHandle> {
        self.pads.clear();
        self.stale = false;

        let mut handles = Vec::new();
        for path in self.event_nodes() {
            let device = match Device::open(&path) {
                Ok(device) => device,
                Err(e) => {
                    // Permission denied or other errors - skip device
                    debug!("Could not open {}: {}", path.display(), e);
                    continue;
                }
            };

            let is_gamepad = device
                .supported_keys()
                .map(|keys| keys.contains(Key::BTN_SOUTH) || keys.contains(Key::BTN_TRIGGER))
                .unwrap_or(false);
            if !is_gamepad {
                continue;
            }

            let handle = DeviceHandle {
                index: handles.len(),
                name: device.name().unwrap_or("Unknown controller").to_string(),
                path: path.to_string_lossy().to_string(),
            };
            let pad = Gamepad::new(device);
            info!(
                "Found controller {} at {} ({} buttons)",
                handle.name,
                handle.path,
                pad.buttons.len()
            );

            self.pads.push(pad);
            handles.push(handle);
        }
        handles
    }

    fn is_stale(&self) -> bool {
        self.stale
    }

    fn poll_events(&mut self) -> Vec<InputEvent> {
        let mut events = Vec::new();
        for (index, pad) in self.pads.iter_mut().enumerate() {
            if pad.lost {
                continue;
            }
            if let Err(e) = pad.poll(index, &mut events) {
                warn!("Controller {} stopped responding: {}", index, e);
                pad.lost = true;
                self.stale = true;
            }
        }
        events
    }

    fn axis(&self, device: usize, axis: usize) -> f32 {
        if axis != POINTER_AXIS_X && axis != POINTER_AXIS_Y {
            return 0.0;
        }
        self.pads
            .get(device)
            .filter(|pad| !pad.lost)
            .map(|pad| pad.axes[axis].normalized())
            .unwrap_or(0.0)
    }

    fn button_held(&self, device: usize, button: u16) -> bool {
        self.pads
            .get(device)
            .filter(|pad| !pad.lost)
            .and_then(|pad| pad.pressed.get(button as usize).copied())
            .unwrap_or(false)
    }
}

/// Orders a device's keys into button indices, joydev style.
///
/// Keys below `BTN_MISC` (keyboard keys) are not buttons.
pub fn button_layout(keys: impl Iterator<Item = Key>) -> Vec<Key> {
    let mut codes: Vec<u16> = keys.map(|k| k.code()).filter(|&c| c >= BTN_MISC).collect();
    codes.sort_unstable();
    codes.dedup();

    let (misc, joystick): (Vec<u16>, Vec<u16>) = codes.into_iter().partition(|&c| c < BTN_JOYSTICK);
    joystick.into_iter().chain(misc).map(Key::new).collect()
}

/// Converts raw hat axes to a direction with "up" as `y = 1`.
#[must_use]
pub fn hat_direction(raw_x: i32, raw_y: i32) -> HatDirection {
    HatDirection::new(raw_x.signum() as i8, -(raw_y.signum()) as i8)
}
