//! # Continuous Analog Driver
//!
//! Runs every tick for every connected device, independent of discrete
//! events, mode and cooldown:
//!
//! - Left stick deflection beyond the dead-zone moves the pointer by
//!   `deflection * speed` on each axis.
//! - Every held button bound to Scroll Up / Scroll Down scrolls by
//!   `±scroll_speed`.

use tracing::warn;

use crate::controller::axis::{outside_deadzone, scale_deflection};
use crate::controller::{DeviceHandle, InputBackend, POINTER_AXIS_X, POINTER_AXIS_Y};
use crate::mapping::{ActionName, MappingTable};
use crate::output::OutputSink;
use crate::store::Settings;

/// Pointer motion and held-scroll for all `devices`.
pub fn drive(
    backend: &dyn InputBackend,
    output: &mut dyn OutputSink,
    table: &MappingTable,
    settings: &Settings,
    devices: &[DeviceHandle],
    deadzone: f32,
) {
    for device in devices {
        move_pointer(backend, output, settings, device.index, deadzone);
        held_scroll(backend, output, table, settings, device.index);
    }
}

fn move_pointer(
    backend: &dyn InputBackend,
    output: &mut dyn OutputSink,
    settings: &Settings,
    device: usize,
    deadzone: f32,
) {
    let x = backend.axis(device, POINTER_AXIS_X);
    let y = backend.axis(device, POINTER_AXIS_Y);
    if !outside_deadzone(x, y, deadzone) {
        return;
    }

    let dx = scale_deflection(x, settings.speed());
    let dy = scale_deflection(y, settings.speed());
    if let Err(e) = output.move_pointer(dx, dy) {
        warn!("Pointer move failed: {}", e);
    }
}

fn held_scroll(
    backend: &dyn InputBackend,
    output: &mut dyn OutputSink,
    table: &MappingTable,
    settings: &Settings,
    device: usize,
) {
    let step = settings.scroll_speed() as i32;
    for (button, action) in table.held_bindings_for(device) {
        let amount = match action {
            ActionName::ScrollUp => step,
            ActionName::ScrollDown => -step,
            _ => continue,
        };
        if backend.button_held(device, button) {
            if let Err(e) = output.scroll(amount) {
                warn!("Scroll failed: {}", e);
            }
        }
    }
}
