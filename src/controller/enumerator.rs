//! # Device Enumerator
//!
//! Keeps the list of connected controllers current. Every tick the backend is
//! probed for a live count; the device list is rebuilt only when that count
//! differs from the previous probe (hot-plug or unplug) or when the backend
//! reports that a device went away.

use tracing::{debug, info};

use super::{DeviceHandle, InputBackend};

/// Tracks connected devices across ticks.
#[derive(Debug, Default)]
pub struct DeviceEnumerator {
    last_probe: Option<usize>,
    devices: Vec<DeviceHandle>,
}

impl DeviceEnumerator {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Re-enumerates unconditionally and returns the new device list.
    ///
    /// An empty list is a normal outcome meaning "no input available".
    pub fn refresh(&mut self, backend: &mut dyn InputBackend) -> &[DeviceHandle] {
        let count = backend.probe();
        self.rebuild(backend, count)
    }

    fn rebuild(&mut self, backend: &mut dyn InputBackend, count: usize) -> &[DeviceHandle] {
        self.last_probe = Some(count);
        self.devices = backend.enumerate();

        if self.devices.is_empty() {
            info!("No controller found");
        } else {
            info!("{} controller(s) active", self.devices.len());
            for device in &self.devices {
                debug!("Controller {}: {} ({})", device.index, device.name, device.path);
            }
        }
        &self.devices
    }

    /// Re-enumerates when the live count changed since the last probe.
    ///
    /// Returns `true` when the device list was rebuilt.
    pub fn refresh_if_changed(&mut self, backend: &mut dyn InputBackend) -> bool {
        let count = backend.probe();
        let changed = self.last_probe != Some(count) || backend.is_stale();
        if changed {
            debug!("Input node count changed: {:?} -> {}", self.last_probe, count);
            self.rebuild(backend, count);
        }
        changed
    }

    /// Devices found by the last enumeration, ordered by index.
    #[must_use]
    pub fn devices(&self) -> &[DeviceHandle] {
        &self.devices
    }

    #[must_use]
    pub fn count(&self) -> usize {
        self.devices.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::controller::mocks::FakeInput;

    #[test]
    fn test_first_refresh_always_enumerates() {
        let mut backend = FakeInput::with_devices(1);
        let mut enumerator = DeviceEnumerator::new();

        assert!(enumerator.refresh_if_changed(&mut backend));
        assert_eq!(enumerator.count(), 1);
        assert_eq!(backend.enumerate_calls, 1);
    }

    #[test]
    fn test_unchanged_count_skips_enumeration() {
        let mut backend = FakeInput::with_devices(2);
        let mut enumerator = DeviceEnumerator::new();
        enumerator.refresh(&mut backend);

        for _ in 0..10 {
            assert!(!enumerator.refresh_if_changed(&mut backend));
        }
        assert_eq!(backend.enumerate_calls, 1);
    }

    #[test]
    fn test_hot_plug_triggers_enumeration() {
        let mut backend = FakeInput::with_devices(0);
        let mut enumerator = DeviceEnumerator::new();
        enumerator.refresh(&mut backend);
        assert!(enumerator.devices().is_empty());

        backend.connect(1);
        assert!(enumerator.refresh_if_changed(&mut backend));
        assert_eq!(enumerator.count(), 1);
        assert_eq!(enumerator.devices()[0].index, 0);
    }

    #[test]
    fn test_unplug_triggers_enumeration() {
        let mut backend = FakeInput::with_devices(2);
        let mut enumerator = DeviceEnumerator::new();
        enumerator.refresh(&mut backend);

        backend.connect(1);
        assert!(enumerator.refresh_if_changed(&mut backend));
        assert_eq!(enumerator.count(), 1);
    }

    #[test]
    fn test_stale_backend_triggers_enumeration() {
        let mut backend = FakeInput::with_devices(1);
        let mut enumerator = DeviceEnumerator::new();
        enumerator.refresh(&mut backend);

        backend.stale = true;
        assert!(enumerator.refresh_if_changed(&mut backend));
        assert_eq!(backend.enumerate_calls, 2);
    }

    #[test]
    fn test_changed_count_probes_once() {
        let mut backend = FakeInput::with_devices(0);
        let mut enumerator = DeviceEnumerator::new();
        enumerator.refresh(&mut backend);
        assert_eq!(backend.probe_calls, 1);

        backend.connect(2);
        assert!(enumerator.refresh_if_changed(&mut backend));
        assert_eq!(backend.probe_calls, 2);
        assert_eq!(backend.enumerate_calls, 2);
    }

    #[test]
    fn test_no_devices_is_not_an_error() {
        let mut backend = FakeInput::with_devices(0);
        let mut enumerator = DeviceEnumerator::new();
        assert!(enumerator.refresh(&mut backend).is_empty());
        assert_eq!(enumerator.count(), 0);
    }
}
