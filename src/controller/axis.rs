//! # Analog Axis Helpers
//!
//! Converts raw absolute-axis readings into the normalized `-1.0..=1.0` range
//! and applies the pointer dead-zone.
//!
//! Controllers report very different raw ranges (0-255 on a DualSense,
//! -32768..32767 on an Xbox pad), so normalization uses the range the device
//! advertises for the axis.

/// Dead-zone used for pointer motion when nothing else is configured.
pub const DEFAULT_DEADZONE: f32 = 0.1;

/// Raw range of an absolute axis as advertised by the device.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AxisRange {
    pub minimum: i32,
    pub maximum: i32,
}

impl AxisRange {
    #[must_use]
    pub const fn new(minimum: i32, maximum: i32) -> Self {
        Self { minimum, maximum }
    }

    /// Converts a raw value to `-1.0..=1.0`, with the range midpoint at `0.0`.
    ///
    /// A degenerate range (min >= max) always yields `0.0`.
    ///
    /// # Examples
    ///
    /// ```
    /// use gamepad_mouse::controller::axis::AxisRange;
    ///
    /// let range = AxisRange::new(0, 255);
    /// assert!((range.normalize(0) + 1.0).abs() < 0.01);
    /// assert!(range.normalize(128).abs() < 0.01);
    /// assert!((range.normalize(255) - 1.0).abs() < 0.01);
    /// ```
    #[must_use]
    pub fn normalize(&self, raw: i32) -> f32 {
        if self.maximum <= self.minimum {
            return 0.0;
        }
        let span = (self.maximum as f32) - (self.minimum as f32);
        let offset = (raw as f32) - (self.minimum as f32);
        (2.0 * offset / span - 1.0).clamp(-1.0, 1.0)
    }
}

impl Default for AxisRange {
    fn default() -> Self {
        Self::new(-32768, 32767)
    }
}

/// True when either component leaves the dead-zone.
///
/// The comparison is strict: a deflection exactly at the threshold is still
/// inside the dead-zone.
#[must_use]
pub fn outside_deadzone(x: f32, y: f32, deadzone: f32) -> bool {
    x.abs() > deadzone || y.abs() > deadzone
}

/// Scales a normalized deflection to a relative pointer step.
///
/// Truncates toward zero, so small deflections at low speed produce no motion.
#[must_use]
pub fn scale_deflection(value: f32, speed: u32) -> i32 {
    (value * speed as f32) as i32
}
