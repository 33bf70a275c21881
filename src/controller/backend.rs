//! Hardware boundary
//!
//! The loader never touches a device library directly. It enumerates devices,
//! probes axis ranges and programs hardware dead zones through [`InputBackend`].

use serde::{Deserialize, Serialize};
use std::fmt;

/// Hardware dead zones are programmed in ten-thousandths of the axis range
pub const DEAD_ZONE_UNITS: f32 = 10000.0;

/// Stable identity of one physical device instance
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct DeviceId(String);

impl DeviceId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DeviceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A detected physical device and its capability counts
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceInfo {
    pub id: DeviceId,
    /// Human-readable name; configuration sections are matched against it
    pub name: String,
    pub axis_count: usize,
    pub button_count: usize,
    pub pov_count: usize,
}

impl DeviceInfo {
    /// One-line description for the detected list
    pub fn summary(&self) -> String {
        format!(
            "Detected Controller '{}': {} Axes, {} Buttons, {} POV(s)",
            self.name, self.axis_count, self.button_count, self.pov_count
        )
    }
}

/// The fixed axis catalogue probed on every device
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum AxisKind {
    X,
    Y,
    Z,
    RotationX,
    RotationY,
    RotationZ,
    Slider0,
    Slider1,
}

impl AxisKind {
    pub const ALL: [AxisKind; 8] = [
        AxisKind::X,
        AxisKind::Y,
        AxisKind::Z,
        AxisKind::RotationX,
        AxisKind::RotationY,
        AxisKind::RotationZ,
        AxisKind::Slider0,
        AxisKind::Slider1,
    ];

    /// Object name on the hardware side
    pub fn hardware_name(self) -> &'static str {
        match self {
            AxisKind::X => "X",
            AxisKind::Y => "Y",
            AxisKind::Z => "Z",
            AxisKind::RotationX => "RotationX",
            AxisKind::RotationY => "RotationY",
            AxisKind::RotationZ => "RotationZ",
            AxisKind::Slider0 => "Sliders0",
            AxisKind::Slider1 => "Sliders1",
        }
    }

    /// Key prefix used in the configuration file
    pub fn config_name(self) -> &'static str {
        match self {
            AxisKind::X => "AxisX",
            AxisKind::Y => "AxisY",
            AxisKind::Z => "AxisZ",
            AxisKind::RotationX => "RotationX",
            AxisKind::RotationY => "RotationY",
            AxisKind::RotationZ => "RotationZ",
            AxisKind::Slider0 => "Slider1",
            AxisKind::Slider1 => "Slider2",
        }
    }

    /// Sliders only get their dead zone applied in software
    pub fn accepts_hardware_dead_zone(self) -> bool {
        !matches!(self, AxisKind::Slider0 | AxisKind::Slider1)
    }
}

impl fmt::Display for AxisKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.config_name())
    }
}

/// Native range reported by the hardware for one axis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AxisRange {
    pub min: i32,
    pub max: i32,
}

impl AxisRange {
    pub fn new(min: i32, max: i32) -> Self {
        Self { min, max }
    }

    pub fn width(&self) -> f32 {
        (i64::from(self.max) - i64::from(self.min)) as f32
    }

    /// A zero-width axis cannot produce input
    pub fn is_usable(&self) -> bool {
        self.width() != 0.0
    }

    /// Maps a raw hardware value onto `[-1, 1]`
    pub fn normalize(&self, raw: i32) -> f32 {
        let width = self.width();
        if width == 0.0 {
            return 0.0;
        }
        let offset = (i64::from(raw) - i64::from(self.min)) as f32;
        (2.0 * offset / width - 1.0).clamp(-1.0, 1.0)
    }
}

/// Converts a dead zone fraction to the unit used by [`InputBackend::set_axis_dead_zone`]
pub fn dead_zone_units(dead_zone: f32) -> i32 {
    (DEAD_ZONE_UNITS * dead_zone) as i32
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum HardwareError {
    /// The control does not exist on this device; an expected condition
    #[error("Control {control} not found on device {device}")]
    NotFound { device: DeviceId, control: String },

    #[error("Device {0} is not available")]
    DeviceUnavailable(DeviceId),

    #[error("Input backend error: {0}")]
    Backend(String),
}

impl HardwareError {
    pub fn not_found(device: &DeviceId, axis: AxisKind) -> Self {
        HardwareError::NotFound {
            device: device.clone(),
            control: axis.hardware_name().to_string(),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, HardwareError::NotFound { .. })
    }
}

/// Device enumeration and per-axis queries
pub trait InputBackend {
    /// Currently attached devices, in enumeration order
    fn devices(&mut self) -> Result<Vec<DeviceInfo>, HardwareError>;

    fn axis_range(&self, device: &DeviceId, axis: AxisKind) -> Result<AxisRange, HardwareError>;

    /// Programs a hardware dead zone, in [`DEAD_ZONE_UNITS`]
    fn set_axis_dead_zone(
        &mut self,
        device: &DeviceId,
        axis: AxisKind,
        units: i32,
    ) -> Result<(), HardwareError>;
}
