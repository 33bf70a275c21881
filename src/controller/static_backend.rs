//! Device list described in data
//!
//! Stands in for real hardware: replays a fixed set of devices, records every
//! dead zone the loader programs and can be told to fail on chosen axes. Used
//! by tests and by the binary's offline `--devices` mode.
//!
//! ```toml
//! [[devices]]
//! id = "x52-0"
//! name = "Saitek X52 Flight Control System"
//! buttons = 34
//! povs = 1
//! axes = [
//!     { axis = "X", min = 0, max = 2047 },
//!     { axis = "Slider0", min = 0, max = 255 },
//! ]
//! ```

use super::backend::{AxisKind, AxisRange, DeviceId, DeviceInfo, HardwareError, InputBackend};
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;
use tracing::debug;

#[derive(Debug, Clone, Deserialize)]
pub struct StaticAxis {
    pub axis: AxisKind,
    pub min: i32,
    pub max: i32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StaticDevice {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub buttons: usize,
    #[serde(default)]
    pub povs: usize,
    #[serde(default)]
    pub axes: Vec<StaticAxis>,
}

impl StaticDevice {
    pub fn new(id: &str, name: &str) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            buttons: 0,
            povs: 0,
            axes: Vec::new(),
        }
    }

    pub fn with_axis(mut self, axis: AxisKind, range: AxisRange) -> Self {
        self.axes.push(StaticAxis {
            axis,
            min: range.min,
            max: range.max,
        });
        self
    }

    pub fn with_buttons(mut self, buttons: usize) -> Self {
        self.buttons = buttons;
        self
    }

    pub fn with_povs(mut self, povs: usize) -> Self {
        self.povs = povs;
        self
    }

    fn info(&self) -> DeviceInfo {
        DeviceInfo {
            id: DeviceId::new(self.id.clone()),
            name: self.name.clone(),
            axis_count: self.axes.len(),
            button_count: self.buttons,
            pov_count: self.povs,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct DeviceFile {
    #[serde(default)]
    devices: Vec<StaticDevice>,
}

#[derive(Debug, Default)]
pub struct StaticBackend {
    devices: Vec<StaticDevice>,
    axis_errors: HashMap<(DeviceId, AxisKind), HardwareError>,
    enumeration_error: Option<HardwareError>,
    dead_zones: HashMap<(DeviceId, AxisKind), i32>,
}

impl StaticBackend {
    pub fn new(devices: Vec<StaticDevice>) -> Self {
        Self {
            devices,
            ..Self::default()
        }
    }

    pub fn from_toml_str(content: &str) -> Result<Self, HardwareError> {
        let file: DeviceFile = toml::from_str(content)
            .map_err(|e| HardwareError::Backend(format!("Invalid device list: {}", e)))?;
        Ok(Self::new(file.devices))
    }

    pub fn load(path: &Path) -> Result<Self, HardwareError> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            HardwareError::Backend(format!("Failed to read {}: {}", path.display(), e))
        })?;
        Self::from_toml_str(&content)
    }

    /// Makes every probe of `axis` on device `id` fail with `error`
    pub fn with_axis_error(mut self, id: &str, axis: AxisKind, error: HardwareError) -> Self {
        self.axis_errors.insert((DeviceId::new(id), axis), error);
        self
    }

    /// Makes enumeration itself fail
    pub fn with_enumeration_error(mut self, error: HardwareError) -> Self {
        self.enumeration_error = Some(error);
        self
    }

    pub fn add_device(&mut self, device: StaticDevice) {
        self.devices.push(device);
    }

    /// Last dead zone programmed for an axis, in hardware units
    pub fn dead_zone(&self, id: &DeviceId, axis: AxisKind) -> Option<i32> {
        self.dead_zones.get(&(id.clone(), axis)).copied()
    }

    fn device(&self, id: &DeviceId) -> Result<&StaticDevice, HardwareError> {
        self.devices
            .iter()
            .find(|d| d.id == id.as_str())
            .ok_or_else(|| HardwareError::DeviceUnavailable(id.clone()))
    }
}

impl InputBackend for StaticBackend {
    fn devices(&mut self) -> Result<Vec<DeviceInfo>, HardwareError> {
        if let Some(error) = &self.enumeration_error {
            return Err(error.clone());
        }
        self.dead_zones.clear();
        Ok(self.devices.iter().map(StaticDevice::info).collect())
    }

    fn axis_range(&self, id: &DeviceId, axis: AxisKind) -> Result<AxisRange, HardwareError> {
        if let Some(error) = self.axis_errors.get(&(id.clone(), axis)) {
            return Err(error.clone());
        }
        self.device(id)?
            .axes
            .iter()
            .find(|a| a.axis == axis)
            .map(|a| AxisRange::new(a.min, a.max))
            .ok_or_else(|| HardwareError::not_found(id, axis))
    }

    fn set_axis_dead_zone(
        &mut self,
        id: &DeviceId,
        axis: AxisKind,
        units: i32,
    ) -> Result<(), HardwareError> {
        self.device(id)?;
        debug!("Dead zone of {} on {} set to {}", axis, id, units);
        self.dead_zones.insert((id.clone(), axis), units);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DEVICES: &str = r#"
        [[devices]]
        id = "x52-0"
        name = "Saitek X52 Flight Control System"
        buttons = 34
        povs = 1
        axes = [
            { axis = "X", min = 0, max = 2047 },
            { axis = "Y", min = 0, max = 2047 },
            { axis = "Slider0", min = 0, max = 255 },
        ]

        [[devices]]
        id = "pedals-0"
        name = "Pedals"
        axes = [{ axis = "RotationZ", min = -512, max = 511 }]
    "#;

    #[test]
    fn test_device_list_from_toml() {
        let mut backend = StaticBackend::from_toml_str(DEVICES).unwrap();
        let devices = backend.devices().unwrap();
        assert_eq!(devices.len(), 2);
        assert_eq!(devices[0].axis_count, 3);
        assert_eq!(devices[0].button_count, 34);
        assert_eq!(devices[1].pov_count, 0);
        assert_eq!(devices[1].button_count, 0);
    }

    #[test]
    fn test_invalid_device_list() {
        let result = StaticBackend::from_toml_str("[[devices]]\nname = 3");
        assert!(matches!(result, Err(HardwareError::Backend(_))));
    }

    #[test]
    fn test_axis_lookup() {
        let backend = StaticBackend::from_toml_str(DEVICES).unwrap();
        let id = DeviceId::new("pedals-0");
        assert_eq!(
            backend.axis_range(&id, AxisKind::RotationZ).unwrap(),
            AxisRange::new(-512, 511)
        );
        assert!(backend.axis_range(&id, AxisKind::X).unwrap_err().is_not_found());
        assert_eq!(
            backend.axis_range(&DeviceId::new("gone"), AxisKind::X),
            Err(HardwareError::DeviceUnavailable(DeviceId::new("gone")))
        );
    }

    #[test]
    fn test_records_dead_zones() {
        let mut backend = StaticBackend::from_toml_str(DEVICES).unwrap();
        let id = DeviceId::new("x52-0");
        backend.set_axis_dead_zone(&id, AxisKind::X, 500).unwrap();
        backend.set_axis_dead_zone(&id, AxisKind::X, 700).unwrap();
        assert_eq!(backend.dead_zone(&id, AxisKind::X), Some(700));
        assert_eq!(backend.dead_zone(&id, AxisKind::Y), None);

        backend.devices().unwrap();
        assert_eq!(backend.dead_zone(&id, AxisKind::X), None);
    }

    #[test]
    fn test_injected_errors() {
        let mut backend = StaticBackend::from_toml_str(DEVICES)
            .unwrap()
            .with_axis_error("x52-0", AxisKind::Y, HardwareError::Backend("lost".into()));
        let id = DeviceId::new("x52-0");
        assert!(backend.axis_range(&id, AxisKind::X).is_ok());
        assert_eq!(
            backend.axis_range(&id, AxisKind::Y),
            Err(HardwareError::Backend("lost".into()))
        );

        let mut failing = StaticBackend::default()
            .with_enumeration_error(HardwareError::Backend("no driver".into()));
        assert!(failing.devices().is_err());
        backend.add_device(StaticDevice::new("new", "New"));
        assert_eq!(backend.devices().unwrap().len(), 3);
    }
}
