//! Input backend over gilrs
//!
//! gilrs exposes gamepads through a standard layout rather than raw device
//! objects, so the axis catalogue is mapped onto that layout:
//!
//! | Catalogue   | gilrs axis      |
//! |-------------|-----------------|
//! | X / Y       | LeftStickX/Y    |
//! | Z           | LeftZ           |
//! | RotationX/Y | RightStickX/Y   |
//! | RotationZ   | RightZ          |
//! | Sliders     | not exposed     |
//!
//! gilrs reports values already normalized, so every present axis reports the
//! signed 16-bit range. Programmed dead zones are kept per axis for consumers to
//! apply to incoming values.

use super::backend::{
    AxisKind, AxisRange, DeviceId, DeviceInfo, HardwareError, InputBackend, DEAD_ZONE_UNITS,
};
use gilrs::{Axis, Button, Gamepad, GamepadId, Gilrs};
use std::collections::HashMap;
use tracing::{debug, error, info};

const RANGE: AxisRange = AxisRange {
    min: i16::MIN as i32,
    max: i16::MAX as i32,
};

const FACE_BUTTONS: [Button; 15] = [
    Button::South,
    Button::East,
    Button::North,
    Button::West,
    Button::C,
    Button::Z,
    Button::LeftTrigger,
    Button::LeftTrigger2,
    Button::RightTrigger,
    Button::RightTrigger2,
    Button::Select,
    Button::Start,
    Button::Mode,
    Button::LeftThumb,
    Button::RightThumb,
];

const DPAD: [Button; 4] = [
    Button::DPadUp,
    Button::DPadDown,
    Button::DPadLeft,
    Button::DPadRight,
];

fn gilrs_axis(axis: AxisKind) -> Option<Axis> {
    match axis {
        AxisKind::X => Some(Axis::LeftStickX),
        AxisKind::Y => Some(Axis::LeftStickY),
        AxisKind::Z => Some(Axis::LeftZ),
        AxisKind::RotationX => Some(Axis::RightStickX),
        AxisKind::RotationY => Some(Axis::RightStickY),
        AxisKind::RotationZ => Some(Axis::RightZ),
        AxisKind::Slider0 | AxisKind::Slider1 => None,
    }
}

pub struct GilrsBackend {
    gilrs: Gilrs,
    ids: HashMap<DeviceId, GamepadId>,
    dead_zones: HashMap<(DeviceId, AxisKind), f32>,
}

impl GilrsBackend {
    pub fn new() -> Result<Self, HardwareError> {
        info!("Initializing gilrs controller interface");
        let gilrs = Gilrs::new().map_err(|e| {
            error!("Failed to initialize gilrs: {}", e);
            HardwareError::Backend(e.to_string())
        })?;
        info!("Successfully initialized gilrs");

        Ok(Self {
            gilrs,
            ids: HashMap::new(),
            dead_zones: HashMap::new(),
        })
    }

    /// Dead zone programmed for an axis, as a fraction of its range
    pub fn dead_zone(&self, id: &DeviceId, axis: AxisKind) -> Option<f32> {
        self.dead_zones.get(&(id.clone(), axis)).copied()
    }

    fn gamepad(&self, id: &DeviceId) -> Result<Gamepad<'_>, HardwareError> {
        self.ids
            .get(id)
            .and_then(|gamepad_id| self.gilrs.connected_gamepad(*gamepad_id))
            .ok_or_else(|| HardwareError::DeviceUnavailable(id.clone()))
    }
}

fn device_info(gamepad_id: GamepadId, gamepad: &Gamepad<'_>) -> DeviceInfo {
    let uuid: String = gamepad.uuid().iter().map(|b| format!("{:02x}", b)).collect();

    let axis_count = AxisKind::ALL
        .iter()
        .filter_map(|&axis| gilrs_axis(axis))
        .filter(|&axis| gamepad.axis_code(axis).is_some())
        .count();
    let button_count = FACE_BUTTONS
        .iter()
        .filter(|&&button| gamepad.button_code(button).is_some())
        .count();
    let has_dpad = DPAD.iter().any(|&button| gamepad.button_code(button).is_some());

    DeviceInfo {
        id: DeviceId::new(format!("{}-{}", uuid, gamepad_id)),
        name: gamepad.name().to_string(),
        axis_count,
        button_count,
        pov_count: usize::from(has_dpad),
    }
}

impl InputBackend for GilrsBackend {
    fn devices(&mut self) -> Result<Vec<DeviceInfo>, HardwareError> {
        // Drain pending events so connection changes are reflected
        while self.gilrs.next_event().is_some() {}

        // Identities and dead zones only live until the next enumeration
        self.ids.clear();
        self.dead_zones.clear();
        let mut devices = Vec::new();
        for (gamepad_id, gamepad) in self.gilrs.gamepads() {
            let info = device_info(gamepad_id, &gamepad);
            debug!("Found gamepad {} ({})", info.name, info.id);
            self.ids.insert(info.id.clone(), gamepad_id);
            devices.push(info);
        }
        Ok(devices)
    }

    fn axis_range(&self, id: &DeviceId, axis: AxisKind) -> Result<AxisRange, HardwareError> {
        let gamepad = self.gamepad(id)?;
        match gilrs_axis(axis).and_then(|a| gamepad.axis_code(a)) {
            Some(_) => Ok(RANGE),
            None => Err(HardwareError::not_found(id, axis)),
        }
    }

    fn set_axis_dead_zone(
        &mut self,
        id: &DeviceId,
        axis: AxisKind,
        units: i32,
    ) -> Result<(), HardwareError> {
        self.gamepad(id)?;
        self.dead_zones
            .insert((id.clone(), axis), units as f32 / DEAD_ZONE_UNITS);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalogue_mapping() {
        assert_eq!(gilrs_axis(AxisKind::X), Some(Axis::LeftStickX));
        assert_eq!(gilrs_axis(AxisKind::RotationZ), Some(Axis::RightZ));
        assert_eq!(gilrs_axis(AxisKind::Slider0), None);
        assert_eq!(gilrs_axis(AxisKind::Slider1), None);
    }

    #[test]
    fn test_reported_range_is_usable() {
        assert!(RANGE.is_usable());
        assert_eq!(RANGE.normalize(i16::MIN as i32), -1.0);
        assert_eq!(RANGE.normalize(i16::MAX as i32), 1.0);
    }
}
