//! Resolved device records
//!
//! A [`Device`] is the fully populated mapping of one physical device bound to
//! one configuration section. All per-mode vectors are indexed by mode and hold
//! defaults for modes the section does not enable.

use super::backend::{AxisKind, AxisRange, DeviceId};
use crate::mapping::{Control, Mapping};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Directional positions of a POV switch, clockwise from `Up`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PovPosition {
    Up,
    UpRight,
    Right,
    DownRight,
    Down,
    DownLeft,
    Left,
    UpLeft,
}

impl PovPosition {
    pub const ALL: [PovPosition; 8] = [
        PovPosition::Up,
        PovPosition::UpRight,
        PovPosition::Right,
        PovPosition::DownRight,
        PovPosition::Down,
        PovPosition::DownLeft,
        PovPosition::Left,
        PovPosition::UpLeft,
    ];

    pub fn name(self) -> &'static str {
        match self {
            PovPosition::Up => "Up",
            PovPosition::UpRight => "UpRight",
            PovPosition::Right => "Right",
            PovPosition::DownRight => "DownRight",
            PovPosition::Down => "Down",
            PovPosition::DownLeft => "DownLeft",
            PovPosition::Left => "Left",
            PovPosition::UpLeft => "UpLeft",
        }
    }
}

impl fmt::Display for PovPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AxisEntry {
    pub axis: AxisKind,
    pub range: AxisRange,
    /// False when the axis is missing or its range is zero-width
    pub is_available: bool,
    pub controls: Vec<Control>,
    /// Axis mapping, or the `.Min` mapping when the axis acts as buttons
    pub mapping1: Vec<Mapping>,
    /// `.Max` mapping when the axis acts as buttons
    pub mapping2: Vec<Mapping>,
}

impl AxisEntry {
    pub fn new(axis: AxisKind, range: AxisRange, num_modes: usize) -> Self {
        Self {
            axis,
            range,
            is_available: range.is_usable(),
            controls: vec![Control::default(); num_modes],
            mapping1: vec![Mapping::default(); num_modes],
            mapping2: vec![Mapping::default(); num_modes],
        }
    }

    pub fn unavailable(axis: AxisKind, num_modes: usize) -> Self {
        Self::new(axis, AxisRange::default(), num_modes)
    }
}

/// One direction of a POV switch
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PovButton {
    pub position: PovPosition,
    pub mappings: Vec<Mapping>,
    pub continuous: Vec<bool>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PovEntry {
    pub positions: Vec<PovButton>,
}

impl PovEntry {
    pub fn new(num_modes: usize) -> Self {
        Self {
            positions: PovPosition::ALL
                .iter()
                .map(|&position| PovButton {
                    position,
                    mappings: vec![Mapping::default(); num_modes],
                    continuous: vec![false; num_modes],
                })
                .collect(),
        }
    }

    pub fn position(&self, position: PovPosition) -> Option<&PovButton> {
        self.positions.iter().find(|b| b.position == position)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ButtonEntry {
    pub mappings: Vec<Mapping>,
    pub continuous: Vec<bool>,
}

impl ButtonEntry {
    pub fn new(num_modes: usize) -> Self {
        Self {
            mappings: vec![Mapping::default(); num_modes],
            continuous: vec![false; num_modes],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Device {
    pub id: DeviceId,
    pub name: String,
    /// Configuration section the device was bound to
    pub section: String,
    /// Device-wide dead zone fallback
    pub dead_zone: f32,
    /// Device-wide factor fallback, never zero
    pub factor: f32,
    pub enabled_modes: Vec<bool>,
    pub axes: Vec<AxisEntry>,
    pub povs: Vec<PovEntry>,
    pub buttons: Vec<ButtonEntry>,
}

impl Device {
    pub fn is_mode_enabled(&self, mode: usize) -> bool {
        self.enabled_modes.get(mode).copied().unwrap_or(false)
    }

    pub fn axis(&self, axis: AxisKind) -> Option<&AxisEntry> {
        self.axes.iter().find(|a| a.axis == axis)
    }

    /// Button by 1-based number, as written in the configuration
    pub fn button(&self, number: usize) -> Option<&ButtonEntry> {
        number.checked_sub(1).and_then(|i| self.buttons.get(i))
    }

    /// POV by 1-based number, as written in the configuration
    pub fn pov(&self, number: usize) -> Option<&PovEntry> {
        number.checked_sub(1).and_then(|i| self.povs.get(i))
    }

    pub fn available_axes(&self) -> impl Iterator<Item = &AxisEntry> {
        self.axes.iter().filter(|a| a.is_available)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_axis_entry_tracks_range() {
        let entry = AxisEntry::new(AxisKind::X, AxisRange::new(0, 255), 3);
        assert!(entry.is_available);
        assert_eq!(entry.controls.len(), 3);
        assert_eq!(entry.mapping1.len(), 3);
        assert_eq!(entry.mapping2.len(), 3);

        let flat = AxisEntry::new(AxisKind::Y, AxisRange::new(7, 7), 3);
        assert!(!flat.is_available);
        assert!(!AxisEntry::unavailable(AxisKind::Z, 3).is_available);
    }

    #[test]
    fn test_pov_entry_has_all_positions() {
        let pov = PovEntry::new(2);
        assert_eq!(pov.positions.len(), 8);
        assert_eq!(pov.positions[0].position, PovPosition::Up);
        assert_eq!(pov.positions[7].position, PovPosition::UpLeft);
        assert_eq!(
            pov.position(PovPosition::DownLeft).map(|b| b.mappings.len()),
            Some(2)
        );
    }

    #[test]
    fn test_one_based_lookups() {
        let device = Device {
            id: DeviceId::new("a"),
            name: "Stick".to_string(),
            section: "Stick".to_string(),
            dead_zone: 0.0,
            factor: 1.0,
            enabled_modes: vec![true, false],
            axes: Vec::new(),
            povs: vec![PovEntry::new(2)],
            buttons: vec![ButtonEntry::new(2), ButtonEntry::new(2)],
        };
        assert!(device.button(0).is_none());
        assert!(device.button(2).is_some());
        assert!(device.button(3).is_none());
        assert!(device.pov(1).is_some());
        assert!(device.is_mode_enabled(0));
        assert!(!device.is_mode_enabled(1));
        assert!(!device.is_mode_enabled(5));
    }
}
