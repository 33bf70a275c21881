//! Data types shared by the mapping layer
//!
//! A [`Mapping`] binds one physical control, in one mode, to a game action.
//! A [`Control`] carries the per-mode normalization of that physical control.

use serde::{Deserialize, Serialize};
use std::fmt;

/// How the value of a mapped control is delivered to its action
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum MappingType {
    /// The raw control value is passed through
    #[default]
    Range,
    /// The action is set to a fixed value
    Absolute,
    /// The value is added to the action on every tick
    Delta,
}

impl fmt::Display for MappingType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MappingType::Range => write!(f, "Range"),
            MappingType::Absolute => write!(f, "Absolute"),
            MappingType::Delta => write!(f, "Delta"),
        }
    }
}

/// Resolved binding of a control to an action for one mode
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Mapping {
    pub mapping_type: MappingType,
    /// Target action; empty when the control is unmapped in this mode
    pub action: String,
    /// Fixed value for [`MappingType::Absolute`], step for [`MappingType::Delta`]
    pub value: f32,
}

impl Mapping {
    pub fn is_mapped(&self) -> bool {
        !self.action.is_empty()
    }
}

/// Behaviour of a physical control
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ControlType {
    /// Continuous axis
    #[default]
    Axis,
    /// Button-like, fires once per activation
    OneShot,
    /// Button-like, repeats while held
    Continuous,
}

/// Normalization of one physical control in one mode
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Control {
    pub control_type: ControlType,
    pub inverted: bool,
    /// Fraction of the range treated as rest, in `[0, 1]`
    pub dead_zone: f32,
    /// Sensitivity multiplier
    pub factor: f32,
}

impl Default for Control {
    fn default() -> Self {
        Self {
            control_type: ControlType::Axis,
            inverted: false,
            dead_zone: 0.0,
            factor: 1.0,
        }
    }
}

impl Control {
    pub fn is_button_like(&self) -> bool {
        self.control_type != ControlType::Axis
    }
}
