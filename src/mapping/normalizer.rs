//! Per-control normalization
//!
//! Resolves dead zone, factor, inversion, control type and the mapping(s) of one
//! physical control in one mode. Per-control values that resolve to exactly `0`
//! fall back to the device-wide defaults, so a control cannot be given a zero
//! dead zone while its device declares a non-zero one.

use super::classifier::classify;
use super::mapping_types::{Control, ControlType, Mapping};
use super::resolver::{parse_or_default, OverrideResolver};
use crate::source::ConfigSource;
use tracing::warn;

const DEAD_ZONE: &str = "DeadZone";
const FACTOR: &str = "Factor";
const INVERTED: &str = ".Inverted";
const MIN: &str = ".Min";
const MAX: &str = ".Max";
const CONTINUOUS: &str = ".Continuous";

/// Device-wide fallbacks read from the base section of a device
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DeviceDefaults {
    pub dead_zone: f32,
    /// Never zero
    pub factor: f32,
}

impl Default for DeviceDefaults {
    fn default() -> Self {
        Self {
            dead_zone: 0.0,
            factor: 1.0,
        }
    }
}

impl DeviceDefaults {
    pub fn read(source: &dyn ConfigSource, section: &str) -> Self {
        let dead_zone = parse_or_default(&source.read_value(section, DEAD_ZONE), 0.0);
        let factor = parse_or_default(&source.read_value(section, FACTOR), 0.0);
        Self {
            dead_zone: valid_dead_zone(dead_zone, 0.0),
            factor: normalize_factor(factor),
        }
    }
}

/// Dead zones are fractions of the axis range. Anything outside `(0, 1]`,
/// including `NaN`, is treated as unset and replaced by `fallback`.
pub fn valid_dead_zone(dead_zone: f32, fallback: f32) -> f32 {
    if dead_zone > 0.0 && dead_zone <= 1.0 {
        dead_zone
    } else {
        if dead_zone != 0.0 {
            warn!("Ignoring dead zone {} outside of [0, 1]", dead_zone);
        }
        fallback
    }
}

/// An unset (zero) factor means "no scaling"
pub fn normalize_factor(factor: f32) -> f32 {
    if factor == 0.0 {
        1.0
    } else {
        factor
    }
}

/// Result of normalizing one control in one mode
#[derive(Debug, Clone, PartialEq, Default)]
pub struct NormalizedControl {
    pub control: Control,
    /// Axis mapping, or the `.Min` mapping of a button-like axis
    pub primary: Mapping,
    /// `.Max` mapping of a button-like axis; unmapped for plain axes
    pub secondary: Mapping,
}

pub struct ControlNormalizer<'a> {
    resolver: OverrideResolver<'a>,
    section: &'a str,
    defaults: DeviceDefaults,
}

impl<'a> ControlNormalizer<'a> {
    pub fn new(resolver: OverrideResolver<'a>, section: &'a str, defaults: DeviceDefaults) -> Self {
        Self {
            resolver,
            section,
            defaults,
        }
    }

    pub fn defaults(&self) -> DeviceDefaults {
        self.defaults
    }

    pub fn normalize(&self, name: &str, mode: usize) -> NormalizedControl {
        let control = self.control(name, mode);

        if control.control_type == ControlType::Axis {
            NormalizedControl {
                control,
                primary: self.mapping(name, mode),
                secondary: Mapping::default(),
            }
        } else {
            NormalizedControl {
                control,
                primary: self.mapping(&format!("{}{}", name, MIN), mode),
                secondary: self.mapping(&format!("{}{}", name, MAX), mode),
            }
        }
    }

    pub fn control(&self, name: &str, mode: usize) -> Control {
        let dead_zone = self.resolve_f32(&format!("{}.{}", name, DEAD_ZONE), mode);
        let factor = self.resolve_f32(&format!("{}.{}", name, FACTOR), mode);
        let inverted = self
            .resolver
            .resolve_or(self.section, &format!("{}{}", name, INVERTED), mode, false);

        let has_bounds = self
            .resolver
            .is_defined(self.section, &format!("{}{}", name, MIN), mode)
            || self
                .resolver
                .is_defined(self.section, &format!("{}{}", name, MAX), mode);

        let control_type = if !has_bounds {
            ControlType::Axis
        } else if self.continuous(name, mode) {
            ControlType::Continuous
        } else {
            ControlType::OneShot
        };

        Control {
            control_type,
            inverted,
            dead_zone: valid_dead_zone(dead_zone, self.defaults.dead_zone),
            factor: if factor == 0.0 {
                self.defaults.factor
            } else {
                factor
            },
        }
    }

    /// Mapping for `key` (a control name, possibly with a suffix) in `mode`
    pub fn mapping(&self, key: &str, mode: usize) -> Mapping {
        classify(&self.resolver.resolve(self.section, key, mode))
    }

    /// Resolved `<name>.Continuous` flag
    pub fn continuous(&self, name: &str, mode: usize) -> bool {
        self.resolver
            .resolve_or(self.section, &format!("{}{}", name, CONTINUOUS), mode, false)
    }

    fn resolve_f32(&self, key: &str, mode: usize) -> f32 {
        self.resolver.resolve_or(self.section, key, mode, 0.0)
    }
}
