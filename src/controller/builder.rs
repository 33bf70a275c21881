//! Device attribute builder
//!
//! Populates a [`Device`] for one physical device bound to one configuration
//! section: every catalogue axis, every POV position and every button, for every
//! enabled mode.
//!
//! # Failure handling
//!
//! A "not found" answer from the backend while probing an axis only marks that
//! axis unavailable. Any other hardware error aborts the build and propagates.

use super::backend::{dead_zone_units, AxisKind, DeviceInfo, HardwareError, InputBackend};
use super::device::{AxisEntry, ButtonEntry, Device, PovEntry};
use crate::mapping::{ControlNormalizer, DeviceDefaults, Modes, OverrideResolver};
use crate::source::ConfigSource;
use tracing::{debug, warn};

pub struct DeviceBuilder<'a> {
    resolver: OverrideResolver<'a>,
}

impl<'a> DeviceBuilder<'a> {
    pub fn new(source: &'a dyn ConfigSource, modes: &'a Modes) -> Self {
        Self {
            resolver: OverrideResolver::new(source, modes),
        }
    }

    pub fn build(
        &self,
        info: &DeviceInfo,
        section: &str,
        backend: &mut dyn InputBackend,
    ) -> Result<Device, HardwareError> {
        let modes = self.resolver.modes();
        let defaults = DeviceDefaults::read(self.resolver.source(), section);
        let normalizer = ControlNormalizer::new(self.resolver, section, defaults);

        let enabled_modes: Vec<bool> = (0..modes.len())
            .map(|mode| self.resolver.is_mode_enabled(section, mode))
            .collect();
        debug!(
            "Building '{}' from [{}]: DeadZone = {}, Factor = {}, enabled modes = {:?}",
            info.name, section, defaults.dead_zone, defaults.factor, enabled_modes
        );

        let mut axes = Vec::with_capacity(AxisKind::ALL.len());
        for axis in AxisKind::ALL {
            let entry = match self.build_axis(info, axis, &normalizer, &enabled_modes, backend) {
                Ok(entry) => entry,
                Err(e) if e.is_not_found() => {
                    debug!("Axis {} not present on '{}'", axis, info.name);
                    AxisEntry::unavailable(axis, modes.len())
                }
                Err(e) => return Err(e),
            };
            axes.push(entry);
        }

        let povs = (0..info.pov_count)
            .map(|index| self.build_pov(index, &normalizer, &enabled_modes))
            .collect();

        let buttons = (0..info.button_count)
            .map(|index| self.build_button(index, &normalizer, &enabled_modes))
            .collect();

        Ok(Device {
            id: info.id.clone(),
            name: info.name.clone(),
            section: section.to_string(),
            dead_zone: defaults.dead_zone,
            factor: defaults.factor,
            enabled_modes,
            axes,
            povs,
            buttons,
        })
    }

    fn build_axis(
        &self,
        info: &DeviceInfo,
        axis: AxisKind,
        normalizer: &ControlNormalizer<'_>,
        enabled_modes: &[bool],
        backend: &mut dyn InputBackend,
    ) -> Result<AxisEntry, HardwareError> {
        let range = backend.axis_range(&info.id, axis)?;
        let mut entry = AxisEntry::new(axis, range, enabled_modes.len());

        if !entry.is_available {
            warn!(
                "Axis {} of '{}' was disabled because its range is zero",
                axis, info.name
            );
            return Ok(entry);
        }

        for mode in enabled(enabled_modes) {
            let normalized = normalizer.normalize(axis.config_name(), mode);

            if axis.accepts_hardware_dead_zone() {
                backend.set_axis_dead_zone(
                    &info.id,
                    axis,
                    dead_zone_units(normalized.control.dead_zone),
                )?;
            }

            let mappings = if normalized.control.is_button_like() {
                format!(
                    "Mapping.Min = '{}', Mapping.Max = '{}'",
                    normalized.primary.action, normalized.secondary.action
                )
            } else {
                format!("Mapping = '{}'", normalized.primary.action)
            };
            debug!(
                "Axis {} [{}]: Range [{}, {}], DeadZone = {}, Factor = {}, {}, Inverted = {}",
                axis,
                self.mode_name(mode),
                range.min,
                range.max,
                normalized.control.dead_zone,
                normalized.control.factor,
                mappings,
                normalized.control.inverted
            );

            entry.controls[mode] = normalized.control;
            entry.mapping1[mode] = normalized.primary;
            entry.mapping2[mode] = normalized.secondary;
        }

        Ok(entry)
    }

    fn build_pov(
        &self,
        index: usize,
        normalizer: &ControlNormalizer<'_>,
        enabled_modes: &[bool],
    ) -> PovEntry {
        let mut pov = PovEntry::new(enabled_modes.len());

        for button in pov.positions.iter_mut() {
            let key = format!("POV{}.{}", index + 1, button.position);
            for mode in enabled(enabled_modes) {
                button.continuous[mode] = normalizer.continuous(&key, mode);
                button.mappings[mode] = normalizer.mapping(&key, mode);
            }
        }

        for mode in enabled(enabled_modes) {
            let summary: Vec<String> = pov
                .positions
                .iter()
                .map(|b| format!("{} = '{}'", b.position, b.mappings[mode].action))
                .collect();
            debug!(
                "POV #{} [{}]: {}",
                index + 1,
                self.mode_name(mode),
                summary.join(", ")
            );
        }

        pov
    }

    fn build_button(
        &self,
        index: usize,
        normalizer: &ControlNormalizer<'_>,
        enabled_modes: &[bool],
    ) -> ButtonEntry {
        let mut button = ButtonEntry::new(enabled_modes.len());
        let key = format!("Button{}", index + 1);

        for mode in enabled(enabled_modes) {
            button.continuous[mode] = normalizer.continuous(&key, mode);
            button.mappings[mode] = normalizer.mapping(&key, mode);
            debug!(
                "Button #{} [{}]: Mapping = '{}', Value = {}",
                index + 1,
                self.mode_name(mode),
                button.mappings[mode].action,
                button.mappings[mode].value
            );
        }

        button
    }

    fn mode_name(&self, mode: usize) -> &str {
        self.resolver.modes().name(mode).unwrap_or("?")
    }
}

fn enabled(enabled_modes: &[bool]) -> impl Iterator<Item = usize> + '_ {
    enabled_modes
        .iter()
        .enumerate()
        .filter(|(_, on)| **on)
        .map(|(mode, _)| mode)
}
