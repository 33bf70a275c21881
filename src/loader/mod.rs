//! Configuration loader with statum state machine
//!
//! One load pass binds every detected device to the first configuration
//! section that accepts it and returns the result as an immutable [`Snapshot`].
//!
//! # State Machine
//!
//! ```text
//! Idle ──► Validating ──► Enumerating ──► Matching ──► Done
//!              │
//!              └──► (MissingSource | VersionMismatch) ──► empty Snapshot
//! ```
//!
//! Hardware errors other than "not found" abort the pass from any stage.

pub mod config_handle;
pub mod error;
pub mod snapshot;

pub use config_handle::ConfigHandle;
pub use error::LoadError;
pub use snapshot::{DeviceList, LoadOutcome, Snapshot};

use crate::config::{ConfigVersion, Settings};
use crate::controller::{DeviceBuilder, DeviceInfo, InputBackend};
use crate::mapping::Modes;
use crate::source::{ConfigSource, IniFile, SourceError};
use chrono::Local;
use statum::{machine, state};
use std::path::Path;
use tracing::{debug, info, warn};

const VERSION: &str = "Version";
const INTERFACE: &str = "Interface";
const IGNORE: &str = "Ignore";
/// Only this exact spelling marks a section as ignored
const IGNORE_SET: &str = "true";
const CLASS: &str = "Class";

#[state]
#[derive(Debug, Clone)]
pub enum LoaderState {
    Idle,
    Validating,
    Enumerating,
    Matching,
    Done,
}

#[machine]
pub struct ConfigLoader<S: LoaderState> {
    settings: Settings,
    modes: Modes,
    source: Option<Box<dyn ConfigSource>>,
    detected: Vec<DeviceInfo>,
    devices: DeviceList,
}

impl<S: LoaderState> ConfigLoader<S> {
    pub fn modes(&self) -> &Modes {
        &self.modes
    }

    pub fn devices(&self) -> &DeviceList {
        &self.devices
    }
}

impl ConfigLoader<Idle> {
    pub fn create(
        settings: Settings,
        source: Option<Box<dyn ConfigSource>>,
    ) -> Result<Self, LoadError> {
        let modes = Modes::new(settings.modes.iter().cloned())?;
        debug!("Creating configuration loader with modes {:?}", settings.modes);
        Ok(Self::new(settings, modes, source, Vec::new(), DeviceList::new()))
    }

    pub fn open(self) -> ConfigLoader<Validating> {
        info!("Loading configuration");
        self.transition()
    }
}

impl ConfigLoader<Validating> {
    /// Checks that a source exists and declares the expected version
    pub fn validate(self) -> Result<ConfigLoader<Enumerating>, LoadError> {
        let Some(source) = self.source.as_deref() else {
            warn!("No configuration file found, no devices will be mapped");
            return Err(LoadError::MissingSource);
        };

        let expected = self.settings.expected_version()?;
        let found = source.read_value(&self.settings.global_section, VERSION);
        match found.parse::<ConfigVersion>() {
            Ok(version) if version == expected => {
                debug!("Configuration version {} accepted", version);
                Ok(self.transition())
            }
            _ => {
                warn!(
                    "Configuration version '{}' does not match expected version {}",
                    found, expected
                );
                Err(LoadError::VersionMismatch {
                    found,
                    expected: expected.to_string(),
                })
            }
        }
    }
}

impl ConfigLoader<Enumerating> {
    pub fn enumerate(
        mut self,
        backend: &mut dyn InputBackend,
    ) -> Result<ConfigLoader<Matching>, LoadError> {
        self.detected = backend.devices()?;
        for info in &self.detected {
            info!("{}", info.summary());
        }
        Ok(self.transition())
    }
}

impl ConfigLoader<Matching> {
    /// Binds each detected device to the first section that accepts it
    pub fn match_devices(
        mut self,
        backend: &mut dyn InputBackend,
    ) -> Result<ConfigLoader<Done>, LoadError> {
        let source = self.source.as_deref().ok_or(LoadError::MissingSource)?;
        let candidates = candidate_sections(source, &self.settings, &self.modes);
        debug!("Candidate sections: {:?}", candidates);
        let builder = DeviceBuilder::new(source, &self.modes);

        for info in &self.detected {
            for section in candidates.iter().filter(|s| info.name.contains(s.as_str())) {
                let interface = source.read_value(section, INTERFACE);
                if interface.is_empty() || source.read_value(section, IGNORE) == IGNORE_SET {
                    debug!("Section [{}] ignores '{}'", section, info.name);
                    break;
                }
                if interface != self.settings.interface {
                    warn!(
                        "Section [{}] uses unsupported interface '{}'",
                        section, interface
                    );
                    continue;
                }

                let class = source.read_value(section, CLASS);
                if !class.is_empty() && class != self.settings.device_class {
                    warn!("Section [{}] uses unsupported class '{}'", section, class);
                    continue;
                }

                if self.devices.contains(&info.id) {
                    warn!(
                        "Device '{}' ({}) is already mapped, skipping section [{}]",
                        info.name, info.id, section
                    );
                    continue;
                }

                let device = builder.build(info, section, backend)?;
                info!("Added device '{}' using section [{}]", info.name, section);
                self.devices.insert(device);
                break;
            }
        }

        Ok(self.transition())
    }
}

impl ConfigLoader<Done> {
    pub fn into_snapshot(self) -> Snapshot {
        info!(
            "Configuration loaded: {} of {} detected device(s) mapped",
            self.devices.len(),
            self.detected.len()
        );
        Snapshot {
            devices: self.devices,
            detected: self.detected.iter().map(DeviceInfo::summary).collect(),
            outcome: LoadOutcome::Loaded,
            loaded_at: Local::now(),
        }
    }
}

/// Sections eligible for binding: everything but the global and mode override sections
fn candidate_sections(source: &dyn ConfigSource, settings: &Settings, modes: &Modes) -> Vec<String> {
    source
        .sections()
        .into_iter()
        .filter(|s| !s.eq_ignore_ascii_case(&settings.global_section))
        .filter(|s| !modes.is_override_section(s))
        .collect()
}

/// Runs one complete load pass
///
/// A missing source or a version mismatch yields an empty snapshot carrying the
/// matching [`LoadOutcome`]; unexpected hardware errors are returned.
pub fn load(
    settings: &Settings,
    source: Option<Box<dyn ConfigSource>>,
    backend: &mut dyn InputBackend,
) -> Result<Snapshot, LoadError> {
    let loader = ConfigLoader::create(settings.clone(), source)?.open();

    let loader = match loader.validate() {
        Ok(loader) => loader,
        Err(LoadError::MissingSource) => return Ok(Snapshot::empty(LoadOutcome::MissingSource)),
        Err(LoadError::VersionMismatch { found, expected }) => {
            return Ok(Snapshot::empty(LoadOutcome::VersionMismatch {
                found,
                expected,
            }))
        }
        Err(e) => return Err(e),
    };

    Ok(loader
        .enumerate(backend)?
        .match_devices(backend)?
        .into_snapshot())
}

/// Opens the mapping file at `path`; an absent file is not an error
pub fn open_source(path: &Path) -> Result<Option<Box<dyn ConfigSource>>, SourceError> {
    if !path.exists() {
        warn!("Configuration file {} does not exist", path.display());
        return Ok(None);
    }
    let source: Box<dyn ConfigSource> = Box::new(IniFile::open(path)?);
    Ok(Some(source))
}

/// [`load`] with the mapping file named in `settings`
pub fn load_path(settings: &Settings, backend: &mut dyn InputBackend) -> Result<Snapshot, LoadError> {
    let source = open_source(&settings.config_path)?;
    load(settings, source, backend)
}
