//! Immutable load results

use crate::controller::{Device, DeviceId};
use chrono::{DateTime, Local};
use std::collections::HashMap;

/// Devices of one load pass, in insertion order, indexed by identity
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DeviceList {
    devices: Vec<Device>,
    index: HashMap<DeviceId, usize>,
}

impl DeviceList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, id: &DeviceId) -> bool {
        self.index.contains_key(id)
    }

    pub fn get(&self, id: &DeviceId) -> Option<&Device> {
        self.index.get(id).map(|&i| &self.devices[i])
    }

    /// Appends `device`; returns false and drops it if its identity is already present
    pub fn insert(&mut self, device: Device) -> bool {
        if self.contains(&device.id) {
            return false;
        }
        self.index.insert(device.id.clone(), self.devices.len());
        self.devices.push(device);
        true
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Device> {
        self.devices.iter()
    }

    pub fn len(&self) -> usize {
        self.devices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.devices.is_empty()
    }
}

impl<'a> IntoIterator for &'a DeviceList {
    type Item = &'a Device;
    type IntoIter = std::slice::Iter<'a, Device>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// How the pass that produced a snapshot ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadOutcome {
    /// Nothing has been loaded yet
    Pending,
    Loaded,
    MissingSource,
    VersionMismatch { found: String, expected: String },
    /// The pass aborted on an unexpected error
    Failed(String),
}

#[derive(Debug, Clone)]
pub struct Snapshot {
    pub devices: DeviceList,
    /// One summary line per detected device, matched or not
    pub detected: Vec<String>,
    pub outcome: LoadOutcome,
    pub loaded_at: DateTime<Local>,
}

impl Snapshot {
    pub fn empty(outcome: LoadOutcome) -> Self {
        Self {
            devices: DeviceList::new(),
            detected: Vec::new(),
            outcome,
            loaded_at: Local::now(),
        }
    }

    pub fn is_loaded(&self) -> bool {
        self.outcome == LoadOutcome::Loaded
    }
}
