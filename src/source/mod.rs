//! Configuration source boundary
//!
//! The resolution logic only ever talks to a [`ConfigSource`]: a string-keyed
//! lookup over named sections where an absent value reads as the empty string.
//! The on-disk syntax lives behind this trait in [`ini_file`].
//!
//! - [`MemorySource`] keeps sections in memory and is used by embedding hosts and tests.
//! - [`IniFile`] reads the `config.ini` format shipped with the plugin.

pub mod ini_file;

pub use ini_file::IniFile;

use std::path::PathBuf;

/// Errors raised while opening a configuration source
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    #[error("Failed to read configuration file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Read-only, section-structured key/value lookup
pub trait ConfigSource {
    /// Returns the value of `key` in `section`, or an empty string when absent
    fn read_value(&self, section: &str, key: &str) -> String;

    /// All section names, in source order
    fn sections(&self) -> Vec<String>;

    /// All key names declared in `section`, in source order
    fn section_keys(&self, section: &str) -> Vec<String>;

    fn has_keys(&self, section: &str) -> bool {
        !self.section_keys(section).is_empty()
    }
}

/// In-memory configuration source with exact (case-sensitive) lookups
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MemorySource {
    sections: Vec<(String, Vec<(String, String)>)>,
}

impl MemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style variant of [`MemorySource::set`]
    pub fn with(mut self, section: &str, key: &str, value: &str) -> Self {
        self.set(section, key, value);
        self
    }

    /// Declares an empty section so it shows up in [`ConfigSource::sections`]
    pub fn with_section(mut self, section: &str) -> Self {
        self.section_mut(section);
        self
    }

    /// Sets `key` in `section`, creating the section if needed
    pub fn set(&mut self, section: &str, key: &str, value: &str) -> &mut Self {
        let entries = self.section_mut(section);
        match entries.iter_mut().find(|(k, _)| k == key) {
            Some((_, v)) => *v = value.to_string(),
            None => entries.push((key.to_string(), value.to_string())),
        }
        self
    }

    fn section_mut(&mut self, section: &str) -> &mut Vec<(String, String)> {
        let index = match self.sections.iter().position(|(name, _)| name == section) {
            Some(index) => index,
            None => {
                self.sections.push((section.to_string(), Vec::new()));
                self.sections.len() - 1
            }
        };
        &mut self.sections[index].1
    }

    fn section(&self, section: &str) -> Option<&[(String, String)]> {
        self.sections
            .iter()
            .find(|(name, _)| name == section)
            .map(|(_, entries)| entries.as_slice())
    }
}

impl ConfigSource for MemorySource {
    fn read_value(&self, section: &str, key: &str) -> String {
        self.section(section)
            .and_then(|entries| entries.iter().find(|(k, _)| k == key))
            .map(|(_, v)| v.clone())
            .unwrap_or_default()
    }

    fn sections(&self) -> Vec<String> {
        self.sections.iter().map(|(name, _)| name.clone()).collect()
    }

    fn section_keys(&self, section: &str) -> Vec<String> {
        self.section(section)
            .map(|entries| entries.iter().map(|(k, _)| k.clone()).collect())
            .unwrap_or_default()
    }
}
