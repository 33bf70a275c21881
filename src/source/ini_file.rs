//! INI configuration file
//!
//! Reads the `config.ini` layout: `[Section]` headers, `key = value` lines and
//! `;` or `#` comment lines. Section and key lookups ignore ASCII case; values
//! are returned verbatim apart from trimming and one pair of enclosing quotes.
//! A repeated section header continues the first section of that name, and the
//! first occurrence of a repeated key wins.

use super::{ConfigSource, SourceError};
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use tracing::debug;

#[derive(Debug, Clone, Default)]
struct IniSection {
    name: String,
    entries: Vec<(String, String)>,
    // lowercased key -> index into entries
    keys: HashMap<String, usize>,
}

impl IniSection {
    fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            ..Default::default()
        }
    }

    fn insert(&mut self, key: &str, value: &str) {
        let folded = key.to_ascii_lowercase();
        if self.keys.contains_key(&folded) {
            debug!("Ignoring repeated key '{}' in section [{}]", key, self.name);
            return;
        }
        self.keys.insert(folded, self.entries.len());
        self.entries.push((key.to_string(), value.to_string()));
    }

    fn get(&self, key: &str) -> Option<&str> {
        self.keys
            .get(&key.to_ascii_lowercase())
            .map(|&i| self.entries[i].1.as_str())
    }
}

/// A parsed INI file
#[derive(Debug, Clone, Default)]
pub struct IniFile {
    sections: Vec<IniSection>,
    // lowercased section name -> index into sections
    index: HashMap<String, usize>,
}

impl IniFile {
    pub fn open(path: &Path) -> Result<Self, SourceError> {
        debug!("Reading configuration from {}", path.display());
        let content = fs::read_to_string(path).map_err(|source| SourceError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Self::parse(&content))
    }

    /// Parses INI text. Lines that are neither headers nor assignments are skipped.
    pub fn parse(content: &str) -> Self {
        let mut file = IniFile::default();
        let mut current: Option<usize> = None;

        for (number, line) in content.lines().enumerate() {
            let line = line.trim().trim_start_matches('\u{feff}');

            if line.is_empty() || line.starts_with(';') || line.starts_with('#') {
                continue;
            }

            if line.starts_with('[') && line.ends_with(']') {
                let name = line[1..line.len() - 1].trim();
                current = Some(file.section_index(name));
                continue;
            }

            match (current, line.split_once('=')) {
                (Some(section), Some((key, value))) => {
                    let key = key.trim();
                    if key.is_empty() {
                        continue;
                    }
                    file.sections[section].insert(key, unquote(value.trim()));
                }
                (None, Some(_)) => {
                    debug!("Line {}: assignment outside of any section", number + 1);
                }
                (_, None) => {
                    debug!("Line {}: not a section header or assignment", number + 1);
                }
            }
        }

        file
    }

    fn section_index(&mut self, name: &str) -> usize {
        let folded = name.to_ascii_lowercase();
        if let Some(&index) = self.index.get(&folded) {
            return index;
        }
        self.sections.push(IniSection::new(name));
        let index = self.sections.len() - 1;
        self.index.insert(folded, index);
        index
    }

    fn section(&self, name: &str) -> Option<&IniSection> {
        self.index
            .get(&name.to_ascii_lowercase())
            .map(|&i| &self.sections[i])
    }
}

fn unquote(value: &str) -> &str {
    for quote in ['"', '\''] {
        if value.len() >= 2 && value.starts_with(quote) && value.ends_with(quote) {
            return &value[1..value.len() - 1];
        }
    }
    value
}

impl ConfigSource for IniFile {
    fn read_value(&self, section: &str, key: &str) -> String {
        self.section(section)
            .and_then(|s| s.get(key))
            .unwrap_or_default()
            .to_string()
    }

    fn sections(&self) -> Vec<String> {
        self.sections.iter().map(|s| s.name.clone()).collect()
    }

    fn section_keys(&self, section: &str) -> Vec<String> {
        self.section(section)
            .map(|s| s.entries.iter().map(|(k, _)| k.clone()).collect())
            .unwrap_or_default()
    }
}
