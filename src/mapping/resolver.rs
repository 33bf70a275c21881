//! Three-tier override resolution
//!
//! Every attribute of every control is looked up through [`OverrideResolver`]:
//!
//! ```text
//! 1. [Section]              key   common value
//! 2. [Section.<mode 0>]     key   only if mode != 0 and (1) was empty
//! 3. [Section.<mode m>]     key   replaces (1)/(2) whenever non-empty
//! ```
//!
//! Parsing of the resolved string goes through [`parse_or_default`], which never
//! fails: malformed user input silently yields the supplied default.

use crate::config::SettingsError;
use crate::source::ConfigSource;

/// Ordered list of operating modes; index 0 is the default mode
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Modes {
    names: Vec<String>,
}

impl Modes {
    pub const DEFAULT: usize = 0;

    pub fn new<I, S>(names: I) -> Result<Self, SettingsError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let names: Vec<String> = names.into_iter().map(Into::into).collect();
        if names.is_empty() {
            return Err(SettingsError::NoModes);
        }
        if let Some(index) = names.iter().position(|n| n.trim().is_empty()) {
            return Err(SettingsError::EmptyModeName(index));
        }
        Ok(Self { names })
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn name(&self, mode: usize) -> Option<&str> {
        self.names.get(mode).map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (usize, &str)> {
        self.names.iter().map(String::as_str).enumerate()
    }

    /// Name of the override section for `section` in `mode`
    pub fn section_for(&self, section: &str, mode: usize) -> Option<String> {
        self.name(mode).map(|name| format!("{}.{}", section, name))
    }

    /// True for override-only sections such as `Saitek X52.Flight`.
    /// The suffix ignores ASCII case, like section lookups in an INI file.
    pub fn is_override_section(&self, section: &str) -> bool {
        self.names.iter().any(|name| {
            let suffix = format!(".{}", name);
            section
                .len()
                .checked_sub(suffix.len())
                .and_then(|start| section.get(start..))
                .is_some_and(|tail| tail.eq_ignore_ascii_case(&suffix))
        })
    }
}

/// Values that can be read out of a resolved configuration string
pub trait ConfigValue: Sized {
    fn parse_value(raw: &str) -> Option<Self>;
}

impl ConfigValue for f32 {
    fn parse_value(raw: &str) -> Option<Self> {
        raw.trim().parse().ok()
    }
}

impl ConfigValue for bool {
    fn parse_value(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        if raw.eq_ignore_ascii_case("true") {
            Some(true)
        } else if raw.eq_ignore_ascii_case("false") {
            Some(false)
        } else {
            None
        }
    }
}

/// Parses `raw`, falling back to `default` on empty or malformed input
pub fn parse_or_default<T: ConfigValue>(raw: &str, default: T) -> T {
    T::parse_value(raw).unwrap_or(default)
}

#[derive(Clone, Copy)]
pub struct OverrideResolver<'a> {
    source: &'a dyn ConfigSource,
    modes: &'a Modes,
}

impl<'a> OverrideResolver<'a> {
    pub fn new(source: &'a dyn ConfigSource, modes: &'a Modes) -> Self {
        Self { source, modes }
    }

    pub fn modes(&self) -> &'a Modes {
        self.modes
    }

    pub fn source(&self) -> &'a dyn ConfigSource {
        self.source
    }

    /// Resolves `key` for `section` in `mode`; empty when no tier defines it
    pub fn resolve(&self, section: &str, key: &str, mode: usize) -> String {
        let mut value = self.source.read_value(section, key);

        if mode != Modes::DEFAULT && value.is_empty() {
            if let Some(default_section) = self.modes.section_for(section, Modes::DEFAULT) {
                value = self.source.read_value(&default_section, key);
            }
        }

        if let Some(mode_section) = self.modes.section_for(section, mode) {
            let overridden = self.source.read_value(&mode_section, key);
            if !overridden.is_empty() {
                value = overridden;
            }
        }

        value
    }

    pub fn resolve_or<T: ConfigValue>(&self, section: &str, key: &str, mode: usize, default: T) -> T {
        parse_or_default(&self.resolve(section, key, mode), default)
    }

    pub fn is_defined(&self, section: &str, key: &str, mode: usize) -> bool {
        !self.resolve(section, key, mode).is_empty()
    }

    /// A mode is enabled for `section` when its override section has any keys.
    /// The default mode is always enabled.
    pub fn is_mode_enabled(&self, section: &str, mode: usize) -> bool {
        if mode == Modes::DEFAULT {
            return true;
        }
        self.modes
            .section_for(section, mode)
            .map(|s| self.source.has_keys(&s))
            .unwrap_or(false)
    }
}
