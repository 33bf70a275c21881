//! Mapping resolution
//!
//! Turns raw configuration strings into typed per-mode mappings and control
//! normalizations. Leaf-first:
//!
//! 1. [`resolver`] - three-tier override lookup and `parse_or_default`
//! 2. [`classifier`] - raw string to [`Mapping`]
//! 3. [`normalizer`] - dead zone, factor, inversion and control type of one control
//!
//! # Data flow
//!
//! ```text
//! ConfigSource ──► OverrideResolver ──► classify()        ──► Mapping
//!                                   └─► ControlNormalizer ──► Control
//! ```

pub mod classifier;
pub mod mapping_types;
pub mod normalizer;
pub mod resolver;

pub use classifier::classify;
pub use mapping_types::{Control, ControlType, Mapping, MappingType};
pub use normalizer::{
    normalize_factor, valid_dead_zone, ControlNormalizer, DeviceDefaults, NormalizedControl,
};
pub use resolver::{parse_or_default, ConfigValue, Modes, OverrideResolver};
