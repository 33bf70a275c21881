//! altinput - input device mapping configuration
//!
//! Resolves an override-based mapping file into per-device, per-mode mappings
//! between physical controls and game actions.
//!
//! ```text
//! ConfigSource ──► mapping ──► controller::DeviceBuilder ──► loader ──► Snapshot
//!                                     ▲
//!                     InputBackend ───┘
//! ```

pub mod config;
pub mod controller;
pub mod loader;
pub mod mapping;
pub mod source;

pub use config::Settings;
pub use loader::{load, load_path, ConfigHandle, DeviceList, LoadError, LoadOutcome, Snapshot};
