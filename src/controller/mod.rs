//! Device side of the loader
//!
//! 1. [`backend`] - the [`InputBackend`] boundary and hardware-facing types
//! 2. [`device`] - fully resolved [`Device`] records
//! 3. [`builder`] - populates a [`Device`] from one configuration section
//! 4. [`gilrs_backend`] / [`static_backend`] - backend implementations
//!
//! # Architecture
//!
//! ```text
//! InputBackend ──► DeviceInfo ──► DeviceBuilder ──► Device
//!                                  ▲
//!                  OverrideResolver┘
//! ```

pub mod backend;
pub mod builder;
pub mod device;
pub mod gilrs_backend;
pub mod static_backend;

pub use backend::{
    dead_zone_units, AxisKind, AxisRange, DeviceId, DeviceInfo, HardwareError, InputBackend,
};
pub use builder::DeviceBuilder;
pub use device::{AxisEntry, ButtonEntry, Device, PovButton, PovEntry, PovPosition};
pub use gilrs_backend::GilrsBackend;
pub use static_backend::{StaticAxis, StaticBackend, StaticDevice};
