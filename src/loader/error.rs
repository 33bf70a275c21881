use crate::config::SettingsError;
use crate::controller::HardwareError;
use crate::source::SourceError;

/// Errors that stop a load pass
///
/// [`LoadError::MissingSource`] and [`LoadError::VersionMismatch`] only leave the
/// validating stage; [`super::load`] turns them into an empty snapshot.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("No configuration source available")]
    MissingSource,

    #[error("Configuration version '{found}' does not match expected version '{expected}'")]
    VersionMismatch { found: String, expected: String },

    #[error("Hardware error: {0}")]
    Hardware(#[from] HardwareError),

    #[error("Configuration source error: {0}")]
    Source(#[from] SourceError),

    #[error("Settings error: {0}")]
    Settings(#[from] SettingsError),
}
