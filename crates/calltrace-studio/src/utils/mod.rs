//! Utility modules for configuration, error handling, and settings.

pub mod config;
pub mod error;
pub mod settings;

// Re-export commonly used error types for convenience
pub use error::{
    FlamegraphError, IngestError, LoadError, OutputError, ParseError, RecordingError, Reference,
    SettingsError,
};
pub use settings::{load_settings, Settings};
