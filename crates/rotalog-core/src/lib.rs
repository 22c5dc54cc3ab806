//! Rotalog Core - Shared types, configuration, and error handling

pub mod config;
pub mod constants;
pub mod error;
pub mod level;
pub mod properties;

pub use config::{AppenderConfig, AppenderKind, LogConfig};
pub use error::{Error, Result};
pub use level::Level;
pub use properties::Properties;
