//! Utility modules for mutorch
//!
//! - Structured logging configuration and the explicitly passed [`Logger`]
//! - Lexical path normalization used by project matching

pub mod logging;
pub mod paths;

pub use logging::{parse_level, Logger, LoggingConfig};
pub use paths::{normalize_path, normalized_parent, resolve_relative};
