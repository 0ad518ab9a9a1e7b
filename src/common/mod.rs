//! # Common Components
//!
//! Shared utilities used by the library and the command-line front end.
//!
//! ## Modules
//!
//! - [`error`]: the library error type
//! - [`config`]: TOML configuration loading
//! - [`logging`]: `env_logger` setup for binaries

pub mod config;
pub mod error;
pub mod logging;
