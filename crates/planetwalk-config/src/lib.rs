//! Configuration for the planetwalk client.
//!
//! Settings persist to disk as RON, tolerate missing and unknown fields for
//! forward/backward compatibility, and can be overridden from the command
//! line via clap.

mod cli;
mod config;
mod error;

pub use cli::CliArgs;
pub use config::{Config, DebugConfig, InputConfig, NetworkConfig, SyncConfig};
pub use error::ConfigError;
