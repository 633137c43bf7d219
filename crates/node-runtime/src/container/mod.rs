//! # Node Container
//!
//! Central container holding all subsystem instances with explicit
//! dependency injection. Subsystems never look each other up; every
//! collaborator is passed in at construction.

pub mod config;
pub mod subsystems;

pub use config::{ConfigError, NodeConfig, RuntimeConfig};
pub use subsystems::NodeContainer;
