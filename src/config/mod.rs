//! Configuration management
//!
//! This module handles loading credentials, endpoints and client policies.

pub mod loader;
pub mod settings;

pub use loader::ConfigLoader;
pub use settings::{Secret, Settings};
