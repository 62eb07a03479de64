//! Amalgam Core
//!
//! Core types for the Amalgam source amalgamation engine.

pub mod config;
pub mod error;
pub mod unit;

pub use config::{Config, OutputConfig};
pub use error::{Error, Result};
pub use unit::{Manifest, Role, Unit, Variant};
