//! Synergy Core - Domain models, configuration, loading, and export
//!
//! This crate holds the shared data model for spatial joins between a
//! reference (boundary) layer and any number of target (asset) layers.

pub mod config;
pub mod error;
pub mod export;
pub mod loader;
pub mod models;

pub use error::{Result, SynergyError};
