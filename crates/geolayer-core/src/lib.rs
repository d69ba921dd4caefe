//! Geolayer Core - Domain models, error taxonomy, and configuration
//!
//! This crate holds the types shared by the normalizer, the storage adapters
//! and the HTTP surface.

pub mod config;
pub mod error;
pub mod models;

pub use error::{GeolayerError, Result};
