//! Geolayer Store - Storage port and adapters
//!
//! This crate defines the `LayerStore` port and provides an in-memory
//! adapter and a PostgreSQL/PostGIS adapter.

pub mod memory;
pub mod ports;
pub mod postgres;

pub use memory::MemoryLayerStore;
pub use ports::LayerStore;
