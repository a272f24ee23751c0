//! Adapter implementations of the document store port.

mod configured;
pub mod memory;
pub mod postgres;

pub use configured::ConfiguredStore;
