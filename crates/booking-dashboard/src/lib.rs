//! Booking appointments dashboard
//!
//! Loads the collector's appointments file, infers column roles from header
//! names, and prints filtered metrics and charts to the console.

pub mod charts;
pub mod columns;
pub mod config;
pub mod constants;
pub mod data;
pub mod derive;
pub mod error;
pub mod export;
pub mod filters;
pub mod frame;
pub mod metrics;
pub mod refresh;
pub mod render;
pub mod session;

pub use filters::{FilterSelection, apply_filters};
pub use frame::Frame;
