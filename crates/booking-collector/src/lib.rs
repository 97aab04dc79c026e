//! Booking plugin appointments collector
//!
//! Logs into a WordPress admin panel, exports every appointment through the
//! booking plugin's CSV export and replaces the local appointments file with
//! the merged result.

pub mod auth;
pub mod collector;
pub mod config;
pub mod constants;
pub mod error;
pub mod export;
pub mod merge;
pub mod panel;
pub mod persist;
pub mod token;

pub use collector::Collector;
pub use error::CollectError;
pub use panel::{AdminPanel, HttpPanel};
