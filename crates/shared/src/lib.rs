//! Types shared by the booking collector and the dashboard
//!
//! The collector writes `Appointments.csv`, the dashboard reads it. Both sides
//! speak in terms of [`Table`] and agree on [`CollectOutcome`] as the result of
//! a collection run.

pub mod constants;
pub mod outcome;
pub mod table;

pub use outcome::CollectOutcome;
pub use table::{Table, TableError};
