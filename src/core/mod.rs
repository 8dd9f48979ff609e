//! Aggregation, budget evaluation, and the record lifecycle manager.

pub mod clock;
pub mod services;
pub mod tracker;

pub use clock::{Clock, IdSource, RandomIds, SystemClock};
pub use tracker::{SharedTracker, Tracker};
