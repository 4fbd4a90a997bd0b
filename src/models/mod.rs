//! Data models for the MSK Suggestion Board application.
//!
//! These models match the frontend TypeScript interfaces exactly for seamless interoperability.

mod datastore;
mod employee;
mod suggestion;

pub use datastore::*;
pub use employee::*;
pub use suggestion::*;
