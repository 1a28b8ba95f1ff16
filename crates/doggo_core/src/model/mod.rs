//! Plain data records mapped from `Owner`, `Dog` and `Neighborhood` rows.
//!
//! # Invariants
//! - Ids are SQLite row ids; `0` marks a record that was never inserted.
//! - Records carry no behavior beyond construction helpers.

pub mod dog;
pub mod neighborhood;
pub mod owner;
