//! Wire types shared by the slot planner client crates.

pub mod domain;
pub mod error;
pub mod protocol;
