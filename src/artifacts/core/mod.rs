//! Shared utilities
//!
//! - `clock`: the time source commits are stamped with

pub mod clock;
