//! Merge algorithms
//!
//! - `split_point`: breadth-first search for the commit two branches split from
//! - `resolution`: per-path three-way classification and conflict markers

pub mod resolution;
pub mod split_point;
