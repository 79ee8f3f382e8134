//! Data structures and algorithms
//!
//! - `branch`: branch names
//! - `checkout`: planning working tree moves between snapshots
//! - `core`: shared utilities (commit clock)
//! - `index`: checksummed staging index file framing
//! - `log`: commit rendering for the history listings
//! - `merge`: split point search and three-way resolution
//! - `objects`: object ids, blobs, commits and snapshots
//! - `status`: working tree status report

pub mod branch;
pub mod checkout;
pub mod core;
pub mod index;
pub mod log;
pub mod merge;
pub mod objects;
pub mod status;
