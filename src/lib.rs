//! bitlet - a small, local, single-user version-control engine
//!
//! The crate is organized the same way as a full Git implementation, only smaller:
//!
//! - `areas`: stateful parts of a repository (object database, staging index,
//!   branch references, history log, working tree)
//! - `artifacts`: pure data structures and algorithms (objects, split point search,
//!   three-way merge classification, checkout planning, status)
//! - `commands`: user-facing operations implemented on top of `Repository`
//! - `errors`: the named failure kinds reported by every operation

/// Macro for debug logging that is enabled with the debug_merge feature flag
///
/// # Usage
/// ```rust,ignore
/// debug_log!("Processing commit {}", commit_id);
/// ```
macro_rules! debug_log {
    ($($arg:tt)*) => {
        #[cfg(feature = "debug_merge")]
        {
            eprintln!($($arg)*);
        }
    };
}

pub(crate) use debug_log;

pub mod areas;
pub mod artifacts;
pub mod commands;
pub mod errors;
