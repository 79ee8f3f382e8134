//! Working tree status
//!
//! - `file_change`: kinds of unstaged modifications
//! - `status_info`: the status report and its rendering

pub mod file_change;
pub mod status_info;
