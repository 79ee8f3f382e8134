//! Working tree reconciliation
//!
//! Moving from one commit to another (checkout of a branch, reset) rewrites the
//! working tree from the current snapshot to the target snapshot. Every action is
//! planned first; the untracked-file check runs during planning, so a refused
//! checkout leaves the working tree exactly as it was.

pub mod migration;
