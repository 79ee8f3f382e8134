//! Stateful repository areas
//!
//! - `database`: content store for blobs and commits
//! - `index`: staging area of pending additions and removals
//! - `refs`: branch references and the active branch pointer
//! - `history`: append-only log of every commit created
//! - `repository`: aggregate tying the areas to one working tree
//! - `workspace`: working tree file system operations

pub mod database;
pub mod history;
pub mod index;
pub mod refs;
pub mod repository;
pub mod workspace;
