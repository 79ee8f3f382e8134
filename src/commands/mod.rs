//! User-facing operations
//!
//! Every operation is an `impl Repository` block under `porcelain`. Operations
//! return `anyhow::Result`; domain failures carry a
//! [`RepositoryError`](crate::errors::RepositoryError).

pub mod porcelain;
