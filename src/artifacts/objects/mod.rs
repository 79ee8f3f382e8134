//! bitlet object types and operations
//!
//! All content is stored as immutable objects identified by SHA-1 digests:
//!
//! - **Blob**: file content together with the path it was added from
//! - **Commit**: a full snapshot (path -> blob id) with message, parents and timestamp
//!
//! All objects implement serialization/deserialization for the on-disk format:
//! `<type> <size>\0<content>`

pub mod blob;
pub mod commit;
pub mod object;
pub mod object_id;
pub mod object_type;
pub mod snapshot;

/// Length of a SHA-1 hash in hexadecimal format
pub const OBJECT_ID_LENGTH: usize = 40;

/// Shortest abbreviated object id accepted when resolving user input
pub const MIN_ABBREV_LENGTH: usize = 4;
