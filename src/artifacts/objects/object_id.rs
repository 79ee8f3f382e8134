//! Content-derived object ids
//!
//! Ids are lowercase 40-digit hex SHA-1 digests. The object store shards them
//! as `objects/<2 digits>/<38 digits>`, the staging index keeps the raw 20
//! bytes, and user-facing output shortens them to 7 digits.

use crate::artifacts::objects::OBJECT_ID_LENGTH;
use anyhow::{anyhow, bail};
use std::path::PathBuf;

/// Length of an id in its raw binary form
pub const RAW_ID_LENGTH: usize = OBJECT_ID_LENGTH / 2;

const SHORT_ID_LENGTH: usize = 7;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, PartialOrd, Ord)]
pub struct ObjectId(String);

impl ObjectId {
    /// Accept a full 40-digit hex id, normalized to lowercase
    pub fn try_parse(id: String) -> anyhow::Result<Self> {
        if id.len() != OBJECT_ID_LENGTH {
            bail!("Object id must be {} hex digits, got {:?}", OBJECT_ID_LENGTH, id);
        }
        if let Some(bad) = id.chars().find(|c| !c.is_ascii_hexdigit()) {
            bail!("Object id {:?} contains non-hex character {:?}", id, bad);
        }

        Ok(ObjectId(id.to_ascii_lowercase()))
    }

    /// Rebuild an id from the raw digest bytes stored in the index
    pub fn from_bytes(raw: &[u8]) -> anyhow::Result<Self> {
        if raw.len() != RAW_ID_LENGTH {
            bail!("Raw object id must be {} bytes, got {}", RAW_ID_LENGTH, raw.len());
        }

        Ok(ObjectId(raw.iter().map(|byte| format!("{byte:02x}")).collect()))
    }

    /// Raw digest bytes of the id
    pub fn to_bytes(&self) -> anyhow::Result<[u8; RAW_ID_LENGTH]> {
        let mut raw = [0u8; RAW_ID_LENGTH];

        for (byte, pair) in raw.iter_mut().zip(self.0.as_bytes().chunks(2)) {
            let pair = std::str::from_utf8(pair)?;
            *byte = u8::from_str_radix(pair, 16)
                .map_err(|_| anyhow!("Object id {} is not hex", self.0))?;
        }

        Ok(raw)
    }

    /// Location of the object relative to the objects directory
    pub fn to_path(&self) -> PathBuf {
        let (shard, rest) = self.0.split_at(2);
        [shard, rest].iter().collect()
    }

    pub fn to_short_oid(&self) -> String {
        self.0[..SHORT_ID_LENGTH].to_string()
    }
}

impl AsRef<str> for ObjectId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ObjectId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}
