use crate::artifacts::index::checksum::Checksum;
use crate::artifacts::objects::object::Packable;
use crate::artifacts::objects::object_id::{ObjectId, RAW_ID_LENGTH};
use anyhow::Context;
use byteorder::{ByteOrder, WriteBytesExt};
use bytes::Bytes;
use derive_new::new;
use std::io::{Read, Write};
use std::path::PathBuf;

/// Fixed-size part of an entry: raw blob id followed by the path length
pub const ENTRY_PREFIX_SIZE: usize = RAW_ID_LENGTH + 2;

/// One path -> blob id record of the staging index
#[derive(Debug, Clone, PartialEq, Eq, new)]
pub struct StagedEntry {
    pub path: PathBuf,
    pub oid: ObjectId,
}

impl StagedEntry {
    pub(crate) fn read_from(reader: &mut Checksum<impl Read>) -> anyhow::Result<Self> {
        let prefix = reader.read(ENTRY_PREFIX_SIZE)?;
        let oid = ObjectId::from_bytes(&prefix[..RAW_ID_LENGTH])?;
        let path_len = byteorder::NetworkEndian::read_u16(&prefix[RAW_ID_LENGTH..]) as usize;

        let path = reader.read(path_len)?;
        let path = String::from_utf8(path.to_vec()).context("Staged path is not valid UTF-8")?;

        Ok(StagedEntry::new(PathBuf::from(path), oid))
    }
}

impl Packable for StagedEntry {
    fn serialize(&self) -> anyhow::Result<Bytes> {
        let path = self.path.to_string_lossy();
        let path_len = u16::try_from(path.len())
            .with_context(|| format!("Path too long for the index: {}", path))?;

        let mut bytes = Vec::new();
        bytes.write_all(&self.oid.to_bytes()?)?;
        bytes.write_u16::<byteorder::NetworkEndian>(path_len)?;
        bytes.write_all(path.as_bytes())?;

        Ok(Bytes::from(bytes))
    }
}
