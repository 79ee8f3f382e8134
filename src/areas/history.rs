//! Commit history log
//!
//! Append-only record of every commit ever created, in creation order. It is
//! independent of the parent links: commits that no branch reaches any more
//! still show up in the global log and in message searches.
//!
//! ## File Format
//!
//! A sequence of records, each a big-endian `u32` length followed by the
//! serialized commit (the same bytes the content store compresses).

use crate::artifacts::objects::commit::Commit;
use crate::artifacts::objects::object::{Object, Packable, Unpackable};
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::object_type::ObjectType;
use anyhow::Context;
use byteorder::{NetworkEndian, ReadBytesExt, WriteBytesExt};
use file_guard::Lock;
use std::io::{Cursor, Read, Write};
use std::ops::DerefMut;
use std::path::Path;

#[derive(Debug)]
pub struct History {
    path: Box<Path>,
}

impl History {
    pub fn new(path: Box<Path>) -> Self {
        History { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn append(&self, commit: &Commit) -> anyhow::Result<()> {
        let record = commit.serialize()?;

        let mut history_file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(self.path())
            .with_context(|| format!("Unable to open history log {:?}", self.path))?;
        let mut lock = file_guard::lock(&mut history_file, Lock::Exclusive, 0, 1)?;

        let file = lock.deref_mut();
        file.write_u32::<NetworkEndian>(record.len() as u32)?;
        file.write_all(&record)?;

        Ok(())
    }

    /// Every commit with its id, oldest first
    pub fn commits(&self) -> anyhow::Result<Vec<(ObjectId, Commit)>> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }

        let content = std::fs::read(&self.path)
            .with_context(|| format!("Unable to read history log {:?}", self.path))?;
        let mut reader = Cursor::new(content);
        let mut commits = Vec::new();

        while (reader.position() as usize) < reader.get_ref().len() {
            let length = reader.read_u32::<NetworkEndian>()? as usize;
            let mut record = vec![0; length];
            reader
                .read_exact(&mut record)
                .context("History log ends in the middle of a commit")?;

            let commit = Self::parse_record(record)?;
            commits.push((commit.object_id()?, commit));
        }

        Ok(commits)
    }

    /// Ids of every commit whose message is exactly `message`, oldest first
    pub fn find_by_message(&self, message: &str) -> anyhow::Result<Vec<ObjectId>> {
        Ok(self
            .commits()?
            .into_iter()
            .filter(|(_, commit)| commit.message() == message)
            .map(|(oid, _)| oid)
            .collect())
    }

    fn parse_record(record: Vec<u8>) -> anyhow::Result<Commit> {
        let mut reader = Cursor::new(record);

        match ObjectType::parse_object_type(&mut reader)? {
            ObjectType::Commit => Commit::deserialize(reader),
            other => anyhow::bail!("History log holds a {} instead of a commit", other),
        }
    }
}
