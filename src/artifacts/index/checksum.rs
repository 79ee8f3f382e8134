//! SHA-1 trailer of the staging index
//!
//! Every byte read from or written to the index goes through [`Checksum`],
//! which keeps a running digest. Writers append it after the last entry;
//! readers compare it with the trailer once every entry has been consumed.

use crate::artifacts::index::CHECKSUM_SIZE;
use anyhow::{Context, anyhow};
use bytes::Bytes;
use sha1::{Digest, Sha1};
use std::io::{Read, Write};

/// Stream wrapper hashing everything that passes through it
pub struct Checksum<S> {
    stream: S,
    digest: Sha1,
}

impl<S> Checksum<S> {
    pub(crate) fn new(stream: S) -> Self {
        Checksum {
            stream,
            digest: Sha1::new(),
        }
    }

    fn current_digest(&self) -> Vec<u8> {
        self.digest.clone().finalize().to_vec()
    }
}

impl<S: Read> Checksum<S> {
    /// Read exactly `size` bytes and feed them to the digest
    pub(crate) fn read(&mut self, size: usize) -> anyhow::Result<Bytes> {
        let mut buffer = vec![0; size];
        self.stream
            .read_exact(&mut buffer)
            .context("Unexpected end of index file")?;

        self.digest.update(&buffer);
        Ok(Bytes::from(buffer))
    }

    /// Compare the trailer with the digest of everything read so far
    pub(crate) fn verify(&mut self) -> anyhow::Result<()> {
        let mut stored = [0u8; CHECKSUM_SIZE];
        self.stream
            .read_exact(&mut stored)
            .context("Index file is missing its checksum")?;

        if stored[..] != self.current_digest()[..] {
            return Err(anyhow!("Index checksum does not match its contents"));
        }

        Ok(())
    }
}

impl<S: Write> Checksum<S> {
    pub(crate) fn write(&mut self, data: &[u8]) -> anyhow::Result<()> {
        self.stream.write_all(data)?;
        self.digest.update(data);
        Ok(())
    }

    /// Append the digest of everything written so far
    pub(crate) fn write_checksum(&mut self) -> anyhow::Result<()> {
        let trailer = self.current_digest();
        self.stream
            .write_all(&trailer)
            .context("Failed to write index checksum")?;

        Ok(())
    }
}
