//! Blob object
//!
//! Blobs store file content. Unlike Git, a blob also remembers the path it was
//! added from, and that path takes part in its identity: the same bytes stored at
//! two different paths are two different blobs.
//!
//! ## Format
//!
//! On disk: `blob <size>\0<path>\0<content>`

use crate::artifacts::objects::object::{Object, Packable, Unpackable};
use crate::artifacts::objects::object_type::ObjectType;
use anyhow::Context;
use bytes::Bytes;
use derive_new::new;
use std::io::{BufRead, Read, Write};
use std::path::{Path, PathBuf};

/// Blob object representing the content of one tracked file
#[derive(Debug, Clone, PartialEq, Eq, new)]
pub struct Blob {
    /// Raw file content
    #[new(into)]
    content: Bytes,
    /// Path (relative to the repository root) the content was read from
    #[new(into)]
    path: PathBuf,
}

impl Blob {
    /// Get the raw file content
    pub fn content(&self) -> &Bytes {
        &self.content
    }

    /// Get the originating path
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Packable for Blob {
    fn serialize(&self) -> anyhow::Result<Bytes> {
        let mut body = Vec::new();
        body.write_all(self.path.to_string_lossy().as_bytes())?;
        body.write_all(b"\0")?;
        body.write_all(&self.content)?;

        let mut blob_bytes = Vec::new();
        let header = format!("{} {}\0", self.object_type().as_str(), body.len());
        blob_bytes.write_all(header.as_bytes())?;
        blob_bytes.write_all(&body)?;

        Ok(Bytes::from(blob_bytes))
    }
}

impl Unpackable for Blob {
    fn deserialize(mut reader: impl BufRead) -> anyhow::Result<Self> {
        // the header has already been read
        let mut path = Vec::new();
        reader.read_until(b'\0', &mut path)?;
        if path.pop() != Some(b'\0') {
            anyhow::bail!("Blob is missing its path terminator");
        }
        let path = String::from_utf8(path).context("Blob path is not valid UTF-8")?;

        let mut content = Vec::new();
        reader.read_to_end(&mut content)?;

        Ok(Self::new(content, path))
    }
}

impl Object for Blob {
    fn object_type(&self) -> ObjectType {
        ObjectType::Blob
    }

    fn identity_fields(&self) -> Vec<Bytes> {
        vec![
            self.content.clone(),
            Bytes::from(self.path.to_string_lossy().to_string()),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::artifacts::objects::object_type::ObjectType;
    use proptest::prelude::*;
    use std::io::Cursor;

    proptest! {
        #[test]
        fn identity_depends_only_on_content_and_path(
            content in proptest::collection::vec(any::<u8>(), 0..64),
            path in "[a-z]{1,8}(/[a-z]{1,8}){0,2}",
        ) {
            let first = Blob::new(content.clone(), path.clone());
            let second = Blob::new(content, path);

            prop_assert_eq!(first.object_id().unwrap(), second.object_id().unwrap());
        }

        #[test]
        fn changing_the_content_changes_the_identity(
            content in "[a-z]{0,16}",
            extra in "[a-z]{1,4}",
        ) {
            let original = Blob::new(content.clone(), "f.txt");
            let changed = Blob::new(format!("{content}{extra}"), "f.txt");

            prop_assert_ne!(original.object_id().unwrap(), changed.object_id().unwrap());
        }
    }

    #[test]
    fn same_content_at_different_paths_is_not_deduplicated() {
        let left = Blob::new("same", "left.txt");
        let right = Blob::new("same", "right.txt");

        assert_ne!(left.object_id().unwrap(), right.object_id().unwrap());
    }

    #[test]
    fn serialized_blob_reads_back_with_path_and_content() {
        let blob = Blob::new(b"line one\nline\0two\n".to_vec(), "dir/file.txt");
        let bytes = blob.serialize().unwrap();

        let mut reader = Cursor::new(bytes);
        let object_type = ObjectType::parse_object_type(&mut reader).unwrap();
        let parsed = Blob::deserialize(reader).unwrap();

        assert_eq!(object_type, ObjectType::Blob);
        assert_eq!(parsed, blob);
    }
}
