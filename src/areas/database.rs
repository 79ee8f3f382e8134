//! Content store
//!
//! Immutable, content-addressed storage for blobs and commits. Objects are keyed
//! by their digest and laid out as `objects/<2 hex>/<38 hex>`, so a lookup never
//! needs a central index file. Storing an object that already exists is a no-op.

use crate::artifacts::objects::MIN_ABBREV_LENGTH;
use crate::artifacts::objects::OBJECT_ID_LENGTH;
use crate::artifacts::objects::blob::Blob;
use crate::artifacts::objects::commit::Commit;
use crate::artifacts::objects::object::{Object, Unpackable};
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::object_type::ObjectType;
use crate::errors::RepositoryError;
use anyhow::Context;
use bytes::Bytes;
use fake::rand;
use std::io::{BufRead, Cursor, Read, Write};
use std::path::{Path, PathBuf};

#[derive(Debug)]
pub struct Database {
    path: Box<Path>,
}

impl Database {
    pub fn new(path: Box<Path>) -> Self {
        Database { path }
    }

    pub fn objects_path(&self) -> &Path {
        &self.path
    }

    pub fn contains(&self, object_id: &ObjectId) -> bool {
        self.path.join(object_id.to_path()).exists()
    }

    /// Store an object and return its identity
    ///
    /// Objects are immutable, so an id that is already present is left alone.
    pub fn store(&self, object: &impl Object) -> anyhow::Result<ObjectId> {
        let object_id = object.object_id()?;
        let object_path = self.path.join(object_id.to_path());

        if !object_path.exists() {
            self.write_object(&object_path, &object.serialize()?)?;
        }

        Ok(object_id)
    }

    pub fn parse_object_as_blob(&self, object_id: &ObjectId) -> anyhow::Result<Blob> {
        let (object_type, object_reader) =
            self.parse_object_as_bytes(object_id, Some(ObjectType::Blob))?;

        match object_type {
            ObjectType::Blob => Blob::deserialize(object_reader),
            _ => Err(RepositoryError::NotABlob(object_id.clone()).into()),
        }
    }

    pub fn parse_object_as_commit(&self, object_id: &ObjectId) -> anyhow::Result<Commit> {
        let (object_type, object_reader) =
            self.parse_object_as_bytes(object_id, Some(ObjectType::Commit))?;

        match object_type {
            ObjectType::Commit => Commit::deserialize(object_reader),
            _ => Err(RepositoryError::NotACommit(object_id.clone()).into()),
        }
    }

    fn parse_object_as_bytes(
        &self,
        object_id: &ObjectId,
        expected: Option<ObjectType>,
    ) -> anyhow::Result<(ObjectType, impl BufRead + use<>)> {
        let object_path = self.path.join(object_id.to_path());
        if !object_path.exists() {
            return Err(RepositoryError::NotFound {
                id: object_id.to_string(),
                kind: expected.unwrap_or(ObjectType::Commit),
            }
            .into());
        }

        let object_content = self.read_object(object_path)?;
        let mut object_reader = Cursor::new(object_content);

        let object_type = ObjectType::parse_object_type(&mut object_reader)?;

        Ok((object_type, object_reader))
    }

    /// Resolve a full or abbreviated commit id typed by a user
    pub fn resolve_commit_id(&self, input: &str) -> anyhow::Result<ObjectId> {
        let not_found = || RepositoryError::NotFound {
            id: input.to_string(),
            kind: ObjectType::Commit,
        };

        if !input.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(not_found().into());
        }

        if input.len() == OBJECT_ID_LENGTH {
            return ObjectId::try_parse(input.to_string()).map_err(|_| not_found().into());
        }

        if input.len() < MIN_ABBREV_LENGTH || input.len() > OBJECT_ID_LENGTH {
            return Err(not_found().into());
        }

        let candidates = self
            .find_objects_by_prefix(&input.to_ascii_lowercase())?
            .into_iter()
            .filter(|oid| matches!(self.get_object_type(oid), Ok(ObjectType::Commit)))
            .collect::<Vec<_>>();

        match candidates.as_slice() {
            [] => Err(not_found().into()),
            [oid] => Ok(oid.clone()),
            _ => Err(RepositoryError::AmbiguousId(input.to_string()).into()),
        }
    }

    fn read_object(&self, object_path: PathBuf) -> anyhow::Result<Bytes> {
        let file = std::fs::File::open(&object_path)
            .with_context(|| format!("Cannot open object {}", object_path.display()))?;

        let mut content = Vec::new();
        flate2::read::ZlibDecoder::new(file)
            .read_to_end(&mut content)
            .with_context(|| format!("Object {} is not valid zlib data", object_path.display()))?;

        Ok(Bytes::from(content))
    }

    /// Compress into a sibling temp file, then rename it over the final path
    fn write_object(&self, object_path: &Path, content: &[u8]) -> anyhow::Result<()> {
        let shard = object_path
            .parent()
            .with_context(|| format!("Object path {} has no shard", object_path.display()))?;
        std::fs::create_dir_all(shard)
            .with_context(|| format!("Cannot create shard directory {}", shard.display()))?;

        let temp_path = shard.join(format!("tmp-obj-{}", rand::random::<u32>()));
        let temp_file = std::fs::File::create(&temp_path)
            .with_context(|| format!("Cannot create {}", temp_path.display()))?;

        let mut encoder = flate2::write::ZlibEncoder::new(temp_file, flate2::Compression::default());
        encoder.write_all(content)?;
        encoder
            .finish()
            .with_context(|| format!("Cannot compress object into {}", temp_path.display()))?;

        std::fs::rename(&temp_path, object_path)
            .with_context(|| format!("Cannot move object into {}", object_path.display()))
    }

    /// Find all objects whose OID starts with the given prefix
    ///
    /// Only the directory named after the first two characters is searched, so
    /// the prefix must be at least two characters long.
    pub fn find_objects_by_prefix(&self, prefix: &str) -> anyhow::Result<Vec<ObjectId>> {
        if prefix.len() < 2 {
            anyhow::bail!("Object id prefix too short: {}", prefix);
        }

        let (dir_name, file_prefix) = prefix.split_at(2);
        let dir_path = self.path.join(dir_name);
        if !dir_path.is_dir() {
            return Ok(Vec::new());
        }

        let mut matches = Vec::new();
        for entry in std::fs::read_dir(&dir_path)? {
            let file_name = entry?.file_name();
            let file_name = file_name.to_string_lossy();

            if file_name.starts_with(file_prefix)
                && let Ok(oid) = ObjectId::try_parse(format!("{dir_name}{file_name}"))
            {
                matches.push(oid);
            }
        }
        matches.sort();

        Ok(matches)
    }

    pub fn get_object_type(&self, object_id: &ObjectId) -> anyhow::Result<ObjectType> {
        let (object_type, _) = self.parse_object_as_bytes(object_id, None)?;
        Ok(object_type)
    }
}
