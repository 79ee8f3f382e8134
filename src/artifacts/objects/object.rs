use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::object_type::ObjectType;
use anyhow::Result;
use bytes::Bytes;
use sha1::{Digest, Sha1};
use std::io::BufRead;

pub trait Packable {
    fn serialize(&self) -> Result<Bytes>;
}

pub trait Unpackable {
    fn deserialize(reader: impl BufRead) -> Result<Self>
    where
        Self: Sized;
}

pub trait Object: Packable {
    fn object_type(&self) -> ObjectType;

    /// Ordered fields the object identity is derived from
    fn identity_fields(&self) -> Vec<Bytes>;

    fn object_id(&self) -> Result<ObjectId> {
        digest(self.identity_fields())
    }
}

/// SHA-1 over an ordered sequence of fields
///
/// Every field is prefixed with its length so that moving bytes from one
/// field into its neighbour always yields a different digest.
pub fn digest<I, F>(fields: I) -> Result<ObjectId>
where
    I: IntoIterator<Item = F>,
    F: AsRef<[u8]>,
{
    let mut hasher = Sha1::new();
    for field in fields {
        let field = field.as_ref();
        hasher.update((field.len() as u64).to_be_bytes());
        hasher.update(field);
    }

    let oid = hasher.finalize();
    ObjectId::try_parse(format!("{oid:x}"))
}
