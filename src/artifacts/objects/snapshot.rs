//! Commit snapshots
//!
//! A snapshot is the full path -> blob id mapping tracked by one commit. Snapshots
//! are never edited in place: a child snapshot is derived from its parent with
//! [`Snapshot::apply`], which copies the parent mapping and returns a new value.

use crate::artifacts::objects::object_id::ObjectId;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Snapshot {
    entries: BTreeMap<PathBuf, ObjectId>,
}

impl Snapshot {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Derive a child snapshot: additions overwrite, then removals delete
    pub fn apply<'a, A, R>(&self, additions: A, removals: R) -> Self
    where
        A: IntoIterator<Item = (&'a PathBuf, &'a ObjectId)>,
        R: IntoIterator<Item = &'a PathBuf>,
    {
        let mut entries = self.entries.clone();

        for (path, oid) in additions {
            entries.insert(path.clone(), oid.clone());
        }
        for path in removals {
            entries.remove(path);
        }

        Self { entries }
    }

    pub fn get(&self, path: &Path) -> Option<&ObjectId> {
        self.entries.get(path)
    }

    pub fn contains(&self, path: &Path) -> bool {
        self.entries.contains_key(path)
    }

    /// True when `path` is tracked with exactly this blob
    pub fn tracks(&self, path: &Path, oid: &ObjectId) -> bool {
        self.get(path) == Some(oid)
    }

    pub fn paths(&self) -> impl Iterator<Item = &PathBuf> {
        self.entries.keys()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&PathBuf, &ObjectId)> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Canonical text form used as a commit identity field
    pub fn identity_text(&self) -> String {
        let entries = self
            .entries
            .iter()
            .map(|(path, oid)| format!("{}={}", path.to_string_lossy(), oid))
            .collect::<Vec<_>>();

        format!("{{{}}}", entries.join(", "))
    }
}

impl FromIterator<(PathBuf, ObjectId)> for Snapshot {
    fn from_iter<T: IntoIterator<Item = (PathBuf, ObjectId)>>(iter: T) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}
