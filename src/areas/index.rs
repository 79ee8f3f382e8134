//! Staging index
//!
//! The staging index holds the changes that the next commit will apply on top of
//! the active commit's snapshot: pending additions (path -> blob id) and pending
//! removals (path -> blob id). A path is never present in both maps at once.
//!
//! The index is read from disk at the start of every operation and written back
//! at the end of it. It is consumed (cleared) by every commit, including merge
//! commits, and by every checkout or reset.
//!
//! ## File Format
//!
//! See [`crate::artifacts::index`] for the checksummed binary layout.

use crate::artifacts::index::checksum::Checksum;
use crate::artifacts::index::index_header::IndexHeader;
use crate::artifacts::index::staged_entry::StagedEntry;
use crate::artifacts::index::{HEADER_SIZE, SIGNATURE, VERSION};
use crate::artifacts::objects::object::Packable;
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::snapshot::Snapshot;
use crate::errors::RepositoryError;
use anyhow::anyhow;
use std::collections::BTreeMap;
use std::io::Read;
use std::ops::DerefMut;
use std::path::{Path, PathBuf};

/// What a removal request did to the staging index
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RemovalOutcome {
    /// The path was only staged for addition; it is no longer staged
    Unstaged,
    /// The path is tracked and its working file must be deleted
    DeleteWorkingFile,
    /// The path is tracked and its working file is already gone
    Staged,
}

/// Staging index (pending additions and removals)
#[derive(Debug, Clone)]
pub struct Index {
    /// Path to the index file (typically `.bitlet/index`)
    path: Box<Path>,
    /// Paths staged for addition
    additions: BTreeMap<PathBuf, ObjectId>,
    /// Paths staged for removal
    removals: BTreeMap<PathBuf, ObjectId>,
}

impl Index {
    /// Create a new empty index backed by the given file
    pub fn new(path: Box<Path>) -> Self {
        Index {
            path,
            additions: BTreeMap::new(),
            removals: BTreeMap::new(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the index from disk
    ///
    /// Reads the index file, parses the header and entries, and verifies
    /// the checksum. A missing or empty file is an empty index.
    ///
    /// # Locking
    ///
    /// Acquires a shared lock on the index file during reading.
    pub fn rehydrate(&mut self) -> anyhow::Result<()> {
        self.additions.clear();
        self.removals.clear();

        if !self.path().exists() {
            return Ok(());
        }

        let mut index_file = std::fs::OpenOptions::new().read(true).open(self.path())?;
        let mut lock = file_guard::lock(&mut index_file, file_guard::Lock::Shared, 0, 1)?;

        if lock.deref_mut().metadata()?.len() == 0 {
            return Ok(());
        }

        let mut reader = Checksum::new(&mut *lock);
        let header = Self::parse_header(&mut reader)?;

        for _ in 0..header.additions_count {
            let entry = StagedEntry::read_from(&mut reader)?;
            self.additions.insert(entry.path, entry.oid);
        }
        for _ in 0..header.removals_count {
            let entry = StagedEntry::read_from(&mut reader)?;
            self.removals.insert(entry.path, entry.oid);
        }

        reader.verify()
    }

    fn parse_header(reader: &mut Checksum<impl Read>) -> anyhow::Result<IndexHeader> {
        let header = IndexHeader::parse(&reader.read(HEADER_SIZE)?)?;

        if header.marker != SIGNATURE {
            return Err(anyhow!("Invalid index file signature"));
        }

        if header.version != VERSION {
            return Err(anyhow!(
                "Unsupported index file version: {}",
                header.version
            ));
        }

        Ok(header)
    }

    /// Persist the index, replacing whatever was on disk
    pub fn write_updates(&mut self) -> anyhow::Result<()> {
        let mut index_file = std::fs::OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(self.path())?;
        let mut lock = file_guard::lock(&mut index_file, file_guard::Lock::Exclusive, 0, 1)?;

        let mut writer = Checksum::new(&mut *lock);

        let header = IndexHeader {
            additions_count: self.additions.len() as u32,
            removals_count: self.removals.len() as u32,
            ..IndexHeader::empty()
        };
        writer.write(&header.serialize()?)?;

        for (path, oid) in self.additions.iter().chain(self.removals.iter()) {
            let entry = StagedEntry::new(path.clone(), oid.clone());
            writer.write(&entry.serialize()?)?;
        }

        writer.write_checksum()
    }

    /// Stage `path` for addition with the given blob
    ///
    /// If the active commit already tracks exactly this blob at `path`, the file
    /// was reverted to its committed state and any pending change for it is
    /// dropped instead.
    pub fn stage_addition(&mut self, path: &Path, oid: ObjectId, head: &Snapshot) {
        if head.tracks(path, &oid) {
            self.additions.remove(path);
            self.removals.remove(path);
            return;
        }

        self.removals.remove(path);
        self.additions.insert(path.to_path_buf(), oid);
    }

    /// Stage `path` for removal
    ///
    /// # Returns
    ///
    /// What the caller still has to do with the working file, or
    /// `NothingToRemove` when the path is neither staged nor tracked.
    pub fn stage_removal(
        &mut self,
        path: &Path,
        head: &Snapshot,
        working_file_exists: bool,
    ) -> anyhow::Result<RemovalOutcome> {
        let tracked = head.get(path).cloned();

        match tracked {
            None if self.additions.contains_key(path) => {
                self.additions.remove(path);
                Ok(RemovalOutcome::Unstaged)
            }
            Some(oid) => {
                self.record_removal(path, oid);

                if working_file_exists {
                    Ok(RemovalOutcome::DeleteWorkingFile)
                } else {
                    Ok(RemovalOutcome::Staged)
                }
            }
            None => Err(RepositoryError::NothingToRemove(path.to_path_buf()).into()),
        }
    }

    /// Record a removal without any precondition checks
    pub fn record_removal(&mut self, path: &Path, oid: ObjectId) {
        self.additions.remove(path);
        self.removals.insert(path.to_path_buf(), oid);
    }

    pub fn is_empty(&self) -> bool {
        self.additions.is_empty() && self.removals.is_empty()
    }

    pub fn clear(&mut self) {
        self.additions.clear();
        self.removals.clear();
    }

    pub fn additions(&self) -> &BTreeMap<PathBuf, ObjectId> {
        &self.additions
    }

    pub fn removals(&self) -> &BTreeMap<PathBuf, ObjectId> {
        &self.removals
    }

    pub fn is_staged_for_addition(&self, path: &Path) -> bool {
        self.additions.contains_key(path)
    }

    pub fn is_staged_for_removal(&self, path: &Path) -> bool {
        self.removals.contains_key(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::RepositoryError;
    use assert_fs::TempDir;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;
    use rstest::{fixture, rstest};

    fn oid(c: char) -> ObjectId {
        ObjectId::try_parse(c.to_string().repeat(40)).unwrap()
    }

    fn head() -> Snapshot {
        Snapshot::from_iter([(PathBuf::from("tracked.txt"), oid('1'))])
    }

    #[fixture]
    fn index_dir() -> TempDir {
        TempDir::new().expect("Failed to create temp dir")
    }

    fn empty_index() -> Index {
        Index::new(PathBuf::from("unused-index").into_boxed_path())
    }

    #[test]
    fn adding_a_reverted_file_drops_its_pending_changes() {
        let mut index = empty_index();
        let head = head();
        let path = Path::new("tracked.txt");

        index.stage_addition(path, oid('2'), &head);
        assert!(index.is_staged_for_addition(path));

        index.stage_addition(path, oid('1'), &head);
        assert!(index.is_empty());
    }

    #[test]
    fn adding_clears_a_pending_removal() {
        let mut index = empty_index();
        let head = head();
        let path = Path::new("tracked.txt");

        index.stage_removal(path, &head, true).unwrap();
        index.stage_addition(path, oid('3'), &head);

        assert!(!index.is_staged_for_removal(path));
        assert_eq!(index.additions().get(path), Some(&oid('3')));
    }

    #[rstest]
    #[case::working_file_present(true, RemovalOutcome::DeleteWorkingFile)]
    #[case::working_file_gone(false, RemovalOutcome::Staged)]
    fn removing_a_tracked_file_records_its_committed_blob(
        #[case] exists: bool,
        #[case] expected: RemovalOutcome,
    ) {
        let mut index = empty_index();
        let path = Path::new("tracked.txt");

        let outcome = index.stage_removal(path, &head(), exists).unwrap();

        assert_eq!(outcome, expected);
        assert_eq!(index.removals().get(path), Some(&oid('1')));
    }

    #[test]
    fn removing_a_file_only_staged_for_addition_unstages_it() {
        let mut index = empty_index();
        let path = Path::new("new.txt");
        index.stage_addition(path, oid('4'), &head());

        let outcome = index.stage_removal(path, &head(), true).unwrap();

        assert_eq!(outcome, RemovalOutcome::Unstaged);
        assert!(index.is_empty());
    }

    #[test]
    fn removing_an_unknown_file_fails() {
        let mut index = empty_index();

        let error = index
            .stage_removal(Path::new("stranger.txt"), &head(), true)
            .unwrap_err();

        assert_eq!(
            error.downcast_ref::<RepositoryError>(),
            Some(&RepositoryError::NothingToRemove(PathBuf::from("stranger.txt")))
        );
    }

    #[rstest]
    fn index_survives_a_write_and_rehydrate(index_dir: TempDir) {
        let index_path = index_dir.path().join("index").into_boxed_path();
        let mut index = Index::new(index_path.clone());
        index.stage_addition(Path::new("dir/new file.txt"), oid('5'), &head());
        index.stage_removal(Path::new("tracked.txt"), &head(), false).unwrap();
        index.write_updates().unwrap();

        let mut reloaded = Index::new(index_path);
        reloaded.rehydrate().unwrap();

        assert_eq!(reloaded.additions(), index.additions());
        assert_eq!(reloaded.removals(), index.removals());
    }

    #[rstest]
    fn corrupted_index_fails_checksum_verification(index_dir: TempDir) {
        let index_path = index_dir.path().join("index").into_boxed_path();
        let mut index = Index::new(index_path.clone());
        index.stage_addition(Path::new("a.txt"), oid('6'), &head());
        index.write_updates().unwrap();

        let mut bytes = std::fs::read(&index_path).unwrap();
        let last = bytes.len() - 1;
        bytes[last] ^= 0xff;
        std::fs::write(&index_path, bytes).unwrap();

        let mut reloaded = Index::new(index_path);
        assert!(reloaded.rehydrate().is_err());
    }

    #[derive(Debug, Clone)]
    enum StagingOp {
        Add(usize, char),
        Remove(usize, bool),
    }

    fn staging_op() -> impl Strategy<Value = StagingOp> {
        prop_oneof![
            (0..4usize, prop::sample::select(vec!['1', '2', '3'])).prop_map(|(p, c)| StagingOp::Add(p, c)),
            (0..4usize, any::<bool>()).prop_map(|(p, e)| StagingOp::Remove(p, e)),
        ]
    }

    proptest! {
        #[test]
        fn no_path_is_ever_staged_both_ways(ops in proptest::collection::vec(staging_op(), 0..32)) {
            let paths = ["tracked.txt", "a.txt", "b.txt", "c.txt"];
            let head = head();
            let mut index = empty_index();

            for op in ops {
                match op {
                    StagingOp::Add(p, c) => index.stage_addition(Path::new(paths[p]), oid(c), &head),
                    StagingOp::Remove(p, exists) => {
                        let _ = index.stage_removal(Path::new(paths[p]), &head, exists);
                    }
                }

                for path in index.additions().keys() {
                    prop_assert!(!index.removals().contains_key(path));
                }
            }
        }
    }
}
