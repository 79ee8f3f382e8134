//! Branch references and the active branch pointer
//!
//! ## File Format
//!
//! - `refs/heads/<name>`: the 40-character id of the branch tip
//! - `HEAD`: `ref: refs/heads/<name>`, naming the active branch
//!
//! Writes take an exclusive lock on the ref file.

use crate::artifacts::branch::branch_name::BranchName;
use crate::artifacts::objects::object_id::ObjectId;
use crate::errors::RepositoryError;
use anyhow::Context;
use derive_new::new;
use file_guard::Lock;
use std::io::Write;
use std::ops::DerefMut;
use std::path::Path;
use walkdir::WalkDir;

/// Regex pattern for parsing symbolic references
const SYMREF_REGEX: &str = r"^ref: (.+)$";

/// Name of the active branch pointer file
pub const HEAD_REF_NAME: &str = "HEAD";

/// Branch references manager
#[derive(Debug, new)]
pub struct Refs {
    /// Path to the metadata directory (typically `.bitlet`)
    path: Box<Path>,
}

impl Refs {
    /// Name of the active branch
    pub fn current_branch(&self) -> anyhow::Result<BranchName> {
        let head_path = self.head_path();
        let content = std::fs::read_to_string(&head_path)
            .with_context(|| format!("Cannot read {}", head_path.display()))?;
        let content = content.trim();

        let symref_match = regex::Regex::new(SYMREF_REGEX)?
            .captures(content)
            .with_context(|| format!("HEAD does not name a branch: '{content}'"))?;

        BranchName::try_parse_ref_path(&symref_match[1])
    }

    pub fn is_current_branch(&self, branch_name: &BranchName) -> anyhow::Result<bool> {
        Ok(&self.current_branch()? == branch_name)
    }

    /// Point the active branch pointer at `branch_name`
    pub fn set_head(&self, branch_name: &BranchName) -> anyhow::Result<()> {
        self.write_ref_file(&self.head_path(), &format!("ref: {}", branch_name.as_ref_path()))
    }

    /// Tip of the active branch
    pub fn read_head(&self) -> anyhow::Result<ObjectId> {
        let branch_name = self.current_branch()?;

        self.read_ref(&branch_name)?
            .with_context(|| format!("active branch {} has no commit", branch_name))
    }

    /// Move the active branch to `oid`
    pub fn update_head(&self, oid: &ObjectId) -> anyhow::Result<()> {
        let branch_name = self.current_branch()?;
        self.update_ref(&branch_name, oid)
    }

    pub fn branch_exists(&self, branch_name: &BranchName) -> bool {
        self.path.join(branch_name.as_ref_path()).is_file()
    }

    pub fn read_ref(&self, branch_name: &BranchName) -> anyhow::Result<Option<ObjectId>> {
        let ref_path = self.path.join(branch_name.as_ref_path());
        if !ref_path.is_file() {
            return Ok(None);
        }

        let content = std::fs::read_to_string(&ref_path)
            .with_context(|| format!("Cannot read ref {}", ref_path.display()))?;

        match content.trim() {
            "" => Ok(None),
            oid => ObjectId::try_parse(oid.to_string()).map(Some),
        }
    }

    /// Create or move a branch
    pub fn update_ref(&self, branch_name: &BranchName, oid: &ObjectId) -> anyhow::Result<()> {
        self.write_ref_file(&self.path.join(branch_name.as_ref_path()), oid.as_ref())
    }

    fn write_ref_file(&self, path: &Path, content: &str) -> anyhow::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Cannot create ref directory {}", parent.display()))?;
        }

        let mut file = std::fs::File::create(path)
            .with_context(|| format!("Cannot open ref {}", path.display()))?;
        let mut lock = file_guard::lock(&mut file, Lock::Exclusive, 0, 1)?;
        lock.deref_mut()
            .write_all(content.as_bytes())
            .with_context(|| format!("Cannot write ref {}", path.display()))
    }

    pub fn create_branch(&self, name: &BranchName, source_oid: &ObjectId) -> anyhow::Result<()> {
        if self.branch_exists(name) {
            return Err(RepositoryError::BranchExists(name.to_string()).into());
        }

        self.update_ref(name, source_oid)
    }

    /// Remove a branch pointer, returning the commit it pointed at
    ///
    /// Directories left empty under `refs/heads` by hierarchical names are removed too.
    pub fn delete_branch(&self, name: &BranchName) -> anyhow::Result<ObjectId> {
        let oid = self
            .read_ref(name)?
            .ok_or_else(|| RepositoryError::NoSuchBranch(name.to_string()))?;

        let branch_path = self.path.join(name.as_ref_path());
        std::fs::remove_file(&branch_path)
            .with_context(|| format!("Cannot delete branch {}", branch_path.display()))?;
        self.prune_empty_dirs_above(&branch_path)?;

        Ok(oid)
    }

    /// Every branch, sorted by name
    pub fn list_branches(&self) -> anyhow::Result<Vec<BranchName>> {
        let heads_path = self.heads_path();

        let mut branches = WalkDir::new(&heads_path)
            .into_iter()
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.file_type().is_file())
            .filter_map(|entry| {
                let relative_path = entry.path().strip_prefix(&heads_path).ok()?;
                BranchName::try_parse(relative_path.to_string_lossy().to_string()).ok()
            })
            .collect::<Vec<_>>();
        branches.sort();

        Ok(branches)
    }

    fn prune_empty_dirs_above(&self, path: &Path) -> anyhow::Result<()> {
        let heads_path = self.heads_path();

        for dir in path.ancestors().skip(1) {
            if dir == heads_path.as_ref() || !dir.starts_with(&heads_path) {
                break;
            }
            if dir.read_dir()?.next().is_some() {
                break;
            }

            std::fs::remove_dir(dir)
                .with_context(|| format!("Cannot remove empty directory {}", dir.display()))?;
        }

        Ok(())
    }

    pub fn head_path(&self) -> Box<Path> {
        self.path.join(HEAD_REF_NAME).into_boxed_path()
    }

    pub fn refs_path(&self) -> Box<Path> {
        self.path.join("refs").into_boxed_path()
    }

    pub fn heads_path(&self) -> Box<Path> {
        self.refs_path().join("heads").into_boxed_path()
    }
}
