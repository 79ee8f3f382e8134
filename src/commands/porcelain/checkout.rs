use crate::areas::repository::Repository;
use crate::artifacts::branch::branch_name::BranchName;
use crate::artifacts::checkout::migration::Migration;
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::snapshot::Snapshot;
use crate::errors::RepositoryError;
use anyhow::Context;
use std::path::Path;

impl Repository {
    /// Switch to another branch, rewriting the working tree to its tip
    pub fn checkout_branch(&self, branch_name: &str) -> anyhow::Result<()> {
        self.ensure_initialized()?;

        let branch_name = BranchName::try_parse(branch_name)
            .map_err(|_| RepositoryError::NoSuchBranch(branch_name.to_string()))?;
        let target_oid = self
            .refs()
            .read_ref(&branch_name)?
            .ok_or_else(|| RepositoryError::NoSuchBranch(branch_name.to_string()))?;

        if self.refs().is_current_branch(&branch_name)? {
            return Err(RepositoryError::AlreadyActive(branch_name.to_string()).into());
        }

        let (_, head) = self.head_commit()?;
        let target = self.database().parse_object_as_commit(&target_oid)?;

        self.reconcile_working_tree(head.snapshot(), target.snapshot())?;
        self.refs().set_head(&branch_name)?;

        Ok(())
    }

    /// Restore one file from the active branch tip
    pub fn checkout_file(&self, path: impl AsRef<Path>) -> anyhow::Result<()> {
        self.ensure_initialized()?;

        let head_oid = self.refs().read_head()?;
        self.restore_file(&head_oid, path.as_ref())
    }

    /// Restore one file from a commit given by a full or abbreviated id
    pub fn checkout_file_from_commit(
        &self,
        commit_id: &str,
        path: impl AsRef<Path>,
    ) -> anyhow::Result<()> {
        self.ensure_initialized()?;

        let commit_oid = self.database().resolve_commit_id(commit_id)?;
        self.restore_file(&commit_oid, path.as_ref())
    }

    // overwrites the working file whether it is tracked or not, and leaves the
    // index alone
    fn restore_file(&self, commit_oid: &ObjectId, path: &Path) -> anyhow::Result<()> {
        let commit = self.database().parse_object_as_commit(commit_oid)?;
        let blob_oid = commit
            .snapshot()
            .get(path)
            .ok_or_else(|| RepositoryError::PathNotInCommit(path.to_path_buf()))?;

        let blob = self
            .database()
            .parse_object_as_blob(blob_oid)
            .with_context(|| format!("Failed to load {:?} from commit {}", path, commit_oid))?;

        self.workspace().write_file(path, blob.content())
    }

    /// Move the working tree from `current` to `target` and clear the index
    pub(crate) fn reconcile_working_tree(
        &self,
        current: &Snapshot,
        target: &Snapshot,
    ) -> anyhow::Result<()> {
        let mut index = self.index();
        index.rehydrate()?;

        {
            let mut migration = Migration::new(self, &mut index);
            migration.apply_changes(current, target)?;
        }

        index.write_updates()
    }
}
