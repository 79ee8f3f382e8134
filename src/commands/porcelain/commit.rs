use crate::areas::index::Index;
use crate::areas::repository::Repository;
use crate::artifacts::objects::commit::{Commit, CommitKind};
use crate::artifacts::objects::object::Object;
use crate::artifacts::objects::object_id::ObjectId;
use crate::errors::RepositoryError;
use std::io::Write;

impl Repository {
    /// Record the staged changes on top of the active branch
    pub fn commit(&self, message: &str) -> anyhow::Result<ObjectId> {
        self.ensure_initialized()?;

        let mut index = self.index();
        index.rehydrate()?;

        let (commit_id, commit) = self.write_commit(&mut index, message, None)?;

        writeln!(
            self.writer(),
            "[{} {}] {}",
            self.refs().current_branch()?,
            commit_id.to_short_oid(),
            commit.short_message()
        )?;

        Ok(commit_id)
    }

    /// Create a commit from the active branch tip and the given index
    ///
    /// The snapshot is the first parent's snapshot with the index additions
    /// applied, then its removals. With `other_parent` the commit is a merge
    /// commit. The active branch advances to the new commit, which is appended
    /// to the history log, and the index is cleared and persisted.
    pub(crate) fn write_commit(
        &self,
        index: &mut Index,
        message: &str,
        other_parent: Option<&ObjectId>,
    ) -> anyhow::Result<(ObjectId, Commit)> {
        if message.is_empty() {
            return Err(RepositoryError::EmptyMessage.into());
        }

        if index.is_empty() {
            return Err(RepositoryError::NothingStaged.into());
        }

        let (parent_id, parent) = self.head_commit()?;
        let snapshot = parent
            .snapshot()
            .apply(index.additions(), index.removals().keys());

        let kind = match other_parent {
            Some(other) => CommitKind::Merge {
                parent: parent_id,
                other: other.clone(),
            },
            None => CommitKind::Regular { parent: parent_id },
        };
        let commit = Commit::new(kind, message.to_string(), self.clock().now()?, snapshot);

        let commit_id = self.database().store(&commit)?;
        self.refs().update_head(&commit_id)?;
        self.history().append(&commit)?;

        index.clear();
        index.write_updates()?;

        Ok((commit_id, commit))
    }
}
