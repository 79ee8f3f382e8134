use crate::areas::repository::Repository;
use crate::artifacts::branch::branch_name::BranchName;
use crate::artifacts::merge::resolution::{MergeAction, classify, conflict_content, merge_paths};
use crate::artifacts::merge::split_point::SplitPointFinder;
use crate::artifacts::objects::blob::Blob;
use crate::artifacts::objects::object_id::ObjectId;
use crate::debug_log;
use crate::errors::RepositoryError;
use anyhow::Context;
use bytes::Bytes;
use std::io::Write;
use std::path::Path;

pub const FAST_FORWARD_MESSAGE: &str = "Current branch fast-forwarded.";
pub const ANCESTOR_MESSAGE: &str = "Given branch is an ancestor of the current branch.";
pub const CONFLICT_MESSAGE: &str = "Encountered a merge conflict.";

/// How a merge ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MergeOutcome {
    /// The active branch was behind and now points at the merged tip
    FastForward(ObjectId),
    /// The merged branch was already part of the active branch's history
    AlreadyAncestor,
    /// A merge commit was created, possibly with conflict markers in it
    Merged { commit: ObjectId, conflicted: bool },
}

impl Repository {
    /// Merge `branch_name` into the active branch
    pub fn merge(&self, branch_name: &str) -> anyhow::Result<MergeOutcome> {
        self.ensure_initialized()?;

        {
            let mut index = self.index();
            index.rehydrate()?;
            if !index.is_empty() {
                return Err(RepositoryError::UncommittedChanges.into());
            }
        }

        let other_branch = BranchName::try_parse(branch_name)
            .map_err(|_| RepositoryError::NoSuchBranch(branch_name.to_string()))?;
        let other_oid = self
            .refs()
            .read_ref(&other_branch)?
            .ok_or_else(|| RepositoryError::NoSuchBranch(branch_name.to_string()))?;

        let current_branch = self.refs().current_branch()?;
        if current_branch == other_branch {
            return Err(RepositoryError::SelfMerge.into());
        }

        let (head_oid, head) = self.head_commit()?;
        let other = self.database().parse_object_as_commit(&other_oid)?;

        let split_point_oid = self.find_split_point(&head_oid, &other_oid)?;
        debug_log!(
            "Merging {} ({}) into {} ({}), split point {}",
            other_branch,
            other_oid.to_short_oid(),
            current_branch,
            head_oid.to_short_oid(),
            split_point_oid.to_short_oid()
        );

        if split_point_oid == head_oid {
            self.reconcile_working_tree(head.snapshot(), other.snapshot())?;
            self.refs().update_head(&other_oid)?;
            writeln!(self.writer(), "{}", FAST_FORWARD_MESSAGE)?;

            return Ok(MergeOutcome::FastForward(other_oid));
        }

        if split_point_oid == other_oid {
            writeln!(self.writer(), "{}", ANCESTOR_MESSAGE)?;

            return Ok(MergeOutcome::AlreadyAncestor);
        }

        let split_point = self.database().parse_object_as_commit(&split_point_oid)?;
        let (base, ours, theirs) = (split_point.snapshot(), head.snapshot(), other.snapshot());

        let mut index = self.index();
        let mut conflicted = false;

        for path in merge_paths(base, ours, theirs) {
            let action = classify(base.get(&path), ours.get(&path), theirs.get(&path));
            debug_log!("Merge action for {:?}: {:?}", path, action);

            match action {
                MergeAction::Keep => {}
                MergeAction::TakeTheirs(blob_oid) => {
                    self.check_untracked_obstruction(&path, ours.contains(&path))?;

                    let blob = self.database().parse_object_as_blob(&blob_oid)?;
                    self.workspace().write_file(&path, blob.content())?;
                    index.stage_addition(&path, blob_oid, ours);
                }
                MergeAction::Remove => {
                    let tracked_oid = ours
                        .get(&path)
                        .with_context(|| format!("{:?} is not tracked by the active commit", path))?
                        .clone();

                    self.workspace().delete_file(&path)?;
                    index.record_removal(&path, tracked_oid);
                }
                MergeAction::Conflict {
                    ours: ours_oid,
                    theirs: theirs_oid,
                } => {
                    self.check_untracked_obstruction(&path, ours_oid.is_some())?;

                    let content = conflict_content(
                        &self.load_blob_content(ours_oid.as_ref())?,
                        &self.load_blob_content(theirs_oid.as_ref())?,
                    );
                    self.workspace().write_file(&path, &content)?;

                    let blob_oid = self.database().store(&Blob::new(content, path.clone()))?;
                    index.stage_addition(&path, blob_oid, ours);
                    conflicted = true;
                }
            }
        }

        let message = format!("Merged {} into {}", other_branch, current_branch);
        let (commit_oid, _) = self.write_commit(&mut index, &message, Some(&other_oid))?;

        if conflicted {
            writeln!(self.writer(), "{}", CONFLICT_MESSAGE)?;
        }

        Ok(MergeOutcome::Merged {
            commit: commit_oid,
            conflicted,
        })
    }

    /// Split point of the active branch tip and another commit
    pub fn find_split_point(&self, head_oid: &ObjectId, other_oid: &ObjectId) -> anyhow::Result<ObjectId> {
        let finder = SplitPointFinder::new(|oid: &ObjectId| -> anyhow::Result<Vec<ObjectId>> {
            let commit = self.database().parse_object_as_commit(oid)?;
            Ok(commit.parents().into_iter().cloned().collect())
        });

        finder
            .find_split_point(head_oid, other_oid)?
            .with_context(|| format!("{} and {} share no history", head_oid, other_oid))
    }

    fn check_untracked_obstruction(&self, path: &Path, tracked: bool) -> anyhow::Result<()> {
        if !tracked && self.workspace().exists(path) {
            return Err(RepositoryError::UntrackedObstruction(path.to_path_buf()).into());
        }

        Ok(())
    }

    fn load_blob_content(&self, blob_oid: Option<&ObjectId>) -> anyhow::Result<Bytes> {
        match blob_oid {
            Some(blob_oid) => Ok(self.database().parse_object_as_blob(blob_oid)?.content().clone()),
            None => Ok(Bytes::new()),
        }
    }
}
