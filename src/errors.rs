//! Repository error kinds
//!
//! Every operation fails with exactly one of these kinds. They travel inside
//! `anyhow::Error`, so callers recover the kind with
//! `error.downcast_ref::<RepositoryError>()`.

use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::object_type::ObjectType;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RepositoryError {
    #[error("No {kind} with that id exists.")]
    NotFound { id: String, kind: ObjectType },

    #[error("Object {0} is not a commit.")]
    NotACommit(ObjectId),

    #[error("Object {0} is not a blob.")]
    NotABlob(ObjectId),

    #[error("Abbreviated id {0} matches more than one object.")]
    AmbiguousId(String),

    #[error("Please enter a commit message.")]
    EmptyMessage,

    #[error("No changes added to the commit.")]
    NothingStaged,

    #[error("No reason to remove the file.")]
    NothingToRemove(PathBuf),

    #[error("File does not exist.")]
    FileNotFound(PathBuf),

    #[error("You have uncommitted changes.")]
    UncommittedChanges,

    #[error("Cannot merge a branch with itself.")]
    SelfMerge,

    #[error("There is an untracked file in the way; delete it, or add and commit it first.")]
    UntrackedObstruction(PathBuf),

    #[error("A branch with that name does not exist.")]
    NoSuchBranch(String),

    #[error("No need to checkout the current branch.")]
    AlreadyActive(String),

    #[error("A branch with that name already exists.")]
    BranchExists(String),

    #[error("Cannot remove the current branch.")]
    CannotRemoveActiveBranch(String),

    #[error("Invalid branch name: {0}")]
    InvalidBranchName(String),

    #[error("File does not exist in that commit.")]
    PathNotInCommit(PathBuf),

    #[error("Not in an initialized bitlet directory.")]
    NotInitialized,

    #[error("A bitlet version-control system already exists in the current directory.")]
    AlreadyInitialized,
}

/// Recover the repository error kind carried by an `anyhow::Error`, if any
pub fn error_kind(error: &anyhow::Error) -> Option<&RepositoryError> {
    error.downcast_ref::<RepositoryError>()
}
