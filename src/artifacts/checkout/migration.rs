//! Checkout migration
//!
//! Plans and executes the move of the working tree from the current snapshot to
//! a target snapshot:
//!
//! 1. Every path tracked now but not by the target is deleted.
//! 2. Every path of the target is written. A path the current snapshot does not
//!    track must not exist in the working tree: it would be an untracked file
//!    silently overwritten, so planning stops with `UntrackedObstruction` for
//!    the first such path in target order.
//! 3. The staging index is cleared.
//!
//! Nothing is touched before the whole plan is known to be clean.

use crate::areas::index::Index;
use crate::areas::repository::Repository;
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::snapshot::Snapshot;
use crate::debug_log;
use crate::errors::RepositoryError;
use bytes::Bytes;
use std::collections::HashMap;
use std::path::PathBuf;

/// Type of file system action required for checkout
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ActionType {
    /// Create new file
    Add,
    /// Delete file
    Delete,
    /// Overwrite a tracked file
    Modify,
}

/// Set of planned actions grouped by type
pub type ActionsSet = HashMap<ActionType, Vec<(PathBuf, Option<ObjectId>)>>;

/// Checkout migration planner and executor
pub struct Migration<'r> {
    repository: &'r Repository,
    /// Index to clear once the working tree matches the target
    index: &'r mut Index,
    /// Planned file system actions
    actions: ActionsSet,
}

impl<'r> Migration<'r> {
    pub fn new(repository: &'r Repository, index: &'r mut Index) -> Self {
        let actions = HashMap::from([
            (ActionType::Add, Vec::new()),
            (ActionType::Delete, Vec::new()),
            (ActionType::Modify, Vec::new()),
        ]);

        Self {
            repository,
            index,
            actions,
        }
    }

    pub fn actions(&self) -> &ActionsSet {
        &self.actions
    }

    /// Rewrite the working tree from `current` to `target` and clear the index
    ///
    /// The index is only cleared in memory; persisting it is up to the caller.
    pub fn apply_changes(&mut self, current: &Snapshot, target: &Snapshot) -> anyhow::Result<()> {
        self.plan_changes(current, target)?;
        self.update_workspace()?;
        self.update_index();

        Ok(())
    }

    fn plan_changes(&mut self, current: &Snapshot, target: &Snapshot) -> anyhow::Result<()> {
        let workspace = self.repository.workspace();
        let planned = plan(current, target, |path| workspace.exists(path))?;
        self.actions = planned;

        debug_log!(
            "Checkout plan: {} deletions, {} modifications, {} additions",
            self.actions[&ActionType::Delete].len(),
            self.actions[&ActionType::Modify].len(),
            self.actions[&ActionType::Add].len()
        );

        Ok(())
    }

    fn update_workspace(&self) -> anyhow::Result<()> {
        self.repository.workspace().apply_migration(self)
    }

    fn update_index(&mut self) {
        self.index.clear();
    }

    pub fn load_blob_data(&self, object_id: &ObjectId) -> anyhow::Result<Bytes> {
        let blob = self.repository.database().parse_object_as_blob(object_id)?;

        Ok(blob.content().clone())
    }
}

/// Plan the actions moving the working tree from `current` to `target`
///
/// `exists` reports whether a working file is present at a path.
pub fn plan(
    current: &Snapshot,
    target: &Snapshot,
    exists: impl Fn(&std::path::Path) -> bool,
) -> anyhow::Result<ActionsSet> {
    let mut actions = ActionsSet::from([
        (ActionType::Add, Vec::new()),
        (ActionType::Delete, Vec::new()),
        (ActionType::Modify, Vec::new()),
    ]);

    for path in current.paths().filter(|path| !target.contains(path)) {
        actions
            .entry(ActionType::Delete)
            .or_default()
            .push((path.clone(), None));
    }

    for (path, oid) in target.iter() {
        let action = if current.contains(path) {
            ActionType::Modify
        } else if exists(path.as_path()) {
            return Err(RepositoryError::UntrackedObstruction(path.clone()).into());
        } else {
            ActionType::Add
        };

        actions
            .entry(action)
            .or_default()
            .push((path.clone(), Some(oid.clone())));
    }

    Ok(actions)
}
