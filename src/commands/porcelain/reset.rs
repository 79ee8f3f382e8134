use crate::areas::repository::Repository;

impl Repository {
    /// Move the active branch to a commit given by a full or abbreviated id
    ///
    /// The working tree is rewritten to the commit's snapshot first; the active
    /// branch name does not change.
    pub fn reset(&self, commit_id: &str) -> anyhow::Result<()> {
        self.ensure_initialized()?;

        let target_oid = self.database().resolve_commit_id(commit_id)?;
        let target = self.database().parse_object_as_commit(&target_oid)?;
        let (_, head) = self.head_commit()?;

        self.reconcile_working_tree(head.snapshot(), target.snapshot())?;
        self.refs().update_head(&target_oid)
    }
}
