use crate::areas::repository::Repository;
use crate::artifacts::log::LogEntry;
use crate::artifacts::objects::commit::Commit;
use crate::artifacts::objects::object_id::ObjectId;
use std::io::Write;

impl Repository {
    /// History of the active branch, following first parents back to the initial commit
    pub fn log(&self) -> anyhow::Result<()> {
        self.ensure_initialized()?;

        for (oid, commit) in self.first_parent_history()? {
            write!(self.writer(), "{}", LogEntry::new(&oid, &commit))?;
        }

        Ok(())
    }

    /// Every commit ever made, in creation order
    pub fn global_log(&self) -> anyhow::Result<()> {
        self.ensure_initialized()?;

        for (oid, commit) in self.history().commits()? {
            write!(self.writer(), "{}", LogEntry::new(&oid, &commit))?;
        }

        Ok(())
    }

    /// Commits from the active branch tip back to the initial commit, newest first
    pub fn first_parent_history(&self) -> anyhow::Result<Vec<(ObjectId, Commit)>> {
        let mut commits = Vec::new();
        let mut next = Some(self.refs().read_head()?);

        while let Some(oid) = next {
            let commit = self.database().parse_object_as_commit(&oid)?;
            next = commit.first_parent().cloned();
            commits.push((oid, commit));
        }

        Ok(commits)
    }
}
