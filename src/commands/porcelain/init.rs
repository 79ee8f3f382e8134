use crate::areas::repository::Repository;
use crate::artifacts::branch::branch_name::BranchName;
use crate::artifacts::objects::commit::Commit;
use crate::errors::RepositoryError;
use anyhow::Context;
use std::fs;

impl Repository {
    pub fn init(&self) -> anyhow::Result<()> {
        if self.is_initialized() {
            return Err(RepositoryError::AlreadyInitialized.into());
        }

        fs::create_dir_all(self.database().objects_path())
            .context("Failed to create .bitlet/objects directory")?;

        fs::create_dir_all(self.refs().heads_path())
            .context("Failed to create .bitlet/refs/heads directory")?;

        let initial_commit = Commit::initial();
        let initial_commit_id = self
            .database()
            .store(&initial_commit)
            .context("Failed to store the initial commit")?;
        self.history().append(&initial_commit)?;

        let default_branch = BranchName::default_branch();
        self.refs()
            .update_ref(&default_branch, &initial_commit_id)
            .context("Failed to create the default branch")?;
        self.refs()
            .set_head(&default_branch)
            .context("Failed to create initial HEAD reference")?;

        let mut index = self.index();
        index.clear();
        index
            .write_updates()
            .context("Failed to create .bitlet/index file")?;

        Ok(())
    }
}
