use crate::areas::index::RemovalOutcome;
use crate::areas::repository::Repository;
use std::path::Path;

impl Repository {
    /// Unstage `path`, or stage its removal and delete the working file if tracked
    pub fn rm(&self, path: impl AsRef<Path>) -> anyhow::Result<()> {
        self.ensure_initialized()?;
        let path = path.as_ref();

        let (_, head) = self.head_commit()?;

        let mut index = self.index();
        index.rehydrate()?;

        let outcome =
            index.stage_removal(path, head.snapshot(), self.workspace().exists(path))?;
        if outcome == RemovalOutcome::DeleteWorkingFile {
            self.workspace().delete_file(path)?;
        }

        index.write_updates()
    }
}
