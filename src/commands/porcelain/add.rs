use crate::areas::repository::Repository;
use crate::errors::RepositoryError;
use std::path::Path;

impl Repository {
    /// Stage the working file at `path` for addition
    pub fn add(&self, path: impl AsRef<Path>) -> anyhow::Result<()> {
        self.ensure_initialized()?;
        let path = path.as_ref();

        if path.to_string_lossy().contains('\n') {
            anyhow::bail!("Cannot track {:?}: file names may not contain a newline", path);
        }

        if !self.workspace().path().join(path).is_file() {
            return Err(RepositoryError::FileNotFound(path.to_path_buf()).into());
        }

        let blob = self.workspace().parse_blob(path)?;
        let blob_id = self.database().store(&blob)?;

        let (_, head) = self.head_commit()?;

        let mut index = self.index();
        index.rehydrate()?;
        index.stage_addition(path, blob_id, head.snapshot());
        index.write_updates()?;

        Ok(())
    }
}
