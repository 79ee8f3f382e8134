use crate::areas::database::Database;
use crate::areas::history::History;
use crate::areas::index::Index;
use crate::areas::refs::Refs;
use crate::areas::workspace::Workspace;
use crate::artifacts::core::clock::{Clock, SystemClock};
use crate::artifacts::objects::commit::Commit;
use crate::artifacts::objects::object_id::ObjectId;
use crate::errors::RepositoryError;
use anyhow::Context;
use std::cell::{RefCell, RefMut};
use std::path::Path;

/// Name of the metadata directory inside the working tree
pub const METADATA_DIR: &str = ".bitlet";

pub struct Repository {
    path: Box<Path>,
    writer: RefCell<Box<dyn std::io::Write>>,
    clock: Box<dyn Clock>,
    index: RefCell<Index>,
    database: Database,
    workspace: Workspace,
    refs: Refs,
    history: History,
}

impl Repository {
    /// Open the repository rooted at `path`, writing user-facing output to `writer`
    ///
    /// Every metadata path is derived from the root. The metadata directory does
    /// not have to exist yet (see `init`).
    pub fn new(path: impl AsRef<Path>, writer: Box<dyn std::io::Write>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            std::fs::create_dir_all(path)
                .with_context(|| format!("Unable to create repository root {:?}", path))?;
        }
        let path = path
            .canonicalize()
            .with_context(|| format!("Invalid repository root {:?}", path))?;
        let metadata_path = path.join(METADATA_DIR);

        let index = Index::new(metadata_path.join("index").into_boxed_path());
        let database = Database::new(metadata_path.join("objects").into_boxed_path());
        let workspace = Workspace::new(path.clone().into_boxed_path());
        let refs = Refs::new(metadata_path.clone().into_boxed_path());
        let history = History::new(metadata_path.join("history").into_boxed_path());

        Ok(Repository {
            path: path.into_boxed_path(),
            writer: RefCell::new(writer),
            clock: Box::new(SystemClock),
            index: RefCell::new(index),
            database,
            workspace,
            refs,
            history,
        })
    }

    /// Replace the clock commits are stamped with
    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Box::new(clock);
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn metadata_path(&self) -> Box<Path> {
        self.path.join(METADATA_DIR).into_boxed_path()
    }

    pub fn is_initialized(&self) -> bool {
        self.metadata_path().is_dir()
    }

    pub(crate) fn ensure_initialized(&self) -> anyhow::Result<()> {
        if self.is_initialized() {
            Ok(())
        } else {
            Err(RepositoryError::NotInitialized.into())
        }
    }

    pub fn writer(&'_ self) -> RefMut<'_, Box<dyn std::io::Write>> {
        self.writer.borrow_mut()
    }

    pub fn clock(&self) -> &dyn Clock {
        self.clock.as_ref()
    }

    pub fn index(&'_ self) -> RefMut<'_, Index> {
        self.index.borrow_mut()
    }

    pub fn database(&self) -> &Database {
        &self.database
    }

    pub fn workspace(&self) -> &Workspace {
        &self.workspace
    }

    pub fn refs(&self) -> &Refs {
        &self.refs
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    /// Tip of the active branch together with its commit
    pub fn head_commit(&self) -> anyhow::Result<(ObjectId, Commit)> {
        let head_id = self.refs.read_head()?;
        let head = self.database.parse_object_as_commit(&head_id)?;

        Ok((head_id, head))
    }
}
