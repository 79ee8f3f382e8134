#![allow(dead_code)]

pub mod command;
pub mod file;

use assert_fs::TempDir;
use bitlet::areas::repository::Repository;
use bitlet::artifacts::core::clock::{FixedClock, parse_commit_date};
use rstest::fixture;
use std::cell::RefCell;
use std::io::Write;
use std::path::Path;
use std::rc::Rc;

pub const COMMIT_DATE: &str = "2024-05-01 12:00:00 +0000";

/// Output sink the repository writes to, readable from the test
#[derive(Debug, Clone, Default)]
pub struct SharedOutput(Rc<RefCell<Vec<u8>>>);

impl SharedOutput {
    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.borrow()).to_string()
    }

    pub fn clear(&self) {
        self.0.borrow_mut().clear();
    }
}

impl Write for SharedOutput {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.borrow_mut().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

pub struct TestRepository {
    pub dir: TempDir,
    pub repository: Repository,
    pub output: SharedOutput,
}

impl TestRepository {
    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn write(&self, path: &str, content: &str) {
        file::write_file(file::FileSpec::new(self.dir.path().join(path), content.to_string()));
    }

    pub fn read(&self, path: &str) -> String {
        std::fs::read_to_string(self.dir.path().join(path))
            .unwrap_or_else(|e| panic!("Failed to read {}: {}", path, e))
    }

    pub fn exists(&self, path: &str) -> bool {
        self.dir.path().join(path).exists()
    }

    pub fn delete(&self, path: &str) {
        std::fs::remove_file(self.dir.path().join(path))
            .unwrap_or_else(|e| panic!("Failed to delete {}: {}", path, e));
    }

    /// Write, stage and commit a single file
    pub fn commit_file(&self, path: &str, content: &str, message: &str) -> bitlet::artifacts::objects::object_id::ObjectId {
        self.write(path, content);
        self.repository.add(path).expect("Failed to add file");
        self.repository.commit(message).expect("Failed to commit")
    }
}

#[fixture]
pub fn repository_dir() -> TempDir {
    TempDir::new().expect("Failed to create temp dir")
}

/// A freshly initialized repository with a fixed commit clock
#[fixture]
pub fn repository(repository_dir: TempDir) -> TestRepository {
    let output = SharedOutput::default();
    let clock = FixedClock::new(parse_commit_date(COMMIT_DATE).expect("Invalid commit date"));
    let repository = Repository::new(repository_dir.path(), Box::new(output.clone()))
        .expect("Failed to open repository")
        .with_clock(clock);
    repository.init().expect("Failed to initialize repository");

    TestRepository {
        dir: repository_dir,
        repository,
        output,
    }
}

pub fn kind_of(error: &anyhow::Error) -> Option<&bitlet::errors::RepositoryError> {
    bitlet::errors::error_kind(error)
}
