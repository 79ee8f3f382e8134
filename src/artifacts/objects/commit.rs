//! Commit object
//!
//! Commits are immutable nodes of the history DAG. Each one carries:
//! - The full snapshot of tracked paths (path -> blob id)
//! - Its parent commit ID(s)
//! - A formatted timestamp
//! - The commit message
//!
//! ## Parents
//!
//! The kind of a commit decides its parents: the initial commit has none, a
//! regular commit has one, a merge commit has two (first = previous tip of the
//! active branch, second = tip of the merged branch). For identity purposes a
//! regular commit still contributes two parent slots holding the same id.
//!
//! ## Format
//!
//! On disk:
//! ```text
//! commit <size>\0
//! parent <parent-sha>
//! parent <parent-sha>
//! timestamp <Thu Jan 1 00:00:00 1970 +0000>
//! blob <blob-sha> <path>
//!
//! <commit message>
//! ```

use crate::artifacts::objects::object::{Object, Packable, Unpackable};
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::object_type::ObjectType;
use crate::artifacts::objects::snapshot::Snapshot;
use anyhow::Context;
use bytes::Bytes;
use chrono::{DateTime, FixedOffset};
use std::io::{BufRead, Read, Write};
use std::path::PathBuf;

/// Message of the commit every repository starts from
pub const INITIAL_COMMIT_MESSAGE: &str = "initial commit";

/// Timestamp of the initial commit, fixed so its identity is the same everywhere
pub const INITIAL_COMMIT_TIMESTAMP: &str = "Thu Jan 1 00:00:00 1970 +0000";

/// Format used to render commit timestamps
pub const TIMESTAMP_FORMAT: &str = "%a %b %-d %H:%M:%S %Y %z";

/// Position of a commit in the history DAG
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommitKind {
    /// Root of every history, no parents
    Initial,
    /// Ordinary commit on top of the active branch tip
    Regular { parent: ObjectId },
    /// Merge commit joining the active branch tip with another branch tip
    Merge { parent: ObjectId, other: ObjectId },
}

impl CommitKind {
    /// Parent slots as they take part in the commit identity
    pub fn parent_slots(&self) -> Vec<&ObjectId> {
        match self {
            CommitKind::Initial => vec![],
            CommitKind::Regular { parent } => vec![parent, parent],
            CommitKind::Merge { parent, other } => vec![parent, other],
        }
    }

    /// Parent edges of the DAG, without duplicates
    pub fn parents(&self) -> Vec<&ObjectId> {
        match self {
            CommitKind::Initial => vec![],
            CommitKind::Regular { parent } => vec![parent],
            CommitKind::Merge { parent, other } => vec![parent, other],
        }
    }

    pub fn first_parent(&self) -> Option<&ObjectId> {
        match self {
            CommitKind::Initial => None,
            CommitKind::Regular { parent } | CommitKind::Merge { parent, .. } => Some(parent),
        }
    }

    fn from_parent_slots(mut slots: Vec<ObjectId>) -> anyhow::Result<Self> {
        match slots.len() {
            0 => Ok(CommitKind::Initial),
            2 => {
                let other = slots.pop().context("missing second parent")?;
                let parent = slots.pop().context("missing first parent")?;

                if parent == other {
                    Ok(CommitKind::Regular { parent })
                } else {
                    Ok(CommitKind::Merge { parent, other })
                }
            }
            count => anyhow::bail!("Invalid number of commit parents: {}", count),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Commit {
    kind: CommitKind,
    message: String,
    timestamp: String,
    snapshot: Snapshot,
}

impl Commit {
    pub fn new(
        kind: CommitKind,
        message: String,
        timestamp: DateTime<FixedOffset>,
        snapshot: Snapshot,
    ) -> Self {
        Commit {
            kind,
            message,
            timestamp: timestamp.format(TIMESTAMP_FORMAT).to_string(),
            snapshot,
        }
    }

    /// The distinguished root commit: no parents, empty snapshot, epoch timestamp
    pub fn initial() -> Self {
        Commit {
            kind: CommitKind::Initial,
            message: INITIAL_COMMIT_MESSAGE.to_string(),
            timestamp: INITIAL_COMMIT_TIMESTAMP.to_string(),
            snapshot: Snapshot::empty(),
        }
    }

    pub fn kind(&self) -> &CommitKind {
        &self.kind
    }

    pub fn parents(&self) -> Vec<&ObjectId> {
        self.kind.parents()
    }

    pub fn first_parent(&self) -> Option<&ObjectId> {
        self.kind.first_parent()
    }

    pub fn is_initial(&self) -> bool {
        self.kind == CommitKind::Initial
    }

    pub fn is_merge(&self) -> bool {
        matches!(self.kind, CommitKind::Merge { .. })
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn short_message(&self) -> String {
        self.message.lines().next().unwrap_or_default().to_string()
    }

    pub fn timestamp(&self) -> &str {
        &self.timestamp
    }

    pub fn snapshot(&self) -> &Snapshot {
        &self.snapshot
    }

    fn parents_identity_text(&self) -> String {
        let slots = self
            .kind
            .parent_slots()
            .into_iter()
            .map(|oid| oid.to_string())
            .collect::<Vec<_>>();

        format!("[{}]", slots.join(", "))
    }
}

impl Packable for Commit {
    fn serialize(&self) -> anyhow::Result<Bytes> {
        let mut lines = Vec::new();

        for parent in self.kind.parent_slots() {
            lines.push(format!("parent {}", parent));
        }
        lines.push(format!("timestamp {}", self.timestamp));
        for (path, oid) in self.snapshot.iter() {
            let path = path.to_string_lossy();
            if path.contains('\n') {
                anyhow::bail!("Cannot record {:?} in a commit: path contains a newline", path);
            }
            lines.push(format!("blob {} {}", oid, path));
        }
        lines.push(String::new());
        lines.push(self.message.clone());

        let content = lines.join("\n");

        let mut commit_bytes = Vec::new();
        let header = format!("{} {}\0", self.object_type().as_str(), content.len());
        commit_bytes.write_all(header.as_bytes())?;
        commit_bytes.write_all(content.as_bytes())?;

        Ok(Bytes::from(commit_bytes))
    }
}

impl Unpackable for Commit {
    fn deserialize(mut reader: impl BufRead) -> anyhow::Result<Self> {
        // the header has already been read
        let mut parents = Vec::new();
        let mut timestamp = None;
        let mut entries = Vec::new();

        loop {
            let mut line = String::new();
            if reader.read_line(&mut line)? == 0 {
                anyhow::bail!("Unexpected end of commit object before message");
            }

            let line = line.trim_end_matches('\n');
            if line.is_empty() {
                break;
            }

            let (key, value) = line
                .split_once(' ')
                .with_context(|| format!("Malformed commit line: {line}"))?;

            match key {
                "parent" => parents.push(ObjectId::try_parse(value.to_string())?),
                "timestamp" => timestamp = Some(value.to_string()),
                "blob" => {
                    let (oid, path) = value
                        .split_once(' ')
                        .with_context(|| format!("Malformed snapshot entry: {value}"))?;
                    entries.push((PathBuf::from(path), ObjectId::try_parse(oid.to_string())?));
                }
                _ => anyhow::bail!("Unknown commit field: {}", key),
            }
        }

        let mut message = String::new();
        reader.read_to_string(&mut message)?;

        Ok(Commit {
            kind: CommitKind::from_parent_slots(parents)?,
            message,
            timestamp: timestamp.context("Commit is missing its timestamp")?,
            snapshot: entries.into_iter().collect(),
        })
    }
}

impl Object for Commit {
    fn object_type(&self) -> ObjectType {
        ObjectType::Commit
    }

    fn identity_fields(&self) -> Vec<Bytes> {
        vec![
            Bytes::from(self.message.clone()),
            Bytes::from(self.parents_identity_text()),
            Bytes::from(self.snapshot.identity_text()),
            Bytes::from(self.timestamp.clone()),
        ]
    }
}
