//! Commit rendering for `log` and `global-log`
//!
//! Each commit is printed as a block:
//!
//! ```text
//! ===
//! commit <id>
//! Merge: <first parent, 7 chars> <second parent, 7 chars>
//! Date: <timestamp>
//! <message>
//!
//! ```
//!
//! The `Merge:` line only appears for merge commits.

use crate::artifacts::objects::commit::{Commit, CommitKind};
use crate::artifacts::objects::object_id::ObjectId;
use derive_new::new;
use std::fmt;

const MERGE_PARENT_ABBREV: usize = 7;

#[derive(Debug, Clone, new)]
pub struct LogEntry<'c> {
    oid: &'c ObjectId,
    commit: &'c Commit,
}

impl fmt::Display for LogEntry<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "===")?;
        writeln!(f, "commit {}", self.oid)?;
        if let CommitKind::Merge { parent, other } = self.commit.kind() {
            writeln!(
                f,
                "Merge: {} {}",
                &parent.as_ref()[..MERGE_PARENT_ABBREV],
                &other.as_ref()[..MERGE_PARENT_ABBREV]
            )?;
        }
        writeln!(f, "Date: {}", self.commit.timestamp())?;
        writeln!(f, "{}", self.commit.message())?;
        writeln!(f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::artifacts::objects::object::Object;
    use crate::artifacts::objects::snapshot::Snapshot;
    use chrono::DateTime;
    use pretty_assertions::assert_eq;

    #[test]
    fn initial_commit_entry() {
        let commit = Commit::initial();
        let oid = commit.object_id().unwrap();

        assert_eq!(
            LogEntry::new(&oid, &commit).to_string(),
            format!("===\ncommit {oid}\nDate: Thu Jan 1 00:00:00 1970 +0000\ninitial commit\n\n")
        );
    }

    #[test]
    fn merge_commit_entry_lists_both_parents() {
        let parent = ObjectId::try_parse("1234567".to_string() + &"0".repeat(33)).unwrap();
        let other = ObjectId::try_parse("abcdef1".to_string() + &"0".repeat(33)).unwrap();
        let commit = Commit::new(
            CommitKind::Merge { parent, other },
            "Merged side into master".to_string(),
            DateTime::parse_from_rfc2822("Tue, 14 Nov 2023 22:13:20 -0800").unwrap(),
            Snapshot::empty(),
        );
        let oid = commit.object_id().unwrap();

        assert_eq!(
            LogEntry::new(&oid, &commit).to_string(),
            format!(
                "===\ncommit {oid}\nMerge: 1234567 abcdef1\n\
                 Date: Tue Nov 14 22:13:20 2023 -0800\nMerged side into master\n\n"
            )
        );
    }
}
