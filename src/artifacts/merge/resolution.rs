//! Three-way resolution
//!
//! Every path that appears in the split point (base), the current tip (ours) or
//! the merged tip (theirs) is classified on its own, using only whether the path
//! is present on each side and whether the blob ids are equal.
//!
//! | Base | Ours | Theirs | Condition                    | Action       |
//! |------|------|--------|------------------------------|--------------|
//! | any  | -    | -      |                              | keep         |
//! | -    | o    | -      |                              | keep         |
//! | -    | -    | t      |                              | take theirs  |
//! | b    | o    | -      | o == b                       | remove       |
//! | b    | o    | -      | o != b                       | conflict     |
//! | b    | -    | t      | t == b                       | keep         |
//! | b    | -    | t      | t != b                       | conflict     |
//! | b    | o    | t      | o == b, t != b               | take theirs  |
//! | b    | o    | t      | t == b or o == t             | keep         |
//! | b    | o    | t      | all three differ             | conflict     |
//! | -    | o    | t      | o == t                       | keep         |
//! | -    | o    | t      | o != t                       | conflict     |

use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::snapshot::Snapshot;
use bytes::Bytes;
use std::collections::BTreeSet;
use std::path::PathBuf;

const CONFLICT_OURS_MARKER: &[u8] = b"<<<<<<< HEAD\n";
const CONFLICT_SEPARATOR: &[u8] = b"=======\n";
const CONFLICT_END_MARKER: &[u8] = b">>>>>>>\n";

/// What a merge does with one path
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MergeAction {
    /// Leave the working file and the index alone
    Keep,
    /// Write the merged branch's blob and stage it
    TakeTheirs(ObjectId),
    /// Delete the working file and stage its removal
    Remove,
    /// Write conflict markers around both versions and stage the result
    Conflict {
        ours: Option<ObjectId>,
        theirs: Option<ObjectId>,
    },
}

impl MergeAction {
    pub fn is_conflict(&self) -> bool {
        matches!(self, MergeAction::Conflict { .. })
    }
}

/// Classify one path from its blob id in base, ours and theirs
pub fn classify(
    base: Option<&ObjectId>,
    ours: Option<&ObjectId>,
    theirs: Option<&ObjectId>,
) -> MergeAction {
    let conflict = || MergeAction::Conflict {
        ours: ours.cloned(),
        theirs: theirs.cloned(),
    };

    match (base, ours, theirs) {
        (_, None, None) => MergeAction::Keep,
        (None, Some(_), None) => MergeAction::Keep,
        (None, None, Some(theirs)) => MergeAction::TakeTheirs(theirs.clone()),
        (Some(base), Some(ours), None) => {
            if ours == base {
                MergeAction::Remove
            } else {
                conflict()
            }
        }
        (Some(base), None, Some(theirs)) => {
            if theirs == base {
                MergeAction::Keep
            } else {
                conflict()
            }
        }
        (Some(base), Some(ours), Some(theirs)) => {
            if ours == base && theirs != base {
                MergeAction::TakeTheirs(theirs.clone())
            } else if theirs == base || ours == theirs {
                MergeAction::Keep
            } else {
                conflict()
            }
        }
        (None, Some(ours), Some(theirs)) => {
            if ours == theirs {
                MergeAction::Keep
            } else {
                conflict()
            }
        }
    }
}

/// Every path tracked by at least one of the three snapshots, in path order
pub fn merge_paths(base: &Snapshot, ours: &Snapshot, theirs: &Snapshot) -> BTreeSet<PathBuf> {
    base.paths()
        .chain(ours.paths())
        .chain(theirs.paths())
        .cloned()
        .collect()
}

/// Working file content for a conflicted path
///
/// A side that does not have the path contributes empty content.
pub fn conflict_content(ours: &[u8], theirs: &[u8]) -> Bytes {
    let mut content = Vec::with_capacity(
        CONFLICT_OURS_MARKER.len()
            + ours.len()
            + CONFLICT_SEPARATOR.len()
            + theirs.len()
            + CONFLICT_END_MARKER.len(),
    );

    content.extend_from_slice(CONFLICT_OURS_MARKER);
    content.extend_from_slice(ours);
    content.extend_from_slice(CONFLICT_SEPARATOR);
    content.extend_from_slice(theirs);
    content.extend_from_slice(CONFLICT_END_MARKER);

    Bytes::from(content)
}
