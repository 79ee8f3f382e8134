//! Status report
//!
//! Compares three states of every path: the active commit's snapshot, the
//! staging index, and the working tree (as the blob id each working file would
//! get if it were added now).
//!
//! A path is reported as
//! - modified, when it is tracked and unstaged but its content changed, or it is
//!   staged for addition with content other than the working file's;
//! - deleted, when it is staged for addition but gone from the working tree, or
//!   tracked, not staged for removal, and gone from the working tree;
//! - untracked, when the working file is neither staged for addition nor
//!   tracked (a file staged for removal and then recreated counts as untracked).

use crate::areas::index::Index;
use crate::artifacts::branch::branch_name::BranchName;
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::snapshot::Snapshot;
use crate::artifacts::status::file_change::WorkspaceChangeType;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::path::PathBuf;

pub type ChangeSet = BTreeMap<PathBuf, WorkspaceChangeType>;
pub type FileSet = BTreeSet<PathBuf>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusInfo {
    pub(crate) branches: Vec<BranchName>,
    pub(crate) current_branch: BranchName,
    pub(crate) staged_files: FileSet,
    pub(crate) removed_files: FileSet,
    pub(crate) workspace_changeset: ChangeSet,
    pub(crate) untracked_files: FileSet,
}

impl StatusInfo {
    /// Build the report
    ///
    /// `working_files` maps every working file to the blob id of its content.
    pub fn build(
        branches: Vec<BranchName>,
        current_branch: BranchName,
        head: &Snapshot,
        index: &Index,
        working_files: &BTreeMap<PathBuf, ObjectId>,
    ) -> Self {
        let staged_files = index.additions().keys().cloned().collect::<FileSet>();
        let removed_files = index.removals().keys().cloned().collect::<FileSet>();

        let mut workspace_changeset = ChangeSet::new();

        for (path, staged_oid) in index.additions() {
            match working_files.get(path) {
                None => {
                    workspace_changeset.insert(path.clone(), WorkspaceChangeType::Deleted);
                }
                Some(working_oid) if working_oid != staged_oid => {
                    workspace_changeset.insert(path.clone(), WorkspaceChangeType::Modified);
                }
                Some(_) => {}
            }
        }

        for (path, tracked_oid) in head.iter() {
            if index.is_staged_for_addition(path) || index.is_staged_for_removal(path) {
                continue;
            }

            match working_files.get(path) {
                None => {
                    workspace_changeset.insert(path.clone(), WorkspaceChangeType::Deleted);
                }
                Some(working_oid) if working_oid != tracked_oid => {
                    workspace_changeset.insert(path.clone(), WorkspaceChangeType::Modified);
                }
                Some(_) => {}
            }
        }

        let untracked_files = working_files
            .keys()
            .filter(|path| {
                !index.is_staged_for_addition(path)
                    && (!head.contains(path) || index.is_staged_for_removal(path))
            })
            .cloned()
            .collect::<FileSet>();

        StatusInfo {
            branches,
            current_branch,
            staged_files,
            removed_files,
            workspace_changeset,
            untracked_files,
        }
    }

    pub fn staged_files(&self) -> &FileSet {
        &self.staged_files
    }

    pub fn removed_files(&self) -> &FileSet {
        &self.removed_files
    }

    pub fn workspace_changeset(&self) -> &ChangeSet {
        &self.workspace_changeset
    }

    pub fn untracked_files(&self) -> &FileSet {
        &self.untracked_files
    }
}

impl fmt::Display for StatusInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "=== Branches ===")?;
        for branch in &self.branches {
            if branch == &self.current_branch {
                writeln!(f, "*{}", branch)?;
            } else {
                writeln!(f, "{}", branch)?;
            }
        }
        writeln!(f)?;

        writeln!(f, "=== Staged Files ===")?;
        for path in &self.staged_files {
            writeln!(f, "{}", path.display())?;
        }
        writeln!(f)?;

        writeln!(f, "=== Removed Files ===")?;
        for path in &self.removed_files {
            writeln!(f, "{}", path.display())?;
        }
        writeln!(f)?;

        writeln!(f, "=== Modifications Not Staged For Commit ===")?;
        for (path, change) in &self.workspace_changeset {
            writeln!(f, "{} ({})", path.display(), change)?;
        }
        writeln!(f)?;

        writeln!(f, "=== Untracked Files ===")?;
        for path in &self.untracked_files {
            writeln!(f, "{}", path.display())?;
        }
        writeln!(f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::path::Path;

    fn oid(c: char) -> ObjectId {
        ObjectId::try_parse(c.to_string().repeat(40)).unwrap()
    }

    fn branch(name: &str) -> BranchName {
        BranchName::try_parse(name).unwrap()
    }

    fn files(entries: &[(&str, char)]) -> BTreeMap<PathBuf, ObjectId> {
        entries
            .iter()
            .map(|(path, c)| (PathBuf::from(path), oid(*c)))
            .collect()
    }

    fn status(head: &Snapshot, index: &Index, working: &[(&str, char)]) -> StatusInfo {
        StatusInfo::build(
            vec![branch("master"), branch("other")],
            branch("master"),
            head,
            index,
            &files(working),
        )
    }

    fn empty_index() -> Index {
        Index::new(PathBuf::from("unused-index").into_boxed_path())
    }

    #[test]
    fn clean_tree_reports_nothing() {
        let head = Snapshot::from_iter(files(&[("a.txt", '1')]));

        let status = status(&head, &empty_index(), &[("a.txt", '1')]);

        assert!(status.staged_files().is_empty());
        assert!(status.workspace_changeset().is_empty());
        assert!(status.untracked_files().is_empty());
    }

    #[test]
    fn unstaged_edits_and_deletions_of_tracked_files() {
        let head = Snapshot::from_iter(files(&[("edited.txt", '1'), ("gone.txt", '2')]));

        let status = status(&head, &empty_index(), &[("edited.txt", '3')]);

        assert_eq!(
            status.workspace_changeset(),
            &ChangeSet::from([
                (PathBuf::from("edited.txt"), WorkspaceChangeType::Modified),
                (PathBuf::from("gone.txt"), WorkspaceChangeType::Deleted),
            ])
        );
    }

    #[test]
    fn staged_files_changed_again_after_adding() {
        let head = Snapshot::empty();
        let mut index = empty_index();
        index.stage_addition(Path::new("edited.txt"), oid('1'), &head);
        index.stage_addition(Path::new("gone.txt"), oid('2'), &head);

        let status = status(&head, &index, &[("edited.txt", '3')]);

        assert_eq!(
            status.workspace_changeset(),
            &ChangeSet::from([
                (PathBuf::from("edited.txt"), WorkspaceChangeType::Modified),
                (PathBuf::from("gone.txt"), WorkspaceChangeType::Deleted),
            ])
        );
        assert!(status.untracked_files().is_empty());
    }

    #[test]
    fn recreated_removed_file_is_untracked() {
        let head = Snapshot::from_iter(files(&[("a.txt", '1')]));
        let mut index = empty_index();
        index.record_removal(Path::new("a.txt"), oid('1'));

        let status = status(&head, &index, &[("a.txt", '1'), ("new.txt", '4')]);

        assert_eq!(
            status.untracked_files(),
            &FileSet::from([PathBuf::from("a.txt"), PathBuf::from("new.txt")])
        );
        assert!(status.workspace_changeset().is_empty());
    }

    #[test]
    fn rendering_marks_the_active_branch() {
        let head = Snapshot::from_iter(files(&[("gone.txt", '2')]));
        let mut index = empty_index();
        index.stage_addition(Path::new("staged.txt"), oid('1'), &head);

        let rendered = status(&head, &index, &[("staged.txt", '1'), ("junk.txt", '5')]).to_string();

        assert_eq!(
            rendered,
            "=== Branches ===\n*master\nother\n\n\
             === Staged Files ===\nstaged.txt\n\n\
             === Removed Files ===\n\n\
             === Modifications Not Staged For Commit ===\ngone.txt (deleted)\n\n\
             === Untracked Files ===\njunk.txt\n\n"
        );
    }
}
