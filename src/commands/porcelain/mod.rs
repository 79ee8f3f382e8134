//! Porcelain commands
//!
//! - `init`: create the repository layout and the initial commit
//! - `add`: stage a file for addition
//! - `rm`: stage a file for removal
//! - `commit`: record the staged changes as a new commit
//! - `log`: first-parent history of the active branch, or every commit ever made
//! - `find`: commits with a given message
//! - `status`: branches, staged changes, unstaged modifications, untracked files
//! - `branch`: create or delete branches
//! - `checkout`: switch branches or restore files
//! - `reset`: move the active branch to another commit
//! - `merge`: three-way merge of another branch into the active one

pub mod add;
pub mod branch;
pub mod checkout;
pub mod commit;
pub mod find;
pub mod init;
pub mod log;
pub mod merge;
pub mod reset;
pub mod rm;
pub mod status;
