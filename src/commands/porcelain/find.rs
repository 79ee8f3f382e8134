use crate::areas::repository::Repository;
use crate::artifacts::objects::object_id::ObjectId;
use std::io::Write;

pub const NO_MATCHING_COMMIT_MESSAGE: &str = "Found no commit with that message.";

impl Repository {
    /// Ids of every commit whose message is exactly `message`, oldest first
    pub fn find(&self, message: &str) -> anyhow::Result<Vec<ObjectId>> {
        self.ensure_initialized()?;

        let matches = self.history().find_by_message(message)?;

        if matches.is_empty() {
            writeln!(self.writer(), "{}", NO_MATCHING_COMMIT_MESSAGE)?;
        }
        for oid in &matches {
            writeln!(self.writer(), "{}", oid)?;
        }

        Ok(matches)
    }
}
