use crate::areas::repository::Repository;
use crate::artifacts::objects::object::Object;
use crate::artifacts::status::status_info::StatusInfo;
use std::collections::BTreeMap;
use std::io::Write;

impl Repository {
    pub fn status(&self) -> anyhow::Result<StatusInfo> {
        self.ensure_initialized()?;

        let (_, head) = self.head_commit()?;

        let working_files = self
            .workspace()
            .list_files()?
            .into_iter()
            .map(|path| {
                let blob_id = self.workspace().parse_blob(&path)?.object_id()?;
                Ok((path, blob_id))
            })
            .collect::<anyhow::Result<BTreeMap<_, _>>>()?;

        let mut index = self.index();
        index.rehydrate()?;

        let status = StatusInfo::build(
            self.refs().list_branches()?,
            self.refs().current_branch()?,
            head.snapshot(),
            &index,
            &working_files,
        );

        write!(self.writer(), "{}", status)?;

        Ok(status)
    }
}
