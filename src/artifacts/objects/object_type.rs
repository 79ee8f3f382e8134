use anyhow::Context;
use std::io::BufRead;
use std::str::FromStr;

/// Kind of a stored object, as written in its `<kind> <size>\0` header
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObjectType {
    Blob,
    Commit,
}

impl ObjectType {
    pub fn as_str(&self) -> &str {
        match self {
            ObjectType::Blob => "blob",
            ObjectType::Commit => "commit",
        }
    }

    /// Consume an object header and return its kind
    ///
    /// The reader is left at the first byte of the body.
    pub fn parse_object_type(reader: &mut impl BufRead) -> anyhow::Result<ObjectType> {
        let kind = read_header_field(reader, b' ').context("Object header has no kind")?;
        let size = read_header_field(reader, b'\0').context("Object header has no size")?;

        size.parse::<usize>()
            .with_context(|| format!("Invalid object size in header: {size:?}"))?;

        kind.parse()
    }
}

fn read_header_field(reader: &mut impl BufRead, terminator: u8) -> anyhow::Result<String> {
    let mut field = Vec::new();
    reader.read_until(terminator, &mut field)?;

    if field.pop() != Some(terminator) {
        anyhow::bail!("Object header ends early");
    }

    Ok(String::from_utf8(field)?)
}

impl FromStr for ObjectType {
    type Err = anyhow::Error;

    fn from_str(value: &str) -> anyhow::Result<Self> {
        match value {
            "blob" => Ok(ObjectType::Blob),
            "commit" => Ok(ObjectType::Commit),
            other => Err(anyhow::anyhow!("Unknown object kind: {other}")),
        }
    }
}

impl std::fmt::Display for ObjectType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
