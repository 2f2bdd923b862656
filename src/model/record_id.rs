//! Graph record identifiers (`#<cluster>:<position>`).

use regex::Regex;
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

static RECORD_ID_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^#(-?\d+):(\d+)$").unwrap());

/// Error returned when a string is not a record id.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Invalid record id: '{0}'")]
pub struct RecordIdError(pub String);

/// A physical record identifier in the graph store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RecordId {
    pub cluster: i32,
    pub position: u64,
}

impl RecordId {
    pub fn new(cluster: i32, position: u64) -> Self {
        Self { cluster, position }
    }

    /// Parse `#<cluster>:<position>`, returning `None` for anything else.
    pub fn parse(s: &str) -> Option<Self> {
        let caps = RECORD_ID_PATTERN.captures(s)?;
        let cluster = caps[1].parse().ok()?;
        let position = caps[2].parse().ok()?;
        Some(Self { cluster, position })
    }

    /// Does the string look like a record id?
    pub fn is_record_id(s: &str) -> bool {
        Self::parse(s).is_some()
    }
}

impl FromStr for RecordId {
    type Err = RecordIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| RecordIdError(s.to_string()))
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}:{}", self.cluster, self.position)
    }
}
