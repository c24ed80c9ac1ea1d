use std::fmt;
use std::str::FromStr;

use anyhow::{Result, bail};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Failed,
    Broken,
    Passed,
    Skipped,
    Unknown,
}

impl Status {
    pub const ALL: [Status; 5] = [
        Status::Failed,
        Status::Broken,
        Status::Passed,
        Status::Skipped,
        Status::Unknown,
    ];

    pub fn icon(&self) -> &'static str {
        match self {
            Status::Failed => "✘",
            Status::Broken => "!",
            Status::Passed => "✔",
            Status::Skipped => "⊘",
            Status::Unknown => "?",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Status::Failed => "failed",
            Status::Broken => "broken",
            Status::Passed => "passed",
            Status::Skipped => "skipped",
            Status::Unknown => "unknown",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Status {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "failed" => Ok(Status::Failed),
            "broken" => Ok(Status::Broken),
            "passed" => Ok(Status::Passed),
            "skipped" => Ok(Status::Skipped),
            "unknown" => Ok(Status::Unknown),
            other => bail!("unknown status '{}'", other),
        }
    }
}

/// Severity ranking shared by filtering and sorting. Earlier entries are more severe.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusOrder {
    order: Vec<Status>,
}

impl StatusOrder {
    pub fn new(order: Vec<Status>) -> Result<Self> {
        for (i, status) in order.iter().enumerate() {
            if order[..i].contains(status) {
                bail!("status '{}' listed twice in status order", status);
            }
        }
        Ok(Self { order })
    }

    /// Position of `status` in the order. Unlisted statuses rank after every listed one.
    pub fn rank(&self, status: Status) -> usize {
        self.order
            .iter()
            .position(|&s| s == status)
            .unwrap_or(self.order.len())
    }

    pub fn iter(&self) -> impl Iterator<Item = Status> + '_ {
        self.order.iter().copied()
    }

    pub fn as_slice(&self) -> &[Status] {
        &self.order
    }
}

impl Default for StatusOrder {
    fn default() -> Self {
        Self {
            order: Status::ALL.to_vec(),
        }
    }
}
