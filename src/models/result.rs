use serde::{Deserialize, Serialize};

use super::status::Status;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Time {
    #[serde(default)]
    pub start: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stop: Option<u64>,
    /// Milliseconds.
    #[serde(default)]
    pub duration: u64,
}

/// Per-status counts carried by container nodes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Statistic {
    #[serde(default)]
    pub failed: u64,
    #[serde(default)]
    pub broken: u64,
    #[serde(default)]
    pub passed: u64,
    #[serde(default)]
    pub skipped: u64,
    #[serde(default)]
    pub unknown: u64,
}

impl Statistic {
    pub fn count(&self, status: Status) -> u64 {
        match status {
            Status::Failed => self.failed,
            Status::Broken => self.broken,
            Status::Passed => self.passed,
            Status::Skipped => self.skipped,
            Status::Unknown => self.unknown,
        }
    }

    pub fn total(&self) -> u64 {
        Status::ALL.iter().map(|&s| self.count(s)).sum()
    }

    pub fn increment(&mut self, status: Status) {
        let slot = match status {
            Status::Failed => &mut self.failed,
            Status::Broken => &mut self.broken,
            Status::Passed => &mut self.passed,
            Status::Skipped => &mut self.skipped,
            Status::Unknown => &mut self.unknown,
        };
        *slot += 1;
    }

    pub fn merge(&mut self, other: &Statistic) {
        self.failed += other.failed;
        self.broken += other.broken;
        self.passed += other.passed;
        self.skipped += other.skipped;
        self.unknown += other.unknown;
    }
}
