use std::path::{Path, PathBuf};

use anyhow::Result;
use serde::Deserialize;

use crate::filter::FilterCriteria;
use crate::models::{Status, StatusOrder};

pub const CONFIG_FILE: &str = "report-tree.toml";

#[derive(Debug, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub statuses: StatusesConfig,
    #[serde(default)]
    pub filter: FilterConfig,
    #[serde(default)]
    pub preferences: PreferencesConfig,
}

/// Severity ranking used for status sorting.
#[derive(Debug, Default, Deserialize)]
pub struct StatusesConfig {
    /// Most severe first. Example: ["failed", "broken", "passed", "skipped", "unknown"]
    pub order: Option<Vec<Status>>,
}

/// Filter applied when the command line does not override it.
#[derive(Debug, Default, Deserialize)]
pub struct FilterConfig {
    /// Statuses to show. All statuses when omitted.
    pub statuses: Option<Vec<Status>>,
    pub min_duration: Option<u64>,
    pub max_duration: Option<u64>,
    #[serde(default)]
    pub text: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct PreferencesConfig {
    /// Settings file holding sort preferences.
    pub path: Option<PathBuf>,
    /// Context key the sort preference is stored under.
    pub key: Option<String>,
}

impl Config {
    /// Load `report-tree.toml` from `dir`, falling back to defaults if absent or invalid.
    pub fn load(dir: &Path) -> Self {
        let path = dir.join(CONFIG_FILE);
        let Ok(content) = std::fs::read_to_string(&path) else {
            return Self::default();
        };
        toml::from_str(&content).unwrap_or_else(|e| {
            tracing::warn!("ignoring invalid {}: {}", path.display(), e);
            Self::default()
        })
    }

    pub fn status_order(&self) -> Result<StatusOrder> {
        match &self.statuses.order {
            Some(order) => StatusOrder::new(order.clone()),
            None => Ok(StatusOrder::default()),
        }
    }

    pub fn filter_criteria(&self) -> FilterCriteria {
        let mut criteria = FilterCriteria::default();
        if let Some(statuses) = &self.filter.statuses {
            criteria = criteria.with_statuses(statuses.iter().copied());
        }
        criteria
            .with_duration(
                self.filter.min_duration.unwrap_or(0),
                self.filter.max_duration.unwrap_or(u64::MAX),
            )
            .with_text(self.filter.text.clone())
    }

    pub fn preferences_path(&self, dir: &Path) -> PathBuf {
        match &self.preferences.path {
            Some(path) => dir.join(path),
            None => dir.join(".report-tree").join("settings.json"),
        }
    }

    pub fn preferences_key(&self) -> &str {
        self.preferences.key.as_deref().unwrap_or("tree")
    }
}
