pub mod cli;
pub mod config;
pub mod filter;
pub mod models;
pub mod prefs;
pub mod render;
pub mod sorter;

pub use filter::{FilterCriteria, Predicate, by_duration, by_statuses, by_text, filter_tree, mix};
pub use models::{ResultNode, Statistic, Status, StatusOrder};
pub use prefs::{FileStore, MemoryStore, PreferenceStore, SortPreference, toggle};
pub use sorter::{Comparator, Direction, SortKey, TreeSorter};
