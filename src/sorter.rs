use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use anyhow::{Result, bail};
use serde::{Deserialize, Serialize};

use crate::models::{ResultNode, StatusOrder};
use crate::prefs::SortPreference;

/// Sibling ordering strategies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub enum SortKey {
    Name,
    Duration,
    Status,
}

impl SortKey {
    /// Stored index of the strategy. Persisted preferences refer to these
    /// numbers, so they must never be renumbered.
    pub fn index(self) -> u32 {
        match self {
            SortKey::Name => 0,
            SortKey::Duration => 1,
            SortKey::Status => 2,
        }
    }

    pub fn from_index(index: u32) -> Result<Self> {
        match index {
            0 => Ok(SortKey::Name),
            1 => Ok(SortKey::Duration),
            2 => Ok(SortKey::Status),
            other => bail!("unknown sorter index {}", other),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            SortKey::Name => "name",
            SortKey::Duration => "duration",
            SortKey::Status => "status",
        }
    }
}

impl TryFrom<u32> for SortKey {
    type Error = anyhow::Error;

    fn try_from(index: u32) -> Result<Self> {
        Self::from_index(index)
    }
}

impl From<SortKey> for u32 {
    fn from(key: SortKey) -> Self {
        key.index()
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortKey {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "name" => Ok(SortKey::Name),
            "duration" => Ok(SortKey::Duration),
            "status" => Ok(SortKey::Status),
            other => bail!("unknown sort key '{}' (expected name, duration or status)", other),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Ascending,
    Descending,
}

impl Direction {
    pub fn from_ascending(ascending: bool) -> Self {
        if ascending {
            Direction::Ascending
        } else {
            Direction::Descending
        }
    }

    fn apply(self, ordering: Ordering) -> Ordering {
        match self {
            Direction::Ascending => ordering,
            Direction::Descending => ordering.reverse(),
        }
    }
}

/// Builds sibling comparators against a shared status order.
#[derive(Debug, Clone, Default)]
pub struct TreeSorter {
    order: StatusOrder,
}

impl TreeSorter {
    pub fn new(order: StatusOrder) -> Self {
        Self { order }
    }

    pub fn order(&self) -> &StatusOrder {
        &self.order
    }

    pub fn comparator(&self, preference: SortPreference) -> Comparator<'_> {
        Comparator {
            key: preference.sorter,
            direction: Direction::from_ascending(preference.ascending),
            order: &self.order,
        }
    }
}

/// A two-argument ordering over sibling nodes.
#[derive(Debug, Clone, Copy)]
pub struct Comparator<'a> {
    key: SortKey,
    direction: Direction,
    order: &'a StatusOrder,
}

impl Comparator<'_> {
    pub fn key(&self) -> SortKey {
        self.key
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// Compare two siblings.
    ///
    /// Ascending puts names alphabetically, shorter durations first, and more
    /// severe statuses first. Under the status strategy a leaf compared with a
    /// container always yields `Greater`, whatever the direction.
    pub fn compare(&self, a: &ResultNode, b: &ResultNode) -> Ordering {
        let ordering = match self.key {
            SortKey::Name => Some(a.name().to_lowercase().cmp(&b.name().to_lowercase())),
            SortKey::Duration => Some(a.duration().cmp(&b.duration())),
            SortKey::Status => compare_status(self.order, a, b),
        };
        match ordering {
            Some(ordering) => self.direction.apply(ordering),
            None => Ordering::Greater,
        }
    }

    /// Stable in-place sort of one sibling group.
    pub fn sort_siblings(&self, nodes: &mut [ResultNode]) {
        nodes.sort_by(|a, b| {
            if self.key == SortKey::Status && a.is_leaf() != b.is_leaf() {
                // compare() is not antisymmetric here; keep groups ahead of cases.
                return a.is_leaf().cmp(&b.is_leaf());
            }
            self.compare(a, b)
        });
    }

    /// Sort every sibling group in the subtree rooted at `node`.
    pub fn sort_tree(&self, node: &mut ResultNode) {
        if let ResultNode::Container(group) = node {
            self.sort_siblings(&mut group.children);
            for child in &mut group.children {
                self.sort_tree(child);
            }
        }
    }
}

/// `None` when the nodes are of different kinds.
fn compare_status(order: &StatusOrder, a: &ResultNode, b: &ResultNode) -> Option<Ordering> {
    match (a, b) {
        (ResultNode::Leaf(a), ResultNode::Leaf(b)) => {
            Some(order.rank(a.status).cmp(&order.rank(b.status)))
        }
        (ResultNode::Container(a), ResultNode::Container(b)) => {
            let ordering = order
                .iter()
                .map(|status| (a.statistic.count(status), b.statistic.count(status)))
                .find(|(ca, cb)| ca != cb)
                .map_or(Ordering::Equal, |(ca, cb)| cb.cmp(&ca));
            Some(ordering)
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Group, Statistic, Status, Time};

    fn sorter() -> TreeSorter {
        TreeSorter::new(
            StatusOrder::new(vec![
                Status::Failed,
                Status::Broken,
                Status::Passed,
                Status::Skipped,
            ])
            .unwrap(),
        )
    }

    fn pref(sorter: SortKey, ascending: bool) -> SortPreference {
        SortPreference { sorter, ascending }
    }

    fn names(nodes: &[ResultNode]) -> Vec<&str> {
        nodes.iter().map(ResultNode::name).collect()
    }

    fn group(name: &str, statistic: Statistic) -> ResultNode {
        ResultNode::Container(Group {
            name: name.into(),
            statistic,
            time: Time::default(),
            children: vec![ResultNode::leaf("x", Status::Passed, 1)],
        })
    }

    #[test]
    fn name_ascending_ignores_case() {
        let sorter = sorter();
        let mut nodes = vec![
            ResultNode::leaf("Banana", Status::Passed, 1),
            ResultNode::leaf("apple", Status::Passed, 1),
        ];
        sorter.comparator(pref(SortKey::Name, true)).sort_siblings(&mut nodes);
        assert_eq!(names(&nodes), ["apple", "Banana"]);
    }

    #[test]
    fn duration_descending() {
        let sorter = sorter();
        let mut nodes = vec![
            ResultNode::leaf("a", Status::Passed, 10),
            ResultNode::leaf("b", Status::Passed, 5),
            ResultNode::leaf("c", Status::Passed, 20),
        ];
        sorter
            .comparator(pref(SortKey::Duration, false))
            .sort_siblings(&mut nodes);
        let durations: Vec<u64> = nodes.iter().map(ResultNode::duration).collect();
        assert_eq!(durations, [20, 10, 5]);
    }

    #[test]
    fn leaf_status_ascending_is_severity_first() {
        let sorter = sorter();
        let mut nodes = vec![
            ResultNode::leaf("p", Status::Passed, 1),
            ResultNode::leaf("f", Status::Failed, 1),
            ResultNode::leaf("s", Status::Skipped, 1),
        ];
        sorter.comparator(pref(SortKey::Status, true)).sort_siblings(&mut nodes);
        assert_eq!(names(&nodes), ["f", "p", "s"]);

        sorter.comparator(pref(SortKey::Status, false)).sort_siblings(&mut nodes);
        assert_eq!(names(&nodes), ["s", "p", "f"]);
    }

    #[test]
    fn statistic_first_differing_status_decides() {
        let sorter = sorter();
        let a = group(
            "a",
            Statistic {
                failed: 1,
                passed: 5,
                ..Statistic::default()
            },
        );
        let b = group(
            "b",
            Statistic {
                failed: 0,
                passed: 6,
                ..Statistic::default()
            },
        );
        let ascending = sorter.comparator(pref(SortKey::Status, true));
        assert_eq!(ascending.compare(&a, &b), Ordering::Less);
        assert_eq!(ascending.compare(&b, &a), Ordering::Greater);

        let descending = sorter.comparator(pref(SortKey::Status, false));
        assert_eq!(descending.compare(&a, &b), Ordering::Greater);
    }

    #[test]
    fn statistic_ties_are_equal() {
        let sorter = sorter();
        let stat = Statistic {
            broken: 2,
            ..Statistic::default()
        };
        let comparator = sorter.comparator(pref(SortKey::Status, true));
        assert_eq!(comparator.compare(&group("a", stat), &group("b", stat)), Ordering::Equal);
    }

    #[test]
    fn statistic_ignores_statuses_outside_the_order() {
        let sorter = sorter();
        let a = group(
            "a",
            Statistic {
                unknown: 3,
                ..Statistic::default()
            },
        );
        let b = group("b", Statistic::default());
        let comparator = sorter.comparator(pref(SortKey::Status, true));
        assert_eq!(comparator.compare(&a, &b), Ordering::Equal);
    }

    #[test]
    fn mixed_kinds_fall_back_to_greater() {
        let sorter = sorter();
        let leaf = ResultNode::leaf("l", Status::Failed, 1);
        let container = group("g", Statistic::default());
        for ascending in [true, false] {
            let comparator = sorter.comparator(pref(SortKey::Status, ascending));
            assert_eq!(comparator.compare(&leaf, &container), Ordering::Greater);
            assert_eq!(comparator.compare(&container, &leaf), Ordering::Greater);
        }
    }

    #[test]
    fn mixed_siblings_sort_without_panicking() {
        let sorter = sorter();
        let mut nodes = vec![
            ResultNode::leaf("l1", Status::Passed, 1),
            group("g", Statistic::default()),
            ResultNode::leaf("l2", Status::Failed, 1),
        ];
        sorter.comparator(pref(SortKey::Status, true)).sort_siblings(&mut nodes);
        assert_eq!(names(&nodes), ["g", "l2", "l1"]);
    }

    #[test]
    fn sort_tree_orders_every_level() {
        let sorter = sorter();
        let mut tree = ResultNode::container(
            "root",
            vec![
                ResultNode::container(
                    "zeta",
                    vec![
                        ResultNode::leaf("b", Status::Passed, 1),
                        ResultNode::leaf("A", Status::Passed, 1),
                    ],
                ),
                ResultNode::leaf("alpha", Status::Passed, 1),
            ],
        );
        sorter.comparator(pref(SortKey::Name, true)).sort_tree(&mut tree);
        assert_eq!(names(tree.children()), ["alpha", "zeta"]);
        assert_eq!(names(tree.children()[1].children()), ["A", "b"]);
    }

    #[test]
    fn storage_indices_are_stable() {
        for key in [SortKey::Name, SortKey::Duration, SortKey::Status] {
            assert_eq!(SortKey::from_index(key.index()).unwrap(), key);
        }
        assert_eq!(SortKey::Name.index(), 0);
        assert_eq!(SortKey::Duration.index(), 1);
        assert_eq!(SortKey::Status.index(), 2);
        assert_eq!(SortKey::from_index(2).unwrap(), SortKey::Status);
        assert!(SortKey::from_index(3).is_err());
    }

    #[test]
    fn parses_key_names() {
        assert_eq!("Duration".parse::<SortKey>().unwrap(), SortKey::Duration);
        assert!("size".parse::<SortKey>().is_err());
    }
}
