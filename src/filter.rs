use std::collections::HashMap;

use crate::models::{Group, ResultNode, Status};

/// A node predicate. Predicates are built independently and combined with [`mix`].
pub type Predicate = Box<dyn Fn(&ResultNode) -> bool>;

/// Leaves pass when their status is enabled. Containers pass while they still have children.
pub fn by_statuses(enabled: HashMap<Status, bool>) -> Predicate {
    Box::new(move |node| match node {
        ResultNode::Container(group) => !group.children.is_empty(),
        ResultNode::Leaf(case) => enabled.get(&case.status).copied().unwrap_or(false),
    })
}

/// Leaves pass when `min <= duration <= max`. Containers pass while they still have children.
pub fn by_duration(min: u64, max: u64) -> Predicate {
    Box::new(move |node| match node {
        ResultNode::Container(group) => !group.children.is_empty(),
        ResultNode::Leaf(case) => min <= case.time.duration && case.time.duration <= max,
    })
}

/// Case-sensitive substring match on the node name or any descendant's name.
/// An empty query matches everything.
pub fn by_text(text: impl Into<String>) -> Predicate {
    let text = text.into();
    Box::new(move |node| text.is_empty() || matches_text(node, &text))
}

fn matches_text(node: &ResultNode, text: &str) -> bool {
    node.name().contains(text) || node.children().iter().any(|c| matches_text(c, text))
}

/// Logical AND of `predicates`. Every predicate runs on every call.
pub fn mix(predicates: Vec<Predicate>) -> Predicate {
    Box::new(move |node| {
        let mut result = true;
        for predicate in &predicates {
            result &= predicate(node);
        }
        result
    })
}

/// Prune `node` with `predicate`, bottom-up.
///
/// Children are filtered first, then the node itself is tested with its
/// surviving children in place, so a container emptied by filtering is
/// rejected by the container rule of [`by_statuses`] and [`by_duration`].
/// Statistics are left as reported.
pub fn filter_tree(
    node: &ResultNode,
    predicate: &dyn Fn(&ResultNode) -> bool,
) -> Option<ResultNode> {
    let candidate = match node {
        ResultNode::Leaf(_) => node.clone(),
        ResultNode::Container(group) => ResultNode::Container(Group {
            name: group.name.clone(),
            statistic: group.statistic,
            time: group.time,
            children: group
                .children
                .iter()
                .filter_map(|child| filter_tree(child, predicate))
                .collect(),
        }),
    };
    predicate(&candidate).then_some(candidate)
}

/// Declarative filter settings that compose into a single [`Predicate`].
#[derive(Debug, Clone, PartialEq)]
pub struct FilterCriteria {
    pub statuses: HashMap<Status, bool>,
    pub min_duration: u64,
    pub max_duration: u64,
    pub text: String,
}

impl Default for FilterCriteria {
    fn default() -> Self {
        Self {
            statuses: Status::ALL.iter().map(|&s| (s, true)).collect(),
            min_duration: 0,
            max_duration: u64::MAX,
            text: String::new(),
        }
    }
}

impl FilterCriteria {
    /// Enable exactly the given statuses.
    pub fn with_statuses(mut self, statuses: impl IntoIterator<Item = Status>) -> Self {
        self.statuses = Status::ALL.iter().map(|&s| (s, false)).collect();
        for status in statuses {
            self.statuses.insert(status, true);
        }
        self
    }

    pub fn with_duration(mut self, min: u64, max: u64) -> Self {
        self.min_duration = min;
        self.max_duration = max;
        self
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    pub fn predicate(&self) -> Predicate {
        mix(vec![
            by_statuses(self.statuses.clone()),
            by_duration(self.min_duration, self.max_duration),
            by_text(self.text.clone()),
        ])
    }

    /// Filter a whole tree. `None` when nothing survives.
    pub fn apply(&self, root: &ResultNode) -> Option<ResultNode> {
        let predicate = self.predicate();
        let filtered = filter_tree(root, &predicate);
        tracing::debug!(
            before = root.leaf_count(),
            after = filtered.as_ref().map_or(0, ResultNode::leaf_count),
            "filtered report tree"
        );
        filtered
    }
}
