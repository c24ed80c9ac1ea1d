use anyhow::bail;
use serde::{Deserialize, Serialize};

use super::result::{Statistic, Time};
use super::status::Status;

/// A single test case.
#[derive(Debug, Clone, PartialEq)]
pub struct TestCase {
    pub name: String,
    pub status: Status,
    pub time: Time,
}

/// A suite or grouping node. Its statistic summarizes the leaves below it.
#[derive(Debug, Clone, PartialEq)]
pub struct Group {
    pub name: String,
    pub statistic: Statistic,
    pub time: Time,
    pub children: Vec<ResultNode>,
}

/// One entry of a report tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawNode", into = "RawNode")]
pub enum ResultNode {
    Leaf(TestCase),
    Container(Group),
}

impl ResultNode {
    pub fn leaf(name: impl Into<String>, status: Status, duration: u64) -> Self {
        ResultNode::Leaf(TestCase {
            name: name.into(),
            status,
            time: Time {
                duration,
                ..Time::default()
            },
        })
    }

    /// Build a container whose statistic is tallied from `children`.
    pub fn container(name: impl Into<String>, children: Vec<ResultNode>) -> Self {
        let statistic = tally(&children);
        let duration = children.iter().map(ResultNode::duration).sum();
        ResultNode::Container(Group {
            name: name.into(),
            statistic,
            time: Time {
                duration,
                ..Time::default()
            },
            children,
        })
    }

    pub fn name(&self) -> &str {
        match self {
            ResultNode::Leaf(case) => &case.name,
            ResultNode::Container(group) => &group.name,
        }
    }

    pub fn time(&self) -> &Time {
        match self {
            ResultNode::Leaf(case) => &case.time,
            ResultNode::Container(group) => &group.time,
        }
    }

    pub fn duration(&self) -> u64 {
        self.time().duration
    }

    pub fn status(&self) -> Option<Status> {
        match self {
            ResultNode::Leaf(case) => Some(case.status),
            ResultNode::Container(_) => None,
        }
    }

    pub fn statistic(&self) -> Option<&Statistic> {
        match self {
            ResultNode::Leaf(_) => None,
            ResultNode::Container(group) => Some(&group.statistic),
        }
    }

    /// Children of a container; leaves have none.
    pub fn children(&self) -> &[ResultNode] {
        match self {
            ResultNode::Leaf(_) => &[],
            ResultNode::Container(group) => &group.children,
        }
    }

    pub fn is_leaf(&self) -> bool {
        matches!(self, ResultNode::Leaf(_))
    }

    /// Number of leaves in this subtree.
    pub fn leaf_count(&self) -> usize {
        match self {
            ResultNode::Leaf(_) => 1,
            ResultNode::Container(group) => group.children.iter().map(Self::leaf_count).sum(),
        }
    }
}

/// Count leaf statuses across `nodes` and all their descendants.
pub fn tally(nodes: &[ResultNode]) -> Statistic {
    let mut statistic = Statistic::default();
    for node in nodes {
        match node {
            ResultNode::Leaf(case) => statistic.increment(case.status),
            ResultNode::Container(group) => statistic.merge(&tally(&group.children)),
        }
    }
    statistic
}

/// Wire shape of a node: leaves carry `status`, containers carry `children` and `statistic`.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct RawNode {
    name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    status: Option<Status>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    statistic: Option<Statistic>,
    #[serde(default)]
    time: Time,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    children: Option<Vec<ResultNode>>,
}

impl TryFrom<RawNode> for ResultNode {
    type Error = anyhow::Error;

    fn try_from(raw: RawNode) -> Result<Self, Self::Error> {
        match (raw.status, raw.children) {
            (Some(status), None) => {
                if raw.statistic.is_some() {
                    bail!("node '{}' has both a status and a statistic", raw.name);
                }
                Ok(ResultNode::Leaf(TestCase {
                    name: raw.name,
                    status,
                    time: raw.time,
                }))
            }
            (None, Some(children)) => {
                let statistic = raw.statistic.unwrap_or_else(|| tally(&children));
                Ok(ResultNode::Container(Group {
                    name: raw.name,
                    statistic,
                    time: raw.time,
                    children,
                }))
            }
            (Some(_), Some(_)) => bail!("node '{}' has both a status and children", raw.name),
            (None, None) => bail!("node '{}' has neither a status nor children", raw.name),
        }
    }
}

impl From<ResultNode> for RawNode {
    fn from(node: ResultNode) -> Self {
        match node {
            ResultNode::Leaf(case) => RawNode {
                name: case.name,
                status: Some(case.status),
                statistic: None,
                time: case.time,
                children: None,
            },
            ResultNode::Container(group) => RawNode {
                name: group.name,
                status: None,
                statistic: Some(group.statistic),
                time: group.time,
                children: Some(group.children),
            },
        }
    }
}
