//! Core topology type definitions.
//!
//! This file contains the node and link types shared by the synthesis
//! pipeline. Nodes and links live in registries owned by the `Topology`
//! aggregate; relationships between them are expressed as index handles
//! (`NodeId`, `LinkId`) rather than owning references.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::simulation::propagation::PropagationRecord;

/// Handle to a node in the topology's node registry.
///
/// Index 0 is always the donor. Relay indices follow discovery order, which
/// is also the order of their numeric names ("1", "2", ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub usize);

/// Handle to a link in the topology's link registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LinkId(pub usize);

/// Role a node plays in the backhaul topology.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NodeRole {
    /// The single aggregation point all paths originate from.
    Donor,
    /// A forwarding node attached below the donor.
    Relay,
}

impl NodeRole {
    pub fn is_donor(&self) -> bool {
        matches!(self, Self::Donor)
    }
}

/// How relays attach to parents during graph construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TreeMode {
    /// A relay may acquire multiple parents (shared children allowed).
    Dag,
    /// Each relay keeps exactly one parent; later candidate parents are
    /// skipped.
    Tree,
}

/// Raised when a tree mode string is neither "DAG" nor "TREE".
#[derive(Debug, Clone, thiserror::Error)]
#[error("unknown tree mode '{0}', expected 'DAG' or 'TREE'")]
pub struct UnknownTreeModeError(pub String);

impl FromStr for TreeMode {
    type Err = UnknownTreeModeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "DAG" => Ok(Self::Dag),
            "TREE" => Ok(Self::Tree),
            _ => Err(UnknownTreeModeError(s.to_string())),
        }
    }
}

impl fmt::Display for TreeMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Dag => write!(f, "DAG"),
            Self::Tree => write!(f, "TREE"),
        }
    }
}

/// A donor or relay node.
///
/// Parent/child edges are kept mutually consistent by the graph builder:
/// `child` appears in `parent.children` exactly when `parent` appears in
/// `child.parents`. The simulation queues (`inbox`, `outbound`, `forward`)
/// are untouched by synthesis and only mutated by `simulation::advance`.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub name: String,
    pub role: NodeRole,
    /// Grid position as (row, column). Immutable once assigned.
    pub position: (usize, usize),
    pub parents: Vec<NodeId>,
    pub children: Vec<NodeId>,
    /// Nodes that cannot be active at the same time as this one.
    pub conflict_nodes: Vec<NodeId>,
    /// Links whose source is this node, in child order.
    pub outgoing_links: Vec<LinkId>,
    /// For every reachable descendant, the direct children through which it
    /// can be reached. Built by `path::build_next_hop_table`.
    pub next_hops: HashMap<NodeId, Vec<NodeId>>,
    /// Delivered records, keyed by their original timestamp. Entries older
    /// than the retention window are purged on every simulation step.
    pub inbox: HashMap<u64, Vec<PropagationRecord>>,
    /// Records this node originates, waiting for their send time.
    pub outbound: Vec<PropagationRecord>,
    /// Records in flight through this node, waiting for their next hop time.
    pub forward: Vec<PropagationRecord>,
}

impl Node {
    pub fn new(name: impl Into<String>, role: NodeRole, position: (usize, usize)) -> Self {
        Self {
            name: name.into(),
            role,
            position,
            parents: Vec::new(),
            children: Vec::new(),
            conflict_nodes: Vec::new(),
            outgoing_links: Vec::new(),
            next_hops: HashMap::new(),
            inbox: HashMap::new(),
            outbound: Vec::new(),
            forward: Vec::new(),
        }
    }

    /// True when `other` is recorded as a direct child of this node.
    pub fn has_child(&self, other: NodeId) -> bool {
        self.children.contains(&other)
    }

    pub fn has_parent(&self, other: NodeId) -> bool {
        self.parents.contains(&other)
    }
}

/// A directed parent-to-child radio link.
///
/// Links are a derived view of the parent/child edges: one per edge, never
/// created independently.
#[derive(Debug, Clone, PartialEq)]
pub struct Link {
    /// Ordered pair of endpoint names, source first.
    pub name: (String, String),
    pub source: NodeId,
    pub destination: NodeId,
    /// Achievable rate in bits per second, from the rate formula.
    pub data_rate_bps: f64,
    /// Links sharing an endpoint with this one (half-duplex view).
    pub conflicts: Vec<LinkId>,
}

impl Link {
    /// "src-dst" label used in reports and log lines.
    pub fn label(&self) -> String {
        format!("{}-{}", self.name.0, self.name.1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tree_mode_parses_both_cases() {
        assert_eq!("DAG".parse::<TreeMode>().unwrap(), TreeMode::Dag);
        assert_eq!("tree".parse::<TreeMode>().unwrap(), TreeMode::Tree);
        assert_eq!(TreeMode::Dag.to_string(), "DAG");
    }

    #[test]
    fn tree_mode_rejects_unknown_values() {
        let err = "ring".parse::<TreeMode>().unwrap_err();
        assert!(err.to_string().contains("ring"));
    }

    #[test]
    fn new_node_starts_unwired() {
        let node = Node::new("7", NodeRole::Relay, (3, 1));
        assert_eq!(node.name, "7");
        assert_eq!(node.position, (3, 1));
        assert!(node.parents.is_empty());
        assert!(node.children.is_empty());
        assert!(node.inbox.is_empty());
    }
}
