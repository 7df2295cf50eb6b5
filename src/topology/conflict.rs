//! Half-duplex conflict derivation.
//!
//! A node's radio cannot serve more than one of its links at a time, and a
//! shared child's receive slot is contended by all of its parents. The
//! node-level set therefore holds the node's parents, its children, and for
//! every child that child's other parents. Duplicates may appear when the
//! same node qualifies through several children; callers needing uniqueness
//! can set-ify.

use super::types::{Link, LinkId, Node, NodeId};

/// Fill in `conflict_nodes` for every node in the registry.
pub fn assign_conflicts(nodes: &mut [Node]) {
    for idx in 0..nodes.len() {
        let mut conflicts: Vec<NodeId> = nodes[idx].parents.clone();

        for child_pos in 0..nodes[idx].children.len() {
            let child = nodes[idx].children[child_pos];
            conflicts.push(child);
            for &sibling in &nodes[child.0].parents {
                if sibling != NodeId(idx) {
                    conflicts.push(sibling);
                }
            }
        }

        nodes[idx].conflict_nodes = conflicts;
    }
}

/// Fill in the link-level view: two links conflict when they share an
/// endpoint node.
pub fn assign_link_conflicts(links: &mut [Link], node_count: usize) {
    let mut incident: Vec<Vec<LinkId>> = vec![Vec::new(); node_count];
    for (idx, link) in links.iter().enumerate() {
        incident[link.source.0].push(LinkId(idx));
        incident[link.destination.0].push(LinkId(idx));
    }

    for idx in 0..links.len() {
        let mut conflicts = Vec::new();
        let endpoints = [links[idx].source, links[idx].destination];
        for node in endpoints {
            for &other in &incident[node.0] {
                if other != LinkId(idx) && !conflicts.contains(&other) {
                    conflicts.push(other);
                }
            }
        }
        links[idx].conflicts = conflicts;
    }
}
