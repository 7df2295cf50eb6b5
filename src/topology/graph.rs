//! Node graph construction from a candidate grid.
//!
//! Breadth-first expansion from the donor: every dequeued node scans the
//! candidate cells strictly below its own row and attaches the ones within
//! the connection distance. Edges only ever point downward, so the result
//! is acyclic by construction. Candidates no expansion reaches are left out
//! of the registry.

use std::collections::{HashMap, VecDeque};

use log::debug;

use super::grid::{distance_between, Grid};
use super::types::{Node, NodeId, NodeRole, TreeMode};

/// Reserved name of the donor node.
pub const DONOR_NAME: &str = "d";

/// Errors reported by graph construction.
#[derive(Debug, Clone, thiserror::Error)]
pub enum GraphError {
    #[error("the grid is empty")]
    EmptyGrid,
    #[error("row 0 must hold exactly one candidate (the donor), found {0}")]
    BadRootRow(usize),
}

/// Build the node registry from a candidate grid.
///
/// The single row-0 candidate becomes the donor `"d"`; relays are named by
/// their discovery order ("1", "2", ...). In DAG mode a coordinate reached
/// by several parents keeps all of them; in TREE mode only the first
/// discovering parent is kept and later ones are skipped.
///
/// # Arguments
/// * `grid` - Candidate grid, not yet name-assigned
/// * `max_connect_distance` - Euclidean attachment gate, in cell units
/// * `mode` - DAG or TREE attachment policy
///
/// # Returns
/// Nodes indexed by `NodeId`, donor first, with mutually consistent
/// parent/child edges.
pub fn build_nodes(
    grid: &Grid,
    max_connect_distance: f64,
    mode: TreeMode,
) -> Result<Vec<Node>, GraphError> {
    if grid.size() == 0 {
        return Err(GraphError::EmptyGrid);
    }
    let root_cols = grid.candidates_in_row(0);
    if root_cols.len() != 1 {
        return Err(GraphError::BadRootRow(root_cols.len()));
    }

    let donor = Node::new(DONOR_NAME, NodeRole::Donor, (0, root_cols[0]));
    let mut nodes = vec![donor];
    let mut by_position: HashMap<(usize, usize), NodeId> =
        HashMap::from([((0, root_cols[0]), NodeId(0))]);
    let mut queue = VecDeque::from([NodeId(0)]);

    while let Some(current) = queue.pop_front() {
        let position = nodes[current.0].position;

        for row in position.0 + 1..grid.size() {
            for col in 0..grid.size() {
                if !grid.is_candidate(row, col) {
                    continue;
                }
                if distance_between(position, (row, col)) > max_connect_distance {
                    continue;
                }

                let child = match by_position.get(&(row, col)).copied() {
                    Some(existing) => {
                        if mode == TreeMode::Tree {
                            // First discovering parent keeps the node.
                            continue;
                        }
                        existing
                    }
                    None => {
                        let id = NodeId(nodes.len());
                        nodes.push(Node::new(id.0.to_string(), NodeRole::Relay, (row, col)));
                        by_position.insert((row, col), id);
                        queue.push_back(id);
                        id
                    }
                };

                attach(&mut nodes, current, child);
            }
        }
    }

    let unreachable = grid.candidate_count().saturating_sub(nodes.len());
    if unreachable > 0 {
        debug!("{} candidate cells were unreachable and dropped", unreachable);
    }
    debug!(
        "built {} nodes ({} mode, connect distance {})",
        nodes.len(),
        mode,
        max_connect_distance
    );
    Ok(nodes)
}

/// Record the parent/child edge on both endpoints, skipping duplicates and
/// self-loops.
fn attach(nodes: &mut [Node], parent: NodeId, child: NodeId) {
    if parent == child || nodes[parent.0].has_child(child) {
        return;
    }
    nodes[parent.0].children.push(child);
    nodes[child.0].parents.push(parent);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::topology::grid::Grid;

    fn worked_grid() -> Grid {
        Grid::from_matrix(&[
            vec![0, 1, 0, 0],
            vec![1, 0, 1, 0],
            vec![0, 1, 0, 0],
            vec![1, 1, 0, 1],
        ])
        .unwrap()
    }

    #[test]
    fn dag_mode_builds_the_worked_example() {
        let nodes = build_nodes(&worked_grid(), 1.5, TreeMode::Dag).unwrap();

        // Candidate (3, 3) is out of everyone's reach and must be dropped.
        assert_eq!(nodes.len(), 6);
        assert_eq!(nodes[0].name, DONOR_NAME);
        assert_eq!(nodes[0].position, (0, 1));
        assert!(nodes[0].parents.is_empty());

        // The donor's children are exactly the two row-1 candidates.
        let donor_children: Vec<&str> = nodes[0]
            .children
            .iter()
            .map(|&id| nodes[id.0].name.as_str())
            .collect();
        assert_eq!(donor_children, vec!["1", "2"]);

        // Node "3" at (2, 1) is the shared child of both row-1 relays.
        let shared = nodes.iter().find(|n| n.name == "3").unwrap();
        assert_eq!(shared.position, (2, 1));
        assert_eq!(shared.parents.len(), 2);
    }

    #[test]
    fn edges_are_mutually_consistent_and_point_downward() {
        let nodes = build_nodes(&worked_grid(), 1.5, TreeMode::Dag).unwrap();
        for (i, node) in nodes.iter().enumerate() {
            for &child in &node.children {
                assert!(nodes[child.0].has_parent(NodeId(i)));
                assert!(nodes[child.0].position.0 > node.position.0);
            }
            for &parent in &node.parents {
                assert!(nodes[parent.0].has_child(NodeId(i)));
            }
        }
    }

    #[test]
    fn tree_mode_gives_every_relay_one_parent() {
        let nodes = build_nodes(&worked_grid(), 1.5, TreeMode::Tree).unwrap();
        assert_eq!(nodes.len(), 6);
        for node in nodes.iter().skip(1) {
            assert_eq!(node.parents.len(), 1, "node {}", node.name);
        }
        // The shared coordinate goes to its first discovering parent, "1".
        let shared = nodes.iter().find(|n| n.name == "3").unwrap();
        assert_eq!(nodes[shared.parents[0].0].name, "1");
    }

    #[test]
    fn positions_are_unique() {
        let nodes = build_nodes(&worked_grid(), 1.5, TreeMode::Dag).unwrap();
        let mut seen = std::collections::HashSet::new();
        for node in &nodes {
            assert!(seen.insert(node.position));
        }
    }

    #[test]
    fn rejects_grids_without_a_single_root_marker() {
        let no_root = Grid::from_matrix(&[
            vec![0, 0, 0, 0],
            vec![1, 0, 1, 0],
            vec![0, 1, 0, 0],
            vec![1, 1, 0, 1],
        ])
        .unwrap();
        assert!(matches!(
            build_nodes(&no_root, 1.5, TreeMode::Dag),
            Err(GraphError::BadRootRow(0))
        ));

        let two_roots = Grid::from_matrix(&[
            vec![0, 1, 0, 1],
            vec![1, 0, 1, 0],
            vec![0, 1, 0, 0],
            vec![1, 1, 0, 1],
        ])
        .unwrap();
        assert!(matches!(
            build_nodes(&two_roots, 1.5, TreeMode::Dag),
            Err(GraphError::BadRootRow(2))
        ));
    }
}
