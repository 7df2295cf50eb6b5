//! Path computation: exhaustive enumeration and next-hop tables.
//!
//! Enumeration walks the DAG depth-first with an explicit stack, so deep
//! grids cannot overflow the call stack. The next-hop table trades full
//! routes for a compact descendant-to-child map built in one bottom-up
//! sweep over the grid rows.

use std::collections::HashMap;

use super::grid::{Cell, Grid};
use super::types::{Node, NodeId};

/// All simple paths from `root` to `target`, in DFS child-visit order.
///
/// Each path starts at `root` and ends at `target`. A tree yields exactly
/// one path; a DAG yields one per distinct ancestor route. Asking for the
/// root itself yields the single trivial path `[root]`.
pub fn enumerate_all_paths(nodes: &[Node], root: NodeId, target: NodeId) -> Vec<Vec<NodeId>> {
    let mut paths = Vec::new();
    // (node, index of the next child to visit)
    let mut stack: Vec<(NodeId, usize)> = vec![(root, 0)];
    let mut path = vec![root];

    while let Some(frame) = stack.last_mut() {
        let (node, next_child) = *frame;

        if node == target {
            paths.push(path.clone());
            stack.pop();
            path.pop();
            continue;
        }

        if next_child < nodes[node.0].children.len() {
            frame.1 += 1;
            let child = nodes[node.0].children[next_child];
            stack.push((child, 0));
            path.push(child);
        } else {
            stack.pop();
            path.pop();
        }
    }

    paths
}

/// Enumerate root paths for every node, indexed by `NodeId`.
pub fn build_path_table(nodes: &[Node], root: NodeId) -> Vec<Vec<Vec<NodeId>>> {
    (0..nodes.len())
        .map(|idx| enumerate_all_paths(nodes, root, NodeId(idx)))
        .collect()
}

/// Fill in every node's descendant-to-next-hop map.
///
/// Rows are processed bottom-up using the name-assigned grid, so each
/// node's children already carry finalized tables when the node itself is
/// reached: the node inherits every child as a hop toward itself and toward
/// all of that child's descendants. Multiple qualifying hops are kept, in
/// child order.
pub fn build_next_hop_table(nodes: &mut [Node], grid: &Grid) {
    let by_name: HashMap<String, NodeId> = nodes
        .iter()
        .enumerate()
        .map(|(idx, node)| (node.name.clone(), NodeId(idx)))
        .collect();

    let mut tables: Vec<HashMap<NodeId, Vec<NodeId>>> = vec![HashMap::new(); nodes.len()];

    for row in (0..grid.size()).rev() {
        for col in 0..grid.size() {
            let Cell::Assigned(name) = grid.cell(row, col) else {
                continue;
            };
            let Some(&id) = by_name.get(name) else {
                continue;
            };

            let mut table: HashMap<NodeId, Vec<NodeId>> = HashMap::new();
            for &child in &nodes[id.0].children {
                push_hop(&mut table, child, child);
                for &descendant in tables[child.0].keys() {
                    push_hop(&mut table, descendant, child);
                }
            }
            tables[id.0] = table;
        }
    }

    for (idx, table) in tables.into_iter().enumerate() {
        nodes[idx].next_hops = table;
    }
}

fn push_hop(table: &mut HashMap<NodeId, Vec<NodeId>>, destination: NodeId, hop: NodeId) {
    let hops = table.entry(destination).or_default();
    if !hops.contains(&hop) {
        hops.push(hop);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::topology::graph::build_nodes;
    use crate::topology::grid::Grid;
    use crate::topology::types::{NodeRole, TreeMode};

    fn wire(nodes: &mut [Node], parent: usize, child: usize) {
        nodes[parent].children.push(NodeId(child));
        nodes[child].parents.push(NodeId(parent));
    }

    #[test]
    fn a_chain_yields_exactly_one_path() {
        // d -> 1 -> 2 -> 3
        let mut nodes = vec![
            Node::new("d", NodeRole::Donor, (0, 0)),
            Node::new("1", NodeRole::Relay, (1, 0)),
            Node::new("2", NodeRole::Relay, (2, 0)),
            Node::new("3", NodeRole::Relay, (3, 0)),
        ];
        wire(&mut nodes, 0, 1);
        wire(&mut nodes, 1, 2);
        wire(&mut nodes, 2, 3);

        let paths = enumerate_all_paths(&nodes, NodeId(0), NodeId(3));
        assert_eq!(paths, vec![vec![NodeId(0), NodeId(1), NodeId(2), NodeId(3)]]);
    }

    #[test]
    fn a_diamond_yields_both_routes_in_child_order() {
        // 0 -> {1, 2}, both -> 3
        let mut nodes = vec![
            Node::new("1", NodeRole::Relay, (0, 0)),
            Node::new("2", NodeRole::Relay, (1, 0)),
            Node::new("3", NodeRole::Relay, (1, 1)),
            Node::new("4", NodeRole::Relay, (2, 0)),
        ];
        wire(&mut nodes, 0, 1);
        wire(&mut nodes, 0, 2);
        wire(&mut nodes, 1, 3);
        wire(&mut nodes, 2, 3);

        let paths = enumerate_all_paths(&nodes, NodeId(0), NodeId(3));
        assert_eq!(
            paths,
            vec![
                vec![NodeId(0), NodeId(1), NodeId(3)],
                vec![NodeId(0), NodeId(2), NodeId(3)],
            ]
        );
    }

    #[test]
    fn the_root_gets_the_trivial_path() {
        let nodes = vec![Node::new("d", NodeRole::Donor, (0, 0))];
        let paths = enumerate_all_paths(&nodes, NodeId(0), NodeId(0));
        assert_eq!(paths, vec![vec![NodeId(0)]]);
    }

    fn worked_topology() -> (Vec<Node>, Grid) {
        let mut grid = Grid::from_matrix(&[
            vec![0, 1, 0, 0],
            vec![1, 0, 1, 0],
            vec![0, 1, 0, 0],
            vec![1, 1, 0, 1],
        ])
        .unwrap();
        let nodes = build_nodes(&grid, 1.5, TreeMode::Dag).unwrap();
        grid.assign_names(&nodes);
        (nodes, grid)
    }

    #[test]
    fn worked_example_has_two_routes_to_each_bottom_node() {
        let (nodes, _) = worked_topology();
        let five = NodeId(nodes.iter().position(|n| n.name == "5").unwrap());
        let paths = enumerate_all_paths(&nodes, NodeId(0), five);

        let named: Vec<Vec<&str>> = paths
            .iter()
            .map(|p| p.iter().map(|id| nodes[id.0].name.as_str()).collect())
            .collect();
        assert_eq!(named, vec![vec!["d", "1", "3", "5"], vec!["d", "2", "3", "5"]]);
    }

    #[test]
    fn next_hop_table_matches_the_worked_example() {
        let (mut nodes, grid) = worked_topology();
        build_next_hop_table(&mut nodes, &grid);

        let id = |name: &str| NodeId(nodes.iter().position(|n| n.name == name).unwrap());

        assert!(nodes[id("5").0].next_hops.is_empty());
        assert!(nodes[id("4").0].next_hops.is_empty());

        let three = &nodes[id("3").0].next_hops;
        assert_eq!(three[&id("4")], vec![id("4")]);
        assert_eq!(three[&id("5")], vec![id("5")]);
        assert_eq!(three.len(), 2);

        let two = &nodes[id("2").0].next_hops;
        assert_eq!(two[&id("3")], vec![id("3")]);
        assert_eq!(two[&id("4")], vec![id("3")]);
        assert_eq!(two[&id("5")], vec![id("3")]);

        let donor = &nodes[id("d").0].next_hops;
        assert_eq!(donor[&id("1")], vec![id("1")]);
        assert_eq!(donor[&id("2")], vec![id("2")]);
        assert_eq!(donor[&id("3")], vec![id("1"), id("2")]);
        assert_eq!(donor[&id("4")], vec![id("1"), id("2")]);
        assert_eq!(donor[&id("5")], vec![id("1"), id("2")]);
        assert_eq!(donor.len(), 5);
    }

    #[test]
    fn next_hops_and_path_enumeration_agree_on_reachability() {
        let (mut nodes, grid) = worked_topology();
        build_next_hop_table(&mut nodes, &grid);

        for target_idx in 1..nodes.len() {
            let target = NodeId(target_idx);
            let has_path = !enumerate_all_paths(&nodes, NodeId(0), target).is_empty();
            let in_table = nodes[0].next_hops.contains_key(&target);
            assert_eq!(has_path, in_table, "node {}", nodes[target_idx].name);
        }
    }
}
