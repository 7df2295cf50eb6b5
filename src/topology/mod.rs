//! Backhaul topology synthesis.
//!
//! This module contains the full synthesis pipeline: grid generation,
//! node graph construction, link derivation, half-duplex conflict sets and
//! path computation, bundled into the [`Topology`] aggregate.

pub mod conflict;
pub mod graph;
pub mod grid;
pub mod link;
pub mod path;
pub mod types;

use std::collections::HashMap;

use log::info;
use rand::Rng;

use crate::channel::RateFormula;
use crate::config::SynthesisConfig;

pub use graph::DONOR_NAME;
pub use grid::{Cell, Grid, GridConfig};
pub use types::{Link, LinkId, Node, NodeId, NodeRole, TreeMode};

/// Any failure of the synthesis pipeline.
///
/// Synthesis is atomic: on error no partial topology is returned and
/// nothing needs to be rolled back.
#[derive(Debug, Clone, thiserror::Error)]
pub enum TopologyError {
    #[error(transparent)]
    Grid(#[from] grid::GridError),
    #[error(transparent)]
    Graph(#[from] graph::GraphError),
    #[error(transparent)]
    Link(#[from] link::LinkError),
    #[error(transparent)]
    Config(#[from] crate::config::ValidationError),
}

/// The synthesized topology: owns every node, link and the grid.
///
/// External callers address nodes and links through the id handles; the
/// aggregate is the single owner and there is no process-wide instance.
#[derive(Debug, Clone, PartialEq)]
pub struct Topology {
    pub nodes: Vec<Node>,
    pub links: Vec<Link>,
    pub grid: Grid,
    /// For every node (by index), all paths from the donor to it.
    pub path_table: Vec<Vec<Vec<NodeId>>>,
    link_index: HashMap<(NodeId, NodeId), LinkId>,
    name_index: HashMap<String, NodeId>,
}

impl Topology {
    fn assemble(
        nodes: Vec<Node>,
        links: Vec<Link>,
        link_index: HashMap<(NodeId, NodeId), LinkId>,
        grid: Grid,
        path_table: Vec<Vec<Vec<NodeId>>>,
    ) -> Self {
        let name_index = nodes
            .iter()
            .enumerate()
            .map(|(idx, node)| (node.name.clone(), NodeId(idx)))
            .collect();
        Self {
            nodes,
            links,
            grid,
            path_table,
            link_index,
            name_index,
        }
    }

    /// The donor's handle. Always the first registry entry.
    pub fn donor(&self) -> NodeId {
        NodeId(0)
    }

    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.0]
    }

    pub fn node_mut(&mut self, id: NodeId) -> &mut Node {
        &mut self.nodes[id.0]
    }

    /// Look a node up by its name.
    pub fn node_id(&self, name: &str) -> Option<NodeId> {
        self.name_index.get(name).copied()
    }

    pub fn link(&self, id: LinkId) -> &Link {
        &self.links[id.0]
    }

    /// The link carrying the given parent/child edge, if any.
    pub fn link_between(&self, source: NodeId, destination: NodeId) -> Option<LinkId> {
        self.link_index.get(&(source, destination)).copied()
    }

    /// All donor paths ending at the given node.
    pub fn paths_to(&self, id: NodeId) -> &[Vec<NodeId>] {
        &self.path_table[id.0]
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn link_count(&self) -> usize {
        self.links.len()
    }
}

/// Synthesize a full topology from scratch.
///
/// Runs the whole pipeline: random grid, node graph, rated links, conflict
/// sets, next-hop tables and the exhaustive path table. Every precondition
/// failure surfaces as a typed [`TopologyError`] before anything is built.
///
/// # Arguments
/// * `config` - Fully-typed synthesis parameters
/// * `formula` - Distance-to-rate formula for link rating
/// * `rng` - Randomness source; seed it for reproducible topologies
pub fn generate<R: Rng + ?Sized>(
    config: &SynthesisConfig,
    formula: &dyn RateFormula,
    rng: &mut R,
) -> Result<Topology, TopologyError> {
    config.validate()?;

    let grid_config = GridConfig {
        size: config.grid_size,
        min_per_row: config.min_nodes_per_row,
        max_per_row: config.max_nodes_per_row,
        affect_radius: config.connection_radius,
    };
    let grid = grid::generate_grid(&grid_config, rng)?;

    let topology = finalize(
        grid,
        config.tree_mode,
        config.effective_connect_distance(),
        config.grid_cell_length_m,
        formula,
    )?;
    info!(
        "synthesized topology: {} nodes, {} links ({} mode)",
        topology.node_count(),
        topology.link_count(),
        config.tree_mode
    );
    Ok(topology)
}

/// Build a topology from an externally supplied candidate matrix.
///
/// Zero cells are empty, any other value is a candidate; row 0 must hold
/// exactly one candidate, the donor.
pub fn from_matrix(
    matrix: &[Vec<i32>],
    tree_mode: TreeMode,
    max_connect_distance: f64,
    cell_length_m: f64,
    formula: &dyn RateFormula,
) -> Result<Topology, TopologyError> {
    let grid = Grid::from_matrix(matrix)?;
    finalize(grid, tree_mode, max_connect_distance, cell_length_m, formula)
}

fn finalize(
    mut grid: Grid,
    tree_mode: TreeMode,
    max_connect_distance: f64,
    cell_length_m: f64,
    formula: &dyn RateFormula,
) -> Result<Topology, TopologyError> {
    let mut nodes = graph::build_nodes(&grid, max_connect_distance, tree_mode)?;
    let (mut links, link_index) = link::build_links(&mut nodes, cell_length_m, formula)?;

    grid.assign_names(&nodes);
    conflict::assign_conflicts(&mut nodes);
    conflict::assign_link_conflicts(&mut links, nodes.len());
    path::build_next_hop_table(&mut nodes, &grid);
    let path_table = path::build_path_table(&nodes, NodeId(0));

    Ok(Topology::assemble(nodes, links, link_index, grid, path_table))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn worked_matrix() -> Vec<Vec<i32>> {
        vec![
            vec![0, 1, 0, 0],
            vec![1, 0, 1, 0],
            vec![0, 1, 0, 0],
            vec![1, 1, 0, 1],
        ]
    }

    #[test]
    fn from_matrix_builds_the_full_aggregate() {
        let topo = from_matrix(&worked_matrix(), TreeMode::Dag, 1.5, 10.0, &|_d: f64| {
            5.0
        })
        .unwrap();

        assert_eq!(topo.node_count(), 6);
        assert_eq!(topo.link_count(), 6);
        assert_eq!(topo.node(topo.donor()).name, DONOR_NAME);

        // The grid is rewritten with node names; the dropped candidate at
        // (3, 3) reads as empty again.
        assert_eq!(topo.grid.row_tokens(0), vec!["0", "d", "0", "0"]);
        assert_eq!(topo.grid.row_tokens(1), vec!["1", "0", "2", "0"]);
        assert_eq!(topo.grid.row_tokens(2), vec!["0", "3", "0", "0"]);
        assert_eq!(topo.grid.row_tokens(3), vec!["4", "5", "0", "0"]);
    }

    #[test]
    fn lookups_work_by_name_and_by_edge() {
        let topo = from_matrix(&worked_matrix(), TreeMode::Dag, 1.5, 10.0, &|_d: f64| {
            5.0
        })
        .unwrap();

        let donor = topo.node_id("d").unwrap();
        let one = topo.node_id("1").unwrap();
        assert_eq!(donor, topo.donor());
        let link = topo.link_between(donor, one).unwrap();
        assert_eq!(topo.link(link).label(), "d-1");
        assert!(topo.link_between(one, donor).is_none());
        assert!(topo.node_id("99").is_none());
    }

    #[test]
    fn path_table_covers_every_node() {
        let topo = from_matrix(&worked_matrix(), TreeMode::Dag, 1.5, 10.0, &|_d: f64| {
            5.0
        })
        .unwrap();

        for idx in 0..topo.node_count() {
            assert!(
                !topo.paths_to(NodeId(idx)).is_empty(),
                "node {} has no donor path",
                topo.node(NodeId(idx)).name
            );
        }
        let five = topo.node_id("5").unwrap();
        assert_eq!(topo.paths_to(five).len(), 2);
    }

    #[test]
    fn tree_mode_collapses_to_single_paths() {
        let topo = from_matrix(&worked_matrix(), TreeMode::Tree, 1.5, 10.0, &|_d: f64| {
            5.0
        })
        .unwrap();

        for idx in 0..topo.node_count() {
            assert_eq!(topo.paths_to(NodeId(idx)).len(), 1);
        }
    }

    #[test]
    fn validation_failures_surface_as_typed_errors() {
        assert!(matches!(
            from_matrix(&[], TreeMode::Dag, 1.5, 10.0, &|_d: f64| 0.0),
            Err(TopologyError::Grid(_))
        ));

        let headless = vec![
            vec![0, 0, 0, 0],
            vec![1, 0, 1, 0],
            vec![0, 1, 0, 0],
            vec![1, 1, 0, 1],
        ];
        assert!(matches!(
            from_matrix(&headless, TreeMode::Dag, 1.5, 10.0, &|_d: f64| 0.0),
            Err(TopologyError::Graph(_))
        ));
    }
}
