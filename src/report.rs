//! Human-readable topology dumps.
//!
//! Renders a finalized topology without mutating it: the grid, every
//! node's outgoing links with rates and conflicts, and the number of donor
//! paths per node.

use crate::topology::{NodeId, Topology};

/// Render the whole topology as a text report.
pub fn render_topology(topology: &Topology) -> String {
    let mut out = String::new();

    out.push_str("--------------GRID----------------\n\n");
    for row in 0..topology.grid.size() {
        out.push_str(&topology.grid.row_tokens(row).join(" "));
        out.push('\n');
    }

    out.push_str("\n--------------TOPO----------------\n\n");
    for node in &topology.nodes {
        out.push_str(&format!("Node: {}\n", node.name));
        for &link_id in &node.outgoing_links {
            let link = topology.link(link_id);
            let conflicts: Vec<String> = link
                .conflicts
                .iter()
                .map(|&other| topology.link(other).label())
                .collect();
            out.push_str(&format!(
                "  Link: {} (Data Rate: {:.2} bps, Conflicts: [{}])\n",
                link.label(),
                link.data_rate_bps,
                conflicts.join(", ")
            ));
        }
    }

    out.push_str("\n--------------PATHS---------------\n\n");
    for idx in 0..topology.node_count() {
        let node = topology.node(NodeId(idx));
        out.push_str(&format!(
            "Node: {} (Path Count: {})\n",
            node.name,
            topology.paths_to(NodeId(idx)).len()
        ));
    }

    out.push_str("\n----------------------------------\n");
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::topology::{from_matrix, TreeMode};

    #[test]
    fn report_lists_grid_links_and_path_counts() {
        let topo = from_matrix(
            &[
                vec![0, 1, 0, 0],
                vec![1, 0, 1, 0],
                vec![0, 1, 0, 0],
                vec![1, 1, 0, 1],
            ],
            TreeMode::Dag,
            1.5,
            10.0,
            &|_d: f64| 42.0,
        )
        .unwrap();

        let report = render_topology(&topo);
        assert!(report.contains("0 d 0 0"));
        assert!(report.contains("Node: d"));
        assert!(report.contains("Link: d-1 (Data Rate: 42.00 bps"));
        assert!(report.contains("Node: 5 (Path Count: 2)"));
    }

    #[test]
    fn rendering_does_not_change_the_topology() {
        let matrix = vec![
            vec![0, 1, 0, 0],
            vec![1, 0, 1, 0],
            vec![0, 1, 0, 0],
            vec![1, 1, 0, 1],
        ];
        let topo = from_matrix(&matrix, TreeMode::Dag, 1.5, 10.0, &|_d: f64| 1.0).unwrap();
        let before = topo.clone();
        let _ = render_topology(&topo);
        assert_eq!(topo, before);
    }
}
