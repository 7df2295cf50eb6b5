//! Link derivation from parent/child edges.
//!
//! One directed link per edge, rated by the distance between its endpoints.
//! Connectivity is validated even though the graph builder guarantees it;
//! a failure here means a broken invariant upstream, not a user error.

use std::collections::HashMap;

use log::debug;

use crate::channel::RateFormula;

use super::grid::distance_between;
use super::types::{Link, LinkId, Node, NodeId};

/// Errors reported by link construction.
#[derive(Debug, Clone, thiserror::Error)]
pub enum LinkError {
    #[error("link endpoints must differ, got '{0}' twice")]
    SameEndpoints(String),
    #[error("nodes '{origin}' and '{destination}' are not connected as parent and child")]
    NotConnected { origin: String, destination: String },
    #[error("the donor '{0}' cannot be a link destination")]
    DonorDestination(String),
    #[error("link '{0}' already exists")]
    Duplicate(String),
}

/// Validate and build a single parent-to-child link.
pub fn connect(
    nodes: &[Node],
    source: NodeId,
    destination: NodeId,
    data_rate_bps: f64,
) -> Result<Link, LinkError> {
    if source == destination {
        return Err(LinkError::SameEndpoints(nodes[source.0].name.clone()));
    }
    if nodes[destination.0].role.is_donor() {
        return Err(LinkError::DonorDestination(nodes[destination.0].name.clone()));
    }
    if !nodes[source.0].has_child(destination) || !nodes[destination.0].has_parent(source) {
        return Err(LinkError::NotConnected {
            origin: nodes[source.0].name.clone(),
            destination: nodes[destination.0].name.clone(),
        });
    }

    Ok(Link {
        name: (
            nodes[source.0].name.clone(),
            nodes[destination.0].name.clone(),
        ),
        source,
        destination,
        data_rate_bps,
        conflicts: Vec::new(),
    })
}

/// Derive one link per parent/child edge and register it on its source.
///
/// # Arguments
/// * `nodes` - Finalized node registry; `outgoing_links` is filled in here
/// * `cell_length_m` - Physical length of one grid cell, in meters
/// * `formula` - Distance-to-rate formula applied to each link
///
/// # Returns
/// The link registry plus an index from endpoint ids to `LinkId`.
pub fn build_links(
    nodes: &mut [Node],
    cell_length_m: f64,
    formula: &dyn RateFormula,
) -> Result<(Vec<Link>, HashMap<(NodeId, NodeId), LinkId>), LinkError> {
    let mut links = Vec::new();
    let mut index = HashMap::new();

    for source_idx in 0..nodes.len() {
        let source = NodeId(source_idx);
        let children = nodes[source_idx].children.clone();

        for destination in children {
            let distance_m = distance_between(
                nodes[source_idx].position,
                nodes[destination.0].position,
            ) * cell_length_m;
            let link = connect(nodes, source, destination, formula.rate_bps(distance_m))?;

            let id = LinkId(links.len());
            if index.insert((source, destination), id).is_some() {
                return Err(LinkError::Duplicate(link.label()));
            }
            nodes[source_idx].outgoing_links.push(id);
            links.push(link);
        }
    }

    debug!("derived {} links from {} nodes", links.len(), nodes.len());
    Ok((links, index))
}
