//! Hop-synchronous information propagation.
//!
//! Records move one graph edge per simulated time unit. The caller owns the
//! clock: each call to [`advance`] processes exactly one discrete time
//! value, and skipping a value forfeits that step's deliveries. Delivered
//! records are kept in the destination's inbox, keyed by their creation
//! time, until the retention window slides past them.

use std::collections::VecDeque;

use log::trace;

use crate::topology::{Node, NodeId};

/// How many time units a delivered record stays in an inbox.
pub const RETENTION_WINDOW: u64 = 10;

/// One unit of information traversing the topology.
#[derive(Debug, Clone, PartialEq)]
pub struct PropagationRecord {
    /// Simulated time the record was created at its source.
    pub created_at: u64,
    /// Absolute time of the record's next move. Maintained as
    /// `created_at + hops completed`, which keeps one hop per tick.
    pub due_at: u64,
    pub source: NodeId,
    pub destination: NodeId,
    /// Nodes still to traverse; the last entry is the destination.
    pub remaining_path: VecDeque<NodeId>,
    /// Total hops from source to destination, fixed at creation.
    pub hop_count: usize,
    /// Opaque caller data carried end to end.
    pub payload: serde_json::Value,
}

impl PropagationRecord {
    /// Build a record ready to be queued at its source.
    ///
    /// `path` lists the nodes the record must visit after leaving the
    /// source, ending at `destination`.
    pub fn new(
        created_at: u64,
        source: NodeId,
        destination: NodeId,
        path: Vec<NodeId>,
        payload: serde_json::Value,
    ) -> Self {
        Self {
            created_at,
            due_at: created_at,
            source,
            destination,
            hop_count: path.len(),
            remaining_path: path.into(),
            payload,
        }
    }

    pub fn hops_completed(&self) -> usize {
        self.hop_count - self.remaining_path.len()
    }
}

/// Errors reported when queueing a record.
#[derive(Debug, Clone, thiserror::Error)]
pub enum SimulationError {
    #[error("a record needs a non-empty remaining path")]
    EmptyPath,
    #[error("the path ends at node {last:?}, not at the destination {destination:?}")]
    PathDestinationMismatch { last: NodeId, destination: NodeId },
}

/// Queue a record at its origin's outbound queue.
///
/// The record leaves the origin on the `advance` call matching its
/// creation time.
pub fn send_at(
    nodes: &mut [Node],
    origin: NodeId,
    record: PropagationRecord,
) -> Result<(), SimulationError> {
    match record.remaining_path.back() {
        None => return Err(SimulationError::EmptyPath),
        Some(&last) if last != record.destination => {
            return Err(SimulationError::PathDestinationMismatch {
                last,
                destination: record.destination,
            });
        }
        Some(_) => {}
    }
    nodes[origin.0].outbound.push(record);
    Ok(())
}

/// Run one simulated time unit over the whole node registry.
///
/// For every node, in registry order: purge inbox entries that fell out of
/// the retention window, then move each due record one hop. A record whose
/// path empties on this hop is delivered to the popped node's inbox under
/// its creation time; otherwise it joins the popped node's forward queue,
/// due again on the next tick.
pub fn advance(nodes: &mut [Node], current_time: u64) {
    for idx in 0..nodes.len() {
        let node = &mut nodes[idx];
        node.inbox
            .retain(|&stamp, _| current_time.saturating_sub(stamp) <= RETENTION_WINDOW);

        let (due_outbound, waiting): (Vec<_>, Vec<_>) = node
            .outbound
            .drain(..)
            .partition(|record| record.due_at == current_time);
        node.outbound = waiting;

        let (due_forward, waiting): (Vec<_>, Vec<_>) = node
            .forward
            .drain(..)
            .partition(|record| record.due_at == current_time);
        node.forward = waiting;

        for mut record in due_outbound.into_iter().chain(due_forward) {
            let Some(next) = record.remaining_path.pop_front() else {
                continue;
            };
            if record.remaining_path.is_empty() {
                trace!(
                    "t={}: record from {:?} delivered at {:?}",
                    current_time,
                    record.source,
                    next
                );
                nodes[next.0]
                    .inbox
                    .entry(record.created_at)
                    .or_default()
                    .push(record);
            } else {
                record.due_at = current_time + 1;
                nodes[next.0].forward.push(record);
            }
        }
    }
}
