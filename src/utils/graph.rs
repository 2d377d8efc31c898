//! Helper functions for working with road graphs.

use crate::{node::Node, road::Road};

/// Lays a straight road segment between every pair of nearby nodes.
///
/// A pair gets a segment when `constraint_function(from, to)` is at
/// most `constraint`. With straight-line distance as the function this
/// caps segment length, which is how synthetic road networks are
/// built.
///
/// # Arguments
/// * `nodes` - Nodes to connect.
/// * `constraint` - Largest accepted value of `constraint_function`.
/// * `constraint_function` - Measure between two nodes, usually
///   [`Node::distance`].
///
/// # Returns
/// One two-node [`Road`] per connected pair. `node_refs` index into
/// `nodes`, so the result can be passed to
/// [`RoadModel::new`](crate::model::RoadModel::new) together with the
/// same nodes.
///
/// # Time Complexity
/// *O*(*n^2*).
pub fn build_roads(
    nodes: &[Node],
    constraint: f32,
    constraint_function: fn(&Node, &Node) -> f32,
) -> Vec<Road> {
    let mut roads = Vec::new();
    for (i, from) in nodes.iter().enumerate() {
        for (j, to) in nodes.iter().enumerate().skip(i + 1) {
            if constraint_function(from, to) <= constraint {
                roads.push(Road::new(format!("{}:{}", from.uid, to.uid), vec![i, j]));
            }
        }
    }
    roads
}
