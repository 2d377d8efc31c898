//! Definition of the `Road` type.
use serde::{Deserialize, Serialize};

/// A road is a polyline through a sequence of nodes.
///
/// `node_refs` are indices into the node list the road network is
/// built from. Every pair of consecutive refs is one road segment.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Road {
    /// Identifier of the road, usually the id of the source way.
    pub uid: String,

    /// Ordered node indices along the road.
    pub node_refs: Vec<usize>,
}

impl Road {
    /// Creates a road through the given node indices.
    pub fn new(uid: impl Into<String>, node_refs: Vec<usize>) -> Road {
        Road {
            uid: uid.into(),
            node_refs,
        }
    }

    /// Iterates over the segments of the road as `(from, to)` index
    /// pairs, in road order.
    pub fn segments(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.node_refs.windows(2).map(|pair| (pair[0], pair[1]))
    }
}
