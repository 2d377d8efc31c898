//! Struct definitions and implementations for [`Location`].

use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};

/// A [`Location`] is a position on the map. Typically, this type is
/// used in tandem with the [`Node`](`super::node::Node`) type.
///
/// Both coordinates live in the normalized map space: `(0, 0)` and
/// `(1, 1)` are opposite corners of the map's bounding box. Queries
/// are resolved in the same space, so no projection is needed to
/// compare a query point with a node.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Location {
    pub x: OrderedFloat<f32>,
    pub y: OrderedFloat<f32>,
}

impl Location {
    /// Creates a location from raw coordinates.
    pub fn new(x: f32, y: f32) -> Location {
        Location {
            x: OrderedFloat(x),
            y: OrderedFloat(y),
        }
    }

    /// Straight-line (Euclidean) distance between two locations, in
    /// the map's native units.
    pub fn distance(&self, other: &Location) -> f32 {
        let dx = self.x.into_inner() - other.x.into_inner();
        let dy = self.y.into_inner() - other.y.into_inner();
        (dx * dx + dy * dy).sqrt()
    }
}
