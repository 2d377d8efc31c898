//! Struct definitions and implementations for objects that represent
//! vertices in a road graph.
//!
//! A [`Node`] is a plain value: it carries an identity and a position
//! and nothing else. Search bookkeeping (visited flags, costs, parent
//! links) is kept by the path finder in its own arrays, so the same
//! nodes can be shared by any number of searches.

use serde::{Deserialize, Serialize};

use super::location::Location;

/// Represent a vertex in a road graph.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Node {
    /// Typed as a [`String`] to allow for synthetic ids, such as the
    /// id of the map element the node was read from.
    pub uid: String,

    /// Denotes the position of the node in normalized map space.
    ///
    /// See also [`Location`].
    pub location: Location,
}

impl Node {
    /// Creates a node at the given normalized coordinates.
    pub fn new(uid: impl Into<String>, x: f32, y: f32) -> Node {
        Node {
            uid: uid.into(),
            location: Location::new(x, y),
        }
    }

    /// Straight-line distance to another node, in the map's native
    /// units.
    pub fn distance(&self, other: &Node) -> f32 {
        self.location.distance(&other.location)
    }
}

//------------------------------------------------------------------
// Unit Tests
//------------------------------------------------------------------
