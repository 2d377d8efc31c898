//! Generates synthetic nodes for building test and demo road networks.

use rand::Rng;
use uuid::Uuid;

use crate::node::Node;

/// Generates `capacity` nodes at random positions in the unit square.
///
/// Each node gets a random v4 uuid as its uid.
pub fn generate_nodes(capacity: usize) -> Vec<Node> {
    generate_nodes_with_rng(&mut rand::thread_rng(), capacity)
}

/// Same as [`generate_nodes`] but draws positions from `rng`, so a
/// seeded generator always yields the same layout.
pub fn generate_nodes_with_rng<R: Rng>(rng: &mut R, capacity: usize) -> Vec<Node> {
    (0..capacity)
        .map(|_| {
            let x: f32 = rng.gen_range(0.0..=1.0);
            let y: f32 = rng.gen_range(0.0..=1.0);
            Node::new(Uuid::new_v4().to_string(), x, y)
        })
        .collect()
}
