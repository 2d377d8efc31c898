//! The road network a path finder searches over.
//!
//! [`RouteModel`] is the contract the path finder needs from a map:
//! nearest-node lookup, node access, adjacency and the scale from map
//! units to meters. [`RoadModel`] implements it on top of a petgraph
//! arena, where every node is addressed by its [`NodeIndex`].

use ordered_float::OrderedFloat;
use petgraph::{graph::NodeIndex, stable_graph::StableUnGraph, visit::NodeIndexable};

use crate::{location::Location, node::Node, planner::engine::PathFinder, road::Road};

/// Read-only view of a road network, as needed by
/// [`PathFinder`](crate::planner::engine::PathFinder).
pub trait RouteModel {
    /// Returns the node closest to `(x, y)` in normalized map space,
    /// or [`None`] if the model has no nodes.
    fn find_closest_node(&self, x: f32, y: f32) -> Option<NodeIndex>;

    /// Returns the node stored at `index`.
    ///
    /// # Panics
    /// If `index` does not belong to this model.
    fn node(&self, index: NodeIndex) -> &Node;

    /// Returns the nodes directly connected to `index` by a road
    /// segment.
    fn neighbors(&self, index: NodeIndex) -> Vec<NodeIndex>;

    /// Conversion factor from map units to meters.
    fn metric_scale(&self) -> f32;

    /// Upper bound (exclusive) of the node indices in use.
    fn node_bound(&self) -> usize;
}

/// An undirected road network stored in a stable graph.
///
/// Edge weights are the straight-line lengths of the road segments in
/// map units, so they agree with the heuristic the path finder uses.
#[derive(Debug)]
pub struct RoadModel {
    graph: StableUnGraph<Node, OrderedFloat<f32>>,
    metric_scale: f32,

    /// The last route found by [`RoadModel::plan_route`], start to end.
    pub path: Vec<Node>,

    /// Length of [`RoadModel::path`] in meters.
    pub distance: f32,
}

impl RoadModel {
    /// Creates a road network.
    ///
    /// The i-th element of `nodes` is the node referenced by index `i`
    /// in the roads' `node_refs`.
    ///
    /// # Arguments
    /// * `nodes` - The nodes of the network.
    /// * `roads` - Roads connecting the nodes. Repeated segments are
    ///   merged and segments from a node to itself are skipped.
    /// * `metric_scale` - Meters per map unit. Must be positive.
    ///
    /// # Returns
    /// An error if a node position is not finite, if a road refers to
    /// a node that does not exist or if the scale is not a positive
    /// number.
    pub fn new(nodes: Vec<Node>, roads: &[Road], metric_scale: f32) -> Result<RoadModel, String> {
        if !metric_scale.is_finite() || metric_scale <= 0.0 {
            return Err(format!(
                "Metric scale must be a positive number, got {}",
                metric_scale
            ));
        }

        if let Some(node) = nodes.iter().find(|node| {
            !node.location.x.into_inner().is_finite() || !node.location.y.into_inner().is_finite()
        }) {
            return Err(format!("Node {} has a non-finite position", node.uid));
        }

        let mut graph = StableUnGraph::with_capacity(nodes.len(), 0);
        let indices: Vec<NodeIndex> = nodes.into_iter().map(|node| graph.add_node(node)).collect();

        for road in roads {
            for (from, to) in road.segments() {
                let (from_index, to_index) = match (indices.get(from), indices.get(to)) {
                    (Some(f), Some(t)) => (*f, *t),
                    _ => {
                        return Err(format!(
                            "Road {} refers to a missing node ({} -> {})",
                            road.uid, from, to
                        ))
                    }
                };
                if from_index == to_index {
                    continue;
                }
                let cost = graph[from_index].distance(&graph[to_index]);
                graph.update_edge(from_index, to_index, OrderedFloat(cost));
            }
        }

        debug!(
            "Road model built: {} nodes, {} segments",
            graph.node_count(),
            graph.edge_count()
        );
        Ok(RoadModel {
            graph,
            metric_scale,
            path: Vec::new(),
            distance: 0.0,
        })
    }

    /// Return the number of nodes in the network.
    pub fn get_node_count(&self) -> usize {
        self.graph.node_count()
    }

    /// Return the number of road segments in the network.
    pub fn get_road_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Get the index of the node with the given uid.
    pub fn get_node_index_by_uid(&self, uid: &str) -> Option<NodeIndex> {
        self.graph
            .node_indices()
            .find(|index| self.graph[*index].uid == uid)
    }

    /// The underlying graph. Edge weights are segment lengths in map
    /// units.
    pub fn graph(&self) -> &StableUnGraph<Node, OrderedFloat<f32>> {
        &self.graph
    }

    /// Finds a route between two points given in percent of the map's
    /// extent and stores it in [`RoadModel::path`] and
    /// [`RoadModel::distance`].
    ///
    /// # Returns
    /// The route length in meters. On error the stored route is
    /// cleared.
    pub fn plan_route(
        &mut self,
        start_x: f32,
        start_y: f32,
        end_x: f32,
        end_y: f32,
    ) -> Result<f32, String> {
        self.path.clear();
        self.distance = 0.0;

        let route = PathFinder::new(&*self, start_x, start_y, end_x, end_y)?.a_star_search()?;
        self.path = route.nodes;
        self.distance = route.distance;
        Ok(self.distance)
    }
}

impl RouteModel for RoadModel {
    fn find_closest_node(&self, x: f32, y: f32) -> Option<NodeIndex> {
        let target = Location::new(x, y);
        self.graph
            .node_indices()
            .min_by_key(|index| OrderedFloat(self.graph[*index].location.distance(&target)))
    }

    fn node(&self, index: NodeIndex) -> &Node {
        &self.graph[index]
    }

    fn neighbors(&self, index: NodeIndex) -> Vec<NodeIndex> {
        self.graph.neighbors(index).collect()
    }

    fn metric_scale(&self) -> f32 {
        self.metric_scale
    }

    fn node_bound(&self) -> usize {
        self.graph.node_bound()
    }
}

#[cfg(test)]
mod model_tests {
    use super::*;

    fn square() -> (Vec<Node>, Vec<Road>) {
        let nodes = vec![
            Node::new("sw", 0.0, 0.0),
            Node::new("se", 1.0, 0.0),
            Node::new("nw", 0.0, 1.0),
            Node::new("ne", 1.0, 1.0),
        ];
        let roads = vec![
            Road::new("south", vec![0, 1]),
            Road::new("east", vec![1, 3]),
            Road::new("north", vec![3, 2]),
            Road::new("west", vec![2, 0]),
        ];
        (nodes, roads)
    }

    #[test]
    fn test_build_square() {
        let (nodes, roads) = square();
        let model = RoadModel::new(nodes, &roads, 1.0).unwrap();

        assert_eq!(model.get_node_count(), 4);
        assert_eq!(model.get_road_count(), 4);
        assert_eq!(model.node_bound(), 4);
        assert_eq!(model.metric_scale(), 1.0);
        assert!(model.path.is_empty());
    }

    #[test]
    fn test_repeated_and_looping_segments() {
        let (nodes, _) = square();
        let roads = vec![
            Road::new("there", vec![0, 1]),
            Road::new("back", vec![1, 0]),
            Road::new("loop", vec![2, 2]),
        ];
        let model = RoadModel::new(nodes, &roads, 1.0).unwrap();
        assert_eq!(model.get_road_count(), 1);
    }

    #[test]
    fn test_missing_node_ref() {
        let (nodes, _) = square();
        let roads = vec![Road::new("nowhere", vec![0, 7])];
        let err = RoadModel::new(nodes, &roads, 1.0).unwrap_err();
        assert!(err.contains("nowhere"));
    }

    #[test]
    fn test_invalid_metric_scale() {
        let (nodes, roads) = square();
        assert!(RoadModel::new(nodes.clone(), &roads, 0.0).is_err());
        assert!(RoadModel::new(nodes.clone(), &roads, -2.0).is_err());
        assert!(RoadModel::new(nodes, &roads, f32::NAN).is_err());
    }

    #[test]
    fn test_non_finite_node_position() {
        let roads = vec![Road::new("through", vec![0, 1, 2])];
        let nodes = vec![
            Node::new("a", 0.0, 0.0),
            Node::new("bad", f32::NAN, 0.5),
            Node::new("c", 1.0, 1.0),
        ];
        let err = RoadModel::new(nodes, &roads, 1.0).unwrap_err();
        assert!(err.contains("bad"));

        let nodes = vec![
            Node::new("a", 0.0, 0.0),
            Node::new("far", 0.5, f32::INFINITY),
            Node::new("c", 1.0, 1.0),
        ];
        assert!(RoadModel::new(nodes, &roads, 1.0).is_err());
    }

    #[test]
    fn test_find_closest_node() {
        let (nodes, roads) = square();
        let model = RoadModel::new(nodes, &roads, 1.0).unwrap();

        let sw = model.find_closest_node(0.1, 0.2).unwrap();
        assert_eq!(model.node(sw).uid, "sw");
        let ne = model.find_closest_node(0.9, 0.8).unwrap();
        assert_eq!(model.node(ne).uid, "ne");
        // Outside the box still resolves to the nearest corner.
        let se = model.find_closest_node(3.0, -1.0).unwrap();
        assert_eq!(model.node(se).uid, "se");
    }

    #[test]
    fn test_find_closest_node_empty_model() {
        let model = RoadModel::new(vec![], &[], 1.0).unwrap();
        assert_eq!(model.find_closest_node(0.5, 0.5), None);
    }

    #[test]
    fn test_neighbors() {
        let (nodes, roads) = square();
        let model = RoadModel::new(nodes, &roads, 1.0).unwrap();
        let sw = model.get_node_index_by_uid("sw").unwrap();

        let mut neighbors: Vec<String> = model
            .neighbors(sw)
            .into_iter()
            .map(|index| model.node(index).uid.clone())
            .collect();
        neighbors.sort();
        assert_eq!(neighbors, vec!["nw".to_string(), "se".to_string()]);

        // Adjacency queries have no side effects.
        assert_eq!(model.neighbors(sw).len(), 2);
    }

    #[test]
    fn test_edge_weights_are_segment_lengths() {
        let nodes = vec![Node::new("a", 0.0, 0.0), Node::new("b", 0.3, 0.4)];
        let model = RoadModel::new(nodes, &[Road::new("ab", vec![0, 1])], 1.0).unwrap();
        let a = model.get_node_index_by_uid("a").unwrap();
        let b = model.get_node_index_by_uid("b").unwrap();
        let edge = model.graph().find_edge(a, b).unwrap();
        assert!((model.graph()[edge].into_inner() - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_plan_route() {
        let (nodes, roads) = square();
        let mut model = RoadModel::new(nodes, &roads, 2.0).unwrap();

        let distance = model.plan_route(0.0, 0.0, 100.0, 100.0).unwrap();
        assert!((distance - 4.0).abs() < 1e-6);
        assert_eq!(model.distance, distance);
        assert_eq!(model.path.len(), 3);
        assert_eq!(model.path[0].uid, "sw");
        assert_eq!(model.path[2].uid, "ne");
    }

    #[test]
    fn test_plan_route_failure_clears_previous_route() {
        let (nodes, mut roads) = square();
        roads.truncate(1);
        let mut model = RoadModel::new(nodes, &roads, 1.0).unwrap();

        model.plan_route(0.0, 0.0, 100.0, 0.0).unwrap();
        assert_eq!(model.path.len(), 2);

        assert!(model.plan_route(0.0, 0.0, 100.0, 100.0).is_err());
        assert!(model.path.is_empty());
        assert_eq!(model.distance, 0.0);
    }
}
