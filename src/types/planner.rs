//! The core of the router library.
//!
//! The engine module resolves a start and an end point to the nearest
//! nodes of a [`RouteModel`](crate::model::RouteModel) and runs an A*
//! search between them, using straight-line distance both as the edge
//! cost and as the heuristic.

/// The path finding engine module.
pub mod engine {
    use std::{cmp::Reverse, collections::BinaryHeap};

    use ordered_float::OrderedFloat;
    use petgraph::graph::NodeIndex;

    use crate::{model::RouteModel, node::Node};

    /// Converts a percentage of the map's extent into a fraction.
    pub const PERCENT_SCALE: f32 = 0.01;

    /// What to do when an already discovered node is reached again.
    #[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
    pub enum ExpansionPolicy {
        /// The first path that reaches a node is kept. Every node
        /// enters the frontier at most once and parent links are never
        /// revised.
        #[default]
        FirstVisit,
        /// A node that is still on the frontier takes a cheaper path
        /// when one is found. Settled nodes are final.
        Relaxing,
    }

    /// A route between two nodes.
    #[derive(Debug, Clone, PartialEq)]
    pub struct Route {
        /// Copies of the nodes along the route, start to end.
        pub nodes: Vec<Node>,
        /// Length of the route in meters.
        pub distance: f32,
    }

    /// A* search between the nodes closest to two query points.
    ///
    /// The model is only borrowed for reading; the per-node search
    /// state is held here in arrays indexed by [`NodeIndex`], so
    /// searches over the same model do not interfere.
    #[derive(Debug)]
    pub struct PathFinder<'a, M: RouteModel> {
        model: &'a M,
        start_node: NodeIndex,
        end_node: NodeIndex,
        policy: ExpansionPolicy,

        pub(super) open_list: BinaryHeap<Reverse<(OrderedFloat<f32>, NodeIndex)>>,
        pub(super) visited: Vec<bool>,
        settled: Vec<bool>,
        pub(super) g_value: Vec<f32>,
        pub(super) h_value: Vec<f32>,
        pub(super) parent: Vec<Option<NodeIndex>>,

        distance: f32,
        expanded: usize,
    }

    impl<'a, M: RouteModel> PathFinder<'a, M> {
        /// Creates a path finder between two points.
        ///
        /// # Arguments
        /// * `model` - The road network to search.
        /// * `start_x`, `start_y` - Start point, in percent (0 to 100)
        ///   of the map's extent.
        /// * `end_x`, `end_y` - End point, in percent of the map's
        ///   extent.
        ///
        /// # Returns
        /// An error if a coordinate is not a finite number or if the
        /// model has no nodes.
        pub fn new(
            model: &'a M,
            start_x: f32,
            start_y: f32,
            end_x: f32,
            end_y: f32,
        ) -> Result<PathFinder<'a, M>, String> {
            if ![start_x, start_y, end_x, end_y]
                .iter()
                .all(|value| value.is_finite())
            {
                return Err(format!(
                    "Coordinates must be finite, got start ({}, {}) and end ({}, {})",
                    start_x, start_y, end_x, end_y
                ));
            }

            let start_node = model
                .find_closest_node(start_x * PERCENT_SCALE, start_y * PERCENT_SCALE)
                .ok_or_else(|| "Route model has no nodes".to_string())?;
            let end_node = model
                .find_closest_node(end_x * PERCENT_SCALE, end_y * PERCENT_SCALE)
                .ok_or_else(|| "Route model has no nodes".to_string())?;
            debug!("start_node: {:?}", model.node(start_node));
            debug!("end_node: {:?}", model.node(end_node));

            let bound = model.node_bound();
            Ok(PathFinder {
                model,
                start_node,
                end_node,
                policy: ExpansionPolicy::default(),
                open_list: BinaryHeap::new(),
                visited: vec![false; bound],
                settled: vec![false; bound],
                g_value: vec![0.0; bound],
                h_value: vec![0.0; bound],
                parent: vec![None; bound],
                distance: 0.0,
                expanded: 0,
            })
        }

        /// Sets the [`ExpansionPolicy`] used by the search.
        pub fn with_policy(mut self, policy: ExpansionPolicy) -> Self {
            self.policy = policy;
            self
        }

        /// The node closest to the start point.
        pub fn start_node(&self) -> NodeIndex {
            self.start_node
        }

        /// The node closest to the end point.
        pub fn end_node(&self) -> NodeIndex {
            self.end_node
        }

        /// Length in meters of the last path built by
        /// [`PathFinder::construct_final_path`].
        pub fn distance(&self) -> f32 {
            self.distance
        }

        /// Number of nodes settled by the last search.
        pub fn expanded_count(&self) -> usize {
            self.expanded
        }

        /// Straight-line distance from `node` to the end node, in map
        /// units.
        pub fn calculate_h_value(&self, node: NodeIndex) -> f32 {
            self.model
                .node(node)
                .distance(self.model.node(self.end_node))
        }

        /// Discovers the neighbors of `current_node` and puts the new
        /// ones on the frontier.
        pub fn add_neighbors(&mut self, current_node: NodeIndex) {
            let model = self.model;
            let current = model.node(current_node);
            let current_g = self.g_value[current_node.index()];

            for neighbor in model.neighbors(current_node) {
                let i = neighbor.index();
                let g_value = current_g + current.distance(model.node(neighbor));

                if !self.visited[i] {
                    self.visited[i] = true;
                    self.parent[i] = Some(current_node);
                    self.h_value[i] = self.calculate_h_value(neighbor);
                    self.g_value[i] = g_value;
                    self.push(neighbor);
                } else if self.policy == ExpansionPolicy::Relaxing
                    && !self.settled[i]
                    && g_value < self.g_value[i]
                {
                    self.parent[i] = Some(current_node);
                    self.g_value[i] = g_value;
                    self.push(neighbor);
                }
            }
        }

        /// Removes and returns the frontier node with the lowest
        /// `g + h`, or [`None`] when the frontier is empty.
        pub fn next_node(&mut self) -> Option<NodeIndex> {
            while let Some(Reverse((_, index))) = self.open_list.pop() {
                // Superseded by a cheaper entry that was settled first.
                if self.settled[index.index()] {
                    continue;
                }
                self.settled[index.index()] = true;
                return Some(index);
            }
            None
        }

        /// Follows the parent links from `current_node` back to the
        /// start and returns copies of the nodes in start to end order.
        /// The length of the path in meters is stored and available
        /// through [`PathFinder::distance`].
        pub fn construct_final_path(&mut self, current_node: NodeIndex) -> Vec<Node> {
            let model = self.model;
            let mut distance = 0.0;
            let mut path_found = Vec::new();

            let mut cursor = Some(current_node);
            while let Some(index) = cursor {
                let node = model.node(index);
                let parent = self.parent[index.index()];
                if let Some(parent) = parent {
                    distance += node.distance(model.node(parent));
                }
                path_found.push(node.clone());
                cursor = parent;
            }

            self.distance = distance * model.metric_scale();
            path_found.reverse();
            path_found
        }

        /// Runs the search from the start node to the end node.
        ///
        /// # Returns
        /// The route, or an error if the end node cannot be reached
        /// from the start node.
        pub fn a_star_search(&mut self) -> Result<Route, String> {
            info!("Searching for a route");
            self.reset();

            while let Some(current_node) = self.next_node() {
                self.expanded += 1;
                if current_node == self.end_node {
                    let nodes = self.construct_final_path(current_node);
                    debug!("expanded: {}", self.expanded);
                    debug!("path: {:?}", nodes);
                    debug!("distance: {}", self.distance);
                    info!("Route found");
                    return Ok(Route {
                        nodes,
                        distance: self.distance,
                    });
                }
                self.add_neighbors(current_node);
            }

            debug!("expanded: {}", self.expanded);
            Err(format!(
                "No route found between nodes {} and {}",
                self.model.node(self.start_node).uid,
                self.model.node(self.end_node).uid
            ))
        }

        /// Clears the search state and puts the start node on the
        /// frontier.
        pub(super) fn reset(&mut self) {
            self.open_list.clear();
            self.visited.fill(false);
            self.settled.fill(false);
            self.g_value.fill(0.0);
            self.h_value.fill(0.0);
            self.parent.fill(None);
            self.distance = 0.0;
            self.expanded = 0;

            let start = self.start_node.index();
            self.visited[start] = true;
            self.parent[start] = None;
            self.g_value[start] = 0.0;
            self.h_value[start] = self.calculate_h_value(self.start_node);
            self.push(self.start_node);
        }

        fn push(&mut self, node: NodeIndex) {
            let i = node.index();
            let f_value = self.g_value[i] + self.h_value[i];
            self.open_list.push(Reverse((OrderedFloat(f_value), node)));
        }
    }
}
