//! Stores the state of the planner
//!
//! A road network is loaded once per process and shared by every route
//! query. Queries only read the network, so they can run from any
//! number of threads at the same time.

use once_cell::sync::OnceCell;

use crate::generator::generate_nodes;
use crate::graph::build_roads;
use crate::model::RoadModel;
use crate::node::Node;
use crate::planner::engine::{ExpansionPolicy, PathFinder, Route};
use crate::road::Road;

/// Query struct to find a route between two points.
///
/// Coordinates are percentages (0 to 100) of the map's extent.
#[derive(Debug, Copy, Clone)]
pub struct RouteQuery {
    ///start x
    pub start_x: f32,
    ///start y
    pub start_y: f32,
    ///end x
    pub end_x: f32,
    ///end y
    pub end_y: f32,
    ///policy
    pub policy: ExpansionPolicy,
}

/// Query struct for generating a synthetic road network.
#[derive(Debug, Copy, Clone)]
pub struct GeneratedModelQuery {
    ///number of nodes
    pub capacity: usize,
    ///longest road segment, in map units
    pub constraint: f32,
    ///meters per map unit
    pub metric_scale: f32,
}

impl Default for GeneratedModelQuery {
    fn default() -> Self {
        GeneratedModelQuery {
            capacity: 500,
            constraint: DEFAULT_CONSTRAINT,
            metric_scale: DEFAULT_METRIC_SCALE,
        }
    }
}

/// Shared road network
pub static ROAD_MODEL: OnceCell<RoadModel> = OnceCell::new();

/// Longest road segment of a generated network, in map units
pub const DEFAULT_CONSTRAINT: f32 = 0.1;
/// Meters per map unit of a generated network
pub const DEFAULT_METRIC_SCALE: f32 = 1000.0;

/// Checks if the road network is initialized
pub fn is_model_initialized() -> bool {
    ROAD_MODEL.get().is_some()
}

/// Initializes the shared road network
pub fn init_model(nodes: Vec<Node>, roads: &[Road], metric_scale: f32) -> Result<(), String> {
    info!("Initializing road model");
    if is_model_initialized() {
        error!("Road model already initialized");
        return Err(
            "Road model already initialized. Try to use the model instead of initializing it."
                .to_string(),
        );
    }
    let model = RoadModel::new(nodes, roads, metric_scale)?;
    set_model(model)
}

/// Initializes the shared road network with randomly placed nodes
pub fn init_generated_model(query: GeneratedModelQuery) -> Result<(), String> {
    info!("Initializing generated road model");
    if is_model_initialized() {
        error!("Road model already initialized");
        return Err(
            "Road model already initialized. Try to use the model instead of initializing it."
                .to_string(),
        );
    }
    set_model(build_generated_model(query)?)
}

/// Builds a road network of random nodes connected to every other
/// node within `query.constraint`.
pub fn build_generated_model(query: GeneratedModelQuery) -> Result<RoadModel, String> {
    debug!("query: {:?}", query);
    let nodes = generate_nodes(query.capacity);
    let roads = build_roads(&nodes, query.constraint, |from, to| from.distance(to));
    RoadModel::new(nodes, &roads, query.metric_scale)
}

/// gets node by id
pub fn get_node_by_id(id: &str) -> Result<&'static Node, String> {
    debug!("id: {}", id);
    let model = ROAD_MODEL
        .get()
        .ok_or_else(|| "Road model not initialized".to_string())?;
    let index = model
        .get_node_index_by_uid(id)
        .ok_or_else(|| "Node not found by id: ".to_owned() + id)?;
    Ok(&model.graph()[index])
}

/// Get route
pub fn get_route(req: RouteQuery) -> Result<Route, String> {
    info!("Getting route");
    debug!("query: {:?}", req);
    let model = ROAD_MODEL.get().ok_or_else(|| {
        error!("Road model not initialized");
        "Road model not initialized. Try to initialize it first.".to_string()
    })?;

    let route = PathFinder::new(model, req.start_x, req.start_y, req.end_x, req.end_y)
        .map_err(|e| {
            error!("{}", e);
            e
        })?
        .with_policy(req.policy)
        .a_star_search()
        .map_err(|e| {
            error!("{}", e);
            e
        })?;
    debug!("route: {:?}", route.nodes);
    debug!("distance: {}", route.distance);
    info!("Finished getting route");
    Ok(route)
}

fn set_model(model: RoadModel) -> Result<(), String> {
    ROAD_MODEL
        .set(model)
        .map_err(|_| "Failed to initialize road model".to_string())
}
