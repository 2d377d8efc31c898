//! Road Network Routing Library.
//! Handles point-to-point path-finding over road graphs.

#[macro_use]
extern crate log;

pub mod types {
    pub mod location;
    pub mod model;
    pub mod node;
    pub mod planner;
    pub mod road;
}

pub mod utils {
    pub mod generator;
    pub mod graph;
    pub mod planner_state;
}

pub use types::*;
pub use utils::*;
