//! Network construction for the flow solver.
//!
//! Parallel track segments between the same pair of locations are merged
//! into one arc per direction: capacities add up and the arc cost is the
//! capacity-weighted average of the merged segments.

pub mod aggregate;
pub mod builder;
pub mod types;

pub use aggregate::merge_arc;
pub use builder::build_network;
pub use types::{Matrix, Network, Vertex};
