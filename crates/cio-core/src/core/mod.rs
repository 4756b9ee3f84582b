//! # Core Module
//!
//! The stateless foundation of the cost engine.
//!
//! - **Data Models** ([`models`]) - Trajectory tables, dynamics snapshots, contact points,
//!   contact variables and the scratch robot state
//! - **Collaborators** ([`world`]) - Ground projection, collision and kinematic-chain interfaces,
//!   with simple planar ground implementations
//! - **Cost Terms** ([`costs`]) - One evaluator per physical effect, dispatched through a closed
//!   tagged variant
//! - **Utilities** ([`utils`]) - Exponential-map and surface-frame geometry

pub mod costs;
pub mod models;
pub mod utils;
pub mod world;

#[cfg(test)]
pub(crate) mod test_support;
