//! # Workflows Module
//!
//! High-level entry points that run a complete evaluation pass from a configuration.
//!
//! - **Trajectory Evaluation** ([`evaluate`]) - Validates the configuration, prepares the
//!   trajectory revision and aggregates every waypoint into a cost report.

pub mod evaluate;
