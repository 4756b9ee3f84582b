//! # CIO Core Library
//!
//! Per-waypoint cost evaluation for contact-invariant trajectory optimization of legged and
//! humanoid robots. Every candidate trajectory is scored on smoothness, collision avoidance,
//! contact consistency, dynamic feasibility (torque and friction) and goal attainment so that
//! an outer optimizer can improve it by gradient or sampling-based updates.
//!
//! ## Architectural Philosophy
//!
//! The library follows a three-layer architecture:
//!
//! - **[`core`]: The Foundation.** Stateless data models (trajectory view, dynamics snapshot,
//!   contact variables), the interfaces of the external collaborators (ground projection,
//!   collision checking, kinematic chains) and the cost terms themselves. Every cost term is a
//!   pure function of a waypoint and its collaborators.
//!
//! - **[`engine`]: The Logic Core.** Configuration, the per-revision caches that guarantee the
//!   dynamics snapshot and contact variables of a waypoint are computed exactly once, and the
//!   `CostAggregator` that weights and sums the terms, optionally in parallel.
//!
//! - **[`workflows`]: The Public API.** A single entry point that wires a configuration, a
//!   trajectory and the collaborators into a complete cost report.

pub mod core;
pub mod engine;
pub mod workflows;
