//! # Engine Module
//!
//! Stateful orchestration of cost evaluation over a whole trajectory.
//!
//! - **Configuration** ([`config`]) - Term weights and parameters, contact points and the
//!   contact activation, loaded from TOML or assembled with a builder
//! - **Collaborators** ([`context`]) - The world services shared by every waypoint of a pass
//! - **Revision Caches** ([`revision`]) - Dynamics snapshots and contact variables computed once
//!   per trajectory revision and shared read-only by every term
//! - **Aggregation** ([`aggregator`]) - Weighted per-waypoint and per-term cost totals,
//!   evaluated in parallel when the `parallel` feature is enabled
//! - **Error Handling** ([`error`]) - Engine-level errors wrapping cost and configuration errors

pub mod aggregator;
pub mod config;
pub mod context;
pub mod error;
pub mod revision;
