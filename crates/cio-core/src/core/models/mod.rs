//! # Core Models Module
//!
//! Data structures shared by every cost term.
//!
//! - [`trajectory`] - The trajectory view contract and a dense in-memory implementation
//! - [`dynamics`] - Per-waypoint body transforms, velocities, masses and joint torques
//! - [`contact`] - Contact point descriptors and the smoothed contact variables derived from them
//! - [`robot_state`] - Scratch joint-position state handed to the collision oracle
//! - [`ids`] - Body references resolved against a dynamics snapshot
//!
//! ```ignore
//! use cio_core::core::models::trajectory::{FullTrajectory, TrajectoryComponent, DerivativeType};
//!
//! let positions = nalgebra::DMatrix::zeros(20, 12);
//! let mut trajectory = FullTrajectory::new(20, 0.05)?;
//! trajectory.set_component(TrajectoryComponent::Joint, DerivativeType::Position, positions)?;
//! trajectory.derive_joint_derivatives()?;
//! ```

pub mod contact;
pub mod dynamics;
pub mod ids;
pub mod robot_state;
pub mod trajectory;
