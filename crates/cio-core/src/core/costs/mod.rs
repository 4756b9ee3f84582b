//! # Cost Terms Module
//!
//! One evaluator per physical effect. Each evaluator is a pure function of a waypoint and the
//! shared collaborators ([`context::WaypointContext`]) returning an unweighted cost and a
//! feasibility flag ([`term::CostEvaluation`]).
//!
//! - [`smoothness`] - Mean squared joint acceleration
//! - [`joint_deviation`] - Actuated joint excursion beyond a dead band
//! - [`obstacle`] - Environment and self-collision penetration depth
//! - [`contact_invariant`] - Deviation of contact bodies from their projected support pose
//! - [`effort`] - Normalized root (physics violation) and actuated joint torques
//! - [`friction_cone`] - Corner forces outside the friction cone
//! - [`transmission`] - Force magnitudes exceeding the chain's force transmission ratio
//! - [`regulation`] - Forces carried by weakly activated contacts
//! - [`goal_pose`] - Terminal body pose error
//!
//! The term set is closed: [`term::CostKind`] is a tagged variant and [`term::CostTerm`]
//! dispatches on it without virtual calls.

pub mod context;
pub mod contact_invariant;
pub mod effort;
pub mod error;
pub mod friction_cone;
pub mod goal_pose;
pub mod joint_deviation;
pub mod obstacle;
pub mod regulation;
pub mod smoothness;
pub mod term;
pub mod transmission;

pub use error::CostError;
