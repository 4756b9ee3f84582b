//! External collaborators consumed by the cost terms.
//!
//! Every collaborator is an injectable trait object; none of them is process-wide state. All
//! of them must tolerate concurrent read access, since waypoints are evaluated in parallel.

pub mod collision;
pub mod ground;
pub mod kinematics;
