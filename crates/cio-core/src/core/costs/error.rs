use crate::core::models::ids::BodyRef;
use crate::core::models::trajectory::{DerivativeType, TrajectoryComponent};
use thiserror::Error;

/// Contract violations detected while evaluating a cost term. Any of them aborts the
/// evaluation pass; none of them is ever turned into a cost.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum CostError {
    #[error("The trajectory has no {component} {derivative} table")]
    MissingComponent {
        component: TrajectoryComponent,
        derivative: DerivativeType,
    },

    #[error("Waypoint {waypoint} is out of range for a trajectory of {num_points} points")]
    WaypointOutOfRange { waypoint: usize, num_points: usize },

    #[error("Body {0} is out of range or unknown to the dynamics model")]
    UnknownBody(BodyRef),

    #[error("Kinematic chain '{0}' is unknown")]
    UnknownChain(String),

    #[error("Expected {expected} degrees of freedom, found {found}")]
    DofMismatch { expected: usize, found: usize },

    #[error("Torque normalization needs more than 6 degrees of freedom, found {0}")]
    InsufficientDof(usize),

    #[error("{expected} contact points are configured but {found} contact variables were supplied")]
    ContactCountMismatch { expected: usize, found: usize },

    #[error("Total body mass must be positive, got {0}")]
    NonPositiveMass(f64),

    #[error("The {0} collaborator is required but was not provided")]
    MissingCollaborator(&'static str),
}
