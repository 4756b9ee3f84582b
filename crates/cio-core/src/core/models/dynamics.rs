use super::ids::{BodyId, BodyRef};
use super::trajectory::TrajectoryView;
use nalgebra::{DVector, Isometry3, Vector3, Vector6};
use std::collections::HashMap;

/// Number of unactuated floating-root degrees of freedom leading every torque vector.
pub const ROOT_DOF: usize = 6;

/// Kinematic and inertial state of one rigid body at a waypoint.
#[derive(Debug, Clone, PartialEq)]
pub struct BodyState {
    /// Body pose in the world frame.
    pub transform: Isometry3<f64>,
    /// Spatial velocity `[angular; linear]`.
    pub spatial_velocity: Vector6<f64>,
    pub mass: f64,
}

impl BodyState {
    pub fn new(transform: Isometry3<f64>, spatial_velocity: Vector6<f64>, mass: f64) -> Self {
        Self {
            transform,
            spatial_velocity,
            mass,
        }
    }

    pub fn at_rest(transform: Isometry3<f64>, mass: f64) -> Self {
        Self::new(transform, Vector6::zeros(), mass)
    }

    #[inline]
    pub fn position(&self) -> Vector3<f64> {
        self.transform.translation.vector
    }
}

/// Output of the dynamics oracle for a single waypoint: every body's state plus the joint
/// torque vector. The first six torque entries belong to the unactuated floating root.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DynamicsSnapshot {
    bodies: Vec<BodyState>,
    joint_torques: DVector<f64>,
    body_names: HashMap<String, BodyId>,
}

impl DynamicsSnapshot {
    pub fn new(bodies: Vec<BodyState>, joint_torques: DVector<f64>) -> Self {
        Self {
            bodies,
            joint_torques,
            body_names: HashMap::new(),
        }
    }

    pub fn with_body_name(mut self, name: &str, id: BodyId) -> Self {
        self.body_names.insert(name.to_string(), id);
        self
    }

    pub fn with_joint_torques(mut self, joint_torques: DVector<f64>) -> Self {
        self.joint_torques = joint_torques;
        self
    }

    pub fn bodies(&self) -> &[BodyState] {
        &self.bodies
    }

    #[inline]
    pub fn body(&self, id: BodyId) -> Option<&BodyState> {
        self.bodies.get(id)
    }

    pub fn body_id(&self, name: &str) -> Option<BodyId> {
        self.body_names.get(name).copied()
    }

    /// Resolves a body reference to a body id that is in range for this snapshot.
    pub fn resolve(&self, body: &BodyRef) -> Option<BodyId> {
        let id = match body {
            BodyRef::Id(id) => *id,
            BodyRef::Name(name) => self.body_id(name)?,
        };
        (id < self.bodies.len()).then_some(id)
    }

    pub fn joint_torques(&self) -> &DVector<f64> {
        &self.joint_torques
    }

    #[inline]
    pub fn dof(&self) -> usize {
        self.joint_torques.len()
    }

    pub fn total_mass(&self) -> f64 {
        self.bodies.iter().map(|body| body.mass).sum()
    }
}

/// Forward/inverse dynamics collaborator producing one snapshot per waypoint.
pub trait DynamicsOracle: Send + Sync {
    fn compute(
        &self,
        trajectory: &dyn TrajectoryView,
        waypoint: usize,
    ) -> Result<DynamicsSnapshot, String>;
}
