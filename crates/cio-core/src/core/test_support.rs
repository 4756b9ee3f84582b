//! Shared fixtures for unit tests: a small humanoid with two feet and two hands standing on
//! flat ground.

use crate::core::costs::context::WaypointContext;
use crate::core::models::contact::{
    ContactActivation, ContactClass, ContactPointDescriptor, ContactVariable,
    NUM_ENDEFFECTOR_CONTACT_POINTS,
};
use crate::core::models::dynamics::{BodyState, DynamicsOracle, DynamicsSnapshot};
use crate::core::models::robot_state::RobotState;
use crate::core::models::trajectory::{
    DerivativeType, FullTrajectory, TrajectoryComponent, TrajectoryView,
};
use crate::core::world::collision::{CollisionContact, CollisionOracle};
use crate::core::world::kinematics::KinematicChains;
use nalgebra::{DMatrix, DVector, Isometry3, Matrix3xX, Translation3, Vector3};

pub(crate) const DOF: usize = 10;
pub(crate) const NUM_CONTACTS: usize = 4;
pub(crate) const TOTAL_MASS: f64 = 55.0;
pub(crate) const DT: f64 = 0.05;

pub(crate) const LEFT_FOOT: usize = 2;
pub(crate) const RIGHT_FOOT: usize = 3;
pub(crate) const PELVIS: usize = 6;

fn at(x: f64, y: f64, z: f64) -> Isometry3<f64> {
    Translation3::new(x, y, z).into()
}

/// Root body of 20 kg plus seven 5 kg links.
pub(crate) fn standing_snapshot() -> DynamicsSnapshot {
    let bodies = vec![
        BodyState::at_rest(at(0.0, 0.0, 0.9), 20.0),
        BodyState::at_rest(at(0.0, 0.0, 0.5), 5.0),
        BodyState::at_rest(at(-0.1, 0.0, 0.0), 5.0),
        BodyState::at_rest(at(0.1, 0.0, 0.0), 5.0),
        BodyState::at_rest(at(-0.3, 0.0, 1.0), 5.0),
        BodyState::at_rest(at(0.3, 0.0, 1.0), 5.0),
        BodyState::at_rest(at(0.0, 0.0, 1.0), 5.0),
        BodyState::at_rest(at(0.0, 0.0, 1.4), 5.0),
    ];
    DynamicsSnapshot::new(bodies, DVector::zeros(DOF))
        .with_body_name("left_foot_endeffector_link", LEFT_FOOT)
        .with_body_name("right_foot_endeffector_link", RIGHT_FOOT)
        .with_body_name("pelvis_link", PELVIS)
}

pub(crate) fn contact_points() -> Vec<ContactPointDescriptor> {
    vec![
        ContactPointDescriptor::new(0, LEFT_FOOT, "left_leg", ContactClass::Foot),
        ContactPointDescriptor::new(1, RIGHT_FOOT, "right_leg", ContactClass::Foot),
        ContactPointDescriptor::new(2, 4usize, "left_arm", ContactClass::Hand),
        ContactPointDescriptor::new(3, 5usize, "right_arm", ContactClass::Hand),
    ]
}

/// A contact on flat ground (zero surface orientation).
pub(crate) fn contact(
    raw: f64,
    projected_position: Vector3<f64>,
    point_forces: [Vector3<f64>; NUM_ENDEFFECTOR_CONTACT_POINTS],
) -> ContactVariable {
    ContactVariable::new(
        raw,
        &ContactActivation::default(),
        projected_position,
        Vector3::zeros(),
        point_forces,
    )
}

pub(crate) fn no_forces() -> [Vector3<f64>; NUM_ENDEFFECTOR_CONTACT_POINTS] {
    [Vector3::zeros(); NUM_ENDEFFECTOR_CONTACT_POINTS]
}

/// Trajectory with zeroed joint position/acceleration and contact tables. Joint velocity is
/// intentionally absent.
pub(crate) fn trajectory(num_points: usize) -> FullTrajectory {
    FullTrajectory::new(num_points, DT)
        .unwrap()
        .with_component(
            TrajectoryComponent::Joint,
            DerivativeType::Position,
            DMatrix::zeros(num_points, DOF),
        )
        .unwrap()
        .with_component(
            TrajectoryComponent::Joint,
            DerivativeType::Acceleration,
            DMatrix::zeros(num_points, DOF),
        )
        .unwrap()
        .with_component(
            TrajectoryComponent::ContactPosition,
            DerivativeType::Position,
            DMatrix::zeros(num_points, 3 * NUM_CONTACTS),
        )
        .unwrap()
        .with_component(
            TrajectoryComponent::ContactForce,
            DerivativeType::Position,
            DMatrix::zeros(num_points, 3 * NUM_ENDEFFECTOR_CONTACT_POINTS * NUM_CONTACTS),
        )
        .unwrap()
}

pub(crate) struct Fixture {
    pub trajectory: FullTrajectory,
    pub snapshot: DynamicsSnapshot,
    pub contact_points: Vec<ContactPointDescriptor>,
    pub contacts: Vec<ContactVariable>,
}

impl Fixture {
    pub fn new(num_points: usize) -> Self {
        let snapshot = standing_snapshot();
        let contact_points = contact_points();
        let contacts = contact_points
            .iter()
            .map(|point| {
                let id = snapshot.resolve(&point.body).unwrap();
                contact(0.0, snapshot.body(id).unwrap().position(), no_forces())
            })
            .collect();
        Self {
            trajectory: trajectory(num_points),
            snapshot,
            contact_points,
            contacts,
        }
    }

    pub fn context(&self, waypoint: usize) -> WaypointContext<'_> {
        WaypointContext::new(
            waypoint,
            &self.trajectory,
            &self.snapshot,
            &self.contact_points,
            &self.contacts,
        )
        .unwrap()
    }

    pub fn set_joint_row(&mut self, derivative: DerivativeType, waypoint: usize, values: &[f64]) {
        let table = self
            .trajectory
            .component_mut(TrajectoryComponent::Joint, derivative)
            .unwrap();
        for (j, value) in values.iter().enumerate() {
            table[(waypoint, j)] = *value;
        }
    }
}

/// Collision oracle reporting the same contacts for every state.
pub(crate) struct StaticCollisions(pub Vec<CollisionContact>);

impl CollisionOracle for StaticCollisions {
    fn check(&self, _state: &RobotState) -> Vec<CollisionContact> {
        self.0.clone()
    }
}

/// Collision oracle reporting one environment contact whose depth is the first joint position.
pub(crate) struct DepthFromFirstJoint;

impl CollisionOracle for DepthFromFirstJoint {
    fn check(&self, state: &RobotState) -> Vec<CollisionContact> {
        let depth = state.positions()[0];
        if depth > 0.0 {
            vec![CollisionContact::environment("pelvis_link", "box", depth)]
        } else {
            Vec::new()
        }
    }
}

/// Every chain shares the same Jacobian.
pub(crate) struct UniformJacobian(pub Matrix3xX<f64>);

impl KinematicChains for UniformJacobian {
    fn jacobian(&self, chain: &str, _joint_positions: &[f64]) -> Option<Matrix3xX<f64>> {
        (!chain.is_empty() && chain != "unknown").then(|| self.0.clone())
    }
}

/// Dynamics oracle returning the standing snapshot with root torque equal to the waypoint
/// index.
pub(crate) struct StandingDynamics;

impl DynamicsOracle for StandingDynamics {
    fn compute(
        &self,
        trajectory: &dyn TrajectoryView,
        waypoint: usize,
    ) -> Result<DynamicsSnapshot, String> {
        if waypoint >= trajectory.num_points() {
            return Err(format!("waypoint {waypoint} out of range"));
        }
        let mut torques = DVector::zeros(DOF);
        torques[0] = waypoint as f64;
        Ok(standing_snapshot().with_joint_torques(torques))
    }
}
