use super::error::CostError;
use crate::core::models::contact::{ContactPointDescriptor, ContactVariable};
use crate::core::models::dynamics::{BodyState, DynamicsSnapshot};
use crate::core::models::ids::BodyRef;
use crate::core::models::trajectory::{DerivativeType, TrajectoryComponent, TrajectoryView};
use crate::core::world::collision::CollisionOracle;
use crate::core::world::kinematics::KinematicChains;
use nalgebra::{Dyn, MatrixView, U1};

pub type TrajectoryRow<'a> = MatrixView<'a, f64, U1, Dyn, U1, Dyn>;

/// Everything a cost term may read at one waypoint. The dynamics snapshot and contact
/// variables are computed once per trajectory revision and shared by every term.
#[derive(Clone, Copy)]
pub struct WaypointContext<'a> {
    pub waypoint: usize,
    pub trajectory: &'a dyn TrajectoryView,
    pub dynamics: &'a DynamicsSnapshot,
    pub contact_points: &'a [ContactPointDescriptor],
    pub contacts: &'a [ContactVariable],
    pub collision: Option<&'a dyn CollisionOracle>,
    pub kinematics: Option<&'a dyn KinematicChains>,
}

impl<'a> WaypointContext<'a> {
    pub fn new(
        waypoint: usize,
        trajectory: &'a dyn TrajectoryView,
        dynamics: &'a DynamicsSnapshot,
        contact_points: &'a [ContactPointDescriptor],
        contacts: &'a [ContactVariable],
    ) -> Result<Self, CostError> {
        if waypoint >= trajectory.num_points() {
            return Err(CostError::WaypointOutOfRange {
                waypoint,
                num_points: trajectory.num_points(),
            });
        }
        if contacts.len() != contact_points.len() {
            return Err(CostError::ContactCountMismatch {
                expected: contact_points.len(),
                found: contacts.len(),
            });
        }
        Ok(Self {
            waypoint,
            trajectory,
            dynamics,
            contact_points,
            contacts,
            collision: None,
            kinematics: None,
        })
    }

    pub fn with_collision(mut self, collision: Option<&'a dyn CollisionOracle>) -> Self {
        self.collision = collision;
        self
    }

    pub fn with_kinematics(mut self, kinematics: Option<&'a dyn KinematicChains>) -> Self {
        self.kinematics = kinematics;
        self
    }

    #[inline]
    pub fn is_final_waypoint(&self) -> bool {
        self.waypoint + 1 == self.trajectory.num_points()
    }

    /// The row of the requested sub-trajectory at this waypoint.
    pub fn row(
        &self,
        component: TrajectoryComponent,
        derivative: DerivativeType,
    ) -> Result<TrajectoryRow<'a>, CostError> {
        let table = self
            .trajectory
            .rows(component, derivative)
            .ok_or(CostError::MissingComponent {
                component,
                derivative,
            })?;
        if self.waypoint >= table.nrows() {
            return Err(CostError::WaypointOutOfRange {
                waypoint: self.waypoint,
                num_points: table.nrows(),
            });
        }
        Ok(table.row(self.waypoint))
    }

    pub fn body(&self, body: &BodyRef) -> Result<&'a BodyState, CostError> {
        self.dynamics
            .resolve(body)
            .and_then(|id| self.dynamics.body(id))
            .ok_or_else(|| CostError::UnknownBody(body.clone()))
    }

    /// Contact points paired with their contact variables at this waypoint.
    pub fn contact_pairs(
        &self,
    ) -> impl Iterator<Item = (&'a ContactPointDescriptor, &'a ContactVariable)> {
        self.contact_points.iter().zip(self.contacts.iter())
    }
}
