use super::context::Collaborators;
use super::error::EngineError;
use crate::core::costs::CostError;
use crate::core::costs::context::WaypointContext;
use crate::core::models::contact::{ContactActivation, ContactPointDescriptor, ContactVariable};
use crate::core::models::dynamics::{DynamicsOracle, DynamicsSnapshot};
use crate::core::models::trajectory::TrajectoryView;
use crate::core::world::ground::GroundProjector;
use tracing::{debug, instrument};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// One dynamics snapshot per waypoint.
#[derive(Debug, Clone, Default)]
pub struct SnapshotTable {
    snapshots: Vec<DynamicsSnapshot>,
}

impl SnapshotTable {
    #[instrument(skip_all, name = "dynamics_snapshot_task")]
    pub fn compute(
        oracle: &dyn DynamicsOracle,
        trajectory: &dyn TrajectoryView,
    ) -> Result<Self, EngineError> {
        let num_points = trajectory.num_points();

        #[cfg(not(feature = "parallel"))]
        let iterator = 0..num_points;

        #[cfg(feature = "parallel")]
        let iterator = (0..num_points).into_par_iter();

        let snapshots = iterator
            .map(|waypoint| {
                oracle
                    .compute(trajectory, waypoint)
                    .map_err(|message| EngineError::Dynamics { waypoint, message })
            })
            .collect::<Result<Vec<_>, _>>()?;

        debug!(waypoints = snapshots.len(), "Dynamics snapshots computed.");
        Ok(Self { snapshots })
    }

    pub fn from_snapshots(snapshots: Vec<DynamicsSnapshot>) -> Self {
        Self { snapshots }
    }

    #[inline]
    pub fn get(&self, waypoint: usize) -> Option<&DynamicsSnapshot> {
        self.snapshots.get(waypoint)
    }

    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }
}

/// Contact variables of every contact point, one row per waypoint.
#[derive(Debug, Clone, Default)]
pub struct ContactTable {
    rows: Vec<Vec<ContactVariable>>,
}

impl ContactTable {
    #[instrument(skip_all, name = "contact_variable_task")]
    pub fn compute(
        trajectory: &dyn TrajectoryView,
        contact_points: &[ContactPointDescriptor],
        ground: &dyn GroundProjector,
        activation: &ContactActivation,
    ) -> Result<Self, EngineError> {
        let num_points = trajectory.num_points();

        #[cfg(not(feature = "parallel"))]
        let iterator = 0..num_points;

        #[cfg(feature = "parallel")]
        let iterator = (0..num_points).into_par_iter();

        let rows = iterator
            .map(|waypoint| {
                ContactVariable::evaluate_all(
                    trajectory,
                    waypoint,
                    contact_points,
                    ground,
                    activation,
                )
            })
            .collect::<Result<Vec<_>, _>>()?;

        debug!(
            waypoints = rows.len(),
            contacts = contact_points.len(),
            "Contact variables computed."
        );
        Ok(Self { rows })
    }

    pub fn from_rows(rows: Vec<Vec<ContactVariable>>) -> Self {
        Self { rows }
    }

    #[inline]
    pub fn waypoint(&self, waypoint: usize) -> Option<&[ContactVariable]> {
        self.rows.get(waypoint).map(Vec::as_slice)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Everything derived from one revision of the trajectory. Dynamics snapshots and contact
/// variables are computed once here and shared read-only by every cost term.
pub struct TrajectoryRevision<'t> {
    trajectory: &'t dyn TrajectoryView,
    contact_points: Vec<ContactPointDescriptor>,
    snapshots: SnapshotTable,
    contacts: ContactTable,
}

impl<'t> TrajectoryRevision<'t> {
    #[instrument(skip_all, name = "revision_task")]
    pub fn prepare(
        trajectory: &'t dyn TrajectoryView,
        contact_points: &[ContactPointDescriptor],
        dynamics: &dyn DynamicsOracle,
        ground: &dyn GroundProjector,
        activation: &ContactActivation,
    ) -> Result<Self, EngineError> {
        let snapshots = SnapshotTable::compute(dynamics, trajectory)?;
        let contacts = ContactTable::compute(trajectory, contact_points, ground, activation)?;
        Self::from_parts(trajectory, contact_points.to_vec(), snapshots, contacts)
    }

    pub fn from_parts(
        trajectory: &'t dyn TrajectoryView,
        contact_points: Vec<ContactPointDescriptor>,
        snapshots: SnapshotTable,
        contacts: ContactTable,
    ) -> Result<Self, EngineError> {
        let expected = trajectory.num_points();
        if snapshots.len() != expected {
            return Err(EngineError::RevisionMismatch {
                table: "dynamics snapshot",
                expected,
                found: snapshots.len(),
            });
        }
        if contacts.len() != expected {
            return Err(EngineError::RevisionMismatch {
                table: "contact variable",
                expected,
                found: contacts.len(),
            });
        }
        if let Some(row) = contacts
            .rows
            .iter()
            .find(|row| row.len() != contact_points.len())
        {
            return Err(CostError::ContactCountMismatch {
                expected: contact_points.len(),
                found: row.len(),
            }
            .into());
        }

        Ok(Self {
            trajectory,
            contact_points,
            snapshots,
            contacts,
        })
    }

    pub fn trajectory(&self) -> &'t dyn TrajectoryView {
        self.trajectory
    }

    #[inline]
    pub fn num_points(&self) -> usize {
        self.trajectory.num_points()
    }

    pub fn contact_points(&self) -> &[ContactPointDescriptor] {
        &self.contact_points
    }

    pub fn snapshots(&self) -> &SnapshotTable {
        &self.snapshots
    }

    pub fn contacts(&self) -> &ContactTable {
        &self.contacts
    }

    /// The evaluation context of `waypoint`, wired to the given collaborators.
    pub fn context<'s>(
        &'s self,
        waypoint: usize,
        collaborators: &Collaborators<'s>,
    ) -> Result<WaypointContext<'s>, CostError> {
        let out_of_range = CostError::WaypointOutOfRange {
            waypoint,
            num_points: self.num_points(),
        };
        let dynamics = self.snapshots.get(waypoint).ok_or(out_of_range.clone())?;
        let contacts = self.contacts.waypoint(waypoint).ok_or(out_of_range)?;

        Ok(WaypointContext::new(
            waypoint,
            self.trajectory,
            dynamics,
            &self.contact_points,
            contacts,
        )?
        .with_collision(collaborators.collision)
        .with_kinematics(collaborators.kinematics))
    }
}
