use super::contact::NUM_ENDEFFECTOR_CONTACT_POINTS;
use nalgebra::{DMatrix, Vector3};
use std::collections::HashMap;
use std::fmt;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TrajectoryComponent {
    Joint,
    ContactPosition,
    ContactForce,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DerivativeType {
    Position,
    Velocity,
    Acceleration,
}

impl fmt::Display for TrajectoryComponent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TrajectoryComponent::Joint => "joint",
            TrajectoryComponent::ContactPosition => "contact position",
            TrajectoryComponent::ContactForce => "contact force",
        };
        f.write_str(name)
    }
}

impl fmt::Display for DerivativeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DerivativeType::Position => "position",
            DerivativeType::Velocity => "velocity",
            DerivativeType::Acceleration => "acceleration",
        };
        f.write_str(name)
    }
}

/// Read access to a discretized trajectory.
///
/// Every component table has one row per waypoint. The contact-position component stores
/// `(x, y, raw)` per contact point, where `raw` is the unconstrained activation variable. The
/// contact-force component stores one 3-vector per patch corner, so each contact point owns
/// `3 * NUM_ENDEFFECTOR_CONTACT_POINTS` consecutive columns.
pub trait TrajectoryView: Send + Sync {
    fn rows(
        &self,
        component: TrajectoryComponent,
        derivative: DerivativeType,
    ) -> Option<&DMatrix<f64>>;

    fn discretization(&self) -> f64;

    fn num_points(&self) -> usize;

    fn corner_force(&self, waypoint: usize, contact: usize, corner: usize) -> Option<Vector3<f64>> {
        let table = self.rows(TrajectoryComponent::ContactForce, DerivativeType::Position)?;
        let column = (contact * NUM_ENDEFFECTOR_CONTACT_POINTS + corner) * 3;
        if corner >= NUM_ENDEFFECTOR_CONTACT_POINTS
            || waypoint >= table.nrows()
            || column + 3 > table.ncols()
        {
            return None;
        }
        Some(Vector3::new(
            table[(waypoint, column)],
            table[(waypoint, column + 1)],
            table[(waypoint, column + 2)],
        ))
    }

    /// Total contact force of a contact point: the sum of its corner forces.
    fn contact_force(&self, waypoint: usize, contact: usize) -> Option<Vector3<f64>> {
        (0..NUM_ENDEFFECTOR_CONTACT_POINTS).try_fold(Vector3::zeros(), |acc, corner| {
            self.corner_force(waypoint, contact, corner)
                .map(|force| acc + force)
        })
    }
}

#[derive(Debug, Error, PartialEq)]
pub enum TrajectoryError {
    #[error("A trajectory needs at least two waypoints, got {0}")]
    TooFewPoints(usize),
    #[error("Discretization step must be positive and finite, got {0}")]
    InvalidDiscretization(f64),
    #[error("The {component} component has {found} rows but the trajectory has {expected} waypoints")]
    RowCountMismatch {
        component: TrajectoryComponent,
        expected: usize,
        found: usize,
    },
    #[error("The {component} {derivative} table has {found} columns, expected {expected}")]
    ColumnCountMismatch {
        component: TrajectoryComponent,
        derivative: DerivativeType,
        expected: usize,
        found: usize,
    },
    #[error("The {component} component has no {derivative} table")]
    MissingComponent {
        component: TrajectoryComponent,
        derivative: DerivativeType,
    },
}

/// Dense in-memory trajectory: one matrix per (component, derivative) pair.
#[derive(Debug, Clone)]
pub struct FullTrajectory {
    num_points: usize,
    discretization: f64,
    tables: HashMap<(TrajectoryComponent, DerivativeType), DMatrix<f64>>,
}

impl FullTrajectory {
    pub fn new(num_points: usize, discretization: f64) -> Result<Self, TrajectoryError> {
        if num_points < 2 {
            return Err(TrajectoryError::TooFewPoints(num_points));
        }
        if !(discretization.is_finite() && discretization > 0.0) {
            return Err(TrajectoryError::InvalidDiscretization(discretization));
        }
        Ok(Self {
            num_points,
            discretization,
            tables: HashMap::new(),
        })
    }

    pub fn set_component(
        &mut self,
        component: TrajectoryComponent,
        derivative: DerivativeType,
        table: DMatrix<f64>,
    ) -> Result<(), TrajectoryError> {
        if table.nrows() != self.num_points {
            return Err(TrajectoryError::RowCountMismatch {
                component,
                expected: self.num_points,
                found: table.nrows(),
            });
        }
        let sibling_width = self
            .tables
            .iter()
            .find(|((c, d), _)| *c == component && *d != derivative)
            .map(|(_, existing)| existing.ncols());
        if let Some(expected) = sibling_width {
            if table.ncols() != expected {
                return Err(TrajectoryError::ColumnCountMismatch {
                    component,
                    derivative,
                    expected,
                    found: table.ncols(),
                });
            }
        }
        self.tables.insert((component, derivative), table);
        Ok(())
    }

    pub fn with_component(
        mut self,
        component: TrajectoryComponent,
        derivative: DerivativeType,
        table: DMatrix<f64>,
    ) -> Result<Self, TrajectoryError> {
        self.set_component(component, derivative, table)?;
        Ok(self)
    }

    pub fn component_mut(
        &mut self,
        component: TrajectoryComponent,
        derivative: DerivativeType,
    ) -> Option<&mut DMatrix<f64>> {
        self.tables.get_mut(&(component, derivative))
    }

    pub fn has_acceleration(&self) -> bool {
        self.tables
            .contains_key(&(TrajectoryComponent::Joint, DerivativeType::Acceleration))
    }

    /// Fills the joint velocity and acceleration tables from the joint positions by finite
    /// differences: central in the interior, one-sided at the ends. Boundary accelerations
    /// repeat their interior neighbour.
    pub fn derive_joint_derivatives(&mut self) -> Result<(), TrajectoryError> {
        let positions = self
            .tables
            .get(&(TrajectoryComponent::Joint, DerivativeType::Position))
            .ok_or(TrajectoryError::MissingComponent {
                component: TrajectoryComponent::Joint,
                derivative: DerivativeType::Position,
            })?;

        let n = self.num_points;
        let dt = self.discretization;
        let mut velocity = DMatrix::zeros(n, positions.ncols());
        let mut acceleration = DMatrix::zeros(n, positions.ncols());

        for p in 0..n {
            let row = if p == 0 {
                (positions.row(1) - positions.row(0)) / dt
            } else if p == n - 1 {
                (positions.row(n - 1) - positions.row(n - 2)) / dt
            } else {
                (positions.row(p + 1) - positions.row(p - 1)) / (2.0 * dt)
            };
            velocity.set_row(p, &row);
        }

        for p in 1..n.saturating_sub(1) {
            let row = (positions.row(p + 1) - positions.row(p) * 2.0 + positions.row(p - 1))
                / (dt * dt);
            acceleration.set_row(p, &row);
        }
        if n > 2 {
            let first = acceleration.row(1).into_owned();
            let last = acceleration.row(n - 2).into_owned();
            acceleration.set_row(0, &first);
            acceleration.set_row(n - 1, &last);
        }

        self.tables.insert(
            (TrajectoryComponent::Joint, DerivativeType::Velocity),
            velocity,
        );
        self.tables.insert(
            (TrajectoryComponent::Joint, DerivativeType::Acceleration),
            acceleration,
        );
        Ok(())
    }
}

impl TrajectoryView for FullTrajectory {
    fn rows(
        &self,
        component: TrajectoryComponent,
        derivative: DerivativeType,
    ) -> Option<&DMatrix<f64>> {
        self.tables.get(&(component, derivative))
    }

    fn discretization(&self) -> f64 {
        self.discretization
    }

    fn num_points(&self) -> usize {
        self.num_points
    }
}
