use super::ids::BodyRef;
use super::trajectory::{DerivativeType, TrajectoryComponent, TrajectoryView};
use crate::core::utils::geometry::{surface_normal, surface_orientation};
use crate::core::world::ground::GroundProjector;
use nalgebra::{Point3, Vector3};
use serde::Deserialize;
use thiserror::Error;

/// Number of corners of the rectangular contact patch of an end-effector.
pub const NUM_ENDEFFECTOR_CONTACT_POINTS: usize = 4;

/// Reference (x, y) corner offsets of a foot patch, in the end-effector's local frame.
pub const PATCH_CORNER_OFFSETS: [[f64; 2]; NUM_ENDEFFECTOR_CONTACT_POINTS] =
    [[-0.05, -0.05], [0.05, -0.05], [0.05, 0.2], [-0.05, 0.2]];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContactClass {
    Foot,
    Hand,
}

/// Static description of one contact slot of the planning group.
#[derive(Debug, Clone, PartialEq)]
pub struct ContactPointDescriptor {
    pub index: usize,
    pub body: BodyRef,
    /// Kinematic chain ending at the end-effector carrying this contact.
    pub chain: String,
    pub class: ContactClass,
    /// Offset of this slot from the projected contact position, in the support-surface frame.
    pub offset: Vector3<f64>,
    /// Slot whose contact-position channels `(x, y, raw)` this slot reads. The corners of a
    /// patch all read the channels of its first corner.
    pub patch_base: usize,
}

impl ContactPointDescriptor {
    pub fn new(index: usize, body: impl Into<BodyRef>, chain: &str, class: ContactClass) -> Self {
        Self {
            index,
            body: body.into(),
            chain: chain.to_string(),
            class,
            offset: Vector3::zeros(),
            patch_base: index,
        }
    }

    pub fn with_offset(mut self, offset: Vector3<f64>) -> Self {
        self.offset = offset;
        self
    }

    pub fn with_patch_base(mut self, patch_base: usize) -> Self {
        self.patch_base = patch_base;
        self
    }

    /// One slot per patch corner, numbered from `first_index`, each offset by the reference
    /// corner offsets and reading the contact-position channels of slot `first_index`.
    pub fn patch(
        first_index: usize,
        bodies: [BodyRef; NUM_ENDEFFECTOR_CONTACT_POINTS],
        chain: &str,
        class: ContactClass,
    ) -> Vec<Self> {
        bodies
            .into_iter()
            .zip(PATCH_CORNER_OFFSETS)
            .enumerate()
            .map(|(corner, (body, [x, y]))| {
                Self::new(first_index + corner, body, chain, class)
                    .with_offset(Vector3::new(x, y, 0.0))
                    .with_patch_base(first_index)
            })
            .collect()
    }
}

/// Smoothed activation `0.5 * tanh(k1 * raw - k2) + 0.5`, mapping the unconstrained raw
/// variable into `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct ContactActivation {
    pub k1: f64,
    pub k2: f64,
}

impl Default for ContactActivation {
    fn default() -> Self {
        Self { k1: 4.0, k2: 2.0 }
    }
}

impl ContactActivation {
    #[inline]
    pub fn apply(&self, raw: f64) -> f64 {
        0.5 * (self.k1 * raw - self.k2).tanh() + 0.5
    }
}

#[derive(Debug, Error, PartialEq)]
pub enum ContactError {
    #[error("Waypoint {waypoint} is out of range for a trajectory of {num_points} points")]
    WaypointOutOfRange { waypoint: usize, num_points: usize },
    #[error("The trajectory has no {component} {derivative} table")]
    MissingComponent {
        component: TrajectoryComponent,
        derivative: DerivativeType,
    },
    #[error("The {component} table has {found} columns but {expected} are needed for the configured contact points")]
    ContactCountMismatch {
        component: TrajectoryComponent,
        expected: usize,
        found: usize,
    },
    #[error("Contact slot {slot} reads the channels of slot {patch_base}, but only {count} slots are configured")]
    PatchBaseOutOfRange {
        slot: usize,
        patch_base: usize,
        count: usize,
    },
}

/// Activation and target pose of one contact point at one waypoint.
#[derive(Debug, Clone, PartialEq)]
pub struct ContactVariable {
    raw_variable: f64,
    variable: f64,
    projected_position: Vector3<f64>,
    projected_orientation: Vector3<f64>,
    point_forces: [Vector3<f64>; NUM_ENDEFFECTOR_CONTACT_POINTS],
}

impl ContactVariable {
    pub fn new(
        raw_variable: f64,
        activation: &ContactActivation,
        projected_position: Vector3<f64>,
        projected_orientation: Vector3<f64>,
        point_forces: [Vector3<f64>; NUM_ENDEFFECTOR_CONTACT_POINTS],
    ) -> Self {
        Self {
            raw_variable,
            variable: activation.apply(raw_variable),
            projected_position,
            projected_orientation,
            point_forces,
        }
    }

    #[inline]
    pub fn raw_variable(&self) -> f64 {
        self.raw_variable
    }

    #[inline]
    pub fn variable(&self) -> f64 {
        self.variable
    }

    pub fn projected_position(&self) -> &Vector3<f64> {
        &self.projected_position
    }

    /// Exponential-map orientation of the support surface under the contact.
    pub fn projected_orientation(&self) -> &Vector3<f64> {
        &self.projected_orientation
    }

    pub fn contact_normal(&self) -> Vector3<f64> {
        surface_normal(&self.projected_orientation)
    }

    pub fn point_forces(&self) -> &[Vector3<f64>; NUM_ENDEFFECTOR_CONTACT_POINTS] {
        &self.point_forces
    }

    #[inline]
    pub fn point_force(&self, corner: usize) -> Option<&Vector3<f64>> {
        self.point_forces.get(corner)
    }

    pub fn total_force(&self) -> Vector3<f64> {
        self.point_forces.iter().sum()
    }

    /// Derives the contact variables of every contact point at `waypoint`.
    ///
    /// Each slot reads the channels `(x, y, raw)` of its patch base in the contact-position row,
    /// so the corners of a patch share one raw variable. The point is projected onto the support
    /// surface; the slot offset is added in x/y while z stays at the surface height.
    pub fn evaluate_all(
        trajectory: &dyn TrajectoryView,
        waypoint: usize,
        contact_points: &[ContactPointDescriptor],
        ground: &dyn GroundProjector,
        activation: &ContactActivation,
    ) -> Result<Vec<Self>, ContactError> {
        if waypoint >= trajectory.num_points() {
            return Err(ContactError::WaypointOutOfRange {
                waypoint,
                num_points: trajectory.num_points(),
            });
        }
        if contact_points.is_empty() {
            return Ok(Vec::new());
        }

        let positions = required_table(
            trajectory,
            TrajectoryComponent::ContactPosition,
            3 * contact_points.len(),
        )?;
        let forces = required_table(
            trajectory,
            TrajectoryComponent::ContactForce,
            3 * NUM_ENDEFFECTOR_CONTACT_POINTS * contact_points.len(),
        )?;

        if let Some((slot, descriptor)) = contact_points
            .iter()
            .enumerate()
            .find(|(_, descriptor)| descriptor.patch_base >= contact_points.len())
        {
            return Err(ContactError::PatchBaseOutOfRange {
                slot,
                patch_base: descriptor.patch_base,
                count: contact_points.len(),
            });
        }

        let variables = contact_points
            .iter()
            .enumerate()
            .map(|(i, descriptor)| {
                let channel = 3 * descriptor.patch_base;
                let x = positions[(waypoint, channel)];
                let y = positions[(waypoint, channel + 1)];
                let raw = positions[(waypoint, channel + 2)];

                let (surface_point, normal) = ground.nearest(&Point3::new(x, y, raw));
                let projected_position = Vector3::new(
                    surface_point.x + descriptor.offset.x,
                    surface_point.y + descriptor.offset.y,
                    surface_point.z,
                );

                let base = 3 * NUM_ENDEFFECTOR_CONTACT_POINTS * i;
                let point_forces = std::array::from_fn(|corner| {
                    let column = base + 3 * corner;
                    Vector3::new(
                        forces[(waypoint, column)],
                        forces[(waypoint, column + 1)],
                        forces[(waypoint, column + 2)],
                    )
                });

                Self::new(
                    raw,
                    activation,
                    projected_position,
                    surface_orientation(&normal),
                    point_forces,
                )
            })
            .collect();
        Ok(variables)
    }
}

fn required_table<'a>(
    trajectory: &'a dyn TrajectoryView,
    component: TrajectoryComponent,
    expected_columns: usize,
) -> Result<&'a nalgebra::DMatrix<f64>, ContactError> {
    let table = trajectory
        .rows(component, DerivativeType::Position)
        .ok_or(ContactError::MissingComponent {
            component,
            derivative: DerivativeType::Position,
        })?;
    if table.ncols() != expected_columns {
        return Err(ContactError::ContactCountMismatch {
            component,
            expected: expected_columns,
            found: table.ncols(),
        });
    }
    Ok(table)
}
