use super::context::WaypointContext;
use super::error::CostError;
use super::term::CostEvaluation;
use crate::core::models::ids::BodyRef;
use crate::core::utils::geometry::exponential_map;
use nalgebra::Vector3;
use serde::Deserialize;

/// Desired terminal pose of one body. Orientation error is only penalized when an
/// exponential-map goal orientation is given.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(from = "GoalTargetConfig")]
pub struct GoalTarget {
    pub body: BodyRef,
    pub position: Vector3<f64>,
    pub orientation: Option<Vector3<f64>>,
}

#[derive(Deserialize)]
struct GoalTargetConfig {
    body: BodyRef,
    position: [f64; 3],
    #[serde(default)]
    orientation: Option<[f64; 3]>,
}

impl From<GoalTargetConfig> for GoalTarget {
    fn from(config: GoalTargetConfig) -> Self {
        Self {
            body: config.body,
            position: Vector3::from(config.position),
            orientation: config.orientation.map(Vector3::from),
        }
    }
}

impl GoalTarget {
    pub fn new(body: impl Into<BodyRef>, position: Vector3<f64>) -> Self {
        Self {
            body: body.into(),
            position,
            orientation: None,
        }
    }

    pub fn with_orientation(mut self, orientation: Vector3<f64>) -> Self {
        self.orientation = Some(orientation);
        self
    }

    /// Both feet two meters ahead with the pelvis above them; only the left foot's orientation
    /// is tracked.
    pub fn reference_targets() -> Vec<Self> {
        vec![
            Self::new("left_foot_endeffector_link", Vector3::new(-0.1, 2.0, 0.0))
                .with_orientation(Vector3::zeros()),
            Self::new("right_foot_endeffector_link", Vector3::new(0.1, 2.0, 0.0)),
            Self::new(6usize, Vector3::new(0.0, 2.0, 1.12)),
        ]
    }
}

/// Squared terminal pose error summed over `targets`. Zero before the final waypoint.
pub fn evaluate(
    context: &WaypointContext<'_>,
    targets: &[GoalTarget],
) -> Result<CostEvaluation, CostError> {
    if !context.is_final_waypoint() {
        return Ok(CostEvaluation::default());
    }

    let cost = targets.iter().try_fold(0.0, |acc, target| {
        let body = context.body(&target.body)?;
        let mut error = (body.position() - target.position).norm_squared();
        if let Some(orientation) = &target.orientation {
            error += (exponential_map(&body.transform.rotation) - orientation).norm_squared();
        }
        Ok::<f64, CostError>(acc + error)
    })?;
    Ok(CostEvaluation::soft(cost))
}
