use super::context::WaypointContext;
use super::error::CostError;
use super::term::CostEvaluation;
use crate::core::models::dynamics::ROOT_DOF;
use crate::core::models::trajectory::{DerivativeType, TrajectoryComponent};

/// Squared excursion of each actuated joint beyond `threshold` radians from zero, summed.
/// The floating-root coordinates are not penalized.
pub fn evaluate(context: &WaypointContext<'_>, threshold: f64) -> Result<CostEvaluation, CostError> {
    let positions = context.row(TrajectoryComponent::Joint, DerivativeType::Position)?;
    let cost = positions
        .iter()
        .skip(ROOT_DOF)
        .map(|q| (q.abs() - threshold).max(0.0).powi(2))
        .sum();
    Ok(CostEvaluation::soft(cost))
}
