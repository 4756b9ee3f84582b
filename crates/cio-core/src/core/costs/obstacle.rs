use super::context::WaypointContext;
use super::error::CostError;
use super::term::CostEvaluation;
use crate::core::models::robot_state::RobotState;
use crate::core::models::trajectory::{DerivativeType, TrajectoryComponent};
use tracing::trace;

/// Sum of penetration depths at the waypoint's joint configuration. Self-collision depths are
/// scaled by `self_collision_scale`. The waypoint is feasible only when nothing penetrates.
///
/// Writes the joint positions into `scratch`, which must not be shared with a concurrent
/// evaluation.
pub fn evaluate(
    context: &WaypointContext<'_>,
    scratch: &mut RobotState,
    self_collision_scale: f64,
) -> Result<CostEvaluation, CostError> {
    let oracle = context
        .collision
        .ok_or(CostError::MissingCollaborator("collision oracle"))?;
    let positions = context.row(TrajectoryComponent::Joint, DerivativeType::Position)?;
    if positions.len() != scratch.dof() {
        return Err(CostError::DofMismatch {
            expected: scratch.dof(),
            found: positions.len(),
        });
    }
    scratch.set_positions(positions.iter());

    let contacts = oracle.check(scratch);
    let cost: f64 = contacts
        .iter()
        .map(|contact| {
            if contact.is_self_collision() {
                self_collision_scale * contact.depth
            } else {
                contact.depth
            }
        })
        .sum();

    if !contacts.is_empty() {
        trace!(
            waypoint = context.waypoint,
            contacts = contacts.len(),
            cost,
            "Collision contacts found."
        );
    }
    Ok(CostEvaluation::new(cost, cost == 0.0))
}
