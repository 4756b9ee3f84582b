use super::context::WaypointContext;
use super::error::CostError;
use super::term::CostEvaluation;
use crate::core::utils::geometry::exponential_map;

/// Deviation of every contact body from its projected support pose, weighted by how strongly
/// the contact is activated.
///
/// Per contact: `variable * (|dp|^2 + |dr|^2 + velocity_weight * |v|^2)` where `dp`/`dr` are the
/// position and exponential-map orientation differences to the projected pose and `v` is the
/// body's spatial velocity. When no raw variable is positive, the product of all raw variables
/// is added so that at least one contact is pushed towards support.
pub fn evaluate(
    context: &WaypointContext<'_>,
    velocity_weight: f64,
) -> Result<CostEvaluation, CostError> {
    if context.contacts.is_empty() {
        return Ok(CostEvaluation::default());
    }

    let mut cost = 0.0;
    let mut has_positive = false;
    let mut raw_product = 1.0;

    for (point, contact) in context.contact_pairs() {
        let body = context.body(&point.body)?;

        let position_diff = body.position() - contact.projected_position();
        let orientation_diff =
            exponential_map(&body.transform.rotation) - contact.projected_orientation();
        let pose_cost = position_diff.norm_squared() + orientation_diff.norm_squared();
        let velocity_cost = velocity_weight * body.spatial_velocity.norm_squared();

        cost += contact.variable() * (pose_cost + velocity_cost);

        has_positive |= contact.raw_variable() > 0.0;
        raw_product *= contact.raw_variable();
    }

    if !has_positive {
        cost += raw_product;
    }
    Ok(CostEvaluation::soft(cost))
}
