use super::context::WaypointContext;
use super::error::CostError;
use super::term::CostEvaluation;

/// Penalizes corner forces pointing outside the friction cone around the contact normal.
///
/// Each corner force above `min_force` contributes `variable * excess^2 * |f|^2`, where
/// `excess` is the angle between force and normal beyond `half_angle`.
pub fn evaluate(
    context: &WaypointContext<'_>,
    half_angle: f64,
    min_force: f64,
) -> Result<CostEvaluation, CostError> {
    let mut cost = 0.0;
    for contact in context.contacts {
        let normal = contact.contact_normal();
        for force in contact.point_forces() {
            let magnitude = force.norm();
            if magnitude <= min_force {
                continue;
            }
            let cosine = (normal.dot(force) / magnitude).clamp(-1.0, 1.0);
            let excess = (cosine.acos().abs() - half_angle).max(0.0);
            cost += contact.variable() * excess * excess * magnitude * magnitude;
        }
    }
    Ok(CostEvaluation::soft(cost))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::test_support::{Fixture, contact, no_forces};
    use nalgebra::Vector3;
    use std::f64::consts::FRAC_PI_4;

    fn cost_for_corner_force(raw: f64, force: Vector3<f64>) -> f64 {
        let mut fixture = Fixture::new(3);
        let mut forces = no_forces();
        forces[1] = force;
        fixture.contacts[0] = contact(raw, Vector3::zeros(), forces);
        evaluate(&fixture.context(0), FRAC_PI_4, 1e-7).unwrap().cost
    }

    #[test]
    fn force_along_normal_costs_nothing() {
        assert_eq!(cost_for_corner_force(1.0, Vector3::new(0.0, 0.0, 1.0)), 0.0);
    }

    #[test]
    fn force_along_normal_costs_nothing_at_any_activation() {
        for raw in [-2.0, 0.0, 0.3, 1.0] {
            assert_eq!(cost_for_corner_force(raw, Vector3::new(0.0, 0.0, 1.0)), 0.0);
        }
    }

    #[test]
    fn force_on_cone_boundary_costs_nothing() {
        assert!(cost_for_corner_force(1.0, Vector3::new(1.0, 0.0, 1.0)).abs() < 1e-12);
    }

    #[test]
    fn tangential_force_costs_excess_angle_squared() {
        let raw = 0.8;
        let variable = contact(raw, Vector3::zeros(), no_forces()).variable();

        let cost = cost_for_corner_force(raw, Vector3::new(1.0, 0.0, 0.0));
        assert!((cost - variable * FRAC_PI_4 * FRAC_PI_4).abs() < 1e-12);
    }

    #[test]
    fn negligible_forces_are_skipped() {
        assert_eq!(cost_for_corner_force(1.0, Vector3::new(1e-8, 0.0, 0.0)), 0.0);
    }

    #[test]
    fn cost_scales_with_force_magnitude_squared() {
        let unit = cost_for_corner_force(1.0, Vector3::new(0.0, 1.0, 0.0));
        let doubled = cost_for_corner_force(1.0, Vector3::new(0.0, 2.0, 0.0));
        assert!((doubled - 4.0 * unit).abs() < 1e-12);
    }
}
