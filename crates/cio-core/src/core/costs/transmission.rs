use super::context::WaypointContext;
use super::error::CostError;
use super::term::CostEvaluation;
use crate::core::models::trajectory::{DerivativeType, TrajectoryComponent};
use nalgebra::Vector3;
use tracing::trace;

/// Penalizes contact force magnitudes beyond what the contact's kinematic chain can transmit
/// along the force direction.
///
/// The transmission ratio `1 / sqrt(d^T J J^T d)` is projected onto the inward contact normal,
/// clamped to `[-clamp, clamp]` and remapped to `[0, 1]`. Each contact with a nonzero force
/// contributes `max(0, |F| - ratio)`.
pub fn evaluate(context: &WaypointContext<'_>, clamp: f64) -> Result<CostEvaluation, CostError> {
    let chains = context
        .kinematics
        .ok_or(CostError::MissingCollaborator("kinematic chains"))?;
    let joint_positions: Vec<f64> = context
        .row(TrajectoryComponent::Joint, DerivativeType::Position)?
        .iter()
        .copied()
        .collect();

    let mut cost = 0.0;
    for (point, contact) in context.contact_pairs() {
        let force = contact.total_force();
        if force == Vector3::zeros() {
            continue;
        }
        let magnitude = force.norm();
        let direction = force / magnitude;

        let jacobian = chains
            .jacobian(&point.chain, &joint_positions)
            .ok_or_else(|| CostError::UnknownChain(point.chain.clone()))?;
        if jacobian.ncols() != joint_positions.len() {
            return Err(CostError::DofMismatch {
                expected: joint_positions.len(),
                found: jacobian.ncols(),
            });
        }

        let manipulability = (jacobian.transpose() * direction).norm_squared();
        if manipulability <= 0.0 {
            trace!(
                waypoint = context.waypoint,
                contact = point.index,
                "Singular force direction, skipping."
            );
            continue;
        }

        let ratio = manipulability.sqrt().recip() * -direction.dot(&contact.contact_normal());
        let ratio = (ratio.clamp(-clamp, clamp) + clamp) / (2.0 * clamp);
        cost += (magnitude - ratio).max(0.0);
    }
    Ok(CostEvaluation::soft(cost))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::test_support::{DOF, Fixture, UniformJacobian, contact, no_forces};
    use nalgebra::Matrix3xX;

    fn jacobian(scale: f64) -> Matrix3xX<f64> {
        let mut jacobian = Matrix3xX::zeros(DOF);
        jacobian[(0, 6)] = scale;
        jacobian[(1, 7)] = scale;
        jacobian[(2, 8)] = scale;
        jacobian
    }

    fn fixture_with_force(force: Vector3<f64>) -> Fixture {
        let mut fixture = Fixture::new(3);
        let mut forces = no_forces();
        forces[0] = force;
        fixture.contacts[0] = contact(1.0, Vector3::zeros(), forces);
        fixture
    }

    fn cost(fixture: &Fixture, chains: &UniformJacobian) -> Result<CostEvaluation, CostError> {
        let context = fixture.context(0).with_kinematics(Some(chains));
        evaluate(&context, 10.0)
    }

    #[test]
    fn zero_forces_cost_nothing() {
        let fixture = Fixture::new(3);
        let chains = UniformJacobian(jacobian(1.0));
        assert_eq!(cost(&fixture, &chains).unwrap(), CostEvaluation::soft(0.0));
    }

    #[test]
    fn force_against_normal_uses_full_ratio() {
        // Pushing into the ground: ratio = 1/0.5 = 2, remapped to 0.6.
        let fixture = fixture_with_force(Vector3::new(0.0, 0.0, -3.0));
        let chains = UniformJacobian(jacobian(0.5));
        let evaluation = cost(&fixture, &chains).unwrap();
        assert!((evaluation.cost - (3.0 - 0.6)).abs() < 1e-12);
        assert!(evaluation.feasible);
    }

    #[test]
    fn force_pulling_away_from_surface_uses_remapped_negative_ratio() {
        // Pulling off the ground: ratio = -2, remapped to 0.4.
        let fixture = fixture_with_force(Vector3::new(0.0, 0.0, 3.0));
        let chains = UniformJacobian(jacobian(0.5));
        let evaluation = cost(&fixture, &chains).unwrap();
        assert!((evaluation.cost - (3.0 - 0.4)).abs() < 1e-12);
    }

    #[test]
    fn ratio_is_clamped() {
        let fixture = fixture_with_force(Vector3::new(0.0, 0.0, -3.0));
        let chains = UniformJacobian(jacobian(0.01));
        let evaluation = cost(&fixture, &chains).unwrap();
        assert!((evaluation.cost - 2.0).abs() < 1e-12);
    }

    #[test]
    fn small_forces_within_ratio_cost_nothing() {
        let fixture = fixture_with_force(Vector3::new(0.0, 0.0, -0.5));
        let chains = UniformJacobian(jacobian(0.5));
        assert_eq!(cost(&fixture, &chains).unwrap().cost, 0.0);
    }

    #[test]
    fn singular_direction_is_skipped() {
        let fixture = fixture_with_force(Vector3::new(0.0, 0.0, -3.0));
        let chains = UniformJacobian(Matrix3xX::zeros(DOF));
        assert_eq!(cost(&fixture, &chains).unwrap().cost, 0.0);
    }

    #[test]
    fn returns_error_for_unknown_chain() {
        let mut fixture = fixture_with_force(Vector3::new(0.0, 0.0, -3.0));
        fixture.contact_points[0].chain = "unknown".to_string();
        let chains = UniformJacobian(jacobian(1.0));
        assert_eq!(
            cost(&fixture, &chains),
            Err(CostError::UnknownChain("unknown".to_string()))
        );
    }

    #[test]
    fn returns_error_without_kinematic_chains() {
        let fixture = fixture_with_force(Vector3::new(0.0, 0.0, -3.0));
        assert_eq!(
            evaluate(&fixture.context(0), 10.0),
            Err(CostError::MissingCollaborator("kinematic chains"))
        );
    }
}
