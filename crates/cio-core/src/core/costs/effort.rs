use super::context::WaypointContext;
use super::error::CostError;
use super::term::CostEvaluation;
use crate::core::models::dynamics::ROOT_DOF;
use crate::core::models::trajectory::{DerivativeType, TrajectoryComponent};
use std::ops::Range;

/// Mean squared normalized torque on the six unactuated root DOFs. Nonzero values mean the
/// contact forces do not explain the root motion.
pub fn evaluate_physics_violation(
    context: &WaypointContext<'_>,
) -> Result<CostEvaluation, CostError> {
    mean_squared_torque(context, |_| 0..ROOT_DOF)
}

/// Mean squared normalized torque on the actuated DOFs.
pub fn evaluate_torque(context: &WaypointContext<'_>) -> Result<CostEvaluation, CostError> {
    mean_squared_torque(context, |dof| ROOT_DOF..dof)
}

fn mean_squared_torque(
    context: &WaypointContext<'_>,
    dofs: impl FnOnce(usize) -> Range<usize>,
) -> Result<CostEvaluation, CostError> {
    let torques = context.dynamics.joint_torques();
    let dof = torques.len();
    if dof <= ROOT_DOF {
        return Err(CostError::InsufficientDof(dof));
    }
    if let Some(table) = context
        .trajectory
        .rows(TrajectoryComponent::Joint, DerivativeType::Position)
    {
        if table.ncols() != dof {
            return Err(CostError::DofMismatch {
                expected: table.ncols(),
                found: dof,
            });
        }
    }

    let total_mass = context.dynamics.total_mass();
    if total_mass <= 0.0 {
        return Err(CostError::NonPositiveMass(total_mass));
    }
    let normalizer = context.trajectory.discretization() / total_mass;

    let range = dofs(dof);
    let count = range.len() as f64;
    let sum: f64 = torques.as_slice()[range]
        .iter()
        .map(|torque| (torque * normalizer).powi(2))
        .sum();

    Ok(CostEvaluation::soft(sum / count))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::dynamics::DynamicsSnapshot;
    use crate::core::test_support::{DOF, DT, Fixture, TOTAL_MASS};
    use nalgebra::DVector;

    fn fixture_with_torques(torques: &[f64]) -> Fixture {
        let mut fixture = Fixture::new(3);
        fixture.snapshot = fixture
            .snapshot
            .clone()
            .with_joint_torques(DVector::from_column_slice(torques));
        fixture
    }

    fn torques(root: f64, actuated: f64) -> Vec<f64> {
        (0..DOF)
            .map(|i| if i < ROOT_DOF { root } else { actuated })
            .collect()
    }

    #[test]
    fn zero_torques_cost_nothing() {
        let fixture = fixture_with_torques(&torques(0.0, 0.0));
        let context = fixture.context(0);
        assert_eq!(
            evaluate_physics_violation(&context).unwrap(),
            CostEvaluation::soft(0.0)
        );
        assert_eq!(evaluate_torque(&context).unwrap(), CostEvaluation::soft(0.0));
    }

    #[test]
    fn physics_violation_averages_root_torques() {
        let fixture = fixture_with_torques(&torques(100.0, 7.0));
        let normalized = 100.0 * DT / TOTAL_MASS;
        let cost = evaluate_physics_violation(&fixture.context(0)).unwrap().cost;
        assert!((cost - normalized * normalized).abs() < 1e-12);
    }

    #[test]
    fn torque_averages_actuated_torques_only() {
        let mut values = torques(1000.0, 0.0);
        values[ROOT_DOF] = 40.0;
        let fixture = fixture_with_torques(&values);
        let normalized = 40.0 * DT / TOTAL_MASS;
        let expected = normalized * normalized / (DOF - ROOT_DOF) as f64;
        let cost = evaluate_torque(&fixture.context(0)).unwrap().cost;
        assert!((cost - expected).abs() < 1e-12);
    }

    #[test]
    fn scaling_root_torques_scales_cost_quadratically() {
        let base = fixture_with_torques(&[3.0, -1.0, 2.0, 0.5, 4.0, -2.5, 9.0, 9.0, 9.0, 9.0]);
        let scaled =
            fixture_with_torques(&[9.0, -3.0, 6.0, 1.5, 12.0, -7.5, 9.0, 9.0, 9.0, 9.0]);
        let base_cost = evaluate_physics_violation(&base.context(0)).unwrap().cost;
        let scaled_cost = evaluate_physics_violation(&scaled.context(0)).unwrap().cost;
        assert!((scaled_cost - 9.0 * base_cost).abs() < 1e-12 * scaled_cost.max(1.0));
    }

    #[test]
    fn returns_error_for_root_only_model() {
        let mut fixture = Fixture::new(3);
        fixture.snapshot = fixture.snapshot.clone().with_joint_torques(DVector::zeros(6));
        let result = evaluate_torque(&fixture.context(0));
        assert_eq!(result, Err(CostError::InsufficientDof(6)));
    }

    #[test]
    fn returns_error_for_torque_dof_mismatch() {
        let fixture = fixture_with_torques(&[0.0; 8]);
        let result = evaluate_physics_violation(&fixture.context(0));
        assert_eq!(
            result,
            Err(CostError::DofMismatch {
                expected: DOF,
                found: 8
            })
        );
    }

    #[test]
    fn returns_error_for_massless_model() {
        let mut fixture = Fixture::new(3);
        fixture.snapshot = DynamicsSnapshot::new(Vec::new(), DVector::zeros(DOF));
        let result = evaluate_torque(&fixture.context(0));
        assert_eq!(result, Err(CostError::NonPositiveMass(0.0)));
    }
}
