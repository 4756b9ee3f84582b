use super::context::WaypointContext;
use super::error::CostError;
use super::term::CostEvaluation;
use crate::core::models::trajectory::{DerivativeType, TrajectoryComponent};

/// Mean squared joint acceleration over all DOFs. The joint acceleration table is required.
pub fn evaluate(context: &WaypointContext<'_>) -> Result<CostEvaluation, CostError> {
    let accelerations = context.row(TrajectoryComponent::Joint, DerivativeType::Acceleration)?;
    if accelerations.is_empty() {
        return Ok(CostEvaluation::default());
    }
    let cost = accelerations.norm_squared() / accelerations.len() as f64;
    Ok(CostEvaluation::soft(cost))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::test_support::{DOF, Fixture};

    #[test]
    fn zero_acceleration_costs_nothing() {
        let fixture = Fixture::new(4);
        let evaluation = evaluate(&fixture.context(2)).unwrap();
        assert_eq!(evaluation, CostEvaluation::soft(0.0));
    }

    #[test]
    fn cost_is_mean_of_squared_accelerations() {
        let mut fixture = Fixture::new(4);
        let mut row = [0.0; DOF];
        row[0] = 3.0;
        row[DOF - 1] = -4.0;
        fixture.set_joint_row(DerivativeType::Acceleration, 1, &row);

        let evaluation = evaluate(&fixture.context(1)).unwrap();
        assert!((evaluation.cost - 25.0 / DOF as f64).abs() < 1e-12);
        assert!(evaluation.feasible);
        assert_eq!(evaluate(&fixture.context(0)).unwrap().cost, 0.0);
    }

    #[test]
    fn missing_acceleration_is_a_contract_violation() {
        let mut fixture = Fixture::new(4);
        fixture.trajectory = crate::core::models::trajectory::FullTrajectory::new(4, 0.1).unwrap();
        let result = evaluate(&fixture.context(0));
        assert!(matches!(
            result,
            Err(CostError::MissingComponent {
                derivative: DerivativeType::Acceleration,
                ..
            })
        ));
    }
}
