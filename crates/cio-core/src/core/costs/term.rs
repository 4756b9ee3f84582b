use super::context::WaypointContext;
use super::error::CostError;
use super::goal_pose::GoalTarget;
use super::regulation::RegulationParams;
use super::{
    contact_invariant, effort, friction_cone, goal_pose, joint_deviation, obstacle, regulation,
    smoothness, transmission,
};
use crate::core::models::robot_state::RobotState;
use serde::Deserialize;
use std::f64::consts::FRAC_PI_4;

/// Unweighted cost of one term at one waypoint plus its hard-constraint signal.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CostEvaluation {
    pub cost: f64,
    pub feasible: bool,
}

impl CostEvaluation {
    pub fn new(cost: f64, feasible: bool) -> Self {
        Self { cost, feasible }
    }

    /// A soft cost that never signals infeasibility.
    pub fn soft(cost: f64) -> Self {
        Self::new(cost, true)
    }
}

impl Default for CostEvaluation {
    fn default() -> Self {
        Self::soft(0.0)
    }
}

fn default_joint_threshold() -> f64 {
    0.2
}

fn default_self_collision_scale() -> f64 {
    0.1
}

fn default_velocity_weight() -> f64 {
    10.0
}

fn default_half_angle() -> f64 {
    FRAC_PI_4
}

fn default_min_force() -> f64 {
    1e-7
}

fn default_ftr_clamp() -> f64 {
    10.0
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CostKind {
    Smoothness,
    JointDeviation {
        #[serde(default = "default_joint_threshold")]
        threshold: f64,
    },
    Obstacle {
        #[serde(default = "default_self_collision_scale")]
        self_collision_scale: f64,
    },
    ContactInvariant {
        #[serde(default = "default_velocity_weight")]
        velocity_weight: f64,
    },
    PhysicsViolation,
    Torque,
    FrictionCone {
        #[serde(default = "default_half_angle")]
        half_angle: f64,
        #[serde(default = "default_min_force")]
        min_force: f64,
    },
    ForceTransmissionRatio {
        #[serde(default = "default_ftr_clamp")]
        clamp: f64,
    },
    ContactForceRegulation(RegulationParams),
    GoalPose {
        targets: Vec<GoalTarget>,
    },
}

impl CostKind {
    pub fn joint_deviation() -> Self {
        CostKind::JointDeviation {
            threshold: default_joint_threshold(),
        }
    }

    pub fn obstacle() -> Self {
        CostKind::Obstacle {
            self_collision_scale: default_self_collision_scale(),
        }
    }

    pub fn contact_invariant() -> Self {
        CostKind::ContactInvariant {
            velocity_weight: default_velocity_weight(),
        }
    }

    pub fn friction_cone() -> Self {
        CostKind::FrictionCone {
            half_angle: default_half_angle(),
            min_force: default_min_force(),
        }
    }

    pub fn force_transmission_ratio() -> Self {
        CostKind::ForceTransmissionRatio {
            clamp: default_ftr_clamp(),
        }
    }

    pub fn canonical_name(&self) -> &'static str {
        match self {
            CostKind::Smoothness => "smoothness",
            CostKind::JointDeviation { .. } => "joint_deviation",
            CostKind::Obstacle { .. } => "obstacle",
            CostKind::ContactInvariant { .. } => "contact_invariant",
            CostKind::PhysicsViolation => "physics_violation",
            CostKind::Torque => "torque",
            CostKind::FrictionCone { .. } => "friction_cone",
            CostKind::ForceTransmissionRatio { .. } => "force_transmission_ratio",
            CostKind::ContactForceRegulation(_) => "contact_force_regulation",
            CostKind::GoalPose { .. } => "goal_pose",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CostTerm {
    index: usize,
    name: String,
    weight: f64,
    kind: CostKind,
}

impl CostTerm {
    pub fn new(index: usize, name: &str, weight: f64, kind: CostKind) -> Self {
        Self {
            index,
            name: name.to_string(),
            weight,
            kind,
        }
    }

    #[inline]
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn weight(&self) -> f64 {
        self.weight
    }

    pub(crate) fn set_weight(&mut self, weight: f64) {
        self.weight = weight;
    }

    pub fn kind(&self) -> &CostKind {
        &self.kind
    }

    #[inline]
    pub fn is_enabled(&self) -> bool {
        self.weight > 0.0
    }

    /// Unweighted cost of this term at the context's waypoint. Only the obstacle term writes
    /// to `scratch`.
    pub fn evaluate(
        &self,
        context: &WaypointContext<'_>,
        scratch: &mut RobotState,
    ) -> Result<CostEvaluation, CostError> {
        match &self.kind {
            CostKind::Smoothness => smoothness::evaluate(context),
            CostKind::JointDeviation { threshold } => {
                joint_deviation::evaluate(context, *threshold)
            }
            CostKind::Obstacle {
                self_collision_scale,
            } => obstacle::evaluate(context, scratch, *self_collision_scale),
            CostKind::ContactInvariant { velocity_weight } => {
                contact_invariant::evaluate(context, *velocity_weight)
            }
            CostKind::PhysicsViolation => effort::evaluate_physics_violation(context),
            CostKind::Torque => effort::evaluate_torque(context),
            CostKind::FrictionCone {
                half_angle,
                min_force,
            } => friction_cone::evaluate(context, *half_angle, *min_force),
            CostKind::ForceTransmissionRatio { clamp } => {
                transmission::evaluate(context, *clamp)
            }
            CostKind::ContactForceRegulation(params) => regulation::evaluate(context, params),
            CostKind::GoalPose { targets } => goal_pose::evaluate(context, targets),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::test_support::{DOF, Fixture};
    use crate::core::models::trajectory::DerivativeType;

    #[derive(Deserialize)]
    struct Wrapper {
        terms: Vec<CostKind>,
    }

    #[test]
    fn deserializes_unit_and_parameterized_kinds_with_defaults() {
        let parsed: Wrapper = toml::from_str(
            r#"
            [[terms]]
            kind = "smoothness"

            [[terms]]
            kind = "friction_cone"

            [[terms]]
            kind = "obstacle"
            self_collision_scale = 0.5
            "#,
        )
        .unwrap();

        assert_eq!(parsed.terms[0], CostKind::Smoothness);
        assert_eq!(parsed.terms[1], CostKind::friction_cone());
        assert_eq!(
            parsed.terms[2],
            CostKind::Obstacle {
                self_collision_scale: 0.5
            }
        );
    }

    #[test]
    fn canonical_names_are_snake_case_tags() {
        assert_eq!(CostKind::Smoothness.canonical_name(), "smoothness");
        assert_eq!(
            CostKind::force_transmission_ratio().canonical_name(),
            "force_transmission_ratio"
        );
        assert_eq!(
            CostKind::ContactForceRegulation(RegulationParams::feet()).canonical_name(),
            "contact_force_regulation"
        );
    }

    #[test]
    fn is_enabled_requires_positive_weight() {
        assert!(CostTerm::new(0, "smoothness", 1.0, CostKind::Smoothness).is_enabled());
        assert!(!CostTerm::new(0, "smoothness", 0.0, CostKind::Smoothness).is_enabled());
    }

    #[test]
    fn evaluate_dispatches_on_kind() {
        let mut fixture = Fixture::new(3);
        fixture.set_joint_row(DerivativeType::Acceleration, 1, &[2.0; DOF]);
        let mut scratch = RobotState::new(DOF);

        let term = CostTerm::new(0, "smoothness", 3.0, CostKind::Smoothness);
        let evaluation = term.evaluate(&fixture.context(1), &mut scratch).unwrap();

        assert_eq!(evaluation, CostEvaluation::soft(4.0));
    }

    #[test]
    fn evaluate_is_idempotent() {
        let mut fixture = Fixture::new(3);
        fixture.set_joint_row(DerivativeType::Acceleration, 0, &[0.3; DOF]);
        let mut scratch = RobotState::new(DOF);
        let kinds = [
            CostKind::Smoothness,
            CostKind::joint_deviation(),
            CostKind::contact_invariant(),
            CostKind::PhysicsViolation,
            CostKind::Torque,
            CostKind::friction_cone(),
        ];

        for kind in kinds {
            let term = CostTerm::new(0, kind.canonical_name(), 1.0, kind);
            let first = term.evaluate(&fixture.context(0), &mut scratch).unwrap();
            let second = term.evaluate(&fixture.context(0), &mut scratch).unwrap();
            assert_eq!(first.cost.to_bits(), second.cost.to_bits());
            assert_eq!(first.feasible, second.feasible);
        }
    }
}
