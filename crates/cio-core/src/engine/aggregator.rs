use super::config::{ConfigError, CostConfig};
use super::context::Collaborators;
use super::error::EngineError;
use super::revision::TrajectoryRevision;
use crate::core::costs::CostError;
use crate::core::costs::context::WaypointContext;
use crate::core::costs::term::{CostEvaluation, CostTerm};
use crate::core::models::robot_state::RobotState;
use crate::core::models::trajectory::{DerivativeType, TrajectoryComponent};
use tracing::{debug, info, instrument, trace, warn};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Per-term evaluations at one waypoint, in term order, with their weighted sum.
#[derive(Debug, Clone, PartialEq)]
pub struct WaypointCost {
    pub terms: Vec<CostEvaluation>,
    pub total: f64,
    pub feasible: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TrajectoryCostReport {
    pub waypoints: Vec<WaypointCost>,
    pub total: f64,
    pub feasible: bool,
    /// Weighted cost of each term summed over all waypoints, in term order.
    pub term_totals: Vec<f64>,
}

impl TrajectoryCostReport {
    fn from_waypoints(waypoints: Vec<WaypointCost>, weights: &[f64]) -> Self {
        let mut term_totals = vec![0.0; weights.len()];
        let mut total = 0.0;
        let mut feasible = true;
        for waypoint in &waypoints {
            for ((sum, weight), evaluation) in
                term_totals.iter_mut().zip(weights).zip(&waypoint.terms)
            {
                *sum += weight * evaluation.cost;
            }
            total += waypoint.total;
            feasible &= waypoint.feasible;
        }
        Self {
            waypoints,
            total,
            feasible,
            term_totals,
        }
    }
}

/// Weighted combination of a fixed set of cost terms.
#[derive(Debug, Clone, PartialEq)]
pub struct CostAggregator {
    terms: Vec<CostTerm>,
}

impl CostAggregator {
    pub fn new(terms: Vec<CostTerm>) -> Self {
        for term in terms.iter().filter(|term| !term.is_enabled()) {
            warn!(term = term.name(), "Cost term has zero weight and will be skipped.");
        }
        Self { terms }
    }

    pub fn from_config(config: &CostConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::new(config.cost_terms()))
    }

    pub fn terms(&self) -> &[CostTerm] {
        &self.terms
    }

    pub fn term(&self, name: &str) -> Option<&CostTerm> {
        self.terms.iter().find(|term| term.name() == name)
    }

    /// Reweights a term between evaluation passes.
    pub fn set_weight(&mut self, name: &str, weight: f64) -> Result<(), ConfigError> {
        if weight < 0.0 {
            return Err(ConfigError::NegativeWeight {
                name: name.to_string(),
                weight,
            });
        }
        let term = self
            .terms
            .iter_mut()
            .find(|term| term.name() == name)
            .ok_or_else(|| ConfigError::UnknownTerm(name.to_string()))?;
        term.set_weight(weight);
        Ok(())
    }

    /// Evaluates every enabled term at the context's waypoint. Disabled terms report a zero,
    /// feasible evaluation without running.
    pub fn evaluate_waypoint(
        &self,
        context: &WaypointContext<'_>,
        scratch: &mut RobotState,
    ) -> Result<WaypointCost, CostError> {
        let mut terms = Vec::with_capacity(self.terms.len());
        let mut total = 0.0;
        let mut feasible = true;

        for term in &self.terms {
            if !term.is_enabled() {
                terms.push(CostEvaluation::default());
                continue;
            }
            let evaluation = term.evaluate(context, scratch)?;
            trace!(
                waypoint = context.waypoint,
                term = term.name(),
                cost = evaluation.cost,
                feasible = evaluation.feasible,
                "Cost term evaluated."
            );
            total += term.weight() * evaluation.cost;
            feasible &= evaluation.feasible;
            terms.push(evaluation);
        }

        Ok(WaypointCost {
            terms,
            total,
            feasible,
        })
    }

    /// Evaluates every waypoint of the revision. Waypoints run in parallel with one scratch
    /// robot state per worker; the reduction is sequential in waypoint order.
    #[instrument(skip_all, name = "trajectory_cost_task")]
    pub fn evaluate(
        &self,
        revision: &TrajectoryRevision<'_>,
        collaborators: &Collaborators<'_>,
    ) -> Result<TrajectoryCostReport, EngineError> {
        let num_points = revision.num_points();
        info!(
            waypoints = num_points,
            terms = self.terms.len(),
            "Starting trajectory cost evaluation."
        );
        if revision.contact_points().is_empty() {
            warn!("No contact points configured. Contact terms will contribute nothing.");
        }

        let dof = revision
            .trajectory()
            .rows(TrajectoryComponent::Joint, DerivativeType::Position)
            .map_or(0, |table| table.ncols());

        let evaluate_at = |scratch: &mut RobotState,
                           waypoint: usize|
         -> Result<WaypointCost, EngineError> {
            let context = revision.context(waypoint, collaborators)?;
            let cost = self.evaluate_waypoint(&context, scratch)?;
            debug!(
                waypoint,
                total = cost.total,
                feasible = cost.feasible,
                "Waypoint evaluated."
            );
            Ok(cost)
        };

        #[cfg(not(feature = "parallel"))]
        let results: Vec<Result<WaypointCost, EngineError>> = {
            let mut scratch = RobotState::new(dof);
            (0..num_points)
                .map(|waypoint| evaluate_at(&mut scratch, waypoint))
                .collect()
        };

        #[cfg(feature = "parallel")]
        let results: Vec<Result<WaypointCost, EngineError>> = (0..num_points)
            .into_par_iter()
            .map_init(|| RobotState::new(dof), |scratch, waypoint| evaluate_at(scratch, waypoint))
            .collect();

        let waypoints = results.into_iter().collect::<Result<Vec<_>, _>>()?;
        let weights: Vec<f64> = self.terms.iter().map(CostTerm::weight).collect();
        let report = TrajectoryCostReport::from_waypoints(waypoints, &weights);

        info!(
            total = report.total,
            feasible = report.feasible,
            "Trajectory cost evaluation finished."
        );
        Ok(report)
    }
}
