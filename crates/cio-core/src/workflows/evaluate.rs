use crate::core::models::dynamics::DynamicsOracle;
use crate::core::models::trajectory::TrajectoryView;
use crate::engine::aggregator::{CostAggregator, TrajectoryCostReport};
use crate::engine::config::CostConfig;
use crate::engine::context::Collaborators;
use crate::engine::error::EngineError;
use crate::engine::revision::TrajectoryRevision;
use tracing::{info, instrument};

/// Scores `trajectory` with every term of `config`.
///
/// Dynamics snapshots and contact variables are computed once for the whole pass. The first
/// contract violation aborts the pass.
#[instrument(skip_all, name = "evaluate_trajectory_workflow")]
pub fn evaluate_trajectory(
    config: &CostConfig,
    trajectory: &dyn TrajectoryView,
    dynamics: &dyn DynamicsOracle,
    collaborators: &Collaborators<'_>,
) -> Result<TrajectoryCostReport, EngineError> {
    let aggregator = CostAggregator::from_config(config)?;
    let contact_points = config.contact_point_descriptors();
    info!(
        waypoints = trajectory.num_points(),
        terms = aggregator.terms().len(),
        contacts = contact_points.len(),
        "Preparing trajectory revision."
    );

    let revision = TrajectoryRevision::prepare(
        trajectory,
        &contact_points,
        dynamics,
        collaborators.ground,
        &config.activation,
    )?;

    aggregator.evaluate(&revision, collaborators)
}
