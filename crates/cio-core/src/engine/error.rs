use thiserror::Error;

use super::config::ConfigError;
use crate::core::costs::CostError;
use crate::core::models::contact::ContactError;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Invalid cost configuration: {source}")]
    Config {
        #[from]
        source: ConfigError,
    },

    #[error("Cost evaluation failed: {source}")]
    Cost {
        #[from]
        source: CostError,
    },

    #[error("Contact variable evaluation failed: {source}")]
    Contact {
        #[from]
        source: ContactError,
    },

    #[error("Dynamics oracle failed at waypoint {waypoint}: {message}")]
    Dynamics { waypoint: usize, message: String },

    #[error("The {table} table covers {found} waypoints but the trajectory has {expected}")]
    RevisionMismatch {
        table: &'static str,
        expected: usize,
        found: usize,
    },
}
