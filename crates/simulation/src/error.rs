use core_types::CoreError;
use projection::ProjectionError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SimulationError {
    #[error("Invalid simulation settings: {0}")]
    Settings(#[from] CoreError),

    #[error("Baseline projection is invalid: {0}")]
    Projection(#[from] ProjectionError),

    #[error("Simulation was cancelled before completing")]
    Cancelled,

    #[error("All {skipped} trials were skipped; nothing to aggregate")]
    NoCompletedTrials { skipped: u32 },
}
