use projection::ProjectionError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AdvisorError {
    #[error("Projection failed during a parameter sweep: {0}")]
    Projection(#[from] ProjectionError),
}
