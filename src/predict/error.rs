use thiserror::Error;

#[derive(Debug, Error)]
pub enum PredictError {
    #[error("invalid orbital elements: {0}")]
    InvalidElements(String),
    #[error("propagation error: {0}")]
    Propagation(String),
}
