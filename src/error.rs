use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
#[non_exhaustive]
pub enum MotionError {
    #[error("invalid covariance: {0}")]
    InvalidCovariance(String),
    #[error("insufficient data: need at least {required} samples, got {provided}")]
    InsufficientData { required: usize, provided: usize },
    #[error("invalid sensor parameters: {0}")]
    InvalidSensor(String),
}

pub type Result<T> = std::result::Result<T, MotionError>;
