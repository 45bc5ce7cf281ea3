use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LocationError {
    #[error("Coordinate is not a valid non-negative integer: '{0}'")]
    InvalidCoordinate(String),

    #[error("A composite location needs at least one part")]
    EmptyComposite,
}
