use thiserror::Error;

/// Validation failures raised while building regions from a declarative
/// description.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BuildError {
    #[error("region name is missing")]
    MissingName,
    #[error("invalid colour value {0:?}")]
    InvalidColour(String),
    #[error("unknown style {0:?}")]
    UnknownStyle(String),
    #[error("invalid geometry for {name}: {reason}")]
    InvalidGeometry { name: String, reason: String },
}
