use core_model::BuildError;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StateError {
    #[error("unknown region `{0}`")]
    UnknownRegion(String),
    #[error("unknown group `{0}`")]
    UnknownGroup(String),
    #[error("no region has focus")]
    NoFocus,
    #[error(transparent)]
    Build(#[from] BuildError),
}
