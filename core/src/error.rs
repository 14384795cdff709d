use thiserror::Error;

#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum GameError {
    #[error("Invalid coordinates")]
    InvalidCoords,
    #[error("Composition does not fit on the board")]
    InvalidComposition,
    #[error("Board shape does not match declared size")]
    InvalidBoardShape,
    #[error("Score storage is unavailable")]
    PersistenceUnavailable,
    #[error("Persisted score record is malformed")]
    MalformedPersistedState,
}

pub type Result<T> = core::result::Result<T, GameError>;
