use thiserror::Error;

/// Errors raised while building a league or evaluating ratings.
///
/// Undefined win percentages and unplayed opponents are not errors; they are
/// resolved inside the tie-break cascade.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SeasonError {
    #[error("Invalid side type: {0}")]
    InvalidSide(String),

    #[error("Invalid site type: {0}")]
    InvalidSite(String),

    #[error("Unknown team: {0}")]
    UnknownTeam(String),

    #[error("Duplicate team: {0}")]
    DuplicateTeam(String),

    #[error("Unknown conference: {0}")]
    UnknownConference(String),

    #[error("Unknown division {division} in conference {conference}")]
    UnknownDivision { conference: String, division: String },

    #[error("Invalid date: {0}")]
    InvalidDate(String),

    #[error("Team {0} cannot play itself")]
    SelfMatchup(String),

    #[error("Baseline has {got} records, league has {expected} teams")]
    BaselineMismatch { expected: usize, got: usize },
}

pub type Result<T> = std::result::Result<T, SeasonError>;

#[cfg(feature = "python")]
impl From<SeasonError> for pyo3::PyErr {
    fn from(err: SeasonError) -> Self {
        pyo3::exceptions::PyValueError::new_err(err.to_string())
    }
}
