use thiserror::Error;
use uuid::Uuid;

/// Everything bracket generation can reject or fail with. Configuration
/// errors are raised before any computation; persistence failures roll the
/// whole attempt back.
#[derive(Debug, Error)]
pub enum BracketError {
    #[error("unknown seeding mode `{0}`")]
    InvalidSeedingMode(String),

    #[error("no checked-in participants")]
    EmptyParticipantList,

    #[error("at least {required} participants required, got {actual}")]
    InsufficientParticipants { required: usize, actual: usize },

    #[error("doubles draw requires an even number of participants, got {0}")]
    UnevenDoublesField(usize),

    #[error("tournament {id} is {actual}, endpoint expects {expected}")]
    TournamentTypeMismatch {
        id: Uuid,
        actual: &'static str,
        expected: &'static str,
    },

    #[error("bracket already generated for tournament {0}")]
    RoundsAlreadyExist(Uuid),

    #[error("invalid group configuration: {0}")]
    InvalidGroupConfig(String),

    #[error("tournament {0} not found")]
    TournamentNotFound(Uuid),

    #[error("not allowed to manage this tournament")]
    AccessDenied,

    #[error("bracket invariant violated: {0}")]
    Invariant(String),

    #[error("persisting bracket failed")]
    Persistence(#[from] sqlx::Error),
}

impl BracketError {
    /// Configuration and idempotency rejections the caller can correct;
    /// everything else is a server-side failure.
    pub fn is_rejection(&self) -> bool {
        !matches!(
            self,
            BracketError::Persistence(_) | BracketError::Invariant(_)
        )
    }
}
