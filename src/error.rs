//! Error type shared by the board, the stores and the list managers.

/// Everything an operation can decline or fail with.
///
/// Input variants are user-facing notices: the operation that returned them
/// has not touched any stored state.
#[derive(Debug, thiserror::Error)]
pub enum BoardError {
    #[error("text cannot be empty")]
    EmptyText,

    #[error("select at least one day of the week for daily tasks")]
    NoWeekdays,

    #[error("'{0}' is not a day of the week (use 0-6 or sun..sat)")]
    InvalidWeekday(String),

    #[error("weekly tasks take a single day, got '{0}'")]
    SingleWeekday(String),

    #[error("enter at least one date for monthly tasks")]
    NoMonthlyDates,

    #[error("enter valid dates (1-31)")]
    InvalidMonthlyDates,

    #[error("unknown frequency '{0}' (use daily, weekly or monthly)")]
    UnknownFrequency(String),

    #[error("invalid date '{0}', use YYYY-MM-DD")]
    InvalidDate(String),

    #[error("unknown chore '{0}'")]
    UnknownChore(String),

    #[error("'{0}' is not a household member (members: {1})")]
    UnknownMember(String, String),

    #[error("{person} does not have {feature}")]
    NotEnabled { person: String, feature: &'static str },

    #[error("{kind} {id} not found")]
    NotFound { kind: &'static str, id: u64 },

    #[error("config error: {0}")]
    Config(String),

    #[error("storage error: {0}")]
    Storage(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, BoardError>;
