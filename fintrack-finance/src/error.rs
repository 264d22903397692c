use thiserror::Error;

#[derive(Debug, Error)]
pub enum FinanceError {
    #[error("transaction #{index} is selected but has no category")]
    MissingCategory { index: usize },

    #[error("no transactions selected")]
    NothingSelected,

    #[error("monthly repetition of {original_id}; act on the original entry or cancel the recurrence")]
    VirtualOccurrence { original_id: String },

    #[error("entry not found: {id}")]
    NotFound { id: String },

    #[error("{0} is not a recurring expense")]
    NotRecurring(String),

    #[error("recurrence of {id} already ended on {end}")]
    AlreadyCancelled { id: String, end: chrono::NaiveDate },

    #[error("report period offset {offset} is out of range")]
    PeriodOutOfRange { offset: i32 },

    #[error(transparent)]
    Store(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, FinanceError>;
