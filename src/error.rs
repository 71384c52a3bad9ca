use thiserror::Error;

#[derive(Error, Debug)]
pub enum ValuationError {
    #[error("Could not detect a header row within the first {scanned_rows} rows of the statement table")]
    HeaderNotFound { scanned_rows: usize },

    #[error("Statement table contains no rows")]
    EmptyTable,

    #[error("Statement table has no recognizable period columns")]
    NoPeriodColumns,

    #[error("Invalid DCF assumptions: discount rate ({discount_rate}) must exceed growth rate ({growth_rate})")]
    InvalidAssumptions {
        discount_rate: f64,
        growth_rate: f64,
    },

    #[error("Invalid forecast horizon {0}: must be at least 1 year")]
    InvalidForecastYears(u32),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, ValuationError>;
