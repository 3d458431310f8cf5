use lz_core::LzError;
use thiserror::Error;

/// Failures of the driver itself.  Safety violations are not errors: they
/// come back as [`SimOutcome::Aborted`][crate::SimOutcome::Aborted].
#[derive(Debug, Error)]
pub enum SimError {
    #[error(transparent)]
    Config(#[from] LzError),

    #[error("failed to spawn {unit} thread: {source}")]
    Spawn {
        unit:   String,
        #[source]
        source: std::io::Error,
    },

    #[error("{unit} thread panicked")]
    UnitPanicked { unit: String },
}

pub type SimResult<T> = Result<T, SimError>;
