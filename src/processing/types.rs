use thiserror::Error;

/// Processed FIT output returned to the web handler.
#[derive(Debug, Clone)]
pub struct ProcessedFit {
    /// Re-encoded FIT payload with derived speed and distance fields.
    pub processed_bytes: Vec<u8>,
    /// Totals that were written into the lap and session summaries.
    pub totals: DerivedTotals,
}

/// Aggregates produced by the distance integration pass.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct DerivedTotals {
    /// Cumulative distance in meters after the last record.
    pub total_distance: f64,
    /// Highest per-record speed in m/s.
    pub max_speed: f64,
    pub record_count: usize,
}

/// Failures that abort a processing run. Nothing is emitted once one of these
/// is returned.
#[derive(Debug, Error)]
pub enum FitProcessError {
    /// The buffer does not carry a FIT header.
    #[error("not a FIT file: {0}")]
    Format(String),
    /// The FIT header is present but sizes or CRCs do not check out.
    #[error("corrupted FIT file: {0}")]
    Integrity(String),
    /// A summary field needed to derive averages is zero or missing.
    #[error("missing activity data: {0}")]
    Data(String),
    #[error("failed to process FIT file: {0}")]
    Unexpected(String),
}

impl FitProcessError {
    /// Text shown to the person who uploaded the file.
    pub fn user_message(&self) -> &'static str {
        match self {
            FitProcessError::Format(_) => "The file is not a valid FIT file.",
            FitProcessError::Integrity(_) => "The FIT file is corrupted.",
            FitProcessError::Data(_) => {
                "The FIT file is missing data required to compute summaries."
            }
            FitProcessError::Unexpected(_) => "An unexpected error occurred. Please try again.",
        }
    }

    pub(crate) fn malformed(detail: impl Into<String>) -> Self {
        FitProcessError::Unexpected(detail.into())
    }
}
