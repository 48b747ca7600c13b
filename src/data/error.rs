use std::path::PathBuf;

// ---------------------------------------------------------------------------
// Error taxonomy of the data pipeline
// ---------------------------------------------------------------------------

/// Malformed or missing input data. The load cannot proceed.
///
/// Row numbers are 1-based and count data rows only (the header is row 0).
#[derive(Debug, thiserror::Error)]
pub enum InputError {
    #[error("cannot open {}: {source}", .path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("required column '{column}' is missing from the header")]
    MissingColumn { column: &'static str },

    #[error("row {row}, column '{column}': '{value}' is not a valid {expected}")]
    InvalidValue {
        row: usize,
        column: &'static str,
        value: String,
        expected: &'static str,
    },
}

/// A value that has no defined categorical or bucket mapping.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum DataError {
    #[error("row {row}, column '{column}': unknown code '{value}' (expected 0 or 1)")]
    UnknownCode {
        row: usize,
        column: &'static str,
        value: String,
    },

    #[error("row {row}, column '{column}': '{value}' is already a label, expected a 0/1 code")]
    AlreadyLabelled {
        row: usize,
        column: &'static str,
        value: String,
    },

    #[error("row {row}: age {age} falls outside every age band (1-99)")]
    AgeOutOfRange { row: usize, age: f64 },
}

/// Anything that can go wrong between a CSV file and a normalized dataset.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error(transparent)]
    Input(#[from] InputError),

    #[error(transparent)]
    Data(#[from] DataError),
}
