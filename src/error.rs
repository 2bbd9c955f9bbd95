use thiserror::Error;

/// Errors produced by the network, its matrix helpers and persistence.
#[derive(Debug, Error)]
pub enum Error {
    /// A caller-supplied vector (or flat weight array) has the wrong length.
    #[error("shape mismatch for {what}: expected length {expected}, got {actual}")]
    ShapeMismatch {
        what: &'static str,
        expected: usize,
        actual: usize,
    },

    /// Two matrices cannot be combined by `op`.
    #[error("cannot {op} a {}x{} matrix with a {}x{} matrix", .lhs.0, .lhs.1, .rhs.0, .rhs.1)]
    DimensionMismatch {
        op: &'static str,
        lhs: (usize, usize),
        rhs: (usize, usize),
    },

    /// A `rows x cols` matrix has more entries than fit in memory addressing.
    #[error("a {rows}x{cols} matrix is too large")]
    SizeOverflow {
        rows: usize,
        cols: usize,
    },

    #[error("training set is empty")]
    EmptyDataset,

    #[error("invalid network spec: {0}")]
    InvalidSpec(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

/// Checks that `actual` matches the configured length for `what`.
pub(crate) fn check_len(what: &'static str, expected: usize, actual: usize) -> Result<()> {
    if expected == actual {
        Ok(())
    } else {
        Err(Error::ShapeMismatch { what, expected, actual })
    }
}
