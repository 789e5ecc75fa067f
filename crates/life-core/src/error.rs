//! Error types for the engine.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Invalid grid size: {rows}x{cols} (both dimensions must be positive)")]
    InvalidSize { rows: usize, cols: usize },

    #[error("Cell ({row}, {col}) is out of bounds for a {rows}x{cols} grid")]
    OutOfBounds {
        row: usize,
        col: usize,
        rows: usize,
        cols: usize,
    },

    #[error("Invalid seeding density: {0} (expected a value in [0, 1])")]
    InvalidDensity(f64),

    #[error("Invalid pattern: {0}")]
    InvalidPattern(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Config(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = Error::InvalidSize { rows: 0, cols: 5 };
        assert_eq!(
            err.to_string(),
            "Invalid grid size: 0x5 (both dimensions must be positive)"
        );

        let err = Error::OutOfBounds {
            row: 4,
            col: 1,
            rows: 4,
            cols: 4,
        };
        assert_eq!(err.to_string(), "Cell (4, 1) is out of bounds for a 4x4 grid");
    }

    #[test]
    fn test_json_error_maps_to_config() {
        let err: Error = serde_json::from_str::<u32>("not json").unwrap_err().into();
        assert!(matches!(err, Error::Config(_)));
    }
}
