//! Error types for Stowage.

use thiserror::Error;

/// Result type alias for Stowage operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur before or during a packing call.
///
/// Infeasible items are never reported through this type; they simply
/// stay unpacked. Errors are raised only for malformed input.
#[derive(Debug, Error)]
pub enum Error {
    /// An item record is malformed.
    #[error("Invalid item: {0}")]
    InvalidItem(String),

    /// A container record is malformed.
    #[error("Invalid container: {0}")]
    InvalidContainer(String),

    /// A contour face or polyhedron is malformed.
    #[error("Invalid contour: {0}")]
    InvalidContour(String),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    ConfigError(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::InvalidItem("'A' has zero length".into());
        assert_eq!(format!("{err}"), "Invalid item: 'A' has zero length");

        let err = Error::InvalidContour("face 2 has 2 points".into());
        assert!(format!("{err}").contains("face 2"));
    }
}
