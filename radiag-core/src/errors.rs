use thiserror::Error;

/// Error type for invalid diagnostic inputs.
///
/// Every variant describes a defect in what the caller supplied. Nothing is
/// recovered or substituted internally; the error is returned as soon as it is
/// detected.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RadiagError {
    #[error("Shape mismatch in {context}. Expected {expected:?}, got {found:?}")]
    ShapeMismatch {
        context: String,
        expected: Vec<usize>,
        found: Vec<usize>,
    },
    #[error("Invalid latitude weights: {0}")]
    InvalidWeights(String),
    #[error("Required flux field '{0}' is missing")]
    MissingField(String),
    #[error("Invalid coordinates: {0}")]
    InvalidCoordinates(String),
    #[error("Unknown flux name '{0}'. Expected a key such as 'swut' or 'lwds_cs'")]
    UnknownFluxName(String),
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),
}

impl RadiagError {
    /// Build a [`RadiagError::ShapeMismatch`] from borrowed shapes
    pub fn shape_mismatch(context: &str, expected: &[usize], found: &[usize]) -> Self {
        RadiagError::ShapeMismatch {
            context: context.to_string(),
            expected: expected.to_vec(),
            found: found.to_vec(),
        }
    }
}

/// Convenience type for `Result<T, RadiagError>`.
pub type RadiagResult<T> = Result<T, RadiagError>;
