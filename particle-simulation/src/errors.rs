#[non_exhaustive]
#[derive(Debug)]
pub enum Error {
    /// Got an invalid parameter value in a function
    InvalidParameter(String),
    /// A position does not have the same number of dimensions as the system
    /// it is used with
    DimensionMismatch {
        /// dimensionality of the system
        expected: usize,
        /// dimensionality of the offending position
        got: usize,
        /// where the mismatch was found
        context: String,
    },
    /// The requested operation is not available
    NotImplemented(String),
    /// Error while serializing/deserializing data
    Json(serde_json::Error),
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::InvalidParameter(e) => write!(f, "invalid parameter: {}", e),
            Error::DimensionMismatch { expected, got, context } => write!(f,
                "dimension mismatch in {}: expected {} dimensions, got {}",
                context, expected, got
            ),
            Error::NotImplemented(e) => write!(f, "not implemented: {}", e),
            Error::Json(e) => write!(f, "json error: {}", e),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::InvalidParameter(_) |
            Error::DimensionMismatch { .. } |
            Error::NotImplemented(_) => None,
            Error::Json(e) => Some(e),
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(error: serde_json::Error) -> Error {
        Error::Json(error)
    }
}
