use std::fmt;

/// Result type for logspan-types operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur in the schema layer
#[derive(Debug)]
pub enum Error {
    /// Value is neither an absolute timestamp nor a valid relative expression
    InvalidExpression(String),

    /// Unknown IANA time zone identifier
    InvalidZone(String),

    /// Fiscal-year start month outside 0..=11
    InvalidFiscalStart(u32),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::InvalidExpression(value) => write!(f, "Invalid time expression: {}", value),
            Error::InvalidZone(zone) => write!(f, "Unknown time zone: {}", zone),
            Error::InvalidFiscalStart(month) => {
                write!(f, "Fiscal year start month must be 0-11, got {}", month)
            }
        }
    }
}

impl std::error::Error for Error {}
