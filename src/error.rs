use std::{error, fmt};

/// Provides an enumeration of all possible errors reported by this crate.
#[derive(Debug)]
pub enum Error {
    ParameterError(String),
}

impl error::Error for Error {}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ParameterError(str) => write!(f, "Invalid parameter: {str}"),
        }
    }
}
