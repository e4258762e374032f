use std::{error::Error, fmt};

use model::ModelErr;

/// The client module's result type.
pub type Result<T> = std::result::Result<T, ClientErr>;

/// Verification run failures. Any of them aborts the run.
#[derive(Debug)]
pub enum ClientErr {
    Http(reqwest::Error),
    Model(ModelErr),
    RowCountMismatch { got: usize, expected: usize },
}

impl fmt::Display for ClientErr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClientErr::Http(e) => write!(f, "http error: {e}"),
            ClientErr::Model(e) => write!(f, "model error: {e}"),
            ClientErr::RowCountMismatch { got, expected } => write!(
                f,
                "expected output has {got} rows but the reference dataset has {expected}"
            ),
        }
    }
}

impl Error for ClientErr {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            ClientErr::Http(e) => Some(e),
            ClientErr::Model(e) => Some(e),
            ClientErr::RowCountMismatch { .. } => None,
        }
    }
}

impl From<reqwest::Error> for ClientErr {
    fn from(value: reqwest::Error) -> Self {
        Self::Http(value)
    }
}

impl From<ModelErr> for ClientErr {
    fn from(value: ModelErr) -> Self {
        Self::Model(value)
    }
}
