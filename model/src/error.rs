use std::{error::Error, fmt, io};

/// The result type used in the entire model module.
pub type Result<T> = std::result::Result<T, ModelErr>;

/// The model module's error type.
#[derive(Debug)]
pub enum ModelErr {
    Io(io::Error),
    BadMagic {
        got: [u8; 4],
        expected: [u8; 4],
    },
    Truncated {
        got: usize,
        expected: usize,
    },
    TrailingBytes {
        extra: usize,
    },
    SizeMismatch {
        a: &'static str,
        b: &'static str,
        got: usize,
        expected: usize,
    },
    NonPositiveVariance {
        component: usize,
        value: f64,
    },
    MissingModel(String),
    NotATransform(String),
}

impl fmt::Display for ModelErr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ModelErr::Io(e) => write!(f, "io error: {e}"),
            ModelErr::BadMagic { got, expected } => write!(
                f,
                "bad magic bytes: got {}, expected {}",
                got.escape_ascii(),
                expected.escape_ascii()
            ),
            ModelErr::Truncated { got, expected } => {
                write!(f, "truncated payload: got {got} bytes, expected {expected}")
            }
            ModelErr::TrailingBytes { extra } => {
                write!(f, "payload has {extra} unexpected trailing bytes")
            }
            ModelErr::SizeMismatch {
                a,
                b,
                got,
                expected,
            } => write!(
                f,
                "size mismatch between {a} and {b}: got {got}, expected {expected}"
            ),
            ModelErr::NonPositiveVariance { component, value } => write!(
                f,
                "cannot whiten component {component}, its explained variance is {value}"
            ),
            ModelErr::MissingModel(key) => write!(f, "no model registered under `{key}`"),
            ModelErr::NotATransform(key) => {
                write!(f, "model `{key}` is not a matrix transform")
            }
        }
    }
}

impl Error for ModelErr {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            ModelErr::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<io::Error> for ModelErr {
    fn from(value: io::Error) -> Self {
        Self::Io(value)
    }
}
