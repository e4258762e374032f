use std::{error::Error, fmt, io};

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use model::ModelErr;
use serde_json::json;

/// Startup failures of the server process.
#[derive(Debug)]
pub enum ServerErr {
    Io(io::Error),
    Model(ModelErr),
    InvalidConfig {
        key: &'static str,
        value: String,
        reason: String,
    },
}

impl fmt::Display for ServerErr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ServerErr::Io(e) => write!(f, "io error: {e}"),
            ServerErr::Model(e) => write!(f, "model error: {e}"),
            ServerErr::InvalidConfig { key, value, reason } => {
                write!(f, "invalid {key}={value:?}: {reason}")
            }
        }
    }
}

impl Error for ServerErr {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            ServerErr::Io(e) => Some(e),
            ServerErr::Model(e) => Some(e),
            ServerErr::InvalidConfig { .. } => None,
        }
    }
}

impl From<io::Error> for ServerErr {
    fn from(value: io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<ModelErr> for ServerErr {
    fn from(value: ModelErr) -> Self {
        Self::Model(value)
    }
}

/// A failed request, answered as `500` with the error message.
#[derive(Debug)]
pub struct ApiErr(ModelErr);

impl From<ModelErr> for ApiErr {
    fn from(value: ModelErr) -> Self {
        Self(value)
    }
}

impl IntoResponse for ApiErr {
    fn into_response(self) -> Response {
        let body = Json(json!({ "error": self.0.to_string() }));
        (StatusCode::INTERNAL_SERVER_ERROR, body).into_response()
    }
}
