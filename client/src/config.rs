use std::{env, path::PathBuf};

const DEFAULT_SERVER_URL: &str = "http://localhost:8000";
const DEFAULT_EXPECTED_PATH: &str = "../correct_output.bin";

/// Which server to verify and against what.
#[derive(Debug, Clone, PartialEq)]
pub struct ClientConfig {
    pub server_url: String,
    pub expected_path: PathBuf,
}

impl ClientConfig {
    /// Reads `SERVER_URL` and `EXPECTED_PATH`, falling back to the defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        Self {
            server_url: lookup("SERVER_URL").unwrap_or_else(|| DEFAULT_SERVER_URL.to_string()),
            expected_path: lookup("EXPECTED_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_EXPECTED_PATH)),
        }
    }
}
