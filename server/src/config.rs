use std::{env, path::PathBuf};

use crate::ServerErr;

const DEFAULT_HOST: &str = "127.0.0.1";
const DEFAULT_PORT: u16 = 8000;
const DEFAULT_MODEL_PATH: &str = "../model.bin";

/// Where to listen and what to serve.
#[derive(Debug, Clone, PartialEq)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub model_path: PathBuf,
}

impl ServerConfig {
    /// Reads `HOST`, `PORT` and `MODEL_PATH`, falling back to the defaults.
    pub fn from_env() -> Result<Self, ServerErr> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Same as `from_env` but reading variables through `lookup`.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ServerErr>
    where
        F: Fn(&str) -> Option<String>,
    {
        let host = lookup("HOST").unwrap_or_else(|| DEFAULT_HOST.to_string());

        let port = match lookup("PORT") {
            Some(value) => value.parse::<u16>().map_err(|e| ServerErr::InvalidConfig {
                key: "PORT",
                reason: format!("{e}"),
                value,
            })?,
            None => DEFAULT_PORT,
        };

        let model_path = lookup("MODEL_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_MODEL_PATH));

        Ok(Self {
            host,
            port,
            model_path,
        })
    }

    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup_in(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = ServerConfig::from_lookup(lookup_in(&[])).unwrap();

        assert_eq!(config.addr(), "127.0.0.1:8000");
        assert_eq!(config.model_path, PathBuf::from("../model.bin"));
    }

    #[test]
    fn test_overrides() {
        let vars = [("HOST", "0.0.0.0"), ("PORT", "9000"), ("MODEL_PATH", "/srv/pca.bin")];
        let config = ServerConfig::from_lookup(lookup_in(&vars)).unwrap();

        assert_eq!(config.addr(), "0.0.0.0:9000");
        assert_eq!(config.model_path, PathBuf::from("/srv/pca.bin"));
    }

    #[test]
    fn test_invalid_port() {
        let err = ServerConfig::from_lookup(lookup_in(&[("PORT", "eighty")])).unwrap_err();
        assert!(matches!(err, ServerErr::InvalidConfig { key: "PORT", .. }));
    }
}
