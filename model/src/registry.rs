use std::{collections::HashMap, fmt, path::Path};

use log::info;

use crate::{codec, ModelErr, Pca, Result};

/// Registry key of the fitted PCA served by `/predict`.
pub const PCA_KEY: &str = "pca";

/// Registry key of the placeholder scalar model.
pub const ANSWER_KEY: &str = "answer_to_everything";

/// The placeholder scalar model, registered but never routed to.
pub fn answer_to_everything(x: f64) -> f64 {
    x * 42.0
}

/// Something the registry can hold.
pub enum Predictor {
    Transform(Pca),
    Scalar(fn(f64) -> f64),
}

impl fmt::Debug for Predictor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Predictor::Transform(pca) => write!(
                f,
                "Transform({} -> {})",
                pca.n_features(),
                pca.n_components()
            ),
            Predictor::Scalar(_) => write!(f, "Scalar"),
        }
    }
}

/// Process wide mapping from a key to a loaded predictor.
///
/// Filled once before serving and only read afterwards, so it needs no locking.
/// Dropping it releases every model it holds.
#[derive(Debug, Default)]
pub struct ModelRegistry {
    models: HashMap<String, Predictor>,
}

impl ModelRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads the PCA model at `path` and registers it together with the placeholder.
    ///
    /// # Errors
    /// Any failure to read or decode the model file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let pca = codec::read_pca(path)?;
        info!(
            n_features = pca.n_features(), n_components = pca.n_components();
            "loaded model from {}", path.display()
        );

        let mut registry = Self::new();
        registry.insert(ANSWER_KEY, Predictor::Scalar(answer_to_everything));
        registry.insert(PCA_KEY, Predictor::Transform(pca));
        Ok(registry)
    }

    /// Registers `predictor` under `key`, replacing whatever was there.
    pub fn insert<K: Into<String>>(&mut self, key: K, predictor: Predictor) {
        self.models.insert(key.into(), predictor);
    }

    pub fn get(&self, key: &str) -> Option<&Predictor> {
        self.models.get(key)
    }

    /// Looks up a matrix transform.
    ///
    /// # Errors
    /// `MissingModel` when nothing is registered under `key`, `NotATransform` when
    /// the entry is a scalar function.
    pub fn transform(&self, key: &str) -> Result<&Pca> {
        match self.models.get(key) {
            Some(Predictor::Transform(pca)) => Ok(pca),
            Some(Predictor::Scalar(_)) => Err(ModelErr::NotATransform(key.to_string())),
            None => Err(ModelErr::MissingModel(key.to_string())),
        }
    }

    pub fn len(&self) -> usize {
        self.models.len()
    }

    pub fn is_empty(&self) -> bool {
        self.models.is_empty()
    }

    /// Releases every registered model.
    pub fn clear(&mut self) {
        if !self.models.is_empty() {
            info!("releasing {} model(s)", self.models.len());
        }

        self.models.clear();
    }
}

impl Drop for ModelRegistry {
    fn drop(&mut self) {
        self.clear();
    }
}
