use std::sync::Arc;

use axum::{Json, extract::State};
use log::{debug, warn};
use model::{ModelRegistry, registry::PCA_KEY};
use ndarray::{Array1, Axis};
use serde::{Deserialize, Serialize};

use crate::ApiErr;

/// Body of `GET /`.
#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct Greeting {
    pub message: String,
}

pub async fn index() -> Json<Greeting> {
    Json(Greeting {
        message: "Hello World".to_string(),
    })
}

/// Projects one sample with the registered PCA.
///
/// The sample width is not checked here, the transform rejects it.
pub async fn predict(
    State(registry): State<Arc<ModelRegistry>>,
    Json(sample): Json<Vec<f64>>,
) -> Result<Json<Vec<f64>>, ApiErr> {
    debug!(features = sample.len(); "predict request");

    let x = Array1::from(sample).insert_axis(Axis(0));
    let y = registry
        .transform(PCA_KEY)
        .and_then(|pca| pca.transform(x.view()))
        .inspect_err(|e| warn!("rejected prediction: {e}"))?;

    Ok(Json(y.row(0).to_vec()))
}
