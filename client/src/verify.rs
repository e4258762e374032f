use std::fmt;

use log::{debug, info, warn};
use model::{Tolerance, allclose};
use ndarray::{Array2, ArrayView2};

use crate::{ClientErr, Result};

/// The verdict of a verification run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Pass,
    Fail,
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Pass => write!(f, "Tests pass!"),
            Outcome::Fail => write!(f, "Tests failed!"),
        }
    }
}

/// HTTP client for a prediction server.
pub struct PredictClient {
    http: reqwest::Client,
    predict_url: String,
}

impl PredictClient {
    /// Creates a new `PredictClient`.
    ///
    /// # Arguments
    /// * `server_url` - The server's base url, e.g. `http://localhost:8000`.
    pub fn new(server_url: &str) -> Self {
        Self {
            http: reqwest::Client::new(),
            predict_url: format!("{}/predict", server_url.trim_end_matches('/')),
        }
    }

    /// Sends one sample and waits for its projection.
    ///
    /// # Errors
    /// A transport failure, a non success status or a body that isn't a list of numbers.
    pub async fn predict(&self, sample: &[f64]) -> Result<Vec<f64>> {
        let response = self
            .http
            .post(&self.predict_url)
            .json(sample)
            .send()
            .await?
            .error_for_status()?;

        Ok(response.json().await?)
    }

    /// Predicts every row of `x`, one request at a time and in order.
    pub async fn predict_rows(&self, x: ArrayView2<'_, f64>) -> Result<Vec<Vec<f64>>> {
        let mut results = Vec::with_capacity(x.nrows());

        for (i, row) in x.rows().into_iter().enumerate() {
            let y = self.predict(&row.to_vec()).await?;
            debug!(row = i, width = y.len(); "received prediction");
            results.push(y);
        }

        Ok(results)
    }
}

/// Stacks equally long rows into a matrix, `None` if they're ragged.
pub fn stack(rows: Vec<Vec<f64>>) -> Option<Array2<f64>> {
    let cols = rows.first().map_or(0, Vec::len);
    if rows.iter().any(|row| row.len() != cols) {
        return None;
    }

    let n = rows.len();
    let flat = rows.into_iter().flatten().collect();
    Array2::from_shape_vec((n, cols), flat).ok()
}

/// Sends every reference row to the server and compares the answers with `expected`.
///
/// # Arguments
/// * `client` - The prediction client.
/// * `x` - The reference dataset, one sample per row.
/// * `expected` - The precomputed projections, one per reference row.
/// * `tol` - The comparison tolerances.
///
/// # Errors
/// `RowCountMismatch` before sending anything if `expected` and `x` disagree on the
/// number of rows, or the first failed request.
pub async fn verify(
    client: &PredictClient,
    x: ArrayView2<'_, f64>,
    expected: ArrayView2<'_, f64>,
    tol: Tolerance,
) -> Result<Outcome> {
    if expected.nrows() != x.nrows() {
        return Err(ClientErr::RowCountMismatch {
            got: expected.nrows(),
            expected: x.nrows(),
        });
    }

    let rows = client.predict_rows(x).await?;

    let Some(results) = stack(rows) else {
        warn!("server answered with predictions of different widths");
        return Ok(Outcome::Fail);
    };

    let outcome = if allclose(results.view(), expected, tol) {
        Outcome::Pass
    } else {
        warn!(
            got_cols = results.ncols(), expected_cols = expected.ncols();
            "predictions differ from the expected output"
        );
        Outcome::Fail
    };

    info!("verified {} samples: {outcome}", x.nrows());
    Ok(outcome)
}

#[cfg(test)]
mod tests {
    use ndarray::array;

    use super::*;

    #[test]
    fn test_outcome_messages() {
        assert_eq!(Outcome::Pass.to_string(), "Tests pass!");
        assert_eq!(Outcome::Fail.to_string(), "Tests failed!");
    }

    #[test]
    fn test_stack_rows() {
        let m = stack(vec![vec![1.0, 2.0], vec![3.0, 4.0]]).unwrap();
        assert_eq!(m, array![[1.0, 2.0], [3.0, 4.0]]);
    }

    #[test]
    fn test_stack_ragged_rows() {
        assert!(stack(vec![vec![1.0, 2.0], vec![3.0]]).is_none());
    }

    #[test]
    fn test_predict_url_trims_slash() {
        let client = PredictClient::new("http://localhost:8000/");
        assert_eq!(client.predict_url, "http://localhost:8000/predict");
    }
}
