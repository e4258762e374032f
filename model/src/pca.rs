use ndarray::{Array1, Array2, ArrayView2, Axis};

use crate::{ModelErr, Result};

/// A fitted principal component analysis projection.
///
/// Maps `n_features` wide samples onto `n_components` principal axes, optionally
/// whitening the projected coordinates to unit variance.
#[derive(Debug, Clone, PartialEq)]
pub struct Pca {
    mean: Array1<f64>,
    components: Array2<f64>,
    explained_variance: Array1<f64>,
    whiten: bool,
}

impl Pca {
    /// Creates a new `Pca` from already fitted parameters.
    ///
    /// # Arguments
    /// * `mean` - The per feature mean subtracted before projecting.
    /// * `components` - The principal axes, one per row (`n_components x n_features`).
    /// * `explained_variance` - The variance explained by each component.
    /// * `whiten` - Whether to scale the projection by the inverse standard deviation.
    ///
    /// # Returns
    /// A new `Pca` instance or an error if the shapes don't agree.
    pub fn new(
        mean: Array1<f64>,
        components: Array2<f64>,
        explained_variance: Array1<f64>,
        whiten: bool,
    ) -> Result<Self> {
        let (n_components, n_features) = components.dim();

        if mean.len() != n_features {
            return Err(ModelErr::SizeMismatch {
                a: "mean",
                b: "components",
                got: mean.len(),
                expected: n_features,
            });
        }

        if explained_variance.len() != n_components {
            return Err(ModelErr::SizeMismatch {
                a: "explained variance",
                b: "components",
                got: explained_variance.len(),
                expected: n_components,
            });
        }

        if whiten {
            let bad = explained_variance.iter().position(|&v| !(v > 0.0));
            if let Some(component) = bad {
                return Err(ModelErr::NonPositiveVariance {
                    component,
                    value: explained_variance[component],
                });
            }
        }

        Ok(Self {
            mean,
            components,
            explained_variance,
            whiten,
        })
    }

    /// Creates a non whitening `Pca` that only centers and projects.
    pub fn projection(mean: Array1<f64>, components: Array2<f64>) -> Result<Self> {
        let explained_variance = Array1::ones(components.nrows());
        Self::new(mean, components, explained_variance, false)
    }

    pub fn n_features(&self) -> usize {
        self.components.ncols()
    }

    pub fn n_components(&self) -> usize {
        self.components.nrows()
    }

    pub fn mean(&self) -> &Array1<f64> {
        &self.mean
    }

    pub fn components(&self) -> &Array2<f64> {
        &self.components
    }

    pub fn explained_variance(&self) -> &Array1<f64> {
        &self.explained_variance
    }

    pub fn whiten(&self) -> bool {
        self.whiten
    }

    /// Projects every row of `x` onto the principal axes.
    ///
    /// # Arguments
    /// * `x` - A `n_samples x n_features` matrix.
    ///
    /// # Returns
    /// A `n_samples x n_components` matrix or a size mismatch if `x` is not
    /// `n_features` wide.
    pub fn transform(&self, x: ArrayView2<f64>) -> Result<Array2<f64>> {
        if x.ncols() != self.n_features() {
            return Err(ModelErr::SizeMismatch {
                a: "sample",
                b: "model features",
                got: x.ncols(),
                expected: self.n_features(),
            });
        }

        let centered = &x - &self.mean.view().insert_axis(Axis(0));
        let mut projected = centered.dot(&self.components.t());

        if self.whiten {
            let std = self.explained_variance.mapv(f64::sqrt);
            projected /= &std.view().insert_axis(Axis(0));
        }

        Ok(projected)
    }
}
