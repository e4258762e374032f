use ndarray::ArrayView2;

/// Relative and absolute tolerances for element-wise approximate equality.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tolerance {
    pub rtol: f64,
    pub atol: f64,
}

impl Tolerance {
    pub fn new(rtol: f64, atol: f64) -> Self {
        Self { rtol, atol }
    }

    /// Whether `a` is close to the reference value `b`.
    ///
    /// Asymmetric on purpose: the relative term scales with `b` only.
    pub fn is_close(&self, a: f64, b: f64) -> bool {
        if a == b {
            return true;
        }

        (a - b).abs() <= self.atol + self.rtol * b.abs()
    }
}

impl Default for Tolerance {
    fn default() -> Self {
        Self::new(1e-5, 1e-8)
    }
}

/// Checks that two matrices have the same shape and every pair of elements is close.
///
/// # Arguments
/// * `a` - The computed values.
/// * `b` - The reference values.
/// * `tol` - The tolerances to compare with.
///
/// # Returns
/// `false` on any shape difference or any pair out of tolerance, NaNs included.
pub fn allclose(a: ArrayView2<f64>, b: ArrayView2<f64>, tol: Tolerance) -> bool {
    if a.dim() != b.dim() {
        return false;
    }

    a.iter().zip(b.iter()).all(|(&a, &b)| tol.is_close(a, b))
}

#[cfg(test)]
mod tests {
    use ndarray::array;

    use super::*;

    #[test]
    fn test_identical_matrices_are_close() {
        let a = array![[1.0, -2.5], [0.0, 1e9]];
        assert!(allclose(a.view(), a.view(), Tolerance::default()));
    }

    #[test]
    fn test_within_relative_tolerance() {
        let a = array![[1000.0 + 5e-3]];
        let b = array![[1000.0]];
        assert!(allclose(a.view(), b.view(), Tolerance::default()));
    }

    #[test]
    fn test_outside_tolerance() {
        let a = array![[1.0 + 1e-4]];
        let b = array![[1.0]];
        assert!(!allclose(a.view(), b.view(), Tolerance::default()));
    }

    #[test]
    fn test_near_zero_uses_absolute_tolerance() {
        let tol = Tolerance::default();
        assert!(tol.is_close(5e-9, 0.0));
        assert!(!tol.is_close(5e-8, 0.0));
    }

    #[test]
    fn test_nan_is_never_close() {
        let a = array![[f64::NAN]];
        assert!(!allclose(a.view(), a.view(), Tolerance::default()));
    }

    #[test]
    fn test_shape_mismatch_is_not_close() {
        let a = array![[1.0, 2.0]];
        let b = array![[1.0], [2.0]];
        assert!(!allclose(a.view(), b.view(), Tolerance::default()));
    }
}
