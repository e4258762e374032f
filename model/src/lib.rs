pub mod closeness;
pub mod codec;
pub mod error;
pub mod pca;
pub mod registry;

pub use closeness::{allclose, Tolerance};
pub use error::{ModelErr, Result};
pub use pca::Pca;
pub use registry::{ModelRegistry, Predictor};
