mod config;
mod error;
pub mod iris;
mod verify;

pub use config::ClientConfig;
pub use error::{ClientErr, Result};
pub use verify::{Outcome, PredictClient, stack, verify};
