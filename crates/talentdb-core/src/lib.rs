pub mod config;
pub mod dataset;
pub mod error;
pub mod fingerprint;
pub mod logging;
pub mod profile;
pub mod traits;
pub mod types;

pub use error::{Error, Result};
