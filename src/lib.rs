pub mod config;
pub mod error;
pub mod prediction;
pub mod predictor;
pub mod server;
pub mod service;
pub mod store;
pub mod validation;

pub use error::{Error, Result};
