pub mod cli;
pub mod config;
pub mod error;
pub mod ingest;
pub mod report;

pub use error::{Error, Result};
