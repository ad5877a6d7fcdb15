pub mod app;
pub mod bench;
pub mod cli;
pub mod config;
pub mod error;
pub mod fetch;
pub mod utils;

pub use error::{AppError, Result};
