pub mod config;
pub mod error;
pub mod inference;
pub mod relay;
pub mod server;
pub mod upload;

pub use error::{Error, Result};
