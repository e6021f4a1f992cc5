//! Client for the AI quality assurance inference API.

pub mod client;
pub mod config;
pub mod error;
pub mod interceptor;
pub mod types;

pub use client::Client;
pub use config::{ApiConfig, ApiHost};
pub use error::{Error, Result};
