pub mod client_file;
pub mod error;
pub mod request;

pub use client_file::ClientConfig;
pub use error::ConfigError;
pub use request::{ReconcileRequest, ReconcileRequestBuilder, RunTarget};
