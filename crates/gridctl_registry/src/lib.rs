mod client;
mod error;
mod http;
mod mock;
mod state;

pub use client::{RegistryClient, RegistrySession};
pub use error::RegistryError;
pub use http::{HttpRegistryClient, HttpRegistrySession};
pub use mock::{MockFault, MockRegistry};
pub use state::{RunState, ServerSnapshot};
