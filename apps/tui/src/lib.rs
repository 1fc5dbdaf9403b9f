// Export our modules for use in binaries and tests
pub mod app;
pub mod config;
pub mod domain;
pub mod download;
pub mod error;
pub mod generation;
pub mod logging;

pub use domain::{GenerateRequest, GenerateResponse};
pub use generation::{GenerationClient, GenerationOrchestrator, HttpGenerationClient, RequestState};
