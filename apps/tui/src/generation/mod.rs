// Generation module for imagegen_tui
// Request lifecycle: pure state transitions plus the exchange runner

pub mod client;
pub mod orchestrator;
pub mod state;

pub use client::{GenerationClient, HttpGenerationClient};
pub use orchestrator::{GenerationOrchestrator, Settlement};
pub use state::{
    GenerationEvent, Phase, RequestState, FAILED_REFINED_PROMPT, MISSING_REFINED_PROMPT,
    TRANSPORT_FAILURE_MESSAGE,
};
