use std::sync::Arc;

use tokio::sync::mpsc::UnboundedSender;

use crate::domain::{GenerateRequest, GenerateResponse};
use crate::error::TransportError;
use crate::generation::client::GenerationClient;
use crate::generation::state::{GenerationEvent, RequestState};

/// Outcome of one exchange, delivered back to the event loop.
pub type Settlement = Result<GenerateResponse, TransportError>;

/// Owns [`RequestState`] and runs exchanges against a [`GenerationClient`].
pub struct GenerationOrchestrator {
    state: RequestState,
    client: Arc<dyn GenerationClient>,
}

impl GenerationOrchestrator {
    pub fn new(client: Arc<dyn GenerationClient>) -> Self {
        Self {
            state: RequestState::default(),
            client,
        }
    }

    pub const fn state(&self) -> &RequestState {
        &self.state
    }

    fn dispatch(&mut self, event: &GenerationEvent) {
        let from = self.state.phase();
        self.state = self.state.apply(event);
        tracing::debug!(%from, to = %self.state.phase(), %event, "generation transition");
    }

    /// Enters loading for a non-blank prompt and returns the request to send.
    /// Blank prompts are ignored and yield `None`.
    pub fn begin(&mut self, prompt: &str) -> Option<GenerateRequest> {
        if prompt.trim().is_empty() {
            return None;
        }
        self.dispatch(&GenerationEvent::SubmitRequested(prompt.to_string()));
        Some(GenerateRequest::new(prompt))
    }

    /// Applies the outcome of an exchange; also clears the busy flag.
    pub fn settle(&mut self, outcome: Settlement) {
        if let Err(e) = &outcome {
            tracing::error!(error = %e, "generation exchange failed");
        }
        self.dispatch(&GenerationEvent::ExchangeSettled(outcome));
    }

    /// Runs one exchange to settlement before returning.
    pub async fn submit(&mut self, prompt: &str) {
        let Some(request) = self.begin(prompt) else {
            return;
        };
        let outcome = self.client.generate(&request).await;
        self.settle(outcome);
    }

    /// Starts an exchange on a background task. The settlement arrives on
    /// `settled`, including when the task itself panics.
    pub fn spawn_submit(&mut self, prompt: &str, settled: UnboundedSender<Settlement>) -> bool {
        let Some(request) = self.begin(prompt) else {
            return false;
        };
        let client = Arc::clone(&self.client);

        tokio::spawn(async move {
            let exchange = tokio::spawn(async move { client.generate(&request).await });
            let outcome = match exchange.await {
                Ok(outcome) => outcome,
                Err(e) => Err(TransportError::Interrupted(e.to_string())),
            };
            if settled.send(outcome).is_err() {
                tracing::warn!("generation settled after the event loop stopped");
            }
        });

        true
    }
}
