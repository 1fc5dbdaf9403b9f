use std::fmt;

use crate::domain::GenerateResponse;
use crate::error::TransportError;

/// Shown when the backend is unreachable or its reply cannot be read.
pub const TRANSPORT_FAILURE_MESSAGE: &str = "⚠️ Failed to reach backend.";
/// Refined prompt shown next to an application error that carried none.
pub const FAILED_REFINED_PROMPT: &str = "Image generation failed.";
/// Refined prompt shown on success when the backend sent none.
pub const MISSING_REFINED_PROMPT: &str = "No refined prompt found";

/// Where the request lifecycle currently is, derived from [`RequestState`].
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Phase {
    Pristine,
    Loading,
    Success,
    Failure,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pristine => write!(f, "Pristine"),
            Self::Loading => write!(f, "Loading"),
            Self::Success => write!(f, "Success"),
            Self::Failure => write!(f, "Failure"),
        }
    }
}

#[derive(Debug)]
pub enum GenerationEvent {
    SubmitRequested(String),
    ExchangeSettled(Result<GenerateResponse, TransportError>),
}

impl fmt::Display for GenerationEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SubmitRequested(prompt) => write!(f, "SubmitRequested({prompt:?})"),
            Self::ExchangeSettled(Ok(_)) => write!(f, "ExchangeSettled(Ok)"),
            Self::ExchangeSettled(Err(e)) => write!(f, "ExchangeSettled(Err({e}))"),
        }
    }
}

/// The four fields the UI renders from. An empty string means "nothing".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestState {
    pub is_loading: bool,
    pub refined_prompt: String,
    pub image: String,
    pub error: String,
}

impl RequestState {
    pub fn phase(&self) -> Phase {
        if self.is_loading {
            Phase::Loading
        } else if !self.error.is_empty() {
            Phase::Failure
        } else if self.refined_prompt.is_empty() && self.image.is_empty() {
            Phase::Pristine
        } else {
            Phase::Success
        }
    }

    /// Pure transition function: the only place the four fields change.
    #[must_use]
    pub fn apply(&self, event: &GenerationEvent) -> Self {
        match event {
            GenerationEvent::SubmitRequested(prompt) => {
                if prompt.trim().is_empty() {
                    return self.clone();
                }
                Self {
                    is_loading: true,
                    ..Self::default()
                }
            }
            GenerationEvent::ExchangeSettled(outcome) => {
                let mut next = self.clone();
                match outcome {
                    Ok(response) => next.settle_response(response),
                    Err(_) => next.error = TRANSPORT_FAILURE_MESSAGE.to_string(),
                }
                // Runs for every outcome; a second settlement leaves it false.
                next.is_loading = false;
                next
            }
        }
    }

    fn settle_response(&mut self, response: &GenerateResponse) {
        if let Some(error) = response.error() {
            self.error = error.to_string();
            self.refined_prompt = response
                .refined_prompt()
                .unwrap_or(FAILED_REFINED_PROMPT)
                .to_string();
            self.image.clear();
            return;
        }

        self.refined_prompt = response
            .refined_prompt()
            .unwrap_or(MISSING_REFINED_PROMPT)
            .to_string();
        self.image = response.image().unwrap_or_default().to_string();
        self.error.clear();
    }

    /// The error panel and its retry control are visible.
    pub fn shows_error(&self) -> bool {
        !self.is_loading && !self.error.is_empty()
    }

    pub fn shows_refined_prompt(&self) -> bool {
        !self.is_loading && self.error.is_empty() && !self.refined_prompt.is_empty()
    }

    /// The image panel and its download control are visible.
    pub fn shows_image(&self) -> bool {
        !self.is_loading && self.error.is_empty() && !self.image.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn submitted() -> RequestState {
        RequestState::default().apply(&GenerationEvent::SubmitRequested(
            "cyberpunk samurai".to_string(),
        ))
    }

    fn settle_ok(state: &RequestState, response: GenerateResponse) -> RequestState {
        state.apply(&GenerationEvent::ExchangeSettled(Ok(response)))
    }

    fn response(refined: Option<&str>, image: Option<&str>, error: Option<&str>) -> GenerateResponse {
        GenerateResponse {
            refined_prompt: refined.map(str::to_string),
            image: image.map(str::to_string),
            error: error.map(str::to_string),
        }
    }

    #[test]
    fn blank_prompts_leave_state_untouched() {
        let settled = settle_ok(&submitted(), response(Some("X"), Some("Y"), None));
        for prompt in ["", " ", "   ", "\t\n"] {
            let next = settled.apply(&GenerationEvent::SubmitRequested(prompt.to_string()));
            assert_eq!(next, settled);
            assert!(!next.is_loading);
        }
    }

    #[test]
    fn submit_clears_previous_results_and_sets_loading() {
        let failed = submitted().apply(&GenerationEvent::ExchangeSettled(Err(
            TransportError::MissingBaseUrl,
        )));
        let next = failed.apply(&GenerationEvent::SubmitRequested("again".to_string()));
        assert_eq!(
            next,
            RequestState {
                is_loading: true,
                ..RequestState::default()
            }
        );
        assert_eq!(next.phase(), Phase::Loading);
    }

    #[test]
    fn success_populates_refined_prompt_and_image() {
        let state = settle_ok(
            &submitted(),
            response(
                Some("A cyberpunk samurai riding a neon dragon"),
                Some("https://x/y.png"),
                None,
            ),
        );
        assert_eq!(
            state,
            RequestState {
                is_loading: false,
                refined_prompt: "A cyberpunk samurai riding a neon dragon".to_string(),
                image: "https://x/y.png".to_string(),
                error: String::new(),
            }
        );
        assert_eq!(state.phase(), Phase::Success);
        assert!(state.shows_refined_prompt());
        assert!(state.shows_image());
        assert!(!state.shows_error());
    }

    #[test]
    fn missing_refined_prompt_falls_back() {
        let state = settle_ok(&submitted(), response(None, Some("data:image/png;base64,AA=="), None));
        assert_eq!(state.refined_prompt, MISSING_REFINED_PROMPT);
        assert_eq!(state.image, "data:image/png;base64,AA==");
        assert!(state.error.is_empty());
    }

    #[test]
    fn success_without_image_is_still_success() {
        let state = settle_ok(&submitted(), response(Some("X"), None, None));
        assert_eq!(state.image, "");
        assert_eq!(state.phase(), Phase::Success);
        assert!(!state.shows_image());
    }

    #[test]
    fn application_error_drops_image_and_uses_fallback_text() {
        let state = settle_ok(
            &submitted(),
            response(None, Some("https://x/y.png"), Some("NSFW content blocked")),
        );
        assert_eq!(state.error, "NSFW content blocked");
        assert_eq!(state.image, "");
        assert_eq!(state.refined_prompt, FAILED_REFINED_PROMPT);
        assert!(!state.is_loading);
        assert_eq!(state.phase(), Phase::Failure);
        assert!(state.shows_error());
        assert!(!state.shows_refined_prompt());
    }

    #[test]
    fn application_error_keeps_server_refined_prompt() {
        let state = settle_ok(
            &submitted(),
            response(Some("blocked because of policy"), None, Some("NSFW content blocked")),
        );
        assert_eq!(state.refined_prompt, "blocked because of policy");
        assert_eq!(state.error, "NSFW content blocked");
    }

    #[test]
    fn empty_error_field_is_not_a_failure() {
        let state = settle_ok(&submitted(), response(Some("X"), Some("Y"), Some("")));
        assert_eq!(state.phase(), Phase::Success);
        assert!(state.error.is_empty());
    }

    #[test]
    fn transport_failure_sets_fixed_message_only() {
        let state = submitted().apply(&GenerationEvent::ExchangeSettled(Err(
            TransportError::Interrupted("dns failure".to_string()),
        )));
        assert_eq!(state.error, TRANSPORT_FAILURE_MESSAGE);
        assert_eq!(state.error, "⚠️ Failed to reach backend.");
        assert!(state.refined_prompt.is_empty());
        assert!(state.image.is_empty());
        assert!(!state.is_loading);
    }

    #[test]
    fn clearing_loading_twice_has_no_further_effect() {
        let once = settle_ok(&submitted(), response(Some("X"), Some("Y"), None));
        let twice = once.apply(&GenerationEvent::ExchangeSettled(Ok(response(
            Some("X"),
            Some("Y"),
            None,
        ))));
        assert_eq!(once, twice);
        assert!(!twice.is_loading);
    }

    #[test]
    fn overlapping_exchanges_last_settlement_wins() {
        let first = submitted();
        let second = first.apply(&GenerationEvent::SubmitRequested("other".to_string()));
        let after_first = settle_ok(&second, response(Some("first"), Some("a.png"), None));
        let after_second = settle_ok(&after_first, response(Some("second"), Some("b.png"), None));
        assert_eq!(after_second.refined_prompt, "second");
        assert_eq!(after_second.image, "b.png");
    }

    #[test]
    fn pristine_state_shows_nothing() {
        let state = RequestState::default();
        assert_eq!(state.phase(), Phase::Pristine);
        assert!(!state.shows_error());
        assert!(!state.shows_refined_prompt());
        assert!(!state.shows_image());
    }
}
