use std::{path::PathBuf, sync::Arc, time::Duration, time::Instant};

use throbber_widgets_tui::ThrobberState;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};

use crate::download::save_image;
use crate::error::DownloadError;
use crate::generation::{GenerationClient, GenerationOrchestrator, RequestState, Settlement};

const THROBBER_STEP: Duration = Duration::from_millis(100);

/// Where a background download ended up.
pub type DownloadOutcome = Result<PathBuf, DownloadError>;

/// The free-text idea being typed. Storage only, no validation.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct PromptInput {
    value: String,
}

impl PromptInput {
    pub const fn new() -> Self {
        Self {
            value: String::new(),
        }
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn set_prompt(&mut self, text: impl Into<String>) {
        self.value = text.into();
    }

    pub fn insert(&mut self, c: char) {
        self.value.push(c);
    }

    pub fn insert_str(&mut self, text: &str) {
        self.value.push_str(text);
    }

    pub fn backspace(&mut self) {
        self.value.pop();
    }

    pub fn clear(&mut self) {
        self.value.clear();
    }

    /// Non-blank text and nothing in flight.
    pub fn can_submit(&self, is_loading: bool) -> bool {
        !self.value.trim().is_empty() && !is_loading
    }
}

pub struct App {
    pub running: bool,
    pub prompt: PromptInput,
    pub generation: GenerationOrchestrator,
    pub status_message: String,
    pub show_help: bool,
    pub throbber_state: ThrobberState,
    pub last_frame: Instant,
    pub download_dir: PathBuf,
    http: reqwest::Client,
    settled_tx: UnboundedSender<Settlement>,
    settled_rx: UnboundedReceiver<Settlement>,
    downloads_tx: UnboundedSender<DownloadOutcome>,
    downloads_rx: UnboundedReceiver<DownloadOutcome>,
}

impl App {
    pub fn new(
        client: Arc<dyn GenerationClient>,
        http: reqwest::Client,
        download_dir: PathBuf,
    ) -> Self {
        let (settled_tx, settled_rx) = mpsc::unbounded_channel();
        let (downloads_tx, downloads_rx) = mpsc::unbounded_channel();
        Self {
            running: true,
            prompt: PromptInput::new(),
            generation: GenerationOrchestrator::new(client),
            status_message: String::new(),
            show_help: false,
            throbber_state: ThrobberState::default(),
            last_frame: Instant::now(),
            download_dir,
            http,
            settled_tx,
            settled_rx,
            downloads_tx,
            downloads_rx,
        }
    }

    pub const fn request(&self) -> &RequestState {
        self.generation.state()
    }

    pub fn can_submit(&self) -> bool {
        self.prompt.can_submit(self.request().is_loading)
    }

    pub fn update(&mut self) {
        if !self.request().is_loading {
            self.last_frame = Instant::now();
            return;
        }

        let now = Instant::now();
        if now.duration_since(self.last_frame) >= THROBBER_STEP {
            self.throbber_state.calc_next();
            self.last_frame = now;
        }
    }

    /// Starts a generation for the current prompt when the gate allows it.
    pub fn submit(&mut self) -> bool {
        if !self.can_submit() {
            return false;
        }
        let started = self
            .generation
            .spawn_submit(self.prompt.value(), self.settled_tx.clone());
        if started {
            self.status_message.clear();
        }
        started
    }

    /// Re-submits the unchanged prompt after a failed attempt.
    pub fn retry(&mut self) -> bool {
        if !self.request().shows_error() {
            return false;
        }
        self.submit()
    }

    /// Feeds every finished exchange back into the state machine.
    pub fn poll_settlements(&mut self) -> usize {
        let mut settled = 0;
        while let Ok(outcome) = self.settled_rx.try_recv() {
            self.generation.settle(outcome);
            settled += 1;
        }
        settled
    }

    /// Saves the current image on a background task. The outcome arrives
    /// through [`App::poll_downloads`].
    pub fn download_image(&mut self) -> bool {
        if !self.request().shows_image() {
            return false;
        }

        let image = self.request().image.clone();
        let http = self.http.clone();
        let target_dir = self.download_dir.clone();
        let done = self.downloads_tx.clone();

        tokio::spawn(async move {
            let save = tokio::spawn(async move { save_image(&http, &image, &target_dir).await });
            let outcome = match save.await {
                Ok(outcome) => outcome,
                Err(e) => Err(DownloadError::Interrupted(e.to_string())),
            };
            if done.send(outcome).is_err() {
                tracing::warn!("download finished after the event loop stopped");
            }
        });

        self.status_message = "Downloading image...".to_string();
        true
    }

    /// Reports every finished download in the status line.
    pub fn poll_downloads(&mut self) -> usize {
        let mut finished = 0;
        while let Ok(outcome) = self.downloads_rx.try_recv() {
            match outcome {
                Ok(path) => {
                    let filename = path
                        .file_name()
                        .and_then(|name| name.to_str())
                        .unwrap_or("unknown");
                    self.status_message = format!("Image saved: {filename}");
                }
                Err(e) => {
                    tracing::error!(error = %e, "image download failed");
                    self.status_message = format!("Download failed: {e}");
                }
            }
            finished += 1;
        }
        finished
    }

    pub fn quit(&mut self) {
        self.running = false;
    }
}
