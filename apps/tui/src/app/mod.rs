// App module for imagegen_tui
// Holds the prompt input, the generation orchestrator and key handling

pub mod input;
pub mod state;

pub use input::{handle_input, handle_paste};
pub use state::{App, PromptInput};
