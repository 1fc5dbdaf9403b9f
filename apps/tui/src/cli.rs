use clap::{CommandFactory, Parser};
use imagegen_tui::config::{API_URL_VAR, DOWNLOAD_DIR_VAR, LOG_FILE_VAR};

#[derive(Debug, Parser)]
#[command(name = "imagegen_tui", version, about = "AI image generator TUI")]
pub struct CliArgs {
    /// Generate once for this idea, print the result and exit
    #[arg(long, value_name = "TEXT")]
    pub prompt: Option<String>,

    /// Print the headless result as JSON
    #[arg(long)]
    pub json: bool,

    /// Enable debug logging
    #[arg(long)]
    pub debug: bool,

    /// Override the backend base URL
    #[arg(long = "api-url", value_name = "URL")]
    pub api_url: Option<String>,

    /// Override the directory downloaded images are saved to
    #[arg(long = "download-dir", value_name = "PATH")]
    pub download_dir: Option<String>,

    /// Override the log file
    #[arg(long = "log-file", value_name = "PATH")]
    pub log_file: Option<String>,
}

impl CliArgs {
    pub fn apply_env_overrides(&self) {
        if let Some(url) = &self.api_url {
            std::env::set_var(API_URL_VAR, url);
        }
        if let Some(dir) = &self.download_dir {
            std::env::set_var(DOWNLOAD_DIR_VAR, dir);
        }
        if let Some(path) = &self.log_file {
            std::env::set_var(LOG_FILE_VAR, path);
        }
        if self.debug {
            std::env::set_var("DEBUG", "1");
        }
    }

    pub fn help_text() -> String {
        let mut command = Self::command();
        let mut buffer = Vec::new();
        command.write_help(&mut buffer).ok();
        String::from_utf8_lossy(&buffer).to_string()
    }
}
