use dotenv::dotenv;
use std::env;
use std::path::PathBuf;

/// Environment variable holding the generation backend base URL.
pub const API_URL_VAR: &str = "IMAGEGEN_API_URL";
pub const DOWNLOAD_DIR_VAR: &str = "IMAGEGEN_DOWNLOAD_DIR";
pub const LOG_FILE_VAR: &str = "IMAGEGEN_LOG_FILE";

/// Path appended to the base URL for every generation request.
pub const GENERATE_PATH: &str = "/api/generate";

/// Loads variables from a `.env` file if present.
pub fn init_app_config() {
    dotenv().ok();
}

/// Reads the backend base URL. Called once per exchange, so a value changed
/// between two submissions is picked up by the second one.
pub fn api_base_url() -> Option<String> {
    env::var(API_URL_VAR)
        .ok()
        .map(|url| url.trim().to_string())
        .filter(|url| !url.is_empty())
}

/// Joins a base URL and the generate path without doubling the slash.
pub fn generate_endpoint(base_url: &str) -> String {
    format!("{}{GENERATE_PATH}", base_url.trim_end_matches('/'))
}

/// Gets the directory downloaded images are written to
pub fn get_download_dir() -> PathBuf {
    env::var(DOWNLOAD_DIR_VAR).map_or_else(|_| PathBuf::from("."), PathBuf::from)
}

pub fn get_log_file() -> PathBuf {
    env::var(LOG_FILE_VAR).map_or_else(|_| PathBuf::from("imagegen.log"), PathBuf::from)
}

pub fn debug_enabled() -> bool {
    env::var("DEBUG").is_ok_and(|v| !v.is_empty() && v != "0")
}
