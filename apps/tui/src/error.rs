use thiserror::Error;

/// Anything that stops an exchange from producing a readable response.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("backend base URL is not configured (set IMAGEGEN_API_URL)")]
    MissingBaseUrl,

    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("response body is not a generation result: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("exchange task stopped before settling: {0}")]
    Interrupted(String),
}

#[derive(Debug, Error)]
pub enum DownloadError {
    #[error("nothing to download")]
    NoImage,

    #[error("unsupported image URI: {0}")]
    UnsupportedUri(String),

    #[error("malformed data URI")]
    MalformedDataUri,

    #[error("invalid base64 payload: {0}")]
    Base64(#[from] base64::DecodeError),

    #[error("image fetch failed: {0}")]
    Fetch(#[from] reqwest::Error),

    #[error("image fetch returned HTTP {0}")]
    Status(u16),

    #[error("could not write image: {0}")]
    Io(#[from] std::io::Error),

    #[error("download task stopped before finishing: {0}")]
    Interrupted(String),
}
