use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use std::{
    fs,
    io::{self, Write},
    path::{Path, PathBuf},
};

use crate::error::DownloadError;

const DEFAULT_EXTENSION: &str = "png";
const MAX_NAME_ATTEMPTS: u32 = 1000;

/// Writes the generated image to `target_dir` and returns the file path.
///
/// `image` is whatever the backend returned: a `data:` URI is decoded in
/// place, an `http(s)://` URL is fetched with `http`.
pub async fn save_image(
    http: &reqwest::Client,
    image: &str,
    target_dir: &Path,
) -> Result<PathBuf, DownloadError> {
    let image = image.trim();
    if image.is_empty() {
        return Err(DownloadError::NoImage);
    }

    let (bytes, extension) = if image.starts_with("data:") {
        decode_data_uri(image)?
    } else if image.starts_with("http://") || image.starts_with("https://") {
        fetch_remote(http, image).await?
    } else {
        let shown: String = image.chars().take(32).collect();
        return Err(DownloadError::UnsupportedUri(shown));
    };

    if !target_dir.exists() {
        fs::create_dir_all(target_dir)?;
    }

    let timestamp = chrono::Local::now().format("%Y%m%d-%H%M%S");
    let (mut file, file_path) =
        create_unique_file(target_dir, &format!("generated-{timestamp}"), &extension)?;
    file.write_all(&bytes)?;

    tracing::info!(path = %file_path.display(), bytes = bytes.len(), "image saved");
    Ok(file_path)
}

pub fn get_file_path(dir: impl AsRef<Path>, file_name: &str, extension: &str) -> PathBuf {
    dir.as_ref().join(format!("{file_name}.{extension}"))
}

/// Opens `<stem>.<ext>`, or `<stem>-<n>.<ext>` when that name is taken.
/// Existing files are never replaced.
fn create_unique_file(
    dir: &Path,
    stem: &str,
    extension: &str,
) -> Result<(fs::File, PathBuf), DownloadError> {
    for attempt in 0..MAX_NAME_ATTEMPTS {
        let file_name = if attempt == 0 {
            stem.to_string()
        } else {
            format!("{stem}-{attempt}")
        };
        let path = get_file_path(dir, &file_name, extension);
        match fs::OpenOptions::new().write(true).create_new(true).open(&path) {
            Ok(file) => return Ok((file, path)),
            Err(e) if e.kind() == io::ErrorKind::AlreadyExists => {}
            Err(e) => return Err(e.into()),
        }
    }

    Err(io::Error::new(
        io::ErrorKind::AlreadyExists,
        format!("no free file name for {stem}.{extension}"),
    )
    .into())
}

/// Decodes `data:[<mime>][;base64],<payload>`.
pub fn decode_data_uri(uri: &str) -> Result<(Vec<u8>, String), DownloadError> {
    let rest = uri
        .strip_prefix("data:")
        .ok_or(DownloadError::MalformedDataUri)?;
    let (meta, payload) = rest.split_once(',').ok_or(DownloadError::MalformedDataUri)?;

    let mut params = meta.split(';');
    let mime = params.next().unwrap_or_default();
    let is_base64 = params.any(|p| p.eq_ignore_ascii_case("base64"));

    let bytes = if is_base64 {
        // Some encoders wrap long payloads.
        let compact: String = payload.chars().filter(|c| !c.is_whitespace()).collect();
        STANDARD.decode(compact)?
    } else {
        payload.as_bytes().to_vec()
    };

    Ok((bytes, extension_for_mime(mime)))
}

async fn fetch_remote(
    http: &reqwest::Client,
    url: &str,
) -> Result<(Vec<u8>, String), DownloadError> {
    let response = http.get(url).send().await?;
    let status = response.status();
    if !status.is_success() {
        return Err(DownloadError::Status(status.as_u16()));
    }

    let from_header = response
        .headers()
        .get(reqwest::header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .map(|mime| mime.split(';').next().unwrap_or_default().trim().to_string())
        .filter(|mime| mime.starts_with("image/"));

    let extension = from_header.map_or_else(|| extension_for_url(url), |mime| extension_for_mime(&mime));
    let bytes = response.bytes().await?;
    Ok((bytes.to_vec(), extension))
}

fn extension_for_mime(mime: &str) -> String {
    match mime.trim().to_ascii_lowercase().as_str() {
        "image/jpeg" | "image/jpg" => "jpg".to_string(),
        "image/webp" => "webp".to_string(),
        "image/gif" => "gif".to_string(),
        "image/svg+xml" => "svg".to_string(),
        _ => DEFAULT_EXTENSION.to_string(),
    }
}

fn extension_for_url(url: &str) -> String {
    let path = url.split(['?', '#']).next().unwrap_or_default();
    let last_segment = path.rsplit('/').next().unwrap_or_default();
    match last_segment.rsplit_once('.') {
        Some((_, ext))
            if matches!(
                ext.to_ascii_lowercase().as_str(),
                "png" | "jpg" | "jpeg" | "webp" | "gif" | "svg"
            ) =>
        {
            ext.to_ascii_lowercase()
        }
        _ => DEFAULT_EXTENSION.to_string(),
    }
}
