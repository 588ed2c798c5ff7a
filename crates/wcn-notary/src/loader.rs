//! Document loader: local paths and `http(s)://` URLs

use std::path::Path;
use std::time::Duration;
use tracing::debug;
use wcn_core::{LoadedFile, NotaryError, NotaryResult};

const DEFAULT_MIME: &str = "application/octet-stream";

/// Whole-request bound on a remote fetch made through [`load`].
pub const FETCH_TIMEOUT: Duration = Duration::from_secs(60);

/// Load a document from a local path or an `http://` / `https://` URL
/// (scheme matched case-insensitively), giving remote fetches
/// [`FETCH_TIMEOUT`].
///
/// # Errors
/// - [`NotaryError::NotFound`] when the file is missing, the request fails
///   or times out, or the server answers with status >= 400
pub async fn load(source: &str) -> NotaryResult<LoadedFile> {
    load_with_timeout(source, FETCH_TIMEOUT).await
}

/// [`load`] with an explicit bound on the remote request.
pub async fn load_with_timeout(source: &str, timeout: Duration) -> NotaryResult<LoadedFile> {
    if is_remote(source) {
        load_remote(source, timeout).await
    } else {
        load_local(Path::new(source)).await
    }
}

pub fn is_remote(source: &str) -> bool {
    let lower = source
        .get(..8)
        .unwrap_or(source)
        .to_ascii_lowercase();
    lower.starts_with("http://") || lower.starts_with("https://")
}

async fn load_remote(url: &str, timeout: Duration) -> NotaryResult<LoadedFile> {
    let client = reqwest::Client::builder()
        .timeout(timeout)
        .build()
        .map_err(|e| NotaryError::Config(format!("building HTTP client: {e}")))?;
    let response = client
        .get(url)
        .send()
        .await
        .map_err(|e| NotaryError::NotFound(format!("failed to fetch {url}: {e}")))?;

    let status = response.status();
    if status.as_u16() >= 400 {
        return Err(NotaryError::NotFound(format!(
            "failed to fetch {url}: status {status}"
        )));
    }

    let mime_type = response
        .headers()
        .get(reqwest::header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or(DEFAULT_MIME)
        .to_string();
    let bytes = response
        .bytes()
        .await
        .map_err(|e| NotaryError::NotFound(format!("failed to read body of {url}: {e}")))?
        .to_vec();

    debug!(url = %url, bytes = bytes.len(), mime = %mime_type, "fetched remote document");
    Ok(LoadedFile {
        size_bytes: bytes.len() as u64,
        bytes,
        mime_type,
    })
}

async fn load_local(path: &Path) -> NotaryResult<LoadedFile> {
    let bytes = tokio::fs::read(path).await.map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound => {
            NotaryError::NotFound(format!("{}: no such file", path.display()))
        }
        _ => NotaryError::Io(e),
    })?;

    debug!(path = %path.display(), bytes = bytes.len(), "loaded local document");
    Ok(LoadedFile {
        size_bytes: bytes.len() as u64,
        bytes,
        mime_type: detect_mime_type(path).to_string(),
    })
}

/// MIME type from a file extension (case-insensitive).
pub fn detect_mime_type(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase());

    match ext.as_deref() {
        Some("txt") => "text/plain",
        Some("json") => "application/json",
        Some("pdf") => "application/pdf",
        Some("png") => "image/png",
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        Some("svg") => "image/svg+xml",
        _ => DEFAULT_MIME,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn remote_detection_ignores_case() {
        assert!(is_remote("https://example.com/a.pdf"));
        assert!(is_remote("HTTP://example.com"));
        assert!(!is_remote("./http/file.txt"));
        assert!(!is_remote("ftp://example.com"));
        assert!(!is_remote("h"));
    }

    #[test]
    fn mime_from_extension() {
        assert_eq!(detect_mime_type(Path::new("a.TXT")), "text/plain");
        assert_eq!(detect_mime_type(Path::new("b.jpeg")), "image/jpeg");
        assert_eq!(detect_mime_type(Path::new("c.svg")), "image/svg+xml");
        assert_eq!(detect_mime_type(Path::new("noext")), DEFAULT_MIME);
        assert_eq!(detect_mime_type(Path::new("x.tar.gz")), DEFAULT_MIME);
    }

    #[tokio::test]
    async fn loads_local_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("doc.json");
        std::fs::write(&path, br#"{"a":1}"#).unwrap();

        let loaded = load(path.to_str().unwrap()).await.unwrap();
        assert_eq!(loaded.bytes, br#"{"a":1}"#);
        assert_eq!(loaded.size_bytes, 7);
        assert_eq!(loaded.mime_type, "application/json");
    }

    #[tokio::test]
    async fn missing_local_file_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let err = load(dir.path().join("absent.pdf").to_str().unwrap())
            .await
            .unwrap_err();
        assert!(matches!(err, NotaryError::NotFound(_)));
    }
}
