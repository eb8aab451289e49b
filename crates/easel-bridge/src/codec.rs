//! Image codec pipeline.
//!
//! An image crosses three representations on every transfer: the raw bytes
//! the editor exports, a base64 string for any leg that only carries text,
//! and a [`NamedFile`] built just before injection into a host input.
//! Nothing here is cached; each transfer derives its own.

use std::path::Path;

use base64::engine::general_purpose::STANDARD as B64;
use base64::Engine;
use easel_common::CodecError;
use serde::{Deserialize, Serialize};

/// Fallback MIME type when neither the source nor the bytes say otherwise.
pub const OCTET_STREAM: &str = "application/octet-stream";

/// Image bytes plus their MIME type, ready to be wrapped as a file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transferable {
    pub mime: String,
    pub bytes: Vec<u8>,
}

impl Transferable {
    pub fn new(mime: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            mime: mime.into(),
            bytes,
        }
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

/// A file-like object as the host's file inputs expect it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NamedFile {
    pub name: String,
    pub mime: String,
    /// Base64 of the file contents. Files only ever travel to the host as text.
    pub data: String,
}

impl NamedFile {
    /// Decoded file contents.
    pub fn bytes(&self) -> Result<Vec<u8>, CodecError> {
        decode_base64(&self.data)
    }
}

/// Encode raw bytes into the text-safe form.
pub fn encode_to_text_safe(bytes: &[u8]) -> String {
    B64.encode(bytes)
}

/// Decode a text-safe string back into a transferable of type `mime`.
///
/// Surrounding whitespace, embedded line breaks and a leading
/// `data:<mime>;base64,` prefix are accepted. When a prefix is present its
/// MIME type wins over `mime`.
pub fn decode_from_text_safe(encoded: &str, mime: &str) -> Result<Transferable, CodecError> {
    let (mime, payload) = match split_data_url(encoded.trim()) {
        Some((declared, payload)) if !declared.is_empty() => (declared.to_string(), payload),
        Some((_, payload)) => (mime.to_string(), payload),
        None => (mime.to_string(), encoded),
    };
    let bytes = decode_base64(payload)?;
    Ok(Transferable { mime, bytes })
}

/// Wrap a transferable as a file named `name`.
pub fn wrap_as_named_file(transferable: Transferable, name: &str) -> NamedFile {
    NamedFile {
        name: name.to_string(),
        mime: transferable.mime,
        data: encode_to_text_safe(&transferable.bytes),
    }
}

/// `data:` URL of a transferable, as the editor's open command takes it.
pub fn to_data_url(transferable: &Transferable) -> String {
    format!(
        "data:{};base64,{}",
        transferable.mime,
        encode_to_text_safe(&transferable.bytes)
    )
}

/// Pull the bytes of an image the host already displays.
///
/// `locator` is whatever the image element's source resolved to: a `data:`
/// URL, an absolute `http(s)` URL, a path relative to the host (joined onto
/// `base_url`), a `file://` URL or a plain filesystem path.
pub async fn fetch_as_transferable(
    locator: &str,
    base_url: Option<&str>,
) -> Result<Transferable, CodecError> {
    let locator = locator.trim();
    if locator.starts_with("data:") {
        return decode_from_text_safe(locator, OCTET_STREAM);
    }
    if locator.starts_with("http://") || locator.starts_with("https://") {
        return fetch_http(locator).await;
    }
    if let Some(path) = locator.strip_prefix("file://") {
        return read_file(Path::new(path)).await;
    }
    if locator.starts_with('/') {
        if let Some(base) = base_url {
            let url = join_url(base, locator);
            return fetch_http(&url).await;
        }
        return read_file(Path::new(locator)).await;
    }
    if locator.contains("://") || locator.starts_with("blob:") {
        return Err(CodecError::UnsupportedSource(locator.to_string()));
    }
    match base_url {
        Some(base) => fetch_http(&join_url(base, locator)).await,
        None => read_file(Path::new(locator)).await,
    }
}

/// MIME type implied by the leading bytes of an image.
pub fn sniff_mime(bytes: &[u8]) -> Option<&'static str> {
    if bytes.starts_with(b"\x89PNG\r\n\x1a\n") {
        Some("image/png")
    } else if bytes.starts_with(&[0xff, 0xd8, 0xff]) {
        Some("image/jpeg")
    } else if bytes.starts_with(b"GIF87a") || bytes.starts_with(b"GIF89a") {
        Some("image/gif")
    } else if bytes.len() >= 12 && &bytes[0..4] == b"RIFF" && &bytes[8..12] == b"WEBP" {
        Some("image/webp")
    } else {
        None
    }
}

fn decode_base64(payload: &str) -> Result<Vec<u8>, CodecError> {
    let compact: String = payload.chars().filter(|c| !c.is_ascii_whitespace()).collect();
    B64.decode(compact.as_bytes())
        .map_err(|e| CodecError::Decode(e.to_string()))
}

/// Split `data:<mime>;base64,<payload>` into its MIME type and payload.
fn split_data_url(raw: &str) -> Option<(&str, &str)> {
    let rest = raw.strip_prefix("data:")?;
    let (header, payload) = rest.split_once(',')?;
    let mime = header.strip_suffix(";base64")?;
    Some((mime, payload))
}

fn join_url(base: &str, path: &str) -> String {
    format!(
        "{}/{}",
        base.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}

async fn fetch_http(url: &str) -> Result<Transferable, CodecError> {
    tracing::debug!(url, "fetching image");
    let response = reqwest::get(url)
        .await
        .and_then(|r| r.error_for_status())
        .map_err(|e| CodecError::Fetch(e.to_string()))?;
    let header_mime = response
        .headers()
        .get(reqwest::header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(|v| v.split(';').next().unwrap_or(v).trim().to_string())
        .filter(|v| v.starts_with("image/"));
    let bytes = response
        .bytes()
        .await
        .map_err(|e| CodecError::Fetch(e.to_string()))?
        .to_vec();
    let mime = header_mime
        .or_else(|| sniff_mime(&bytes).map(str::to_string))
        .unwrap_or_else(|| OCTET_STREAM.to_string());
    Ok(Transferable { mime, bytes })
}

async fn read_file(path: &Path) -> Result<Transferable, CodecError> {
    let bytes = tokio::fs::read(path)
        .await
        .map_err(|e| CodecError::Fetch(format!("{}: {e}", path.display())))?;
    let mime = sniff_mime(&bytes).unwrap_or(OCTET_STREAM).to_string();
    Ok(Transferable { mime, bytes })
}

#[cfg(test)]
mod tests {
    use super::*;

    const PNG_HEADER: &[u8] = b"\x89PNG\r\n\x1a\n\0\0\0\rIHDR";

    #[test]
    fn round_trip_preserves_bytes() {
        let bytes: Vec<u8> = (0..=255u8).chain([0, 0, 255]).collect();
        let decoded = decode_from_text_safe(&encode_to_text_safe(&bytes), "image/png").unwrap();
        assert_eq!(decoded.bytes, bytes);
        assert_eq!(decoded.mime, "image/png");
    }

    #[test]
    fn round_trip_empty_buffer() {
        let decoded = decode_from_text_safe(&encode_to_text_safe(&[]), "image/png").unwrap();
        assert!(decoded.is_empty());
    }

    #[test]
    fn decode_tolerates_whitespace() {
        let decoded = decode_from_text_safe("  aGVs\nbG8=\n", "text/plain").unwrap();
        assert_eq!(decoded.bytes, b"hello");
    }

    #[test]
    fn decode_accepts_data_url_prefix() {
        let decoded = decode_from_text_safe("data:image/jpeg;base64,aGVsbG8=", "image/png").unwrap();
        assert_eq!(decoded.mime, "image/jpeg");
        assert_eq!(decoded.bytes, b"hello");
    }

    #[test]
    fn decode_rejects_malformed_input() {
        let err = decode_from_text_safe("not base64!!", "image/png").unwrap_err();
        assert!(matches!(err, CodecError::Decode(_)));
    }

    #[test]
    fn wrap_keeps_mime_and_contents() {
        let file = wrap_as_named_file(Transferable::new("image/png", PNG_HEADER.to_vec()), "out.png");
        assert_eq!(file.name, "out.png");
        assert_eq!(file.mime, "image/png");
        assert_eq!(file.bytes().unwrap(), PNG_HEADER);
    }

    #[test]
    fn data_url_decodes_back() {
        let original = Transferable::new("image/png", PNG_HEADER.to_vec());
        let url = to_data_url(&original);
        assert!(url.starts_with("data:image/png;base64,"));
        assert_eq!(decode_from_text_safe(&url, OCTET_STREAM).unwrap(), original);
    }

    #[test]
    fn sniff_known_formats() {
        assert_eq!(sniff_mime(PNG_HEADER), Some("image/png"));
        assert_eq!(sniff_mime(&[0xff, 0xd8, 0xff, 0xe0]), Some("image/jpeg"));
        assert_eq!(sniff_mime(b"GIF89a...."), Some("image/gif"));
        assert_eq!(sniff_mime(b"RIFF\0\0\0\0WEBPVP8 "), Some("image/webp"));
        assert_eq!(sniff_mime(b"plain"), None);
    }

    #[test]
    fn join_url_handles_slashes() {
        assert_eq!(
            join_url("http://127.0.0.1:7860/", "/file=out/a.png"),
            "http://127.0.0.1:7860/file=out/a.png"
        );
        assert_eq!(join_url("http://h", "a.png"), "http://h/a.png");
    }

    #[tokio::test]
    async fn fetch_data_url() {
        let t = fetch_as_transferable("data:image/png;base64,aGVsbG8=", None)
            .await
            .unwrap();
        assert_eq!(t.mime, "image/png");
        assert_eq!(t.bytes, b"hello");
    }

    #[tokio::test]
    async fn fetch_file_path_sniffs_mime() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("gallery.png");
        std::fs::write(&path, PNG_HEADER).unwrap();

        let t = fetch_as_transferable(path.to_str().unwrap(), None).await.unwrap();
        assert_eq!(t.mime, "image/png");
        assert_eq!(t.bytes, PNG_HEADER);

        let url = format!("file://{}", path.display());
        let t = fetch_as_transferable(&url, None).await.unwrap();
        assert_eq!(t.bytes, PNG_HEADER);
    }

    #[tokio::test]
    async fn fetch_missing_file_is_fetch_error() {
        let err = fetch_as_transferable("/nonexistent/easel/missing.png", None)
            .await
            .unwrap_err();
        assert!(matches!(err, CodecError::Fetch(_)));
    }

    #[tokio::test]
    async fn fetch_blob_is_unsupported() {
        let err = fetch_as_transferable("blob:http://h/1234", None).await.unwrap_err();
        assert!(matches!(err, CodecError::UnsupportedSource(_)));
    }
}
