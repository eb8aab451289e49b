use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("config file not found: {0}")]
    FileNotFound(PathBuf),

    #[error("config parse error: {0}")]
    ParseError(String),

    #[error("config validation error: {0}")]
    ValidationError(String),

    #[error("config watch error: {0}")]
    WatchError(String),
}

/// Failures converting image data between its binary, text-safe and
/// transferable forms.
#[derive(Debug, thiserror::Error)]
pub enum CodecError {
    #[error("decode error: {0}")]
    Decode(String),

    #[error("fetch error: {0}")]
    Fetch(String),

    #[error("unsupported image source: {0}")]
    UnsupportedSource(String),
}

/// Failures talking to the host surface adapter.
#[derive(Debug, thiserror::Error)]
pub enum HostError {
    #[error("host script error: {0}")]
    Script(String),

    #[error("host reply dropped before it arrived")]
    ReplyDropped,

    #[error("host surface detached")]
    Detached,

    #[error("invalid host reply: {0}")]
    InvalidReply(String),
}

/// Failures of the editor message channel itself. A missing sentinel is not
/// an error here; it shows up as a request that never resolves.
#[derive(Debug, thiserror::Error)]
pub enum BridgeError {
    #[error("failed to post command to editor: {0}")]
    Post(String),

    #[error("editor channel closed")]
    Closed,
}

/// Errors that abort one transfer flow.
#[derive(Debug, thiserror::Error)]
pub enum TransferError {
    #[error(transparent)]
    Decode(#[from] CodecError),

    #[error("destination not found: {0}")]
    DestinationNotFound(String),

    #[error("unexpected editor response: {0}")]
    UnexpectedResponse(String),

    #[error(transparent)]
    Host(#[from] HostError),

    #[error(transparent)]
    Bridge(#[from] BridgeError),

    #[error("transfer aborted after {0:?}")]
    Aborted(Duration),
}

#[derive(Debug, thiserror::Error)]
pub enum EaselError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Transfer(#[from] TransferError),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("webview error: {0}")]
    WebView(String),

    #[error("{0}")]
    Other(String),
}

impl From<CodecError> for EaselError {
    fn from(e: CodecError) -> Self {
        Self::Transfer(TransferError::Decode(e))
    }
}

impl From<HostError> for EaselError {
    fn from(e: HostError) -> Self {
        Self::Transfer(TransferError::Host(e))
    }
}

impl From<BridgeError> for EaselError {
    fn from(e: BridgeError) -> Self {
        Self::Transfer(TransferError::Bridge(e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_error_display() {
        let err = ConfigError::FileNotFound(PathBuf::from("/tmp/missing.toml"));
        assert_eq!(err.to_string(), "config file not found: /tmp/missing.toml");

        let err = ConfigError::ParseError("unexpected token".into());
        assert_eq!(err.to_string(), "config parse error: unexpected token");

        let err = ConfigError::ValidationError("editor.sentinel is empty".into());
        assert_eq!(
            err.to_string(),
            "config validation error: editor.sentinel is empty"
        );

        let err = ConfigError::WatchError("inotify limit reached".into());
        assert_eq!(err.to_string(), "config watch error: inotify limit reached");
    }

    #[test]
    fn codec_error_display() {
        let err = CodecError::Decode("invalid byte 42".into());
        assert_eq!(err.to_string(), "decode error: invalid byte 42");

        let err = CodecError::UnsupportedSource("ftp://x".into());
        assert_eq!(err.to_string(), "unsupported image source: ftp://x");
    }

    #[test]
    fn transfer_error_wraps_decode_transparently() {
        let err: TransferError = CodecError::Decode("bad padding".into()).into();
        assert!(matches!(err, TransferError::Decode(_)));
        assert_eq!(err.to_string(), "decode error: bad padding");
    }

    #[test]
    fn transfer_error_destination_not_found() {
        let err = TransferError::DestinationNotFound("img2img file input".into());
        assert_eq!(err.to_string(), "destination not found: img2img file input");
    }

    #[test]
    fn transfer_error_aborted_mentions_duration() {
        let err = TransferError::Aborted(Duration::from_secs(5));
        assert_eq!(err.to_string(), "transfer aborted after 5s");
    }

    #[test]
    fn easel_error_from_layers() {
        let err: EaselError = ConfigError::ParseError("bad toml".into()).into();
        assert!(matches!(err, EaselError::Config(_)));
        assert!(err.to_string().contains("bad toml"));

        let err: EaselError = CodecError::Decode("x".into()).into();
        assert!(matches!(err, EaselError::Transfer(TransferError::Decode(_))));

        let err: EaselError = HostError::Detached.into();
        assert!(matches!(err, EaselError::Transfer(TransferError::Host(_))));

        let err: EaselError = BridgeError::Closed.into();
        assert_eq!(err.to_string(), "editor channel closed");
    }

    #[test]
    fn easel_error_from_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file missing");
        let err: EaselError = io_err.into();
        assert!(matches!(err, EaselError::Io(_)));
        assert!(err.to_string().contains("file missing"));
    }
}
