//! Error Types

use thiserror::Error;

/// Main error type
#[derive(Debug, Clone, Error)]
pub enum Wav2FlacError {
    #[error("WAV error: {message}")]
    Wav { message: String },
    #[error("Tag error: {message}")]
    Tag { message: String },
    #[error("FLAC encode error: {message}")]
    Encode { message: String },
    #[error("Config error: {message}")]
    Config { message: String },
    #[error("IO error: {message}")]
    Io { message: String },
}

impl Wav2FlacError {
    pub fn wav<S: Into<String>>(msg: S) -> Self { Self::Wav { message: msg.into() } }
    pub fn tag<S: Into<String>>(msg: S) -> Self { Self::Tag { message: msg.into() } }
    pub fn encode<S: Into<String>>(msg: S) -> Self { Self::Encode { message: msg.into() } }
    pub fn config<S: Into<String>>(msg: S) -> Self { Self::Config { message: msg.into() } }
    pub fn io<S: Into<String>>(msg: S) -> Self { Self::Io { message: msg.into() } }
}

pub type Result<T> = std::result::Result<T, Wav2FlacError>;

impl From<std::io::Error> for Wav2FlacError {
    fn from(err: std::io::Error) -> Self { Self::io(err.to_string()) }
}

impl From<hound::Error> for Wav2FlacError {
    fn from(err: hound::Error) -> Self {
        match err {
            hound::Error::IoError(e) => Self::io(e.to_string()),
            other => Self::wav(other.to_string()),
        }
    }
}

impl From<metaflac::Error> for Wav2FlacError {
    fn from(err: metaflac::Error) -> Self { Self::encode(format!("metadata: {}", err)) }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let e = Wav2FlacError::wav("test");
        assert!(e.to_string().contains("WAV"));

        let e = Wav2FlacError::tag("bad bytes");
        assert_eq!(e.to_string(), "Tag error: bad bytes");
    }

    #[test]
    fn test_hound_format_error_maps_to_wav() {
        let e: Wav2FlacError = hound::Error::FormatError("no RIFF tag found").into();
        assert!(matches!(e, Wav2FlacError::Wav { .. }));
    }

    #[test]
    fn test_io_error_conversion() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let e: Wav2FlacError = io.into();
        assert!(matches!(e, Wav2FlacError::Io { .. }));
    }
}
