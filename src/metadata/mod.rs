//! Track metadata
//!
//! `TrackInfo` is the encoding-neutral tag set carried from the WAV INFO list
//! into the FLAC Vorbis comment block.

pub mod info;

use std::fmt;

pub use info::TagDecoder;

/// Decoded tags of one track. Every field is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TrackInfo {
    pub title: Option<String>,
    pub album: Option<String>,
    pub date: Option<String>,
    pub genre: Option<String>,
    pub artist: Option<String>,
    pub comment: Option<String>,
    pub track_number: Option<String>,
    pub copyright: Option<String>,
    pub encoder: Option<String>,
}

impl TrackInfo {
    pub fn is_empty(&self) -> bool {
        self.vorbis_fields().is_empty()
    }

    /// Populated fields as Vorbis comment `(FIELD, value)` pairs.
    pub fn vorbis_fields(&self) -> Vec<(&'static str, &str)> {
        [
            ("TITLE", &self.title),
            ("ALBUM", &self.album),
            ("DATE", &self.date),
            ("GENRE", &self.genre),
            ("ARTIST", &self.artist),
            ("COMMENT", &self.comment),
            ("TRACKNUMBER", &self.track_number),
            ("COPYRIGHT", &self.copyright),
            ("ENCODER", &self.encoder),
        ]
        .into_iter()
        .filter_map(|(key, value)| value.as_deref().map(|v| (key, v)))
        .collect()
    }
}

impl fmt::Display for TrackInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let fields = self.vorbis_fields();
        if fields.is_empty() {
            return write!(f, "(no tags)");
        }
        for (i, (key, value)) in fields.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}={:?}", key.to_ascii_lowercase(), value)?;
        }
        Ok(())
    }
}
