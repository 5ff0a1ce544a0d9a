//! RIFF INFO tag decoding

use encoding_rs::{Encoding, SHIFT_JIS};
use crate::audio::riff::{self, FourCc};
use crate::error::{Wav2FlacError, Result};
use super::TrackInfo;

/// Decodes INFO sub-chunk payloads with a fixed legacy encoding.
#[derive(Debug, Clone, Copy)]
pub struct TagDecoder {
    encoding: &'static Encoding,
}

impl Default for TagDecoder {
    fn default() -> Self {
        Self::shift_jis()
    }
}

impl TagDecoder {
    pub fn new(encoding: &'static Encoding) -> Self {
        Self { encoding }
    }

    pub fn shift_jis() -> Self {
        Self::new(SHIFT_JIS)
    }

    /// Look up a WHATWG encoding label such as `Shift_JIS`, `sjis` or `windows-31j`.
    pub fn from_label(label: &str) -> Result<Self> {
        Encoding::for_label(label.trim().as_bytes())
            .map(Self::new)
            .ok_or_else(|| Wav2FlacError::config(format!("Unknown text encoding: {}", label)))
    }

    pub fn encoding_name(&self) -> &'static str {
        self.encoding.name()
    }

    /// Decode one tag value. Trailing NULs are dropped; an empty value is `None`.
    pub fn decode_text(&self, bytes: &[u8]) -> Result<Option<String>> {
        let end = bytes.iter().rposition(|&b| b != 0).map_or(0, |i| i + 1);
        let bytes = &bytes[..end];
        if bytes.is_empty() {
            return Ok(None);
        }

        self.encoding
            .decode_without_bom_handling_and_without_replacement(bytes)
            .map(|text| Some(text.into_owned()))
            .ok_or_else(|| Wav2FlacError::tag(format!(
                "Tag bytes are not valid {}: {:02x?}", self.encoding.name(), bytes
            )))
    }

    /// Decode the body of a `LIST`/`INFO` chunk.
    pub fn decode_info(&self, body: &[u8]) -> Result<TrackInfo> {
        let mut info = TrackInfo::default();

        for chunk in riff::split_chunks(body)? {
            let Some(slot) = field_for(&mut info, chunk.id) else {
                log::debug!("Ignoring INFO field {}", chunk.id);
                continue;
            };

            let value = self.decode_text(chunk.data).map_err(|e| match e {
                Wav2FlacError::Tag { message } => Wav2FlacError::tag(format!("{}: {}", chunk.id, message)),
                other => other,
            })?;
            if value.is_some() {
                *slot = value;
            }
        }

        log::info!("Track info: {}", info);
        Ok(info)
    }
}

fn field_for(info: &mut TrackInfo, id: FourCc) -> Option<&mut Option<String>> {
    match id.as_bytes() {
        b"INAM" => Some(&mut info.title),
        b"IPRD" => Some(&mut info.album),
        b"ICRD" => Some(&mut info.date),
        b"IGNR" => Some(&mut info.genre),
        b"IART" => Some(&mut info.artist),
        b"ICMT" => Some(&mut info.comment),
        b"IPRT" | b"ITRK" => Some(&mut info.track_number),
        b"ICOP" => Some(&mut info.copyright),
        b"ISFT" => Some(&mut info.encoder),
        _ => None,
    }
}
