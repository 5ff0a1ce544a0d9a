//! Fixture helpers shared by unit tests

use std::path::Path;
use encoding_rs::SHIFT_JIS;
use crate::audio::WavAudio;

pub fn sjis(text: &str) -> Vec<u8> {
    let (bytes, _, had_errors) = SHIFT_JIS.encode(text);
    assert!(!had_errors, "{:?} is not representable in Shift_JIS", text);
    let mut bytes = bytes.into_owned();
    bytes.push(0);
    bytes
}

pub fn write_pcm_wav(path: &Path, audio: &WavAudio) {
    audio.save_to_file(path).unwrap();
}

/// Append a `LIST`/`INFO` chunk after the audio data and patch the RIFF size.
pub fn append_info_list(path: &Path, entries: &[(&[u8; 4], Vec<u8>)]) {
    let mut body = b"INFO".to_vec();
    for (id, data) in entries {
        body.extend_from_slice(&id[..]);
        body.extend_from_slice(&(data.len() as u32).to_le_bytes());
        body.extend_from_slice(data);
        if data.len() % 2 == 1 {
            body.push(0);
        }
    }

    let mut bytes = std::fs::read(path).unwrap();
    if bytes.len() % 2 == 1 {
        bytes.push(0);
    }
    bytes.extend_from_slice(b"LIST");
    bytes.extend_from_slice(&(body.len() as u32).to_le_bytes());
    bytes.extend_from_slice(&body);

    let riff_size = (bytes.len() - 8) as u32;
    bytes[4..8].copy_from_slice(&riff_size.to_le_bytes());
    std::fs::write(path, bytes).unwrap();
}
