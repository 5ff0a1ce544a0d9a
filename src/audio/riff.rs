//! RIFF chunk walking
//!
//! `hound` only looks at `fmt ` and `data`; tags live in a `LIST` chunk of
//! type `INFO`, which this module locates and splits into sub-chunks.

use std::fmt;
use std::io::{ErrorKind, Read, Seek, SeekFrom};
use crate::error::{Wav2FlacError, Result};

pub const RIFF_ID: FourCc = FourCc(*b"RIFF");
pub const WAVE_TYPE: FourCc = FourCc(*b"WAVE");
pub const LIST_ID: FourCc = FourCc(*b"LIST");
pub const INFO_TYPE: FourCc = FourCc(*b"INFO");

/// Four-character chunk identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FourCc(pub [u8; 4]);

impl FourCc {
    pub fn from_slice(bytes: &[u8]) -> Option<Self> {
        let id: [u8; 4] = bytes.get(..4)?.try_into().ok()?;
        Some(Self(id))
    }

    pub fn as_bytes(&self) -> &[u8; 4] {
        &self.0
    }
}

impl fmt::Display for FourCc {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for &b in &self.0 {
            if b.is_ascii_graphic() || b == b' ' {
                write!(f, "{}", b as char)?;
            } else {
                write!(f, "\\x{:02x}", b)?;
            }
        }
        Ok(())
    }
}

/// Chunk header with the absolute offset of its payload
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChunkHeader {
    pub id: FourCc,
    pub size: u32,
    pub offset: u64,
}

impl ChunkHeader {
    pub fn end(&self) -> u64 {
        self.offset + self.size as u64
    }
}

/// Sub-chunk of an in-memory list payload
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chunk<'a> {
    pub id: FourCc,
    pub data: &'a [u8],
}

/// Sequential reader over the top-level chunks of a RIFF/WAVE stream
pub struct RiffReader<R> {
    inner: R,
    end: u64,
    pos: u64,
    next: u64,
}

impl<R: Read + Seek> RiffReader<R> {
    pub fn new(mut inner: R) -> Result<Self> {
        let len = inner.seek(SeekFrom::End(0))?;
        inner.seek(SeekFrom::Start(0))?;

        let mut preamble = [0u8; 12];
        inner.read_exact(&mut preamble).map_err(|e| match e.kind() {
            ErrorKind::UnexpectedEof => Wav2FlacError::wav("File is too short to be a WAV file"),
            _ => e.into(),
        })?;

        let id = FourCc([preamble[0], preamble[1], preamble[2], preamble[3]]);
        if id != RIFF_ID {
            return Err(Wav2FlacError::wav(format!("Expected RIFF header, found '{}'", id)));
        }
        let form = FourCc([preamble[8], preamble[9], preamble[10], preamble[11]]);
        if form != WAVE_TYPE {
            return Err(Wav2FlacError::wav(format!("Expected WAVE form type, found '{}'", form)));
        }

        let declared = 8 + u32::from_le_bytes([preamble[4], preamble[5], preamble[6], preamble[7]]) as u64;
        if declared > len {
            log::warn!("RIFF size {} exceeds file length {}, clamping", declared, len);
        }
        let end = declared.min(len);

        Ok(Self { inner, end, pos: 12, next: 12 })
    }

    /// Advance to the next chunk, skipping whatever remains of the current one.
    pub fn next_chunk(&mut self) -> Result<Option<ChunkHeader>> {
        if self.pos != self.next {
            self.inner.seek(SeekFrom::Start(self.next))?;
            self.pos = self.next;
        }

        // Word-alignment pad bytes are zero, as are the stray bytes some
        // writers leave between chunks.
        let first = loop {
            if self.pos >= self.end {
                return Ok(None);
            }
            let mut byte = [0u8; 1];
            self.inner.read_exact(&mut byte)?;
            self.pos += 1;
            if byte[0] != 0 {
                break byte[0];
            }
        };

        if self.pos + 7 > self.end {
            return Err(Wav2FlacError::wav(format!(
                "Truncated chunk header at offset {}", self.pos - 1
            )));
        }

        let mut rest = [0u8; 7];
        self.inner.read_exact(&mut rest)?;
        self.pos += 7;

        let header = ChunkHeader {
            id: FourCc([first, rest[0], rest[1], rest[2]]),
            size: u32::from_le_bytes([rest[3], rest[4], rest[5], rest[6]]),
            offset: self.pos,
        };
        self.next = header.end().min(self.end);

        log::debug!("Chunk: {} {}", header.id, header.size);
        Ok(Some(header))
    }

    pub fn read_payload(&mut self, header: &ChunkHeader) -> Result<Vec<u8>> {
        if header.end() > self.end {
            return Err(Wav2FlacError::wav(format!(
                "Chunk '{}' declares {} bytes but only {} remain",
                header.id, header.size, self.end.saturating_sub(header.offset)
            )));
        }

        self.inner.seek(SeekFrom::Start(header.offset))?;
        let mut data = vec![0u8; header.size as usize];
        self.inner.read_exact(&mut data)?;
        self.pos = header.end();
        Ok(data)
    }
}

/// Return the body (after the `INFO` type tag) of the first `LIST`/`INFO`
/// chunk, or `None` when the file carries no INFO list.
pub fn find_info_list<R: Read + Seek>(reader: R) -> Result<Option<Vec<u8>>> {
    let mut riff = RiffReader::new(reader)?;

    while let Some(header) = riff.next_chunk()? {
        if header.id != LIST_ID {
            continue;
        }

        let payload = riff.read_payload(&header)?;
        match FourCc::from_slice(&payload) {
            Some(INFO_TYPE) => return Ok(Some(payload[4..].to_vec())),
            Some(other) => log::debug!("Skipping LIST chunk of type {}", other),
            None => log::warn!("Skipping LIST chunk without a type tag"),
        }
    }

    Ok(None)
}

/// Split a list body into its sub-chunks.
pub fn split_chunks(data: &[u8]) -> Result<Vec<Chunk<'_>>> {
    let mut chunks = Vec::new();
    let mut pos = 0usize;

    loop {
        while pos < data.len() && data[pos] == 0 {
            pos += 1;
        }
        if pos >= data.len() {
            break;
        }
        if data.len() - pos < 8 {
            return Err(Wav2FlacError::wav(format!(
                "Truncated sub-chunk header at offset {}", pos
            )));
        }

        let id = FourCc([data[pos], data[pos + 1], data[pos + 2], data[pos + 3]]);
        let size = u32::from_le_bytes([data[pos + 4], data[pos + 5], data[pos + 6], data[pos + 7]]) as usize;
        let start = pos + 8;
        let remaining = data.len() - start;
        if size > remaining {
            return Err(Wav2FlacError::wav(format!(
                "Sub-chunk '{}' declares {} bytes but only {} remain", id, size, remaining
            )));
        }

        log::debug!("Subchunk: {} {}", id, size);
        chunks.push(Chunk { id, data: &data[start..start + size] });
        pos = start + size;
    }

    Ok(chunks)
}
