//! FLAC encoding and Vorbis comment writing

use std::path::Path;
use flacenc::bitsink::{BitSink, ByteSink};
use flacenc::component::{BitRepr, Frame, StreamInfo};
use flacenc::error::{Verified, Verify};
use flacenc::source::{Fill, FrameBuf};
use md5::{Digest, Md5};
use crate::audio::WavAudio;
use crate::error::{Wav2FlacError, Result};
use crate::metadata::TrackInfo;

pub const DEFAULT_BLOCK_SIZE: usize = flacenc::constant::DEFAULT_BLOCK_SIZE;
pub const MIN_BLOCK_SIZE: usize = flacenc::constant::MIN_BLOCK_SIZE;
pub const MAX_BLOCK_SIZE: usize = flacenc::constant::MAX_BLOCK_SIZE;

/// Last-block, STREAMINFO type, 34 byte body.
const STREAMINFO_BLOCK_HEADER: [u8; 4] = [0x80, 0x00, 0x00, 0x22];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FlacEncoder {
    block_size: usize,
}

impl Default for FlacEncoder {
    fn default() -> Self {
        Self { block_size: DEFAULT_BLOCK_SIZE }
    }
}

impl FlacEncoder {
    pub fn new(block_size: usize) -> Result<Self> {
        if !(MIN_BLOCK_SIZE..=MAX_BLOCK_SIZE).contains(&block_size) {
            return Err(Wav2FlacError::config(format!(
                "Block size must be in range [{}, {}], got {}", MIN_BLOCK_SIZE, MAX_BLOCK_SIZE, block_size
            )));
        }
        Ok(Self { block_size })
    }

    pub fn block_size(&self) -> usize {
        self.block_size
    }

    /// Encode interleaved PCM into a complete FLAC stream.
    ///
    /// Every block except the last holds `block_size` frames. The last block
    /// carries only the frames that remain, so decoders return exactly the
    /// input samples.
    pub fn encode(&self, audio: &WavAudio) -> Result<Vec<u8>> {
        audio.validate()?;
        if audio.total_frames() == 0 {
            return Err(Wav2FlacError::wav("WAV file contains no audio frames"));
        }

        let channels = audio.channels() as usize;
        let bits = audio.bits_per_sample() as usize;

        let mut config = flacenc::config::Encoder::default();
        config.block_size = self.block_size;
        let mut short_config = config.clone();
        // Blocks below flacenc's minimum are too short for its predictors.
        short_config.subframe_coding.use_fixed = false;
        short_config.subframe_coding.use_lpc = false;
        let config = verify_config(config)?;
        let short_config = verify_config(short_config)?;

        let mut info = StreamInfo::new(audio.sample_rate() as usize, channels, bits)
            .map_err(|e| Wav2FlacError::encode(format!("Invalid stream parameters: {:?}", e)))?;
        let mut framebuf = FrameBuf::with_size(channels, self.block_size)
            .map_err(|e| Wav2FlacError::encode(format!("Invalid block size: {:?}", e)))?;

        let bytes_per_sample = (bits + 7) / 8;
        let mut md5 = Md5::new();
        let mut frames: Vec<Frame> = Vec::new();

        for (number, block) in audio.samples.chunks(self.block_size * channels).enumerate() {
            let size = block.len() / channels;
            if size != framebuf.size() {
                framebuf.resize(size);
            }
            framebuf
                .fill_interleaved(block)
                .map_err(|e| Wav2FlacError::encode(format!("Filling block {} failed: {:?}", number, e)))?;

            let frame_config = if size < MIN_BLOCK_SIZE { &short_config } else { &config };
            let frame = flacenc::encode_fixed_size_frame(frame_config, &framebuf, number, &info)
                .map_err(|e| Wav2FlacError::encode(format!("Encoding block {} failed: {:?}", number, e)))?;
            info.update_frame_info(&frame);
            frames.push(frame);

            for sample in block {
                md5.update(&sample.to_le_bytes()[..bytes_per_sample]);
            }
        }

        // A fixed-size stream advertises the nominal block size; the last block may be shorter.
        info.set_block_sizes(self.block_size, self.block_size)
            .map_err(|e| Wav2FlacError::encode(format!("Invalid block size: {:?}", e)))?;
        let digest: [u8; 16] = md5.finalize().into();
        info.set_md5_digest(&digest);

        let bytes = write_stream(&info, &frames)?;
        log::debug!(
            "Encoded {} frames in {} blocks ({}Hz, {}ch, {}bit) into {} bytes",
            audio.total_frames(), frames.len(), audio.sample_rate(), audio.channels(), audio.bits_per_sample(), bytes.len()
        );

        Ok(bytes)
    }

    /// Replace the Vorbis comment block of the FLAC file at `path`.
    ///
    /// The block is always written, with zero fields when `info` is empty.
    pub fn write_tags<P: AsRef<Path>>(path: P, info: &TrackInfo) -> Result<()> {
        let mut tag = metaflac::Tag::read_from_path(path.as_ref())?;

        let comments = tag.vorbis_comments_mut();
        comments.comments.clear();
        for (key, value) in info.vorbis_fields() {
            comments.comments.insert(key.to_string(), vec![value.to_string()]);
        }

        tag.save()?;
        Ok(())
    }
}

fn verify_config(config: flacenc::config::Encoder) -> Result<Verified<flacenc::config::Encoder>> {
    config
        .into_verified()
        .map_err(|(_, e)| Wav2FlacError::encode(format!("Invalid encoder config: {:?}", e)))
}

fn write_stream(info: &StreamInfo, frames: &[Frame]) -> Result<Vec<u8>> {
    let mut sink = ByteSink::new();
    for bytes in [&b"fLaC"[..], &STREAMINFO_BLOCK_HEADER[..]] {
        sink.write_bytes_aligned(bytes)
            .map_err(|e| Wav2FlacError::encode(format!("Writing stream header failed: {}", e)))?;
    }
    info.write(&mut sink)
        .map_err(|e| Wav2FlacError::encode(format!("Writing STREAMINFO failed: {}", e)))?;
    for frame in frames {
        frame
            .write(&mut sink)
            .map_err(|e| Wav2FlacError::encode(format!("Writing frame failed: {}", e)))?;
    }
    Ok(sink.into_inner())
}
