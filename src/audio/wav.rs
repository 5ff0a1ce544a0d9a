//! WAV audio file processing

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;
use hound::{SampleFormat, WavReader, WavWriter};
use crate::error::{Wav2FlacError, Result};

/// Bit depths FLAC can hold losslessly
pub const MIN_BITS_PER_SAMPLE: u16 = 4;
pub const MAX_BITS_PER_SAMPLE: u16 = 24;
pub const MAX_CHANNELS: u16 = 8;

#[derive(Debug, Clone, PartialEq)]
pub struct AudioHeader {
    pub sample_rate: u32,
    pub channels: u16,
    pub bits_per_sample: u16,
    pub total_frames: u32,
    pub duration: f64,
}

impl AudioHeader {
    pub fn new(sample_rate: u32, channels: u16, bits_per_sample: u16, total_frames: u32) -> Self {
        let duration = if sample_rate > 0 {
            total_frames as f64 / sample_rate as f64
        } else {
            0.0
        };

        Self {
            sample_rate,
            channels,
            bits_per_sample,
            total_frames,
            duration,
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.sample_rate == 0 {
            return Err(Wav2FlacError::wav("Sample rate cannot be 0"));
        }

        if self.channels == 0 || self.channels > MAX_CHANNELS {
            return Err(Wav2FlacError::wav(format!(
                "Channel count must be between 1 and {}, found {}", MAX_CHANNELS, self.channels
            )));
        }

        if self.bits_per_sample < MIN_BITS_PER_SAMPLE || self.bits_per_sample > MAX_BITS_PER_SAMPLE {
            return Err(Wav2FlacError::wav(format!(
                "Unsupported bit depth for lossless FLAC: {}", self.bits_per_sample
            )));
        }

        Ok(())
    }

    pub fn total_samples(&self) -> usize {
        self.total_frames as usize * self.channels as usize
    }

    pub fn to_wav_spec(&self) -> hound::WavSpec {
        hound::WavSpec {
            channels: self.channels,
            sample_rate: self.sample_rate,
            bits_per_sample: self.bits_per_sample,
            sample_format: SampleFormat::Int,
        }
    }
}

/// Integer PCM audio with interleaved samples
#[derive(Debug, Clone)]
pub struct WavAudio {
    pub header: AudioHeader,
    pub samples: Vec<i32>,
}

impl WavAudio {
    pub fn new(header: AudioHeader, samples: Vec<i32>) -> Result<Self> {
        let audio = Self { header, samples };
        audio.validate()?;
        Ok(audio)
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        let file = File::open(path)
            .map_err(|e| Wav2FlacError::Io {
                message: format!("Cannot open audio file {}: {}", path.display(), e)
            })?;

        Self::from_reader(BufReader::new(file))
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let mut reader = WavReader::new(reader)
            .map_err(|e| Wav2FlacError::Wav {
                message: format!("Cannot read WAV header: {}", e)
            })?;

        let spec = reader.spec();
        if spec.sample_format == SampleFormat::Float {
            return Err(Wav2FlacError::wav(format!(
                "Floating-point WAV ({}-bit) cannot be stored losslessly in FLAC",
                spec.bits_per_sample
            )));
        }

        let header = AudioHeader::new(spec.sample_rate, spec.channels, spec.bits_per_sample, reader.duration());
        header.validate()?;

        let samples: Result<Vec<i32>> = reader.samples::<i32>()
            .map(|sample| sample.map_err(|e| Wav2FlacError::Wav {
                message: format!("Failed to read sample: {}", e)
            }))
            .collect();
        let samples = samples?;

        if samples.len() % header.channels as usize != 0 {
            return Err(Wav2FlacError::wav(format!(
                "Sample count {} is not a multiple of channel count {}",
                samples.len(), header.channels
            )));
        }

        Ok(WavAudio { header, samples })
    }

    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();

        let file = File::create(path)
            .map_err(|e| Wav2FlacError::Io {
                message: format!("Cannot create output file {}: {}", path.display(), e)
            })?;

        let mut writer = WavWriter::new(std::io::BufWriter::new(file), self.header.to_wav_spec())?;
        for &sample in &self.samples {
            writer.write_sample(sample)?;
        }
        writer.finalize()?;

        Ok(())
    }

    pub fn sample_rate(&self) -> u32 {
        self.header.sample_rate
    }

    pub fn channels(&self) -> u16 {
        self.header.channels
    }

    pub fn bits_per_sample(&self) -> u16 {
        self.header.bits_per_sample
    }

    pub fn total_frames(&self) -> u32 {
        self.header.total_frames
    }

    pub fn duration(&self) -> f64 {
        self.header.duration
    }

    pub fn validate(&self) -> Result<()> {
        self.header.validate()?;

        if self.samples.len() != self.header.total_samples() {
            return Err(Wav2FlacError::wav(format!(
                "Data length mismatch: header shows {} samples, actual {} samples",
                self.header.total_samples(), self.samples.len()
            )));
        }

        let limit = 1i64 << (self.header.bits_per_sample - 1);
        if let Some(pos) = self.samples.iter().position(|&s| (s as i64) < -limit || (s as i64) >= limit) {
            return Err(Wav2FlacError::wav(format!(
                "Sample {} at position {} does not fit in {} bits",
                self.samples[pos], pos, self.header.bits_per_sample
            )));
        }

        Ok(())
    }
}
