//! WAV to FLAC conversion pipeline

use std::collections::HashSet;
use std::fs::{self, File};
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use crate::audio::{riff, WavAudio};
use crate::config::Config;
use crate::error::{Wav2FlacError, Result};
use crate::flac::FlacEncoder;
use crate::metadata::{TagDecoder, TrackInfo};

#[derive(Debug)]
pub struct Converter {
    config: Config,
    decoder: TagDecoder,
    encoder: FlacEncoder,
}

impl Converter {
    pub fn new(config: Config) -> Result<Self> {
        config.validate()?;

        let decoder = TagDecoder::from_label(config.source_encoding())?;
        let encoder = FlacEncoder::new(config.block_size())?;

        log::debug!(
            "Converter ready: tags as {}, block size {}",
            decoder.encoding_name(), encoder.block_size()
        );

        Ok(Self { config, decoder, encoder })
    }

    /// `<stem>.flac` next to the input, or in the configured output directory.
    pub fn output_path_for(&self, input: &Path) -> PathBuf {
        let file_name = input.with_extension("flac");
        match self.config.output_dir() {
            Some(dir) => dir.join(file_name.file_name().unwrap_or(file_name.as_os_str())),
            None => file_name,
        }
    }

    pub fn convert_file(&self, input_path: &Path) -> Result<ConversionReport> {
        let start_time = Instant::now();

        if !input_path.is_file() {
            return Err(Wav2FlacError::io(format!(
                "Input file does not exist: {}", input_path.display()
            )));
        }

        let output_path = self.output_path_for(input_path);
        if output_path == input_path {
            return Err(Wav2FlacError::config(format!(
                "Input already has a .flac extension: {}", input_path.display()
            )));
        }
        if output_path.exists() && !self.config.overwrite() {
            return Err(Wav2FlacError::config(format!(
                "Output file already exists: {} (use --force to overwrite)", output_path.display()
            )));
        }

        let info = self.read_track_info(input_path)?;

        let audio = WavAudio::from_file(input_path)?;
        log::debug!(
            "Audio: {:.2}s, {}Hz, {}ch, {}bit",
            audio.duration(), audio.sample_rate(), audio.channels(), audio.bits_per_sample()
        );

        let flac_bytes = self.encoder.encode(&audio)?;

        if let Some(parent) = output_path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        write_flac(&output_path, &flac_bytes, &info)?;

        let output_bytes = fs::metadata(&output_path)?.len();
        log::info!("Transcoded {} to {}", input_path.display(), output_path.display());

        Ok(ConversionReport {
            input_path: input_path.to_path_buf(),
            output_path,
            info,
            sample_rate: audio.sample_rate(),
            channels: audio.channels(),
            bits_per_sample: audio.bits_per_sample(),
            total_frames: audio.total_frames(),
            input_bytes: fs::metadata(input_path)?.len(),
            output_bytes,
            processing_time: start_time.elapsed(),
        })
    }

    /// Convert every input in order; a failure never stops the batch.
    ///
    /// An input whose output path was already written earlier in the same
    /// batch fails instead of replacing that file, even with overwrite on.
    pub fn convert_all<P: AsRef<Path>>(&self, inputs: &[P]) -> BatchSummary {
        let mut summary = BatchSummary::default();
        let mut written: HashSet<PathBuf> = HashSet::new();

        for input in inputs {
            let input = input.as_ref();
            log::debug!("Processing: {}", input.display());

            let output_path = self.output_path_for(input);
            let result = if written.contains(&output_path) {
                Err(Wav2FlacError::config(format!(
                    "Output file {} was already written for another input in this run",
                    output_path.display()
                )))
            } else {
                self.convert_file(input)
            };

            match result {
                Ok(report) => {
                    written.insert(report.output_path.clone());
                    summary.converted.push(report);
                }
                Err(e) => {
                    log::debug!("Conversion of {} failed: {}", input.display(), e);
                    summary.failed.push((input.to_path_buf(), e));
                }
            }
        }

        summary
    }

    fn read_track_info(&self, path: &Path) -> Result<TrackInfo> {
        let file = File::open(path)
            .map_err(|e| Wav2FlacError::io(format!("Cannot open audio file {}: {}", path.display(), e)))?;

        match riff::find_info_list(BufReader::new(file))? {
            Some(body) => self.decoder.decode_info(&body),
            None => {
                log::info!("No INFO tags in {}", path.display());
                Ok(TrackInfo::default())
            }
        }
    }
}

/// Write encoded bytes and tags to a sibling `.part` file, then move it into
/// place so a failed file never leaves output behind.
fn write_flac(output_path: &Path, flac_bytes: &[u8], info: &TrackInfo) -> Result<()> {
    let part_path = output_path.with_extension("flac.part");

    let result = fs::write(&part_path, flac_bytes)
        .map_err(Wav2FlacError::from)
        .and_then(|()| FlacEncoder::write_tags(&part_path, info))
        .and_then(|()| fs::rename(&part_path, output_path).map_err(Wav2FlacError::from));

    if result.is_err() {
        let _ = fs::remove_file(&part_path);
    }
    result
}

#[derive(Debug, Clone)]
pub struct ConversionReport {
    pub input_path: PathBuf,
    pub output_path: PathBuf,
    pub info: TrackInfo,
    pub sample_rate: u32,
    pub channels: u16,
    pub bits_per_sample: u16,
    pub total_frames: u32,
    pub input_bytes: u64,
    pub output_bytes: u64,
    pub processing_time: Duration,
}

impl ConversionReport {
    pub fn compression_ratio(&self) -> f64 {
        if self.input_bytes == 0 {
            return 0.0;
        }
        self.output_bytes as f64 / self.input_bytes as f64
    }
}

#[derive(Debug, Default)]
pub struct BatchSummary {
    pub converted: Vec<ConversionReport>,
    pub failed: Vec<(PathBuf, Wav2FlacError)>,
}

impl BatchSummary {
    pub fn total(&self) -> usize {
        self.converted.len() + self.failed.len()
    }

    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }
}
