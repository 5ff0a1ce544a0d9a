//! Configuration management for WAV to FLAC conversion

use crate::error::{Wav2FlacError, Result};
use crate::flac::encoder::{DEFAULT_BLOCK_SIZE, MAX_BLOCK_SIZE, MIN_BLOCK_SIZE};
use crate::metadata::TagDecoder;
use clap::Parser;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub encoding: EncodingConfig,
    pub flac: FlacConfig,
    pub output: OutputConfig,
    pub logging: LoggingConfig,
    #[serde(skip)]
    pub inputs: Vec<PathBuf>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EncodingConfig {
    /// Label of the character encoding used by the WAV INFO tags
    pub source: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FlacConfig {
    pub block_size: usize,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Write FLAC files here instead of next to their source
    pub directory: Option<PathBuf>,
    pub overwrite: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub verbose: bool,
}

impl Default for EncodingConfig {
    fn default() -> Self {
        Self {
            source: "Shift_JIS".to_string(),
        }
    }
}

impl Default for FlacConfig {
    fn default() -> Self {
        Self {
            block_size: DEFAULT_BLOCK_SIZE,
        }
    }
}

impl Config {
    pub fn source_encoding(&self) -> &str {
        &self.encoding.source
    }

    pub fn block_size(&self) -> usize {
        self.flac.block_size
    }

    pub fn output_dir(&self) -> Option<&Path> {
        self.output.directory.as_deref()
    }

    pub fn overwrite(&self) -> bool {
        self.output.overwrite
    }

    pub fn verbose(&self) -> bool {
        self.logging.verbose
    }

    pub fn inputs(&self) -> &[PathBuf] {
        &self.inputs
    }
}

#[derive(Debug, Clone, Parser)]
#[command(
    name = "wav2flac",
    about = "Converts wav files to flac files. The flac file is written next to the wav file. \
             It assumes that the input wav file tags are written in SHIFT-JIS.",
    version
)]
pub struct Args {
    #[arg(value_name = "FILES", required = true, num_args = 1.., help = "Audio files to be converted to flac")]
    pub files: Vec<PathBuf>,

    #[arg(short = 'o', long = "output-dir", help = "Write FLAC files to this directory")]
    pub output_dir: Option<PathBuf>,

    #[arg(short = 'e', long = "encoding", help = "Character encoding of the WAV tags [default: Shift_JIS]")]
    pub encoding: Option<String>,

    #[arg(short = 'b', long = "block-size", help = "FLAC block size in samples [default: 4096]")]
    pub block_size: Option<usize>,

    #[arg(short = 'f', long = "force", help = "Overwrite existing FLAC files")]
    pub force: bool,

    #[arg(short = 'c', long = "config", help = "Config file path (TOML format)")]
    pub config_file: Option<PathBuf>,

    #[arg(short = 'v', long = "verbose", help = "Enable verbose output mode")]
    pub verbose: bool,
}

impl Config {
    /// Create config from command line arguments and config file
    pub fn from_args_and_config(args: Args) -> Result<Self> {
        let mut config = if let Some(config_path) = &args.config_file {
            Self::from_file(config_path)?
        } else {
            Self::default()
        };

        // Command line arguments override config file settings
        if let Some(dir) = args.output_dir {
            config.output.directory = Some(dir);
        }
        if let Some(encoding) = args.encoding {
            config.encoding.source = encoding;
        }
        if let Some(block_size) = args.block_size {
            config.flac.block_size = block_size;
        }
        config.output.overwrite |= args.force;
        config.logging.verbose |= args.verbose;
        config.inputs = args.files;

        if config.inputs.is_empty() {
            return Err(Wav2FlacError::config("At least one input file is required"));
        }

        config.validate()?;

        Ok(config)
    }

    /// Load config from TOML config file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| Wav2FlacError::config(format!("Failed to read config file: {}", e)))?;

        toml::from_str(&content)
            .map_err(|e| Wav2FlacError::config(format!("Failed to parse config file: {}", e)))
    }

    pub fn validate(&self) -> Result<()> {
        TagDecoder::from_label(&self.encoding.source)?;

        if !(MIN_BLOCK_SIZE..=MAX_BLOCK_SIZE).contains(&self.flac.block_size) {
            return Err(Wav2FlacError::config(format!(
                "Block size must be in range [{}, {}]", MIN_BLOCK_SIZE, MAX_BLOCK_SIZE
            )));
        }

        if let Some(dir) = &self.output.directory {
            if dir.exists() && !dir.is_dir() {
                return Err(Wav2FlacError::config(format!(
                    "Output path is not a directory: {}", dir.display()
                )));
            }
        }

        Ok(())
    }

    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| Wav2FlacError::config(format!("Failed to serialize config: {}", e)))?;

        std::fs::write(path, content)
            .map_err(|e| Wav2FlacError::config(format!("Failed to write config file: {}", e)))
    }
}
