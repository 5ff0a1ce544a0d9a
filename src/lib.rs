//! wav2flac - WAV to FLAC converter for SHIFT-JIS tagged files
//!
//! Re-encodes integer PCM losslessly and carries RIFF INFO tags over as
//! UTF-8 Vorbis comments.

pub mod audio;
pub mod config;
pub mod error;
pub mod flac;
pub mod metadata;
pub mod processing;

#[cfg(test)]
mod testing;

pub use config::{Config, Args};
pub use error::{Wav2FlacError, Result};
pub use processing::{BatchSummary, ConversionReport, Converter};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Install the `env_logger` backend. `RUST_LOG` wins over the default level.
pub fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .try_init()
        .ok();
}
