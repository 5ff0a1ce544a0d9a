//! Audio Input Module
//!
//! Reads integer PCM from WAV files and walks the RIFF chunks that carry tags.

pub mod riff;
pub mod wav;

pub use riff::{FourCc, RiffReader};
pub use wav::{WavAudio, AudioHeader};
