//! FLAC Output Module

pub mod encoder;

pub use encoder::FlacEncoder;
