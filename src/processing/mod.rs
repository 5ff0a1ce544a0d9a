//! Conversion Pipeline

pub mod converter;

pub use converter::{BatchSummary, ConversionReport, Converter};
