//! wav2flac - SHIFT-JIS tagged WAV to FLAC converter

use anyhow::Context;
use clap::Parser;
use std::process;
use wav2flac::{init_logging, Args, BatchSummary, Config, Converter};

fn main() {
    let args = Args::parse();

    if let Err(e) = run(args) {
        eprintln!("Error: {:#}", e);
        process::exit(1);
    }
}

fn run(args: Args) -> anyhow::Result<()> {
    let config = Config::from_args_and_config(args).context("Invalid configuration")?;
    init_logging(config.verbose());

    log::debug!("wav2flac {} converting {} file(s)", wav2flac::VERSION, config.inputs().len());

    let converter = Converter::new(config.clone())?;
    let summary = converter.convert_all(config.inputs());
    report(&summary, config.verbose());

    if !summary.is_success() {
        anyhow::bail!("{} of {} files failed to convert", summary.failed.len(), summary.total());
    }
    Ok(())
}

fn report(summary: &BatchSummary, verbose: bool) {
    for result in &summary.converted {
        println!("{} -> {}", result.input_path.display(), result.output_path.display());
        if verbose {
            println!(
                "  {}Hz, {}ch, {}bit, {} frames, {:.1}% of WAV size, {:.2}s",
                result.sample_rate,
                result.channels,
                result.bits_per_sample,
                result.total_frames,
                result.compression_ratio() * 100.0,
                result.processing_time.as_secs_f64()
            );
            println!("  Tags: {}", result.info);
        }
    }

    for (path, err) in &summary.failed {
        eprintln!("Failed: {}: {}", path.display(), err);
    }
}
