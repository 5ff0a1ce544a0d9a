//! End-to-end tests of the wav2flac binary

use assert_cmd::Command;
use predicates::prelude::*;
use std::path::Path;
use tempfile::TempDir;

fn write_wav(path: &Path, channels: u16, bits: u16, frames: u32) -> Vec<i32> {
    let spec = hound::WavSpec {
        channels,
        sample_rate: 48000,
        bits_per_sample: bits,
        sample_format: hound::SampleFormat::Int,
    };
    let max = (1i32 << (bits - 1)) - 1;
    let samples: Vec<i32> = (0..(frames * channels as u32) as i32)
        .map(|i| (i * 131 % (2 * max)) - max)
        .collect();

    let mut writer = hound::WavWriter::create(path, spec).unwrap();
    for &s in &samples {
        writer.write_sample(s).unwrap();
    }
    writer.finalize().unwrap();
    samples
}

fn sjis(text: &str) -> Vec<u8> {
    let (bytes, _, had_errors) = encoding_rs::SHIFT_JIS.encode(text);
    assert!(!had_errors);
    let mut bytes = bytes.into_owned();
    bytes.push(0);
    bytes
}

fn append_info_list(path: &Path, entries: &[(&[u8; 4], Vec<u8>)]) {
    let mut body = b"INFO".to_vec();
    for (id, data) in entries {
        body.extend_from_slice(&id[..]);
        body.extend_from_slice(&(data.len() as u32).to_le_bytes());
        body.extend_from_slice(data);
        if data.len() % 2 == 1 {
            body.push(0);
        }
    }

    let mut bytes = std::fs::read(path).unwrap();
    if bytes.len() % 2 == 1 {
        bytes.push(0);
    }
    bytes.extend_from_slice(b"LIST");
    bytes.extend_from_slice(&(body.len() as u32).to_le_bytes());
    bytes.extend_from_slice(&body);
    let riff_size = (bytes.len() - 8) as u32;
    bytes[4..8].copy_from_slice(&riff_size.to_le_bytes());
    std::fs::write(path, bytes).unwrap();
}

fn wav2flac() -> Command {
    let mut cmd = Command::cargo_bin("wav2flac").unwrap();
    cmd.env_remove("RUST_LOG");
    cmd
}

#[test]
fn test_requires_files() {
    wav2flac()
        .assert()
        .failure()
        .stderr(predicate::str::contains("FILES"));
}

#[test]
fn test_version_flag() {
    wav2flac()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn test_converts_multiple_files() {
    let dir = TempDir::new().unwrap();
    let first = dir.path().join("01.wav");
    let second = dir.path().join("02.wav");
    let first_samples = write_wav(&first, 2, 16, 4_000);
    write_wav(&second, 1, 24, 2_000);
    append_info_list(&first, &[
        (b"INAM", sjis("さくら")),
        (b"IPRD", sjis("春の歌集")),
        (b"ICRD", sjis("2010")),
    ]);

    wav2flac()
        .arg(&first)
        .arg(&second)
        .assert()
        .success()
        .stdout(predicate::str::contains("01.flac"))
        .stdout(predicate::str::contains("02.flac"));

    let flac = dir.path().join("01.flac");
    let tag = metaflac::Tag::read_from_path(&flac).unwrap();
    let comments = &tag.vorbis_comments().unwrap().comments;
    assert_eq!(comments.get("TITLE"), Some(&vec!["さくら".to_string()]));
    assert_eq!(comments.get("ALBUM"), Some(&vec!["春の歌集".to_string()]));
    assert_eq!(comments.get("DATE"), Some(&vec!["2010".to_string()]));

    let mut reader = claxon::FlacReader::open(&flac).unwrap();
    assert_eq!(reader.streaminfo().sample_rate, 48000);
    assert_eq!(reader.streaminfo().bits_per_sample, 16);
    let decoded: Vec<i32> = reader.samples().map(|s| s.unwrap()).collect();
    assert_eq!(decoded, first_samples);

    let reader = claxon::FlacReader::open(dir.path().join("02.flac")).unwrap();
    assert_eq!(reader.streaminfo().bits_per_sample, 24);
    assert_eq!(reader.streaminfo().channels, 1);

    assert!(first.exists());
    assert!(second.exists());
}

#[test]
fn test_non_wav_reports_error_and_writes_nothing() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("fake.wav");
    std::fs::write(&input, b"ID3 definitely not a wav file").unwrap();

    wav2flac()
        .arg(&input)
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("fake.wav"))
        .stderr(predicate::str::contains("1 of 1 files failed"));

    assert!(!dir.path().join("fake.flac").exists());
}

#[test]
fn test_partial_failure_sets_exit_status() {
    let dir = TempDir::new().unwrap();
    let good = dir.path().join("good.wav");
    write_wav(&good, 1, 16, 500);
    let missing = dir.path().join("missing.wav");

    wav2flac()
        .arg(&missing)
        .arg(&good)
        .assert()
        .failure()
        .stderr(predicate::str::contains("missing.wav"))
        .stderr(predicate::str::contains("1 of 2 files failed"));

    assert!(dir.path().join("good.flac").exists());
}

#[test]
fn test_output_dir_and_force() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("take.wav");
    write_wav(&input, 2, 16, 300);
    let out_dir = dir.path().join("flac");

    wav2flac()
        .arg("-o")
        .arg(&out_dir)
        .arg(&input)
        .assert()
        .success();
    assert!(out_dir.join("take.flac").exists());

    wav2flac()
        .arg("-o")
        .arg(&out_dir)
        .arg(&input)
        .assert()
        .failure()
        .stderr(predicate::str::contains("already exists"));

    wav2flac()
        .args(["--force", "-o"])
        .arg(&out_dir)
        .arg(&input)
        .assert()
        .success();
}

#[test]
fn test_same_stem_inputs_do_not_overwrite_each_other() {
    let dir = TempDir::new().unwrap();
    std::fs::create_dir_all(dir.path().join("a")).unwrap();
    std::fs::create_dir_all(dir.path().join("b")).unwrap();
    let first = dir.path().join("a").join("x.wav");
    let second = dir.path().join("b").join("x.wav");
    let first_samples = write_wav(&first, 1, 16, 700);
    write_wav(&second, 2, 16, 900);
    let out_dir = dir.path().join("out");

    wav2flac()
        .args(["--force", "-o"])
        .arg(&out_dir)
        .arg(&first)
        .arg(&second)
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("another input"))
        .stderr(predicate::str::contains("1 of 2 files failed"));

    let mut reader = claxon::FlacReader::open(out_dir.join("x.flac")).unwrap();
    let decoded: Vec<i32> = reader.samples().map(|s| s.unwrap()).collect();
    assert_eq!(decoded, first_samples);
}

#[test]
fn test_odd_length_audio_round_trips() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("odd.wav");
    let samples = write_wav(&input, 2, 24, 4_097);

    wav2flac().arg(&input).assert().success();

    let mut reader = claxon::FlacReader::open(dir.path().join("odd.flac")).unwrap();
    let decoded: Vec<i32> = reader.samples().map(|s| s.unwrap()).collect();
    assert_eq!(decoded.len(), samples.len());
    assert_eq!(decoded, samples);
}

#[test]
fn test_rejects_unknown_encoding() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("x.wav");
    write_wav(&input, 1, 16, 10);

    wav2flac()
        .args(["--encoding", "klingon"])
        .arg(&input)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown text encoding"));

    assert!(!dir.path().join("x.flac").exists());
}
