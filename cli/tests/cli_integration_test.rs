use std::fs;
use std::path::PathBuf;
use std::process::{Command, Output};

fn tmp_path(name: &str) -> PathBuf {
    let tmp_dir = std::env::temp_dir().join("v17tx-cli-tests");
    fs::create_dir_all(&tmp_dir).ok();
    tmp_dir.join(name)
}

fn create_test_file(name: &str, content: &[u8]) -> PathBuf {
    let path = tmp_path(name);
    fs::write(&path, content).expect("Failed to write test file");
    path
}

fn run_v17tx(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_v17tx"))
        .args(args)
        .output()
        .expect("Failed to execute v17tx")
}

fn output_text(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).to_string() + &String::from_utf8_lossy(&output.stdout)
}

fn read_wav(path: &PathBuf) -> (hound::WavSpec, Vec<i16>) {
    let reader = hound::WavReader::open(path).expect("Failed to open WAV");
    let spec = reader.spec();
    let samples: Vec<i16> = reader
        .into_samples::<i16>()
        .collect::<Result<_, _>>()
        .expect("Failed to read samples");
    (spec, samples)
}

#[test]
fn test_encode_writes_8khz_pcm() {
    let input = create_test_file("encode_input.bin", b"Test message");
    let output = tmp_path("encode_output.wav");

    let result = run_v17tx(&["encode", input.to_str().unwrap(), output.to_str().unwrap()]);
    let text = output_text(&result);
    assert!(result.status.success(), "encode failed: {}", text);
    assert!(text.contains("Encoded"), "Unexpected output: {}", text);

    let (spec, samples) = read_wav(&output);
    assert_eq!(spec.sample_rate, 8000);
    assert_eq!(spec.channels, 1);
    assert_eq!(spec.bits_per_sample, 16);
    // Long training alone is 3344 bauds, about 1.4 s
    assert!(samples.len() > 11_000, "Too few samples: {}", samples.len());
    assert!(samples.len() < 20_000, "Too many samples: {}", samples.len());
    assert!(samples.iter().any(|&s| s != 0));
    assert_eq!(*samples.last().unwrap(), 0, "Transmission should end in silence");
}

#[test]
fn test_encode_options() {
    let input = create_test_file("options_input.bin", &[0x55; 64]);
    let plain = tmp_path("options_plain.wav");
    let fixed = tmp_path("options_fixed.wav");

    let result = run_v17tx(&[
        "encode",
        input.to_str().unwrap(),
        plain.to_str().unwrap(),
        "--bit-rate",
        "14400",
        "--tep",
        "--chunk",
        "37",
    ]);
    assert!(result.status.success(), "encode failed: {}", output_text(&result));

    let result = run_v17tx(&[
        "encode",
        input.to_str().unwrap(),
        fixed.to_str().unwrap(),
        "--bit-rate",
        "14400",
        "--tep",
        "--fixed-point",
        "--power",
        "-20",
    ]);
    assert!(result.status.success(), "encode failed: {}", output_text(&result));

    let (_, a) = read_wav(&plain);
    let (_, b) = read_wav(&fixed);
    assert_eq!(a.len(), b.len(), "Backends should produce the same length");
    let peak = |s: &[i16]| s.iter().map(|&v| (v as i32).abs()).max().unwrap_or(0);
    assert!(peak(&b) < peak(&a), "-20 dBm0 should be quieter than -14 dBm0");
}

#[test]
fn test_training_duration() {
    let output = tmp_path("training.wav");
    let result = run_v17tx(&["training", output.to_str().unwrap(), "--seconds", "0.5"]);
    assert!(result.status.success(), "training failed: {}", output_text(&result));

    let (_, samples) = read_wav(&output);
    assert_eq!(samples.len(), 4000);
}

#[test]
fn test_rejects_unsupported_bit_rate() {
    let input = create_test_file("bad_rate.bin", b"x");
    let output = tmp_path("bad_rate.wav");
    let result = run_v17tx(&[
        "encode",
        input.to_str().unwrap(),
        output.to_str().unwrap(),
        "--bit-rate",
        "4800",
    ]);
    assert!(!result.status.success());
    assert!(output_text(&result).contains("4800"));
}
