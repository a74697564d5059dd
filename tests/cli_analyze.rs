use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use drum_analyzer::testing::signals;
use drum_analyzer::TARGET_SAMPLE_RATE;
use serde_json::Value;
use tempfile::TempDir;

fn cli() -> Command {
    let mut command = Command::new(env!("CARGO_BIN_EXE_drum_analyzer"));
    command.env_remove("DRUM_ANALYZER_CONFIG");
    command.env("RUST_LOG", "off");
    command
}

fn run(args: &[&str]) -> Output {
    cli().args(args).output().expect("failed to run drum_analyzer")
}

fn write_sample(dir: &Path, name: &str, samples: &[f32]) -> PathBuf {
    let path = dir.join(name);
    signals::write_wav(&path, samples, TARGET_SAMPLE_RATE).expect("write sample");
    path
}

/// Folder with a kick, a snare, a corrupt file and an ignored text file
fn sample_folder() -> TempDir {
    let dir = TempDir::new().expect("temp dir");
    write_sample(dir.path(), "a_kick.wav", &signals::kick_hit(TARGET_SAMPLE_RATE));
    write_sample(dir.path(), "b_snare.wav", &signals::snare_hit(TARGET_SAMPLE_RATE, 4));
    std::fs::write(dir.path().join("c_broken.wav"), b"not a wav").expect("write broken");
    std::fs::write(dir.path().join("readme.txt"), b"ignored").expect("write txt");
    dir
}

fn stdout_of(output: &Output) -> String {
    String::from_utf8(output.stdout.clone()).expect("stdout UTF-8")
}

#[test]
fn single_file_text_output() {
    let dir = TempDir::new().expect("temp dir");
    let kick = write_sample(dir.path(), "kick.wav", &signals::kick_hit(TARGET_SAMPLE_RATE));

    let output = run(&[kick.to_str().expect("utf-8 path")]);
    assert!(output.status.success(), "CLI exited with {:?}", output.status.code());

    let stdout = stdout_of(&output);
    let line = stdout.trim();
    assert!(line.starts_with("Kick \u{2014} BASS "), "unexpected output: {line}");
    assert!(line.contains(" MID ") && line.contains(" HIGH "));
    assert!(line.ends_with('%'));
}

#[test]
fn single_file_json_output() {
    let dir = TempDir::new().expect("temp dir");
    let kick = write_sample(dir.path(), "kick.wav", &signals::kick_hit(TARGET_SAMPLE_RATE));

    let output = run(&[kick.to_str().expect("utf-8 path"), "--json"]);
    assert!(output.status.success());

    let json: Value = serde_json::from_str(stdout_of(&output).trim()).expect("JSON payload");
    assert_eq!(json["drum_type"], "Kick");
    assert_eq!(json["file"], "kick.wav");
    assert_eq!(json["features"].as_array().map(Vec::len), Some(7));
}

#[test]
fn missing_file_exits_with_error() {
    let dir = TempDir::new().expect("temp dir");
    let missing = dir.path().join("missing.wav");

    let output = run(&[missing.to_str().expect("utf-8 path")]);
    assert_eq!(output.status.code(), Some(1));

    let stderr = String::from_utf8(output.stderr).expect("stderr UTF-8");
    assert!(stderr.contains("Error: Audio file not found"), "stderr: {stderr}");
}

#[test]
fn batch_text_output_lists_every_sample() {
    let dir = sample_folder();

    let output = run(&[dir.path().to_str().expect("utf-8 path"), "--batch"]);
    assert!(output.status.success());

    let stdout = stdout_of(&output);
    let lines: Vec<&str> = stdout.lines().collect();
    assert_eq!(lines.len(), 3, "unexpected output:\n{stdout}");
    assert!(lines[0].starts_with("  a_kick.wav: Kick \u{2014} BASS "));
    assert!(lines[1].starts_with("  b_snare.wav: Snare \u{2014} BASS "));
    assert!(lines[2].starts_with("  c_broken.wav: ERROR "));
}

#[test]
fn directory_implies_batch_json() {
    let dir = sample_folder();

    let output = run(&[dir.path().to_str().expect("utf-8 path"), "--json", "--jobs", "2"]);
    assert!(output.status.success());

    let json: Value = serde_json::from_str(stdout_of(&output).trim()).expect("JSON payload");
    let entries = json.as_array().expect("batch array");
    assert_eq!(entries.len(), 3);
    assert_eq!(entries[0]["drum_type"], "Kick");
    assert_eq!(entries[1]["drum_type"], "Snare");
    assert_eq!(entries[2]["file"], "c_broken.wav");
    assert!(entries[2]["error"].is_string());
}

#[test]
fn batch_on_missing_folder_fails() {
    let dir = TempDir::new().expect("temp dir");
    let missing = dir.path().join("nowhere");

    let output = run(&[missing.to_str().expect("utf-8 path"), "--batch"]);
    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8(output.stderr).expect("stderr UTF-8");
    assert!(stderr.contains("Not a directory"), "stderr: {stderr}");
}

#[test]
fn invalid_config_is_rejected() {
    let dir = TempDir::new().expect("temp dir");
    let kick = write_sample(dir.path(), "kick.wav", &signals::kick_hit(TARGET_SAMPLE_RATE));
    let config = dir.path().join("config.json");
    std::fs::write(&config, r#"{"spectral": {"hop_length": 0}}"#).expect("write config");

    let output = run(&[
        kick.to_str().expect("utf-8 path"),
        "--config",
        config.to_str().expect("utf-8 path"),
    ]);
    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8(output.stderr).expect("stderr UTF-8");
    assert!(stderr.contains("invalid analyzer configuration"), "stderr: {stderr}");
}
