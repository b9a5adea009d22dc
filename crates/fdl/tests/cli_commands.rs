#![cfg(feature = "cli")]

use std::io::Write;
use std::path::PathBuf;
use std::process::{Command, Output, Stdio};

fn fdl(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_fdl"))
        .arg("--format")
        .arg("json")
        .args(args)
        .output()
        .expect("fdl should run")
}

fn json_lines(output: &Output) -> Vec<serde_json::Value> {
    String::from_utf8_lossy(&output.stdout)
        .lines()
        .map(|line| serde_json::from_str(line).expect("each line should be json"))
        .collect()
}

fn unique_temp_file(tag: &str) -> PathBuf {
    std::env::temp_dir().join(format!(
        "fdlcli-{tag}-{}-{}.bin",
        std::process::id(),
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .expect("time should be after epoch")
            .as_nanos()
    ))
}

#[test]
fn decode_fixed_no_data() {
    let output = fdl(&["decode", "10 02 03 49 4E 16"]);
    assert!(output.status.success());

    let lines = json_lines(&output);
    assert_eq!(lines.len(), 1);
    assert_eq!(lines[0]["kind"], "fixed_no_data");
    assert_eq!(lines[0]["destination"]["raw"], 2);
    assert_eq!(lines[0]["source"]["raw"], 3);
    assert_eq!(lines[0]["control"]["name"], "FDL_STAT");
}

#[test]
fn decode_checksum_mismatch_exits_60() {
    let output = fdl(&["decode", "10 02 03 49 4F 16"]);
    assert_eq!(output.status.code(), Some(60));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("checksum mismatch"));
}

#[test]
fn decode_bad_hex_exits_64() {
    let output = fdl(&["decode", "not-hex"]);
    assert_eq!(output.status.code(), Some(64));
}

#[test]
fn encode_variable_data() {
    let output = fdl(&[
        "encode", "--kind", "sd2", "--da", "1", "--sa", "2", "--fc", "0x40", "--data", "aa bb",
    ]);
    assert!(output.status.success());

    let lines = json_lines(&output);
    let fcs = (0x68u32 + 1 + 2 + 0x40 + 0xAA + 0xBB) % 256;
    assert_eq!(lines[0]["wire"], format!("68050568010240aabb{fcs:02x}16"));
    assert_eq!(lines[0]["size"], 11);
}

#[test]
fn encode_fixed_data_wrong_length_exits_64() {
    let output = fdl(&[
        "encode", "--kind", "fixed-data", "--da", "1", "--sa", "2", "--fc", "3", "--data", "0102",
    ]);
    assert_eq!(output.status.code(), Some(64));
}

#[test]
fn checksum_command() {
    let output = fdl(&["checksum", "02 03 49"]);
    assert!(output.status.success());
    let lines = json_lines(&output);
    assert_eq!(lines[0]["checksum"], "0x4E");
    assert_eq!(lines[0]["len"], 3);
}

#[test]
fn read_stream_from_stdin() {
    let mut child = Command::new(env!("CARGO_BIN_EXE_fdl"))
        .args(["--format", "json", "read"])
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::null())
        .spawn()
        .expect("read should start");

    child
        .stdin
        .take()
        .expect("stdin should be piped")
        .write_all(&[0xDC, 0x05, 0x0A, 0x10, 2, 3, 0x49, 0x00, 0x16, 0xE5])
        .expect("write should succeed");

    let output = child.wait_with_output().expect("read should finish");
    assert!(output.status.success());

    let lines = json_lines(&output);
    assert_eq!(lines.len(), 4);
    assert_eq!(lines[0]["kind"], "token");
    assert_eq!(lines[1]["error"], "checksum_mismatch");
    assert_eq!(lines[2]["kind"], "short_ack");
    assert_eq!(lines[3]["summary"]["telegrams"], 2);
    assert_eq!(lines[3]["summary"]["invalid"], 1);
}

#[test]
fn read_file_with_resync() {
    let path = unique_temp_file("resync");
    std::fs::write(&path, [0x00, 0xFF, 0xE5, 0x33, 0xDC, 1, 2]).expect("write temp file");

    let path_arg = path.to_string_lossy().into_owned();
    let output = fdl(&["read", "--file", &path_arg, "--resync"]);
    assert!(output.status.success());
    let lines = json_lines(&output);
    let kinds: Vec<String> = lines
        .iter()
        .filter_map(|v| v["kind"].as_str().map(str::to_string))
        .collect();
    assert_eq!(kinds, vec!["short_ack", "token"]);
    assert_eq!(lines.last().expect("summary line")["summary"]["telegrams"], 2);

    let strict = fdl(&["read", "--file", &path_arg]);
    assert_eq!(strict.status.code(), Some(60));

    let _ = std::fs::remove_file(&path);
}

#[test]
fn read_resync_keeps_telegrams_after_false_variable_start() {
    let path = unique_temp_file("false-sd2");
    std::fs::write(
        &path,
        [0x68, 0x05, 0x05, 0x00, 0xDC, 1, 2, 0xE5, 0xE5, 0xE5, 0xE5, 0xDC, 7, 8],
    )
    .expect("write temp file");

    let path_arg = path.to_string_lossy().into_owned();
    let output = fdl(&["read", "--file", &path_arg, "--resync"]);
    assert!(output.status.success());
    let lines = json_lines(&output);
    let summary = &lines.last().expect("summary line")["summary"];
    assert_eq!(summary["telegrams"], 6);
    assert_eq!(summary["invalid"], 0);

    let _ = std::fs::remove_file(&path);
}

#[test]
fn version_reports_package_version() {
    let output = fdl(&["version"]);
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains(env!("CARGO_PKG_VERSION")));
}
