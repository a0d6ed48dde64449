use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use tempfile::TempDir;

/// Stands in for `face_detection`: two faces for an existing file, a
/// non-zero exit for a missing one.
const FAKE_DETECTOR: &str = r#"
img="$1"
if [ ! -f "$img" ]; then echo "no such file: $img" >&2; exit 1; fi
echo "$img,362,266,448,179"
echo "$img,50,120,110,60"
echo "trailing,line"
"#;

fn write_fixture(dir: &Path) -> (PathBuf, PathBuf) {
    let script = dir.join("face_detection.sh");
    fs::write(&script, FAKE_DETECTOR).unwrap();
    let image = dir.join("1.jpg");
    fs::write(&image, b"pixels").unwrap();
    (script, image)
}

fn facebench(dir: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_facebench"))
        .args(args)
        .env("XDG_CACHE_HOME", dir.join("cache"))
        .env_remove("RUST_LOG")
        .output()
        .expect("failed to run facebench")
}

#[cfg(unix)]
#[test]
fn test_cmd_backend_ten_iterations() {
    let tmp = TempDir::new().unwrap();
    let (script, image) = write_fixture(tmp.path());

    let output = facebench(
        tmp.path(),
        &[
            "--backend",
            "cmd",
            "--program",
            "sh",
            "--program-arg",
            script.to_str().unwrap(),
            "--image",
            image.to_str().unwrap(),
        ],
    );

    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));
    let stdout = String::from_utf8(output.stdout).unwrap();
    let lines: Vec<&str> = stdout.lines().collect();
    assert_eq!(lines[0], "0 2 <nil>");
    assert_eq!(lines[1], "362 266 448 179");
    assert_eq!(lines[2], "50 120 110 60");
    assert_eq!(lines[11], "9 2 <nil>");
    assert_eq!(lines.len(), 13);
    assert!(lines[12].parse::<u128>().is_ok());
}

#[cfg(unix)]
#[test]
fn test_cmd_backend_missing_image_reports_each_iteration() {
    let tmp = TempDir::new().unwrap();
    let (script, _) = write_fixture(tmp.path());
    let missing = tmp.path().join("missing.jpg");

    let output = facebench(
        tmp.path(),
        &[
            "--backend",
            "cmd",
            "--program",
            "sh",
            "--program-arg",
            script.to_str().unwrap(),
            "--image",
            missing.to_str().unwrap(),
            "--iterations",
            "3",
        ],
    );

    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    let lines: Vec<&str> = stdout.lines().collect();
    assert_eq!(lines.len(), 4);
    for (i, line) in lines.iter().take(3).enumerate() {
        assert!(line.starts_with(&format!("{i} 0 ")), "line: {line}");
        assert!(!line.ends_with("<nil>"));
    }
}

#[test]
fn test_native_backend_without_model_exits_with_error() {
    let tmp = TempDir::new().unwrap();
    let model_dir = tmp.path().join("models");

    let output = facebench(
        tmp.path(),
        &["--backend", "native", "--model-dir", model_dir.to_str().unwrap()],
    );

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Error:"));
    assert!(stderr.contains("seeta_fd_frontal_v1.0.bin"));
    assert!(output.stdout.is_empty());
}

#[test]
fn test_unknown_backend_is_rejected() {
    let tmp = TempDir::new().unwrap();

    let output = facebench(tmp.path(), &["--backend", "grpc"]);

    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("Backend must be one of"));
}

#[test]
fn test_zero_iterations_is_rejected() {
    let tmp = TempDir::new().unwrap();

    let output = facebench(tmp.path(), &["--backend", "cmd", "--iterations", "0"]);

    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("Iterations"));
}

#[test]
fn test_native_backend_rejects_cnn_model() {
    let tmp = TempDir::new().unwrap();

    let output = facebench(tmp.path(), &["--backend", "native", "--model", "cnn"]);

    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("cnn"));
}

#[cfg(not(feature = "embedded-python"))]
#[test]
fn test_python_backend_requires_feature() {
    let tmp = TempDir::new().unwrap();

    let output = facebench(tmp.path(), &["--backend", "python"]);

    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("embedded-python"));
}
