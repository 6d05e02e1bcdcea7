//! CLI integration tests
//!
//! Drive the `cloudinit` binary against config and objects files in a
//! temporary directory.

use std::fs;
use std::path::PathBuf;
use std::process::{Command, Output};
use tempfile::TempDir;

const CONFIG: &str = r#"
boundary: MIMEBOUNDARY
part:
  - configMapKeyRef:
      namespace: default
      name: base
    content_type: text/cloud-config
  - content: "echo hi"
    content_type: text/x-shellscript
    filename: hi.sh
"#;

const OBJECTS: &str = r##"
- kind: ConfigObject
  namespace: default
  name: base
  data:
    cloud-init: "#cloud-config"
"##;

const EXPECTED: &str = "Content-Type: multipart/mixed; boundary=\"MIMEBOUNDARY\"\r\n\
MIME-Version: 1.0\r\n\
\r\n\
--MIMEBOUNDARY\r\n\
Content-Type: text/cloud-config\r\n\
MIME-Version: 1.0\r\n\
Content-Transfer-Encoding: 7bit\r\n\
\r\n\
#cloud-config\r\n\
--MIMEBOUNDARY\r\n\
Content-Type: text/x-shellscript\r\n\
MIME-Version: 1.0\r\n\
Content-Transfer-Encoding: 7bit\r\n\
Content-Disposition: attachment; filename=\"hi.sh\"\r\n\
\r\n\
echo hi\r\n\
--MIMEBOUNDARY--\r\n";

fn setup(temp_dir: &TempDir, config: &str) -> (PathBuf, PathBuf) {
    let config_path = temp_dir.path().join("config.yaml");
    let objects_path = temp_dir.path().join("objects.yaml");
    fs::write(&config_path, config).unwrap();
    fs::write(&objects_path, OBJECTS).unwrap();
    (config_path, objects_path)
}

fn run(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_cloudinit"))
        .args(args)
        .output()
        .expect("Failed to execute CLI")
}

#[test]
fn test_render_to_stdout() {
    let temp_dir = TempDir::new().unwrap();
    let (config, objects) = setup(&temp_dir, CONFIG);

    let output = run(&[
        "render",
        "--config",
        config.to_str().unwrap(),
        "--objects",
        objects.to_str().unwrap(),
    ]);

    assert!(
        output.status.success(),
        "Stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    assert_eq!(String::from_utf8(output.stdout).unwrap(), EXPECTED);
}

#[test]
fn test_render_to_file_then_check_up_to_date() {
    let temp_dir = TempDir::new().unwrap();
    let (config, objects) = setup(&temp_dir, CONFIG);
    let stored = temp_dir.path().join("user-data");

    let output = run(&[
        "render",
        "-c",
        config.to_str().unwrap(),
        "--objects",
        objects.to_str().unwrap(),
        "-o",
        stored.to_str().unwrap(),
    ]);
    assert!(output.status.success());
    assert_eq!(fs::read_to_string(&stored).unwrap(), EXPECTED);

    let output = run(&[
        "check",
        "--config",
        config.to_str().unwrap(),
        "--objects",
        objects.to_str().unwrap(),
        "--stored",
        stored.to_str().unwrap(),
    ]);
    assert_eq!(output.status.code(), Some(0));
    assert!(String::from_utf8_lossy(&output.stdout).contains("Up to date"));
}

#[test]
fn test_check_reports_drift() {
    let temp_dir = TempDir::new().unwrap();
    let (config, objects) = setup(&temp_dir, CONFIG);
    let stored = temp_dir.path().join("user-data");
    fs::write(&stored, EXPECTED.replace("echo hi", "echo bye")).unwrap();

    let output = run(&[
        "check",
        "--config",
        config.to_str().unwrap(),
        "--objects",
        objects.to_str().unwrap(),
        "--stored",
        stored.to_str().unwrap(),
    ]);

    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stdout).contains("changed"));
}

#[test]
fn test_check_missing_stored_file_is_drift() {
    let temp_dir = TempDir::new().unwrap();
    let (config, objects) = setup(&temp_dir, CONFIG);

    let output = run(&[
        "check",
        "--config",
        config.to_str().unwrap(),
        "--objects",
        objects.to_str().unwrap(),
        "--stored",
        temp_dir.path().join("absent").to_str().unwrap(),
    ]);

    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stdout).contains("no stored document"));
}

#[test]
fn test_missing_reference_fails_with_error_code() {
    let temp_dir = TempDir::new().unwrap();
    let (config, _objects) = setup(&temp_dir, CONFIG);

    // no objects file: the config object cannot be found
    let output = run(&["render", "--config", config.to_str().unwrap()]);

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.starts_with("Error: "), "Stderr: {}", stderr);
    assert!(stderr.contains("ERR_REFERENCE_NOT_FOUND"));
}

#[test]
fn test_gzip_without_base64_is_rejected() {
    let temp_dir = TempDir::new().unwrap();
    let (config, objects) = setup(&temp_dir, &format!("gzip: true\n{}", CONFIG));

    let output = run(&[
        "render",
        "--config",
        config.to_str().unwrap(),
        "--objects",
        objects.to_str().unwrap(),
    ]);

    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("ERR_GZIP_REQUIRES_BASE64"));
}

#[test]
fn test_json_config_by_extension() {
    let temp_dir = TempDir::new().unwrap();
    let config = temp_dir.path().join("config.json");
    fs::write(
        &config,
        r#"{"boundary": "B", "part": [{"content": "x", "merge_type": "list(append)"}]}"#,
    )
    .unwrap();

    let output = run(&["render", "--config", config.to_str().unwrap()]);

    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.contains("Content-Type: text/plain\r\n"));
    assert!(stdout.contains("X-Merge-Type: list(append)\r\n"));
}

#[test]
fn test_zero_timeout_cancels_resolution() {
    let temp_dir = TempDir::new().unwrap();
    let (config, objects) = setup(&temp_dir, CONFIG);

    let output = run(&[
        "render",
        "--config",
        config.to_str().unwrap(),
        "--objects",
        objects.to_str().unwrap(),
        "--timeout-ms",
        "0",
    ]);

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("ERR_CANCELLED"), "Stderr: {}", stderr);
    assert!(stderr.contains("(part: 0)"));
}

#[test]
fn test_generous_timeout_renders_normally() {
    let temp_dir = TempDir::new().unwrap();
    let (config, objects) = setup(&temp_dir, CONFIG);

    let output = run(&[
        "render",
        "--config",
        config.to_str().unwrap(),
        "--objects",
        objects.to_str().unwrap(),
        "--timeout-ms",
        "60000",
    ]);

    assert!(output.status.success());
    assert_eq!(String::from_utf8(output.stdout).unwrap(), EXPECTED);
}

#[test]
fn test_missing_config_file_is_io_error() {
    let temp_dir = TempDir::new().unwrap();
    let absent = temp_dir.path().join("absent.yaml");

    let output = run(&["render", "--config", absent.to_str().unwrap()]);

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.starts_with("Error: [ERR_IO] in operation 'read_config'"), "Stderr: {}", stderr);
}

#[test]
fn test_malformed_objects_file_is_serialization_error() {
    let temp_dir = TempDir::new().unwrap();
    let (config, objects) = setup(&temp_dir, CONFIG);
    fs::write(&objects, "- kind: NotAKind\n  namespace: default\n  name: base\n").unwrap();

    let output = run(&[
        "render",
        "--config",
        config.to_str().unwrap(),
        "--objects",
        objects.to_str().unwrap(),
    ]);

    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("ERR_SERIALIZATION"));
}
