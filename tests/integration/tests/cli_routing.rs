//! CLI binary integration tests.
//!
//! These tests exercise the compiled `mindnote` binary to verify command
//! routing, help text, and error handling. None of them touch the network.

use std::path::PathBuf;
use std::process::Command;
use tempfile::TempDir;

/// Locate the compiled `mindnote` binary in the workspace target directory.
fn mindnote_bin() -> PathBuf {
    let manifest_dir = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    // tests/integration -> workspace root
    let workspace_root = manifest_dir
        .parent()
        .expect("tests/ parent")
        .parent()
        .expect("workspace root");
    let bin = workspace_root.join("target").join("debug").join("mindnote");
    assert!(
        bin.exists(),
        "mindnote binary not found at {}; run `cargo build -p mindnote-cli` first",
        bin.display()
    );
    bin
}

/// Command with an isolated config file and no inherited credentials.
fn mindnote_cmd(config: &std::path::Path) -> Command {
    let mut cmd = Command::new(mindnote_bin());
    cmd.env("MINDNOTE_CONFIG", config)
        .env_remove("OPENAI_API_KEY")
        .env_remove("RUST_LOG");
    cmd
}

#[test]
fn test_cli_version() {
    let dir = TempDir::new().unwrap();
    let output = mindnote_cmd(&dir.path().join("mindnote.json5"))
        .arg("version")
        .output()
        .expect("failed to run mindnote");
    assert!(output.status.success(), "version command should succeed");
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(
        stdout.contains("mindnote"),
        "version output should contain 'mindnote', got: {}",
        stdout
    );
}

#[test]
fn test_cli_help_lists_commands() {
    let dir = TempDir::new().unwrap();
    let output = mindnote_cmd(&dir.path().join("mindnote.json5"))
        .arg("--help")
        .output()
        .expect("failed to run mindnote");
    assert!(output.status.success(), "--help should succeed");
    let stdout = String::from_utf8_lossy(&output.stdout);
    for command in ["advise", "sentiment", "config"] {
        assert!(
            stdout.contains(command),
            "help output should mention '{}', got: {}",
            command,
            stdout
        );
    }
}

#[test]
fn test_cli_unknown_command() {
    let dir = TempDir::new().unwrap();
    let output = mindnote_cmd(&dir.path().join("mindnote.json5"))
        .arg("nonexistent-command")
        .output()
        .expect("failed to run mindnote");
    assert!(
        !output.status.success(),
        "unknown command should return non-zero exit code"
    );
}

#[test]
fn test_cli_sentiment_is_offline() {
    let dir = TempDir::new().unwrap();
    let output = mindnote_cmd(&dir.path().join("mindnote.json5"))
        .args(["sentiment", "I feel hopeless and alone"])
        .output()
        .expect("failed to run mindnote");
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("(negative)"), "got: {}", stdout);
    assert!(stdout.contains("weighing on you"), "got: {}", stdout);
}

#[test]
fn test_cli_config_init_then_validate() {
    let dir = TempDir::new().unwrap();
    let config = dir.path().join("mindnote.json5");

    let init = mindnote_cmd(&config)
        .args(["config", "init"])
        .output()
        .expect("failed to run mindnote");
    assert!(init.status.success());
    assert!(config.exists());

    let again = mindnote_cmd(&config)
        .args(["config", "init"])
        .output()
        .expect("failed to run mindnote");
    assert!(!again.status.success(), "init without --force should refuse");

    let validate = mindnote_cmd(&config)
        .args(["config", "validate"])
        .output()
        .expect("failed to run mindnote");
    assert!(validate.status.success());
    assert!(String::from_utf8_lossy(&validate.stdout).contains("Configuration is valid"));
}

#[test]
fn test_cli_config_path_honors_override() {
    let dir = TempDir::new().unwrap();
    let config = dir.path().join("custom.json5");
    let output = mindnote_cmd(&config)
        .args(["config", "path"])
        .output()
        .expect("failed to run mindnote");
    assert!(output.status.success());
    assert_eq!(
        String::from_utf8_lossy(&output.stdout).trim(),
        config.display().to_string()
    );
}

#[test]
fn test_cli_advise_without_api_key_fails() {
    let dir = TempDir::new().unwrap();
    let output = mindnote_cmd(&dir.path().join("mindnote.json5"))
        .current_dir(dir.path())
        .args(["advise", "--label", "Depression", "--text", "Feeling low"])
        .output()
        .expect("failed to run mindnote");
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("OPENAI_API_KEY"), "got: {}", stderr);
}

#[test]
fn test_cli_advise_off_my_chest_runs_offline() {
    let dir = TempDir::new().unwrap();
    let config = dir.path().join("mindnote.json5");

    let output = mindnote_cmd(&config)
        .current_dir(dir.path())
        .args(["advise", "--label", "Off My Chest", "--text", "Today was a great day"])
        .output()
        .expect("failed to run mindnote");
    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    assert!(String::from_utf8_lossy(&output.stdout).contains("Keep it up!"));

    let output = mindnote_cmd(&config)
        .current_dir(dir.path())
        .args([
            "advise",
            "--label",
            "off_my_chest",
            "--text",
            "I keep thinking about suicide",
            "--json",
        ])
        .output()
        .expect("failed to run mindnote");
    assert!(output.status.success());
    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["outcome"], "sentiment_fallback");
    assert_eq!(report["label"], "off my chest");
    assert!(report["advice"].as_str().unwrap().contains("weighing on you"));
}
