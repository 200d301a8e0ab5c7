use std::process::{Command, Output};

fn run(args: &[&str], env: &[(&str, &str)], removed: &[&str]) -> Output {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_gemini-chat"));
    cmd.args(args);
    for (key, value) in env {
        cmd.env(key, value);
    }
    for key in removed {
        cmd.env_remove(key);
    }
    cmd.output().expect("failed to run gemini-chat binary")
}

#[test]
fn version_flag_prints_version_and_exits() {
    let output = run(&["--version"], &[], &[]);
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert_eq!(
        stdout.trim(),
        format!("gemini-chat {}", env!("CARGO_PKG_VERSION"))
    );
}

#[test]
fn missing_api_key_is_a_startup_error() {
    let output = run(
        &["chat"],
        &[("MODEL_NAME", "test-model")],
        &["GEMINI_API_KEY"],
    );
    assert!(!output.status.success());

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("GEMINI_API_KEY"),
        "expected the missing variable to be named, got:\n{stderr}"
    );
}

#[test]
fn missing_model_name_is_a_startup_error() {
    let output = run(
        &["chat"],
        &[("GEMINI_API_KEY", "test-key")],
        &["MODEL_NAME"],
    );
    assert!(!output.status.success());

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("MODEL_NAME"),
        "expected the missing variable to be named, got:\n{stderr}"
    );
}

#[test]
fn invalid_temperature_is_a_startup_error() {
    let output = run(
        &["chat"],
        &[
            ("GEMINI_API_KEY", "test-key"),
            ("MODEL_NAME", "test-model"),
            ("TEMPERATURE", "2.5"),
        ],
        &[],
    );
    assert!(!output.status.success());

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("TEMPERATURE"),
        "expected the invalid variable to be named, got:\n{stderr}"
    );
}
