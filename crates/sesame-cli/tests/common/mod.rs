use std::path::Path;
use std::process::{Command, Output};

/// Run the CLI with a custom HOME directory for isolated session storage.
pub fn run_cli_with_env(args: &[&str], home: &Path, api_base: &str) -> Output {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_sesame"));
    cmd.args(args);
    cmd.env("HOME", home);
    cmd.env("XDG_DATA_HOME", home.join("data"));
    cmd.env("SESAME_API_BASE", api_base);
    cmd.env_remove("RUST_LOG");
    cmd.env("NO_COLOR", "1");
    cmd.output().expect("Failed to execute CLI")
}

/// Run the CLI with a custom HOME and expect success.
pub fn run_cli_with_env_success(args: &[&str], home: &Path, api_base: &str) -> String {
    let output = run_cli_with_env(args, home, api_base);
    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        panic!("CLI command failed: {:?}\nstderr: {}", args, stderr);
    }
    String::from_utf8_lossy(&output.stdout).to_string()
}

/// Run the CLI with a custom HOME and expect failure, returning stderr.
pub fn run_cli_with_env_failure(args: &[&str], home: &Path, api_base: &str) -> String {
    let output = run_cli_with_env(args, home, api_base);
    if output.status.success() {
        panic!(
            "CLI command should have failed: {:?}\nstdout: {}",
            args,
            String::from_utf8_lossy(&output.stdout)
        );
    }
    String::from_utf8_lossy(&output.stderr).to_string()
}
