use assert_cmd::Command;
use std::path::Path;

pub const CLI_COMMIT_DATE: &str = "2023-01-01 12:00:00 +0000";

pub fn run_bitlet_command(dir: &Path, args: &[&str]) -> Command {
    let mut cmd = Command::cargo_bin("bitlet").expect("Failed to find bitlet binary");
    cmd.env("BITLET_COMMIT_DATE", CLI_COMMIT_DATE);
    cmd.current_dir(dir);
    for arg in args {
        cmd.arg(arg);
    }
    cmd
}

pub fn bitlet_commit(dir: &Path, message: &str) -> Command {
    run_bitlet_command(dir, &["commit", message])
}
