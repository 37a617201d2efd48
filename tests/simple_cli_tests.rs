use assert_cmd::prelude::*;
use assert_cmd::cargo::cargo_bin_cmd;

/// Tests that `--help` is handled successfully by the CLI.
///
/// This test verifies:
/// 1. Running `bitpos-cli --help` exits successfully
/// 2. The help text lists the command groups
/// 3. No unexpected stderr output is produced
#[test]
fn test_cli_help_success() {
    let mut cmd = cargo_bin_cmd!("bitpos-cli");

    let assert = cmd.arg("--help").assert().success();

    let out = assert.get_output();
    let stdout = String::from_utf8_lossy(&out.stdout);
    println!("=== bitpos-cli --help stdout ===\n\n{}\n================================", stdout);

    for group in ["auth", "product", "order", "wallet", "transactions", "stats", "admin"] {
        assert!(stdout.contains(group), "expected '{}' in --help output", group);
    }
    assert!(
        out.stderr.is_empty(),
        "expected empty stderr for --help, got:\n{}",
        String::from_utf8_lossy(&out.stderr)
    );
}

/// Tests that each command group has its own help page
#[test]
fn test_subcommand_help() {
    for group in ["auth", "product", "order", "wallet", "transactions", "admin"] {
        let mut cmd = cargo_bin_cmd!("bitpos-cli");
        cmd.args([group, "--help"]).assert().success();
    }
}

/// Tests that a missing subcommand is a usage error
#[test]
fn test_cli_requires_a_command() {
    let mut cmd = cargo_bin_cmd!("bitpos-cli");
    cmd.assert().failure();
}

/// Tests that a malformed cart line fails before any request is sent
#[test]
fn test_order_create_rejects_bad_cart_line() {
    let mut cmd = cargo_bin_cmd!("bitpos-cli");
    let assert = cmd
        .args(["--server-url", "http://127.0.0.1:9", "order", "create", "--item", "no-quantity"])
        .assert()
        .failure();

    let stderr = String::from_utf8_lossy(&assert.get_output().stderr).to_string();
    assert!(stderr.contains("PRODUCT_ID:QUANTITY"), "unexpected stderr: {}", stderr);
}
