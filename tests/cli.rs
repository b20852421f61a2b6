use assert_cmd::Command;
use predicates::prelude::*;

fn isolated() -> (Command, tempfile::TempDir) {
    let dir = tempfile::tempdir().unwrap();
    let mut cmd = Command::cargo_bin("sheet-summarizer").unwrap();
    cmd.current_dir(dir.path())
        .env_remove("GOOGLE_CREDENTIAL_PATH")
        .env_remove("OPENAI_API_KEY")
        .env_remove("SHEET_SUMMARIZER_SPREADSHEET")
        .env("XDG_CONFIG_HOME", dir.path())
        .env("HOME", dir.path());
    (cmd, dir)
}

#[test]
fn help_mentions_credentials() {
    let (mut cmd, _dir) = isolated();
    cmd.arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("GOOGLE_CREDENTIAL_PATH"))
        .stdout(predicate::str::contains("--spreadsheet"));
}

#[test]
fn missing_credentials_fail_at_startup() {
    let (mut cmd, _dir) = isolated();
    cmd.arg("--quiet")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Missing environment variable: GOOGLE_CREDENTIAL_PATH"));
}

#[test]
fn invalid_config_file_is_rejected() {
    let (mut cmd, dir) = isolated();
    std::fs::write(dir.path().join("config.yaml"), "sheet:\n  url_column: 3\n  result_column: 3\n").unwrap();

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("url_column and sheet.result_column must differ"));
}
