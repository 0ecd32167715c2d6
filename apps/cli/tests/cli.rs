use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

const PAGE: &str = r#"<!DOCTYPE html>
<html>
<head><title>Login</title></head>
<body>
  <div class="alert alert-info">Please log in.</div>
  <form class="auth-form" method="post">
    <input name="username" required>
    <input name="password" type="password" required>
  </form>
</body>
</html>"#;

fn page(dir: &TempDir) -> PathBuf {
    let path = dir.path().join("login.html");
    fs::write(&path, PAGE).expect("write page");
    path
}

fn folio() -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_folio"));
    cmd.env_remove("RUST_LOG").env("FOLIO__LOGGING__LEVEL", "warn");
    cmd
}

#[test]
fn dismiss_removes_alerts_after_their_lifetime() {
    let dir = TempDir::new().unwrap();
    folio()
        .arg("dismiss")
        .arg(page(&dir))
        .assert()
        .success()
        .stdout(predicate::str::contains("Please log in.").not())
        .stdout(predicate::str::contains(r#"<form class="auth-form" method="post">"#));
}

#[test]
fn dismiss_before_the_delay_keeps_alerts() {
    let dir = TempDir::new().unwrap();
    folio()
        .args(["dismiss", "--elapse-ms", "4999"])
        .arg(page(&dir))
        .assert()
        .success()
        .stdout(predicate::str::contains(r#"<div class="alert alert-info">Please log in.</div>"#));
}

#[test]
fn dismiss_mid_fade_shows_the_transition() {
    let dir = TempDir::new().unwrap();
    folio()
        .args(["dismiss", "--elapse-ms", "5000"])
        .arg(page(&dir))
        .assert()
        .success()
        .stdout(predicate::str::contains(r#"style="transition: opacity 0.5s; opacity: 0""#));
}

#[test]
fn environment_overrides_alert_timing() {
    let dir = TempDir::new().unwrap();
    folio()
        .env("FOLIO__ALERTS__DELAY_MS", "1000")
        .args(["dismiss", "--elapse-ms", "1500"])
        .arg(page(&dir))
        .assert()
        .success()
        .stdout(predicate::str::contains("Please log in.").not());
}

#[test]
fn config_file_sets_alert_timing() {
    let dir = TempDir::new().unwrap();
    let config = dir.path().join("folio.toml");
    fs::write(&config, "[alerts]\ndelay_ms = 100\nfade_ms = 50\n").unwrap();

    folio()
        .arg("--config")
        .arg(&config)
        .args(["dismiss", "--elapse-ms", "150"])
        .arg(page(&dir))
        .assert()
        .success()
        .stdout(predicate::str::contains("Please log in.").not());
}

#[test]
fn realtime_dismissal_waits_for_the_timers() {
    let dir = TempDir::new().unwrap();
    folio()
        .env("FOLIO__ALERTS__DELAY_MS", "20")
        .env("FOLIO__ALERTS__FADE_MS", "10")
        .args(["dismiss", "--realtime"])
        .arg(page(&dir))
        .assert()
        .success()
        .stdout(predicate::str::contains("Please log in.").not());
}

#[test]
fn blocked_submission_exits_with_two() {
    let dir = TempDir::new().unwrap();
    folio()
        .args(["submit", "--set", "password=hunter2"])
        .arg(page(&dir))
        .assert()
        .code(2)
        .stdout(predicate::str::contains("status: blocked"))
        .stdout(predicate::str::contains("notice: Please fill in all required fields."))
        .stdout(predicate::str::contains("invalid: username\n"));
}

#[test]
fn complete_submission_proceeds() {
    let dir = TempDir::new().unwrap();
    folio()
        .args(["submit", "--set", "username=alice", "--set", "password=hunter2"])
        .arg(page(&dir))
        .assert()
        .success()
        .stdout(predicate::str::contains("status: proceeded"))
        .stdout(predicate::str::contains("sent: username=alice, password=hunter2"))
        .stdout(predicate::str::contains("notice:").not());
}

#[test]
fn unknown_field_is_an_error() {
    let dir = TempDir::new().unwrap();
    folio()
        .args(["submit", "--set", "email=a@b.com"])
        .arg(page(&dir))
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("Form has no field named `email`"));
}

#[test]
fn missing_page_is_an_error() {
    let dir = TempDir::new().unwrap();
    folio()
        .arg("dismiss")
        .arg(dir.path().join("missing.html"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to read page"));
}

#[test]
fn malformed_config_is_critical() {
    let dir = TempDir::new().unwrap();
    let config = dir.path().join("folio.toml");
    fs::write(&config, "[alerts]\ndelay_ms = \"soon\"\n").unwrap();

    folio()
        .arg("--config")
        .arg(&config)
        .arg("dismiss")
        .arg(page(&dir))
        .assert()
        .failure()
        .stderr(predicate::str::contains("Configuration is malformed"));
}
