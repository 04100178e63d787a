use assert_cmd::Command;
use predicates::str::contains;

fn cli() -> Command {
    let mut cmd = Command::cargo_bin("atelier_cli").expect("binary");
    cmd.env_remove("ATELIER_SITE_URL")
        .env_remove("ATELIER_ADMIN_EMAIL")
        .env_remove("ATELIER_ADMIN_PASSWORD");
    cmd
}

#[test]
fn missing_site_is_a_clear_error() {
    cli()
        .args(["submit", "--title", "T", "--content", "C"])
        .assert()
        .failure()
        .stderr(contains("site URL is required"));
}

#[test]
fn missing_credentials_are_a_clear_error() {
    cli()
        .args(["--site", "http://127.0.0.1:3001"])
        .args(["submit", "--title", "T", "--content", "C"])
        .assert()
        .failure()
        .stderr(contains("credentials are required"));
}

#[test]
fn submit_requires_content_before_any_network_call() {
    cli()
        .args(["--site", "http://127.0.0.1:9", "--email", "svc@example.com"])
        .env("ATELIER_ADMIN_PASSWORD", "pw")
        .args(["submit", "--title", "T"])
        .assert()
        .failure()
        .stderr(contains("content is required"));
}

#[test]
fn title_flag_is_mandatory() {
    cli()
        .args(["--site", "http://127.0.0.1:9", "--email", "svc@example.com"])
        .env("ATELIER_ADMIN_PASSWORD", "pw")
        .arg("submit")
        .assert()
        .failure()
        .stderr(contains("--title"));
}
