use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;

const UNREACHABLE: &str = "http://127.0.0.1:9";

#[test]
fn help_lists_commands() {
    let mut cmd = cargo_bin_cmd!("matsearchctl");
    let output = cmd.arg("--help").assert().success().get_output().stdout.clone();
    let text = String::from_utf8_lossy(&output);
    for command in [
        "status",
        "scan",
        "clean-cache",
        "search",
        "similar",
        "upload",
        "clip",
        "models",
        "use-model",
    ] {
        assert!(text.contains(command), "help missing '{command}'");
    }
}

#[test]
fn search_help_mentions_time_range() {
    let mut cmd = cargo_bin_cmd!("matsearchctl");
    cmd.args(["search", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--from").and(predicate::str::contains("--img-id")));
}

#[test]
fn unknown_mode_is_rejected_by_the_parser() {
    let mut cmd = cargo_bin_cmd!("matsearchctl");
    cmd.args(["search", "text-to-audio", "--positive", "x"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown mode"));
}

#[test]
fn empty_query_fails_before_any_request() {
    let mut cmd = cargo_bin_cmd!("matsearchctl");
    cmd.args(["--server", UNREACHABLE, "search", "text-to-image"])
        .env_remove("RUST_LOG")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Please enter search content or path"))
        .stderr(predicate::str::contains("Search failed").not());
}

#[test]
fn search_image_must_be_an_image() {
    let dir = tempfile::tempdir().unwrap();
    let notes = dir.path().join("notes.txt");
    std::fs::write(&notes, "not a picture").unwrap();

    let mut cmd = cargo_bin_cmd!("matsearchctl");
    cmd.args(["--server", UNREACHABLE, "search", "image-to-image", "--image"])
        .arg(&notes)
        .env_remove("RUST_LOG")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Only image files are allowed!"))
        .stderr(predicate::str::contains("Upload failed").not());
}

#[test]
fn inverted_clip_range_fails_locally() {
    let dir = tempfile::tempdir().unwrap();
    let mut cmd = cargo_bin_cmd!("matsearchctl");
    cmd.current_dir(dir.path())
        .args(["--server", UNREACHABLE, "clip", "/videos/a.mp4", "10", "5"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid video parameters"));
}

#[test]
fn non_image_upload_is_refused() {
    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join("notes.txt");
    std::fs::write(&file, "not an image").unwrap();

    let mut cmd = cargo_bin_cmd!("matsearchctl");
    cmd.args(["--server", UNREACHABLE, "upload"])
        .arg(&file)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Only image files are allowed!"));
}

#[test]
fn bad_server_url_is_a_config_error() {
    let mut cmd = cargo_bin_cmd!("matsearchctl");
    cmd.args(["--server", "ftp://example", "models"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid --server"));
}
