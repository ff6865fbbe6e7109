//! Integration tests for the CLI commands

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use serde_json::Value;

fn read_json(path: &std::path::Path) -> Value {
    let contents = std::fs::read_to_string(path).unwrap();
    serde_json::from_str(&contents).unwrap()
}

#[test]
fn test_version_command() {
    let mut cmd = cargo_bin_cmd!("mangatrans");
    cmd.arg("version");

    cmd.assert()
        .success()
        .stdout(predicate::str::starts_with("mangatrans "));
}

#[test]
fn test_version_flag() {
    let mut cmd = cargo_bin_cmd!("mangatrans");
    cmd.arg("--version");

    cmd.assert()
        .success()
        .stdout(predicate::str::starts_with("mangatrans "));
}

#[test]
fn test_no_subcommand_exits_nonzero() {
    let mut cmd = cargo_bin_cmd!("mangatrans");

    cmd.assert().failure().code(1);
}

#[test]
fn test_translate_writes_stub_result() {
    let dir = tempfile::tempdir().unwrap();
    let image = dir.path().join("page.png");
    std::fs::write(&image, b"").unwrap();
    let output = dir.path().join("out/nested/page.json");

    let mut cmd = cargo_bin_cmd!("mangatrans");
    cmd.arg("translate").arg(&image).arg("--output").arg(&output);

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("Translation result exported to:"));

    let doc = read_json(&output);
    assert_eq!(doc["schema_version"], "1.0");
    assert_eq!(doc["source_lang"], "ja");
    assert_eq!(doc["target_lang"], "en");
    assert_eq!(doc["page"]["id"], "001");
    assert_eq!(doc["regions"].as_array().unwrap().len(), 0);
    assert_eq!(doc["timings_ms"]["total"], 0);
}

#[test]
fn test_translate_language_flags() {
    let dir = tempfile::tempdir().unwrap();
    let image = dir.path().join("manhwa.png");
    std::fs::write(&image, b"").unwrap();
    let output = dir.path().join("manhwa.json");

    let mut cmd = cargo_bin_cmd!("mangatrans");
    cmd.args(["translate", "--src", "ko", "--tgt", "fr", "-o"])
        .arg(&output)
        .arg(&image);

    cmd.assert().success();

    let doc = read_json(&output);
    assert_eq!(doc["source_lang"], "ko");
    assert_eq!(doc["target_lang"], "fr");
}

#[test]
fn test_translate_uses_config_languages() {
    let dir = tempfile::tempdir().unwrap();
    let image = dir.path().join("page.png");
    std::fs::write(&image, b"").unwrap();
    let config = dir.path().join("mangatrans.toml");
    std::fs::write(&config, "[languages]\nsource = \"zh\"\ntarget = \"de\"\n").unwrap();
    let output = dir.path().join("page.json");

    let mut cmd = cargo_bin_cmd!("mangatrans");
    cmd.arg("--config")
        .arg(&config)
        .arg("translate")
        .arg(&image)
        .arg("-o")
        .arg(&output)
        .args(["--tgt", "en"]);

    cmd.assert().success();

    let doc = read_json(&output);
    assert_eq!(doc["source_lang"], "zh");
    assert_eq!(doc["target_lang"], "en");
}

#[test]
fn test_translate_missing_image_fails_without_output() {
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("out/page.json");

    let mut cmd = cargo_bin_cmd!("mangatrans");
    cmd.arg("translate")
        .arg(dir.path().join("missing.png"))
        .arg("--output")
        .arg(&output);

    cmd.assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("Image file not found"));

    assert!(!output.exists());
    assert!(!dir.path().join("out").exists());
}

#[test]
fn test_translate_requires_output() {
    let dir = tempfile::tempdir().unwrap();
    let image = dir.path().join("page.png");
    std::fs::write(&image, b"").unwrap();

    let mut cmd = cargo_bin_cmd!("mangatrans");
    cmd.arg("translate").arg(&image);

    cmd.assert().failure();
}

#[test]
fn test_batch_mirrors_directory_layout() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("chapter");
    std::fs::create_dir_all(input.join("part2")).unwrap();
    std::fs::write(input.join("001.png"), b"").unwrap();
    std::fs::write(input.join("part2/002.JPG"), b"").unwrap();
    std::fs::write(input.join("notes.txt"), b"skip me").unwrap();
    let output = dir.path().join("results");

    let mut cmd = cargo_bin_cmd!("mangatrans");
    cmd.arg("batch").arg(&input).arg("-o").arg(&output).args(["-j", "2"]);

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("2 succeeded, 0 failed"));

    assert_eq!(read_json(&output.join("001.json"))["page"]["id"], "001");
    assert_eq!(read_json(&output.join("part2/002.json"))["page"]["id"], "002");
    assert!(!output.join("notes.json").exists());
}

#[test]
fn test_batch_refuses_shared_output_names() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("chapter");
    std::fs::create_dir_all(&input).unwrap();
    std::fs::write(input.join("001.png"), b"").unwrap();
    std::fs::write(input.join("001.jpg"), b"").unwrap();
    std::fs::write(input.join("002.png"), b"").unwrap();
    let output = dir.path().join("results");

    let mut cmd = cargo_bin_cmd!("mangatrans");
    cmd.arg("batch").arg(&input).arg("-o").arg(&output);

    cmd.assert()
        .failure()
        .code(1)
        .stdout(predicate::str::contains("1 succeeded, 2 failed"))
        .stderr(predicate::str::contains("is shared by 2 images"));

    assert!(!output.join("001.json").exists());
    assert_eq!(read_json(&output.join("002.json"))["page"]["id"], "002");
}

#[test]
fn test_batch_without_images_fails() {
    let dir = tempfile::tempdir().unwrap();

    let mut cmd = cargo_bin_cmd!("mangatrans");
    cmd.arg("batch").arg(dir.path()).arg("-o").arg(dir.path().join("out"));

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("No images found"));
}

#[test]
fn test_inspect_round_trips_translate_output() {
    let dir = tempfile::tempdir().unwrap();
    let image = dir.path().join("page.png");
    std::fs::write(&image, b"").unwrap();
    let output = dir.path().join("page.json");

    cargo_bin_cmd!("mangatrans")
        .arg("translate")
        .arg(&image)
        .arg("-o")
        .arg(&output)
        .assert()
        .success();

    let mut cmd = cargo_bin_cmd!("mangatrans");
    cmd.arg("inspect").arg(&output);

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("easyocr 0.0.0"))
        .stdout(predicate::str::contains("Regions:     0"));
}

#[test]
fn test_inspect_rejects_malformed_document() {
    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join("broken.json");
    std::fs::write(&file, "{\"schema_version\": \"1.0\"}").unwrap();

    let mut cmd = cargo_bin_cmd!("mangatrans");
    cmd.arg("inspect").arg(&file);

    cmd.assert().failure().code(1);
}
