use assert_cmd::Command;
use std::path::PathBuf;

fn bindsurface() -> Command {
    assert_cmd::cargo::cargo_bin_cmd!("bindsurface")
}

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

#[test]
fn header_to_stdout() {
    let assert = bindsurface()
        .arg("header")
        .arg("--config")
        .arg(fixture("faunus.yaml"))
        .assert()
        .success();

    let stdout = String::from_utf8_lossy(&assert.get_output().stdout);
    let expected = std::fs::read_to_string(fixture("faunus_header.h")).unwrap();
    assert_eq!(stdout, expected);
}

#[test]
fn header_to_file() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("generated_header.h");
    bindsurface()
        .arg("header")
        .arg("--config")
        .arg(fixture("faunus.yaml"))
        .arg("--out")
        .arg(&out)
        .assert()
        .success();
    assert!(std::fs::read_to_string(out).unwrap().contains("p_vec"));
}

#[test]
fn resolve_prints_summary_and_explanations() {
    let dir = tempfile::tempdir().unwrap();
    let manifest = dir.path().join("faunus.manifest.json");
    let assert = bindsurface()
        .arg("resolve")
        .arg("--config")
        .arg(fixture("faunus.yaml"))
        .arg("--catalog")
        .arg(fixture("faunus_catalog.json"))
        .arg("--explain")
        .arg("Faunus::point::cache_")
        .arg("--explain")
        .arg("Nope")
        .arg("--manifest")
        .arg(&manifest)
        .assert()
        .success();

    let stdout = String::from_utf8_lossy(&assert.get_output().stdout);
    assert!(stdout.contains("faunus: 13 entities, 6 exposed, 7 hidden"));
    assert!(stdout.contains("`Faunus::point::cache_` hidden by rule #5 (exclude private members)"));
    assert!(stdout.contains("`Nope` is not in the catalog"));

    let value: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(manifest).unwrap()).unwrap();
    assert_eq!(value["module"], "faunus");
}

#[test]
fn configuration_error_exits_non_zero() {
    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("bad.yaml");
    std::fs::write(
        &config,
        "instantiations:\n  - template: Box\n    instances:\n      - { args: [\" \"], alias: IntBox }\n",
    )
    .unwrap();

    let assert = bindsurface()
        .arg("header")
        .arg("--config")
        .arg(&config)
        .assert()
        .failure()
        .code(1);
    let stderr = String::from_utf8_lossy(&assert.get_output().stderr);
    assert!(stderr.contains("empty argument list for 'Box' (alias 'IntBox')"));
}

#[test]
fn absolute_headers_with_bare_config_name() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(
        dir.path().join("bind.yaml"),
        "absolute_headers: true\nheaders: [faunus/point.h]\n",
    )
    .unwrap();

    let assert = bindsurface()
        .current_dir(dir.path())
        .arg("header")
        .arg("--config")
        .arg("bind.yaml")
        .assert()
        .success();

    let stdout = String::from_utf8_lossy(&assert.get_output().stdout);
    let expected = dir.path().canonicalize().unwrap().join("faunus/point.h");
    assert_eq!(stdout, format!("#include <{}>\n", expected.display()));
}

#[test]
fn parse_error_is_reported_verbatim() {
    let dir = tempfile::tempdir().unwrap();
    let dump = dir.path().join("catalog.json");
    std::fs::write(&dump, "{\n  \"entities\": [,]\n}").unwrap();

    let assert = bindsurface()
        .arg("resolve")
        .arg("--config")
        .arg(fixture("faunus.yaml"))
        .arg("--catalog")
        .arg(&dump)
        .assert()
        .failure()
        .code(1);
    let stderr = String::from_utf8_lossy(&assert.get_output().stderr);
    assert!(stderr.contains(&format!("error: {}:2:", dump.display())));
    assert!(!stderr.contains("parse failed"));
}
