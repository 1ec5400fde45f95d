use std::process::Command;

#[test]
fn init_creates_valid_toml() {
    let dir = tempfile::tempdir().unwrap();

    let output = Command::new(env!("CARGO_BIN_EXE_treesim"))
        .arg("init")
        .current_dir(dir.path())
        .output()
        .unwrap();

    assert!(
        output.status.success(),
        "treesim init failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );

    let config_path = dir.path().join(".treesim.toml");
    assert!(config_path.exists(), ".treesim.toml should exist");

    let content = std::fs::read_to_string(&config_path).unwrap();
    assert!(content.contains("[filter]"));
    assert!(content.contains("[walk]"));

    // Verify it's valid TOML that treesim-core can parse
    let config: treesim_core::TreesimConfig = toml::from_str(&content).unwrap();
    assert_eq!(config.method, treesim_core::Method::Ratio);
    assert!(config.language_overrides().unwrap().is_empty());
}

#[test]
fn init_refuses_if_exists() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join(".treesim.toml"), "# existing").unwrap();

    let output = Command::new(env!("CARGO_BIN_EXE_treesim"))
        .arg("init")
        .current_dir(dir.path())
        .output()
        .unwrap();

    assert!(!output.status.success());
    let content = std::fs::read_to_string(dir.path().join(".treesim.toml")).unwrap();
    assert_eq!(content, "# existing");
}
