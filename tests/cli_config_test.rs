use std::process::Command;
use tempfile::TempDir;

#[test]
fn test_init_command() {
    let temp_dir = TempDir::new().unwrap();
    let temp_path = temp_dir.path();

    let output = Command::new(env!("CARGO_BIN_EXE_markview"))
        .arg("init")
        .current_dir(temp_path)
        .output()
        .expect("Failed to run init command");

    assert!(output.status.success());

    let config_path = temp_path.join(".markview/settings.toml");
    assert!(config_path.exists());

    let content = std::fs::read_to_string(&config_path).unwrap();
    assert!(content.contains("[server]"));
    assert!(content.contains("[search]"));
    assert!(content.contains("program = \"ag\""));

    // A second init without --force refuses to overwrite.
    let output = Command::new(env!("CARGO_BIN_EXE_markview"))
        .arg("init")
        .current_dir(temp_path)
        .output()
        .expect("Failed to run init command");
    assert!(!output.status.success());
}

#[test]
fn test_config_command() {
    let temp_dir = TempDir::new().unwrap();
    let temp_path = temp_dir.path();

    let config_dir = temp_path.join(".markview");
    std::fs::create_dir_all(&config_dir).unwrap();
    std::fs::write(
        config_dir.join("settings.toml"),
        "[server]\nbind = \"127.0.0.1:8123\"\n",
    )
    .unwrap();

    let output = Command::new(env!("CARGO_BIN_EXE_markview"))
        .arg("config")
        .current_dir(temp_path)
        .env_remove("MARKVIEW_SERVER__BIND")
        .output()
        .expect("Failed to run config command");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("127.0.0.1:8123"));
    assert!(stdout.contains("35729"));
}

#[test]
fn test_serve_fails_when_port_taken() {
    let temp_dir = TempDir::new().unwrap();
    let taken = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = taken.local_addr().unwrap().to_string();

    let output = Command::new(env!("CARGO_BIN_EXE_markview"))
        .args(["serve", ".", "--bind", &addr, "--no-reload", "--no-watch"])
        .current_dir(temp_dir.path())
        .output()
        .expect("Failed to run serve command");

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("cannot bind content server"), "{stderr}");
}
