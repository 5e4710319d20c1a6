use std::fs;
use std::process::Command;

fn boxsim() -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_boxsim"));
    cmd.env("RUST_LOG", "info");
    cmd
}

#[test]
fn default_scene_runs_to_completion() {
    let output = boxsim()
        .args(["--frames", "20", "--log-every", "10"])
        .output()
        .expect("failed to launch boxsim");

    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("simulation progress"), "{stdout}");
    assert!(stdout.contains("simulation finished"), "{stdout}");
    assert!(stdout.contains("ground: position"), "{stdout}");
}

#[test]
fn scene_file_with_broad_phase_runs() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("pair.json");
    fs::write(
        &path,
        r#"{
            "simulation": { "substeps": 2, "broad_phase": { "depth": 1 } },
            "boxes": [
                { "id": "falling", "pos": [0, 1.2, 0], "vel": [0, -0.01, 0] },
                { "id": "floor", "pos": [0, 0, 0], "scale": [4, 1, 4], "dynamic": false }
            ]
        }"#,
    )
    .unwrap();

    let output = boxsim()
        .arg("--scene")
        .arg(&path)
        .args(["--frames", "30"])
        .output()
        .expect("failed to launch boxsim");

    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("falling: position"), "{stdout}");
    assert!(stdout.contains("floor: position"), "{stdout}");
}

#[test]
fn invalid_scene_exits_with_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("broken.json");
    fs::write(&path, r#"{ "boxes": [ { "id": "a", "pos": [0, 0, 0], "size": [0, 1, 1] } ] }"#).unwrap();

    let output = boxsim()
        .arg("--scene")
        .arg(&path)
        .output()
        .expect("failed to launch boxsim");

    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("size"));
}
