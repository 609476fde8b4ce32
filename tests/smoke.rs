use std::process::Command;

use glam::DVec2;
use meshpick_core::SurfaceId;
use meshpick_testkit::{HitRecord, JsonlSink};

const SCENE: &str = r#"
[camera]
position = [0.0, 0.0, 5.0]
look_direction = [0.0, 0.0, -1.0]

[viewport]
width = 200.0
height = 200.0

[[surfaces]]
id = 3
element = 30
content_bounds = { left = 0.0, top = 0.0, width = 100.0, height = 100.0 }
translation = [0.1, 0.2, 0.0]
mesh = { kind = "plane", width = 2.0, height = 2.0, columns = 2, rows = 2 }

[[pointers]]
position = [100.0, 100.0]
"#;

fn temp_path(name: &str) -> std::path::PathBuf {
    std::env::temp_dir().join(format!("meshpick-smoke-{}-{name}", std::process::id()))
}

#[test]
fn probe_reports_scene_and_cli_pointers() {
    let scene = temp_path("scene.toml");
    std::fs::write(&scene, SCENE).expect("write scene");

    let output = Command::new(env!("CARGO_BIN_EXE_meshpick"))
        .arg("--scene")
        .arg(&scene)
        .args(["--pointer", "5,100", "--capture", "30", "--dump-edges"])
        .output()
        .expect("run probe");
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));

    let report: serde_json::Value = serde_json::from_slice(&output.stdout).expect("json report");
    assert_eq!(report["surfaces"], 1);
    let pointers = report["pointers"].as_array().expect("pointers");
    assert_eq!(pointers.len(), 2);
    assert_eq!(pointers[0]["hit"]["surface"], 3);
    assert_eq!(pointers[1]["captured"], 30);
    let fallback_u = pointers[1]["hit"]["uv"][0].as_f64().expect("fallback uv");
    assert!(fallback_u < 0.0);
    assert!(!report["edges"][0]["edges"].as_array().expect("edges").is_empty());

    let mut sink = JsonlSink::create(temp_path("hits.jsonl")).expect("sink");
    for (step, pointer) in pointers.iter().enumerate() {
        let uv = &pointer["hit"]["uv"];
        sink.write(&HitRecord {
            step: step as u64,
            kind: "probe",
            pointer: DVec2::new(
                pointer["position"][0].as_f64().unwrap_or_default(),
                pointer["position"][1].as_f64().unwrap_or_default(),
            ),
            surface: Some(SurfaceId(3)),
            uv: uv[0].as_f64().zip(uv[1].as_f64()).map(|(u, v)| DVec2::new(u, v)),
        })
        .expect("write record");
    }
    let _ = std::fs::remove_file(&scene);
}

#[test]
fn unknown_capture_element_fails() {
    let output = Command::new(env!("CARGO_BIN_EXE_meshpick"))
        .args(["--scene", "/nonexistent/scene.toml", "--capture", "99"])
        .output()
        .expect("run probe");
    assert!(!output.status.success());
}
