use std::path::{Path, PathBuf};
use std::process::Command;

fn bin() -> String {
    std::env::var("CARGO_BIN_EXE_scrollreel").unwrap_or_else(|_| {
        PathBuf::from(env!("CARGO_MANIFEST_DIR"))
            .join("../../target/debug/scrollreel")
            .to_string_lossy()
            .to_string()
    })
}

fn write(root: &Path, rel: &str, contents: &[u8]) {
    let path = root.join(rel);
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(path, contents).unwrap();
}

fn write_frame(dir: &Path, name: &str, shade: u8) {
    std::fs::create_dir_all(dir).unwrap();
    image::RgbaImage::from_pixel(4, 2, image::Rgba([shade, shade, shade, 255]))
        .save(dir.join(name))
        .unwrap();
}

#[test]
fn test_info_prints_version() {
    let output = Command::new(bin()).arg("info").output().expect("failed to spawn scrollreel");
    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.contains(env!("CARGO_PKG_VERSION")), "stdout: {stdout}");
}

#[test]
fn test_check_json_on_ready_site() {
    let site = tempfile::tempdir().unwrap();
    for file in ["index.html", "script.js", "styles.css", "README.md"] {
        write(site.path(), file, b"ok");
    }
    write(site.path(), ".github/workflows/deploy.yml", b"on: push");
    write(site.path(), "frames/frame_0001.jpg", b"x");

    let output = Command::new(bin())
        .args(["check", "--json", "--root"])
        .arg(site.path())
        .output()
        .expect("failed to spawn scrollreel check");
    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));

    let value: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("stdout is not valid JSON");
    assert_eq!(value["workflow_present"], true);
    assert_eq!(value["frames"]["images"][0], "frame_0001.jpg");
}

#[test]
fn test_check_fails_without_workflow() {
    let site = tempfile::tempdir().unwrap();
    for file in ["index.html", "script.js", "styles.css", "README.md"] {
        write(site.path(), file, b"ok");
    }
    write(site.path(), "frames/frame_0001.png", b"x");

    let output = Command::new(bin())
        .args(["check", "--root"])
        .arg(site.path())
        .output()
        .expect("failed to spawn scrollreel check");
    assert!(!output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.contains("CI workflow"), "stdout: {stdout}");
}

#[test]
fn test_scrub_writes_snapshots() {
    let work = tempfile::tempdir().unwrap();
    let frames = work.path().join("frames");
    write_frame(&frames, "frame_0001.png", 20);
    write_frame(&frames, "frame_0002.png", 120);
    write_frame(&frames, "frame_0003.png", 220);
    write(
        work.path(),
        "scrollreel.toml",
        b"[sequence]\nextension = \"png\"\nframe_count = 3\n",
    );
    let out = work.path().join("out");

    let output = Command::new(bin())
        .arg("scrub")
        .arg("--config")
        .arg(work.path().join("scrollreel.toml"))
        .arg("--frames")
        .arg(&frames)
        .args(["--steps", "2", "--width", "8", "--height", "8", "--output"])
        .arg(&out)
        .output()
        .expect("failed to spawn scrollreel scrub");
    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));

    for name in ["step_000.png", "step_001.png", "step_002.png", "recovery.png"] {
        assert!(out.join(name).is_file(), "missing {name}");
    }
    let last = image::open(out.join("step_002.png")).unwrap().to_rgba8();
    assert_eq!(last.dimensions(), (8, 8));
    assert_eq!(last.get_pixel(4, 4).0, [220, 220, 220, 255]);
}

#[test]
fn test_scrub_zero_width_surface_writes_nothing() {
    let work = tempfile::tempdir().unwrap();
    let frames = work.path().join("frames");
    write_frame(&frames, "frame_0001.png", 40);
    write_frame(&frames, "frame_0002.png", 80);
    write(
        work.path(),
        "scrollreel.toml",
        b"[sequence]\nextension = \"png\"\nframe_count = 2\n",
    );
    let out = work.path().join("out");

    let output = Command::new(bin())
        .arg("scrub")
        .arg("--config")
        .arg(work.path().join("scrollreel.toml"))
        .arg("--frames")
        .arg(&frames)
        .args(["--steps", "1", "--width", "0", "--height", "8", "--output"])
        .arg(&out)
        .output()
        .expect("failed to spawn scrollreel scrub");
    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));

    let written = std::fs::read_dir(&out)
        .map(|entries| entries.count())
        .unwrap_or(0);
    assert_eq!(written, 0);
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.contains("empty surface"), "stdout: {stdout}");
}
