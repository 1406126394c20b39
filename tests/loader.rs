use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use image::{Rgba, RgbaImage};
use imagepeek::app::loader::{LoadState, Loader};
use tempfile::tempdir;

fn write_png(dir: &Path, name: &str) -> PathBuf {
    let path = dir.join(name);
    RgbaImage::from_pixel(4, 4, Rgba([200, 100, 50, 255]))
        .save(&path)
        .unwrap();
    path
}

fn pump_until(loader: &mut Loader, mut done: impl FnMut(&Loader) -> bool) {
    let deadline = Instant::now() + Duration::from_secs(10);
    loop {
        loader.update();
        if done(loader) {
            return;
        }
        assert!(Instant::now() < deadline, "decoder timed out");
        std::thread::sleep(Duration::from_millis(5));
    }
}

#[test]
fn protected_paths_survive_eviction() {
    let tmp = tempdir().unwrap();
    let first = write_png(tmp.path(), "first.png");
    let second = write_png(tmp.path(), "second.png");
    let third = write_png(tmp.path(), "third.png");

    let mut loader = Loader::with_capacity(2);
    loader.protect([first.clone()]);

    for path in [&first, &second, &third] {
        loader.request(path);
        pump_until(&mut loader, |loader| {
            matches!(loader.state(path), LoadState::Ready(_))
        });
    }

    // Two slots, three decodes: the unprotected middle one goes.
    assert!(loader.cached(&first).is_some());
    assert!(loader.cached(&second).is_none());
    assert!(loader.cached(&third).is_some());
}

#[test]
fn failures_are_remembered_until_cleared() {
    let tmp = tempdir().unwrap();
    let broken = tmp.path().join("broken.png");
    std::fs::write(&broken, b"not a png").unwrap();

    let mut loader = Loader::new();
    loader.request(&broken);
    pump_until(&mut loader, |loader| {
        matches!(loader.state(&broken), LoadState::Failed)
    });

    loader.clear_failures();
    assert!(matches!(loader.state(&broken), LoadState::Pending));
}
