use std::path::{Path, PathBuf};

use log::warn;
use walkdir::WalkDir;

pub const SUPPORTED_EXTENSIONS: &[&str] = &[
    "png", "jpg", "jpeg", "bmp", "gif", "webp", "tiff", "tif", "ico",
];

pub fn is_supported_image(path: &Path) -> bool {
    matches!(
        path.extension()
            .and_then(|ext| ext.to_str())
            .map(|s| s.to_ascii_lowercase()),
        Some(ref ext) if SUPPORTED_EXTENSIONS.contains(&ext.as_str())
    )
}

/// Expands command-line arguments into the item list. Directories contribute
/// the supported images inside them (sorted); plain paths pass through
/// unchanged so an unreadable file still gets its error placeholder in the
/// grid instead of silently disappearing.
pub fn expand_args(paths: &[PathBuf]) -> Vec<PathBuf> {
    let mut files = Vec::new();
    for path in paths {
        if path.is_dir() {
            files.extend(collect_images(path));
        } else {
            files.push(path.clone());
        }
    }
    files
}

/// All supported images under `root`, recursively, in path order.
pub fn collect_images(root: &Path) -> Vec<PathBuf> {
    let mut files = Vec::new();
    for entry in WalkDir::new(root).follow_links(false) {
        match entry {
            Ok(entry) if entry.file_type().is_file() && is_supported_image(entry.path()) => {
                files.push(entry.path().to_path_buf());
            }
            Ok(_) => {}
            Err(err) => warn!("skipping unreadable entry under {}: {err}", root.display()),
        }
    }
    files.sort();
    files
}
