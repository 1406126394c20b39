use std::{
    collections::{HashMap, HashSet, VecDeque},
    io::Cursor,
    path::{Path, PathBuf},
    sync::mpsc::{self, Receiver, Sender},
    thread,
};

use image::DynamicImage;
use log::warn;
use zune_jpeg::JpegDecoder;

use crate::image_utils::{downscale_to_fit, MAX_TEXTURE_HEIGHT, MAX_TEXTURE_WIDTH};

/// Decoded images kept around for quick page flips.
const CACHE_CAP: usize = 64;

enum LoadResult {
    Loaded { path: PathBuf, image: DynamicImage },
    Failed { path: PathBuf, error: String },
}

pub enum LoadState<'a> {
    Ready(&'a DynamicImage),
    Failed,
    Pending,
}

/// Background decoder. Paths go out over a channel, decoded images come back
/// and land in a bounded cache; failures are remembered so the grid can show
/// placeholders without retry storms.
pub struct Loader {
    result_rx: Receiver<LoadResult>,
    path_tx: Sender<PathBuf>,
    cache: HashMap<PathBuf, DynamicImage>,
    cache_order: VecDeque<PathBuf>,
    protected: HashSet<PathBuf>,
    failed: HashSet<PathBuf>,
    requested: HashSet<PathBuf>,
    capacity: usize,
}

impl Loader {
    pub fn new() -> Self {
        Self::with_capacity(CACHE_CAP)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        let (result_rx, path_tx) = Self::spawn_decoder();
        Self {
            result_rx,
            path_tx,
            cache: HashMap::new(),
            cache_order: VecDeque::new(),
            protected: HashSet::new(),
            failed: HashSet::new(),
            requested: HashSet::new(),
            capacity,
        }
    }

    /// Pins the paths the grid currently shows. Eviction passes over them, so
    /// a page with more slots than the cache cap keeps its decoded images.
    pub fn protect<I>(&mut self, paths: I)
    where
        I: IntoIterator<Item = PathBuf>,
    {
        self.protected = paths.into_iter().collect();
    }

    fn spawn_decoder() -> (Receiver<LoadResult>, Sender<PathBuf>) {
        let (result_tx, result_rx) = mpsc::channel();
        let (path_tx, path_rx) = mpsc::channel::<PathBuf>();

        thread::spawn(move || {
            while let Ok(path) = path_rx.recv() {
                let result = match decode_file(&path) {
                    Ok(image) => LoadResult::Loaded {
                        path,
                        image: downscale_to_fit(image, MAX_TEXTURE_WIDTH, MAX_TEXTURE_HEIGHT),
                    },
                    Err(error) => LoadResult::Failed { path, error },
                };
                if result_tx.send(result).is_err() {
                    break;
                }
            }
        });
        (result_rx, path_tx)
    }

    /// Queues a decode unless the path is already cached, failed or in
    /// flight.
    pub fn request(&mut self, path: &Path) {
        if self.cache.contains_key(path)
            || self.failed.contains(path)
            || self.requested.contains(path)
        {
            return;
        }
        self.requested.insert(path.to_path_buf());
        let _ = self.path_tx.send(path.to_path_buf());
    }

    /// Drains finished decodes into the cache. Called once per frame.
    pub fn update(&mut self) {
        while let Ok(result) = self.result_rx.try_recv() {
            match result {
                LoadResult::Loaded { path, image } => {
                    self.requested.remove(&path);
                    self.cache_order.push_back(path.clone());
                    self.cache.insert(path, image);
                }
                LoadResult::Failed { path, error } => {
                    warn!("cannot load {}: {error}", path.display());
                    self.requested.remove(&path);
                    self.failed.insert(path);
                }
            }
        }
        let mut passes = self.cache_order.len();
        while self.cache.len() > self.capacity && passes > 0 {
            passes -= 1;
            let Some(oldest) = self.cache_order.pop_front() else {
                break;
            };
            if self.protected.contains(&oldest) {
                self.cache_order.push_back(oldest);
            } else {
                self.cache.remove(&oldest);
            }
        }
    }

    pub fn state(&self, path: &Path) -> LoadState<'_> {
        if let Some(image) = self.cache.get(path) {
            LoadState::Ready(image)
        } else if self.failed.contains(path) {
            LoadState::Failed
        } else {
            LoadState::Pending
        }
    }

    pub fn cached(&self, path: &Path) -> Option<&DynamicImage> {
        self.cache.get(path)
    }

    /// Forgets previous failures so a reload retries them.
    pub fn clear_failures(&mut self) {
        self.failed.clear();
    }
}

impl Default for Loader {
    fn default() -> Self {
        Self::new()
    }
}

fn decode_file(path: &Path) -> Result<DynamicImage, String> {
    let bytes = std::fs::read(path).map_err(|err| err.to_string())?;

    // zune-jpeg is noticeably faster for the common case; fall back to the
    // generic decoder for everything else.
    let is_jpeg = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|s| s.eq_ignore_ascii_case("jpg") || s.eq_ignore_ascii_case("jpeg"))
        .unwrap_or(false);

    if is_jpeg {
        if let Some(image) = decode_jpeg_fast(&bytes) {
            return Ok(image);
        }
    }
    image::load_from_memory(&bytes).map_err(|err| err.to_string())
}

fn decode_jpeg_fast(bytes: &[u8]) -> Option<DynamicImage> {
    let mut decoder = JpegDecoder::new(Cursor::new(bytes));
    let pixels = decoder.decode().ok()?;
    let info = decoder.info()?;
    image::RgbImage::from_raw(info.width as u32, info.height as u32, pixels)
        .map(DynamicImage::ImageRgb8)
}
