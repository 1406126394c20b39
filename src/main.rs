use std::path::PathBuf;

use anyhow::{anyhow, Result};
use clap::Parser;
use eframe::egui;

use imagepeek::app::ImagePeekApp;
use imagepeek::fs_utils::expand_args;
use imagepeek::session;

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Paginated grid image viewer with session persistence"
)]
struct Args {
    /// Image files to view; directories are expanded to the images inside
    /// them. With no arguments the item list comes from the session file.
    #[arg(value_name = "PATH")]
    paths: Vec<PathBuf>,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let session_file = session::session_path();
    let mut options = session_file
        .as_deref()
        .map(session::load)
        .unwrap_or_default();

    let cli_items = expand_args(&args.paths);
    if !cli_items.is_empty() {
        options.items = cli_items
            .iter()
            .map(|path| path.display().to_string())
            .collect();
        options.current = 0;
    }
    if options.items.is_empty() {
        return Err(anyhow!(
            "no images loaded; pass image paths or set {}",
            session::SESSION_ENV
        ));
    }

    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_fullscreen(options.fullscreen)
            .with_inner_size([1024.0, 768.0]),
        ..Default::default()
    };

    eframe::run_native(
        "imagepeek",
        native_options,
        Box::new(move |cc| Ok(Box::new(ImagePeekApp::new(cc, options, session_file)))),
    )
    .map_err(|err| anyhow!("{err}"))?;

    Ok(())
}
