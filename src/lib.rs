pub mod app;
pub mod fs_utils;
pub mod grid;
pub mod image_utils;
pub mod session;
pub mod ui;
pub mod viewport;
