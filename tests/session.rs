use std::env;

use imagepeek::session::{self, Color, Options, BAD_COLOR, SESSION_ENV};
use tempfile::tempdir;

mod common;
use common::ENV_GUARD;

#[test]
fn defaults_round_trip() {
    let options = Options::default();
    assert_eq!(session::parse(&session::serialize(&options)), options);
}

#[test]
fn custom_options_round_trip() {
    let options = Options {
        zoom_animation: 0,
        scroll_animation: 250,
        zoom: 2.5,
        sharpen: 0.35,
        current: 12,
        rows: 3,
        columns: 4,
        items: vec!["a.png".into(), "dir/b.jpg".into()],
        fullscreen: true,
        background_color: Color::rgba(0x10, 0x20, 0x30, 0x40),
        text_color: Color::rgba(0xff, 0xff, 0x00, 0xff),
        text_shadow_color: Color::rgba(0x00, 0x00, 0x00, 0x80),
        error_color: Color::rgba(0xff, 0x00, 0x00, 0xff),
        item_font: "monospace 12px".into(),
        item_spacing: 8,
        zoom_increment: 0.25,
        zoom_quality: 2,
    };
    assert_eq!(session::parse(&session::serialize(&options)), options);
}

#[test]
fn unreadable_values_fall_back_per_key() {
    let parsed = session::parse(
        "[general]\nzoom=not-a-number\nrows=3\ncolumns=oops\nsharpen=0.2\n",
    );
    assert_eq!(parsed.zoom, 1.0);
    assert_eq!(parsed.rows, 3);
    assert_eq!(parsed.columns, 1);
    assert_eq!(parsed.sharpen, 0.2);
}

#[test]
fn dimension_keys_clamp_to_at_least_one() {
    let parsed = session::parse("rows=0\ncolumns=-4\ncurrent=-9\n");
    assert_eq!(parsed.rows, 1);
    assert_eq!(parsed.columns, 1);
    assert_eq!(parsed.current, 0);
}

#[test]
fn comments_sections_and_unknown_keys_are_skipped() {
    let parsed = session::parse(
        "# comment\n; also a comment\n[general]\nmystery=42\nzoom=3\n",
    );
    assert_eq!(parsed.zoom, 3.0);
}

#[test]
fn item_lists_use_semicolons_with_trailing_separator() {
    let parsed = session::parse("items=a.png;b.png;\n");
    assert_eq!(parsed.items, vec!["a.png".to_string(), "b.png".to_string()]);
    let serialized = session::serialize(&parsed);
    assert!(serialized.contains("items=a.png;b.png;\n"));
}

#[test]
fn semicolons_inside_item_paths_are_escaped() {
    let mut options = Options::default();
    options.items = vec!["odd;name.png".into(), "plain.png".into()];
    let serialized = session::serialize(&options);
    assert!(serialized.contains("items=odd\\;name.png;plain.png;\n"));
    assert_eq!(session::parse(&serialized).items, options.items);
}

#[test]
fn colors_parse_with_and_without_alpha() {
    assert_eq!(Color::parse("#ff9000"), Color::rgba(0xff, 0x90, 0x00, 0xff));
    assert_eq!(
        Color::parse("#ff900080"),
        Color::rgba(0xff, 0x90, 0x00, 0x80)
    );
    assert_eq!(Color::parse("red"), BAD_COLOR);
    assert_eq!(Color::parse("#12345"), BAD_COLOR);
    assert_eq!(Color::parse("#ggpp00"), BAD_COLOR);
    assert_eq!(Color::rgba(1, 2, 3, 4).to_hex(), "#01020304");
}

#[test]
fn unparsable_colors_show_up_as_magenta() {
    let parsed = session::parse("background_color=nope\n");
    assert_eq!(parsed.background_color, BAD_COLOR);
}

#[test]
fn missing_file_yields_defaults() {
    let tmp = tempdir().unwrap();
    let options = session::load(&tmp.path().join("absent.ini"));
    assert_eq!(options, Options::default());
}

#[test]
fn save_then_load_preserves_state() {
    let tmp = tempdir().unwrap();
    let path = tmp.path().join("session");
    let mut options = Options::default();
    options.zoom = 0.5;
    options.current = 3;
    options.items = vec!["x.png".into()];
    session::save(&path, &options).unwrap();
    assert_eq!(session::load(&path), options);
}

#[test]
fn save_into_missing_directory_fails_with_context() {
    let tmp = tempdir().unwrap();
    let path = tmp.path().join("no/such/dir/session");
    let err = session::save(&path, &Options::default()).unwrap_err();
    assert!(err.to_string().contains("unable to write session file"));
}

#[test]
fn session_path_comes_from_the_environment() {
    let _guard = ENV_GUARD.lock().unwrap_or_else(|poison| poison.into_inner());
    let previous = env::var(SESSION_ENV).ok();

    env::remove_var(SESSION_ENV);
    assert_eq!(session::session_path(), None);
    env::set_var(SESSION_ENV, "");
    assert_eq!(session::session_path(), None);
    env::set_var(SESSION_ENV, "/tmp/peek-session");
    assert_eq!(
        session::session_path().as_deref(),
        Some(std::path::Path::new("/tmp/peek-session"))
    );

    match previous {
        Some(value) => env::set_var(SESSION_ENV, value),
        None => env::remove_var(SESSION_ENV),
    }
}

#[test]
fn serialized_form_is_ini_like() {
    let text = session::serialize(&Options::default());
    assert!(text.starts_with("[general]\n"));
    assert!(text.contains("background_color=#000000ff\n"));
    assert!(text.contains("fullscreen=false\n"));
}
