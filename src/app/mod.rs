pub mod loader;

use std::{
    collections::VecDeque,
    path::{Path, PathBuf},
    time::Instant,
};

use eframe::{
    egui::{self, Color32, Key, Rect, TextureHandle, ViewportCommand},
    App, Frame,
};
use image::DynamicImage;
use log::{error, info};

use crate::{
    grid::{GridLayout, PageUpdate, Pager},
    image_utils::{sharpen, to_color_image, SHARPEN_STEP},
    session::{self, Options},
    ui::{self, KeyboardState},
    viewport::{self, Viewport, SCROLL_STEP, SKIP_FACTOR},
};

use self::loader::{LoadState, Loader};

/// One grid slot on the current page. A failed load keeps its slot and shows
/// the filename label only.
struct PageItem {
    path: PathBuf,
    texture: Option<TextureHandle>,
    size: egui::Vec2,
}

pub struct ImagePeekApp {
    options: Options,
    session_file: Option<PathBuf>,
    items: Vec<PathBuf>,
    pager: Pager,
    viewport: Viewport,
    loader: Loader,
    page: Vec<PageItem>,
    /// Effective column count when the current page was planned; item
    /// positions are only valid against it.
    page_columns: usize,
    loading: bool,
    /// Layout changed while the page was still filling; start over instead
    /// of mixing shapes.
    restart: bool,
    fullscreen: bool,
    /// Scroll to the bottom once the page finishes loading (backward skip
    /// lands on the end of the previous page).
    scroll_to_bottom: bool,
    resharpen: VecDeque<usize>,
    drag_vector: egui::Vec2,
    texture_seq: u64,
}

impl ImagePeekApp {
    pub fn new(
        cc: &eframe::CreationContext<'_>,
        options: Options,
        session_file: Option<PathBuf>,
    ) -> Self {
        let now = Instant::now();
        let items: Vec<PathBuf> = options.items.iter().map(PathBuf::from).collect();
        let pager = Pager::new(options.rows, options.columns, options.current);
        let viewport = Viewport::new(
            options.zoom as f32,
            options.zoom_increment as f32,
            options.zoom_animation,
            options.scroll_animation,
            now,
        );
        let fullscreen = options.fullscreen;

        let mut app = Self {
            options,
            session_file,
            items,
            pager,
            viewport,
            loader: Loader::new(),
            page: Vec::new(),
            page_columns: 1,
            loading: false,
            restart: false,
            fullscreen,
            scroll_to_bottom: false,
            resharpen: VecDeque::new(),
            drag_vector: egui::Vec2::ZERO,
            texture_seq: 0,
        };
        app.reload(&cc.egui_ctx, now);
        app
    }

    fn count(&self) -> usize {
        self.items.len()
    }

    fn show_labels(&self) -> bool {
        self.pager.rows(self.count()) > 1 || self.pager.columns(self.count()) > 1
    }

    /// Drops the current page and starts filling it again, one item per
    /// frame.
    fn reload(&mut self, ctx: &egui::Context, now: Instant) {
        self.page.clear();
        self.resharpen.clear();
        self.loading = true;
        self.restart = false;
        self.page_columns = self.pager.columns(self.count());
        self.viewport.reset_scroll(now);
        self.loader.clear_failures();
        let wanted: Vec<PathBuf> = self
            .pager
            .visible(self.count())
            .map(|index| self.items[index].clone())
            .collect();
        for path in &wanted {
            self.loader.request(path);
        }
        self.loader.protect(wanted);
        self.update_title(ctx);
    }

    fn update_title(&self, ctx: &egui::Context) {
        let count = self.count();
        let offset = self.pager.offset(count);
        if let Some(path) = self.items.get(offset) {
            ctx.send_viewport_cmd(ViewportCommand::Title(ui::window_title(offset, count, path)));
        }
    }

    /// Adds at most one finished image to the grid per frame so bulk loads
    /// never stall input handling.
    fn tick_loading(&mut self, ctx: &egui::Context, now: Instant) {
        if self.restart {
            self.reload(ctx, now);
        }
        if !self.loading {
            return;
        }
        let visible = self.pager.visible(self.count());
        let next = visible.start + self.page.len();
        if next >= visible.end {
            self.loading = false;
            if self.scroll_to_bottom {
                self.scroll_to_bottom = false;
                let window = ctx.screen_rect().size();
                let content = self.layout().size;
                let max = viewport::max_scroll(content, window, self.viewport.target_zoom());
                let target = egui::vec2(self.viewport.target_scroll().x, max.y);
                self.viewport
                    .scroll_to(target, max, 0, viewport::Easing::Linear, now);
            }
            return;
        }
        let path = self.items[next].clone();
        let ready = match self.loader.state(&path) {
            LoadState::Ready(image) => Some(image.clone()),
            LoadState::Failed => None,
            LoadState::Pending => {
                self.loader.request(&path);
                return;
            }
        };
        match ready {
            Some(image) => {
                let size = egui::vec2(image.width() as f32, image.height() as f32);
                let texture = self.make_texture(ctx, image, &path);
                self.page.push(PageItem {
                    path,
                    texture: Some(texture),
                    size,
                });
            }
            None => {
                self.page.push(PageItem {
                    path,
                    texture: None,
                    size: ui::ERROR_ITEM_SIZE,
                });
            }
        }
    }

    fn make_texture(
        &mut self,
        ctx: &egui::Context,
        image: DynamicImage,
        path: &Path,
    ) -> TextureHandle {
        self.texture_seq += 1;
        let sharpened = sharpen(&image, self.options.sharpen as f32);
        ctx.load_texture(
            format!("item-{}-{}", self.texture_seq, path.display()),
            to_color_image(&sharpened),
            ui::texture_options(self.options.zoom_quality),
        )
    }

    /// Regenerates one texture per frame after a sharpen change.
    fn tick_resharpen(&mut self, ctx: &egui::Context) {
        let Some(index) = self.resharpen.pop_front() else {
            return;
        };
        let Some(path) = self.page.get(index).map(|item| item.path.clone()) else {
            return;
        };
        let mut evicted = false;
        let image = match self.loader.state(&path) {
            LoadState::Ready(image) => Some(image.clone()),
            LoadState::Failed => None,
            LoadState::Pending => {
                evicted = true;
                None
            }
        };
        if evicted {
            // The decoded copy fell out of the cache; decode it again and
            // come back to this slot.
            self.loader.request(&path);
            self.resharpen.push_back(index);
            return;
        }
        if let Some(image) = image {
            let texture = self.make_texture(ctx, image, &path);
            if let Some(item) = self.page.get_mut(index) {
                item.texture = Some(texture);
            }
        }
    }

    fn set_sharpen(&mut self, strength: f64) {
        let strength = strength.max(0.0);
        if (strength - self.options.sharpen).abs() < f64::EPSILON {
            return;
        }
        self.options.sharpen = strength;
        self.resharpen = (0..self.page.len())
            .filter(|&i| self.page[i].texture.is_some())
            .collect();
    }

    fn relayout(&mut self, ctx: &egui::Context, now: Instant) {
        let count = self.count();
        match self
            .pager
            .plan_update(count, self.page.len(), self.page_columns, self.loading)
        {
            PageUpdate::Restart => self.restart = true,
            PageUpdate::Truncate(keep) => {
                self.page.truncate(keep);
                self.page_columns = self.pager.columns(count);
            }
            PageUpdate::Reload => self.reload(ctx, now),
            PageUpdate::Keep => {}
        }
    }

    fn next_page(&mut self, ctx: &egui::Context, now: Instant) {
        if self.pager.next_page(self.count()) {
            self.reload(ctx, now);
        }
    }

    fn prev_page(&mut self, ctx: &egui::Context, now: Instant) {
        if self.pager.prev_page(self.count()) {
            self.reload(ctx, now);
        }
    }

    fn layout(&self) -> GridLayout {
        let sizes: Vec<egui::Vec2> = self.page.iter().map(|item| item.size).collect();
        GridLayout::compute(&sizes, self.page_columns, self.options.item_spacing as f32)
    }

    fn handle_keyboard(ctx: &egui::Context) -> KeyboardState {
        ctx.input(|input| {
            let shift = input.modifiers.shift;
            let ctrl = input.modifiers.ctrl || input.modifiers.command;
            let mut keys = KeyboardState {
                zoom_in: input.key_pressed(Key::Plus) || input.key_pressed(Key::Equals),
                zoom_out: input.key_pressed(Key::Minus),
                fit_width: input.key_pressed(Key::W),
                fit_height: input.key_pressed(Key::H),
                fit_both: input.key_pressed(Key::Num0),
                sharpen_up: input.key_pressed(Key::A),
                sharpen_down: input.key_pressed(Key::Z),
                fullscreen: input.key_pressed(Key::F),
                next_page: (!shift && input.key_pressed(Key::N)) || input.key_pressed(Key::Enter),
                prev_page: input.key_pressed(Key::P)
                    || input.key_pressed(Key::B)
                    || (shift && input.key_pressed(Key::N))
                    || input.key_pressed(Key::Backspace),
                first_page: shift && input.key_pressed(Key::Home),
                last_page: shift && input.key_pressed(Key::End),
                scroll_up: input.key_pressed(Key::ArrowUp),
                scroll_down: input.key_pressed(Key::ArrowDown),
                scroll_left: input.key_pressed(Key::ArrowLeft),
                scroll_right: input.key_pressed(Key::ArrowRight),
                page_up: input.key_pressed(Key::PageUp),
                page_down: input.key_pressed(Key::PageDown),
                scroll_home: !shift && input.key_pressed(Key::Home),
                scroll_end: !shift && input.key_pressed(Key::End),
                skip_forward: (!shift && input.key_pressed(Key::Space))
                    || input.key_pressed(Key::J),
                skip_backward: (shift && input.key_pressed(Key::Space))
                    || input.key_pressed(Key::K),
                reload: input.key_pressed(Key::F5),
                quit: input.key_pressed(Key::Q) || input.key_pressed(Key::Escape),
                ..Default::default()
            };
            let digits = [
                Key::Num1,
                Key::Num2,
                Key::Num3,
                Key::Num4,
                Key::Num5,
                Key::Num6,
                Key::Num7,
                Key::Num8,
                Key::Num9,
            ];
            for (index, key) in digits.iter().enumerate() {
                if input.key_pressed(*key) {
                    keys.zoom_digit = Some(index as u32 + 1);
                    keys.reciprocal = ctrl;
                }
            }
            if input.key_pressed(Key::S) {
                keys.shift_delta = if shift { -1 } else { 1 };
            }
            if input.key_pressed(Key::R) {
                keys.rows_delta = if shift { -1 } else { 1 };
            }
            if input.key_pressed(Key::C) {
                keys.columns_delta = if shift { -1 } else { 1 };
            }
            keys
        })
    }

    fn dispatch(&mut self, ctx: &egui::Context, keys: &KeyboardState, now: Instant) {
        let count = self.count();
        let window = ctx.screen_rect().size();
        let content = self.layout().size;

        if keys.quit {
            ctx.send_viewport_cmd(ViewportCommand::Close);
        }

        if keys.zoom_in {
            self.viewport.zoom_in(now);
        }
        if keys.zoom_out {
            self.viewport.zoom_out(now);
        }
        if let Some(digit) = keys.zoom_digit {
            let level = if keys.reciprocal {
                1.0 / digit as f32
            } else {
                digit as f32
            };
            self.viewport.set_zoom(level, now);
        }
        if keys.fit_width {
            self.viewport.fit_width(content, window, now);
        }
        if keys.fit_height {
            self.viewport.fit_height(content, window, now);
        }
        if keys.fit_both {
            self.viewport.fit_both(content, window, now);
        }

        if keys.sharpen_up {
            self.set_sharpen(self.options.sharpen + SHARPEN_STEP);
        }
        if keys.sharpen_down {
            self.set_sharpen(self.options.sharpen - SHARPEN_STEP);
        }

        if keys.fullscreen {
            self.fullscreen = !self.fullscreen;
            ctx.send_viewport_cmd(ViewportCommand::Fullscreen(self.fullscreen));
        }

        if keys.next_page {
            self.next_page(ctx, now);
        }
        if keys.prev_page {
            self.prev_page(ctx, now);
        }
        if keys.first_page && self.pager.first_page(count) {
            self.reload(ctx, now);
        }
        if keys.last_page && self.pager.last_page(count) {
            self.reload(ctx, now);
        }
        if keys.shift_delta != 0 {
            self.pager.shift(count, keys.shift_delta);
            self.reload(ctx, now);
        }
        if keys.rows_delta != 0 {
            self.pager.adjust_rows(keys.rows_delta, count);
            self.relayout(ctx, now);
        }
        if keys.columns_delta != 0 {
            self.pager.adjust_columns(keys.columns_delta, count);
            self.relayout(ctx, now);
        }
        if keys.reload {
            self.reload(ctx, now);
        }

        let zoom = self.viewport.target_zoom();
        let max = viewport::max_scroll(content, window, zoom);

        // Arrows scroll while there is room; once the content fits the
        // window on that axis they page instead.
        if keys.scroll_right
            && !self
                .viewport
                .scroll_by(egui::vec2(SCROLL_STEP, 0.0), max, now)
            && viewport::fits(content.x, window.x, zoom)
        {
            self.next_page(ctx, now);
        }
        if keys.scroll_left
            && !self
                .viewport
                .scroll_by(egui::vec2(-SCROLL_STEP, 0.0), max, now)
            && viewport::fits(content.x, window.x, zoom)
        {
            self.prev_page(ctx, now);
        }
        if keys.scroll_down
            && !self
                .viewport
                .scroll_by(egui::vec2(0.0, SCROLL_STEP), max, now)
            && viewport::fits(content.y, window.y, zoom)
        {
            self.next_page(ctx, now);
        }
        if keys.scroll_up
            && !self
                .viewport
                .scroll_by(egui::vec2(0.0, -SCROLL_STEP), max, now)
            && viewport::fits(content.y, window.y, zoom)
        {
            self.prev_page(ctx, now);
        }

        let page_step = window.y / zoom - SCROLL_STEP;
        if keys.page_up {
            self.viewport.scroll_by(egui::vec2(0.0, -page_step), max, now);
        }
        if keys.page_down {
            self.viewport.scroll_by(egui::vec2(0.0, page_step), max, now);
        }
        if keys.scroll_home {
            self.viewport.scroll_home(now);
        }
        if keys.scroll_end {
            self.viewport.scroll_end(max, now);
        }

        // Space and j/k read on from the top of the next page once the
        // current one is scrolled through.
        let skip = window.y / zoom * SKIP_FACTOR;
        if keys.skip_forward && !self.viewport.scroll_by(egui::vec2(0.0, skip), max, now) {
            self.next_page(ctx, now);
        }
        if keys.skip_backward
            && !self.viewport.scroll_by(egui::vec2(0.0, -skip), max, now)
            && self.pager.offset(count) != 0
        {
            self.prev_page(ctx, now);
            self.scroll_to_bottom = true;
        }

        let wheel = ctx.input(|input| input.raw_scroll_delta);
        if wheel != egui::Vec2::ZERO {
            let step = |delta: f32| {
                if delta > 0.0 {
                    -SCROLL_STEP
                } else if delta < 0.0 {
                    SCROLL_STEP
                } else {
                    0.0
                }
            };
            self.viewport
                .scroll_by(egui::vec2(step(wheel.x), step(wheel.y)), max, now);
        }

        self.viewport.reclamp(max, now);
    }

    fn draw(&mut self, ctx: &egui::Context, now: Instant) {
        let background = ui::to_color32(self.options.background_color);
        let layout = self.layout();
        egui::CentralPanel::default()
            .frame(egui::Frame::NONE)
            .show(ctx, |ui_ctx| {
                let (response, painter) =
                    ui_ctx.allocate_painter(ui_ctx.available_size(), egui::Sense::click_and_drag());
                painter.rect_filled(response.rect, 0.0, background);

                let window = response.rect.size();
                let zoom = self.viewport.zoom(now);
                let scroll = self.viewport.scroll(now);
                let origin = response.rect.min
                    + viewport::screen_offset(layout.size, window, zoom, scroll);

                let show_labels = self.show_labels();
                let font = egui::FontId::proportional(ui::font_size(&self.options.item_font));
                let text_color = ui::to_color32(self.options.text_color);
                let shadow_color = ui::to_color32(self.options.text_shadow_color);
                let error_color = ui::to_color32(self.options.error_color);

                for (item, position) in self.page.iter().zip(&layout.positions) {
                    let rect = Rect::from_min_size(
                        origin + position.to_vec2() * zoom,
                        item.size * zoom,
                    );
                    if let Some(texture) = &item.texture {
                        painter.image(
                            texture.id(),
                            rect,
                            Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0)),
                            Color32::WHITE,
                        );
                    }
                    if show_labels || item.texture.is_none() {
                        let label = item.path.display().to_string();
                        let color = if item.texture.is_none() {
                            error_color
                        } else {
                            text_color
                        };
                        painter.text(
                            rect.min + egui::vec2(ui::LABEL_SHADOW_OFFSET, ui::LABEL_SHADOW_OFFSET),
                            egui::Align2::LEFT_TOP,
                            &label,
                            font.clone(),
                            shadow_color,
                        );
                        painter.text(rect.min, egui::Align2::LEFT_TOP, &label, font.clone(), color);
                    }
                }

                if self.page.is_empty() && self.loading {
                    painter.text(
                        response.rect.center(),
                        egui::Align2::CENTER_CENTER,
                        "Loading...",
                        egui::FontId::proportional(24.0),
                        text_color,
                    );
                }

                let zoom_target = self.viewport.target_zoom();
                let max = viewport::max_scroll(layout.size, window, zoom_target);
                if response.dragged() {
                    let delta = response.drag_delta();
                    if delta != egui::Vec2::ZERO {
                        self.viewport.drag_by(-delta / zoom_target, max, now);
                        self.drag_vector = delta / zoom_target;
                    }
                }
                if response.drag_stopped() {
                    self.viewport.fling(self.drag_vector, max, now);
                    self.drag_vector = egui::Vec2::ZERO;
                }
            });
    }

    /// Current state as session options, the way it gets persisted.
    pub fn snapshot(&self) -> Options {
        let count = self.count();
        let mut options = self.options.clone();
        options.zoom = f64::from(self.viewport.target_zoom());
        options.current = self.pager.offset(count);
        options.rows = self.pager.rows(count);
        options.columns = self.pager.columns(count);
        options.items = self
            .items
            .iter()
            .map(|path| path.display().to_string())
            .collect();
        options.fullscreen = self.fullscreen;
        options
    }
}

impl App for ImagePeekApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut Frame) {
        let now = Instant::now();

        self.loader.update();
        self.tick_loading(ctx, now);
        self.tick_resharpen(ctx);

        let keys = Self::handle_keyboard(ctx);
        self.dispatch(ctx, &keys, now);
        self.draw(ctx, now);

        if self.loading || !self.resharpen.is_empty() || self.viewport.animating(now) {
            ctx.request_repaint();
        }
    }

    fn on_exit(&mut self) {
        let Some(path) = self.session_file.clone() else {
            return;
        };
        match session::save(&path, &self.snapshot()) {
            Ok(()) => info!("session file {} saved", path.display()),
            Err(err) => error!("{err:#}"),
        }
    }
}
