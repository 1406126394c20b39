use std::time::{Duration, Instant};

use eframe::egui::{self, Vec2};

/// Content pixels moved by one arrow key or wheel notch.
pub const SCROLL_STEP: f32 = 100.0;
/// Fraction of the window skipped by space/j/k.
pub const SKIP_FACTOR: f32 = 0.9;
pub const FLING_MULTIPLIER: f32 = 16.0;
pub const FLING_MS: u32 = 500;

const MIN_ZOOM: f32 = 1e-3;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Easing {
    Linear,
    EaseOutCubic,
}

impl Easing {
    fn apply(self, t: f32) -> f32 {
        match self {
            Easing::Linear => t,
            Easing::EaseOutCubic => 1.0 - (1.0 - t).powi(3),
        }
    }
}

/// A time-based interpolation between two values. Zero duration snaps.
#[derive(Clone, Copy, Debug)]
pub struct Tween {
    from: f32,
    to: f32,
    started: Instant,
    duration: Duration,
    easing: Easing,
}

impl Tween {
    pub fn new(from: f32, to: f32, duration_ms: u32, easing: Easing, now: Instant) -> Self {
        Self {
            from,
            to,
            started: now,
            duration: Duration::from_millis(u64::from(duration_ms)),
            easing,
        }
    }

    pub fn fixed(value: f32, now: Instant) -> Self {
        Self::new(value, value, 0, Easing::Linear, now)
    }

    pub fn target(&self) -> f32 {
        self.to
    }

    pub fn value(&self, now: Instant) -> f32 {
        if self.duration.is_zero() || now >= self.started + self.duration {
            return self.to;
        }
        let elapsed = now.saturating_duration_since(self.started).as_secs_f32();
        let t = (elapsed / self.duration.as_secs_f32()).clamp(0.0, 1.0);
        self.from + (self.to - self.from) * self.easing.apply(t)
    }

    pub fn finished(&self, now: Instant) -> bool {
        self.duration.is_zero() || now >= self.started + self.duration
    }
}

/// Largest valid scroll offset per axis, in content coordinates.
pub fn max_scroll(content: Vec2, window: Vec2, zoom: f32) -> Vec2 {
    let zoom = zoom.max(MIN_ZOOM);
    egui::vec2(
        (content.x - window.x / zoom).max(0.0),
        (content.y - window.y / zoom).max(0.0),
    )
}

pub fn clamp_scroll(scroll: Vec2, max: Vec2) -> Vec2 {
    egui::vec2(scroll.x.clamp(0.0, max.x), scroll.y.clamp(0.0, max.y))
}

/// Screen position of the content's top-left corner: pinned to the scroll
/// offset when the axis overflows, centered otherwise.
pub fn screen_offset(content: Vec2, window: Vec2, zoom: f32, scroll: Vec2) -> Vec2 {
    let max = max_scroll(content, window, zoom);
    let axis = |scroll: f32, max: f32, content: f32, window: f32| {
        if max > 0.0 {
            -scroll * zoom
        } else {
            (window - content * zoom) / 2.0
        }
    };
    egui::vec2(
        axis(scroll.x, max.x, content.x, window.x),
        axis(scroll.y, max.y, content.y, window.y),
    )
}

/// Whether the zoomed content fits the window on the given axis, compared at
/// whole-pixel granularity so page navigation keys keep working at zoom
/// levels that round to a fit.
pub fn fits(content: f32, window: f32, zoom: f32) -> bool {
    window as i32 >= (content * zoom) as i32
}

/// Pan/zoom state of the scrollable grid canvas.
pub struct Viewport {
    zoom: Tween,
    scroll_x: Tween,
    scroll_y: Tween,
    pub zoom_increment: f32,
    pub zoom_animation: u32,
    pub scroll_animation: u32,
}

impl Viewport {
    pub fn new(
        zoom: f32,
        zoom_increment: f32,
        zoom_animation: u32,
        scroll_animation: u32,
        now: Instant,
    ) -> Self {
        Self {
            zoom: Tween::fixed(zoom.max(MIN_ZOOM), now),
            scroll_x: Tween::fixed(0.0, now),
            scroll_y: Tween::fixed(0.0, now),
            zoom_increment,
            zoom_animation,
            scroll_animation,
        }
    }

    pub fn zoom(&self, now: Instant) -> f32 {
        self.zoom.value(now)
    }

    pub fn target_zoom(&self) -> f32 {
        self.zoom.target()
    }

    pub fn set_zoom(&mut self, level: f32, now: Instant) {
        let level = level.max(MIN_ZOOM);
        self.zoom = Tween::new(
            self.zoom.value(now),
            level,
            self.zoom_animation,
            Easing::Linear,
            now,
        );
    }

    /// Steps multiplicatively below one increment so the zoom never reaches
    /// zero, additively above it.
    pub fn zoom_in(&mut self, now: Instant) {
        let zoom = self.target_zoom();
        let next = if zoom <= self.zoom_increment {
            zoom * (1.0 + self.zoom_increment)
        } else {
            zoom + self.zoom_increment
        };
        self.set_zoom(next, now);
    }

    pub fn zoom_out(&mut self, now: Instant) {
        let zoom = self.target_zoom();
        let next = if zoom <= self.zoom_increment {
            zoom / (1.0 + self.zoom_increment)
        } else {
            zoom - self.zoom_increment
        };
        self.set_zoom(next, now);
    }

    pub fn fit_width(&mut self, content: Vec2, window: Vec2, now: Instant) {
        if content.x > 0.0 {
            self.set_zoom(window.x / content.x, now);
        }
    }

    pub fn fit_height(&mut self, content: Vec2, window: Vec2, now: Instant) {
        if content.y > 0.0 {
            self.set_zoom(window.y / content.y, now);
        }
    }

    pub fn fit_both(&mut self, content: Vec2, window: Vec2, now: Instant) {
        if content.x > 0.0 && content.y > 0.0 {
            self.set_zoom((window.x / content.x).min(window.y / content.y), now);
        }
    }

    pub fn scroll(&self, now: Instant) -> Vec2 {
        egui::vec2(self.scroll_x.value(now), self.scroll_y.value(now))
    }

    pub fn target_scroll(&self) -> Vec2 {
        egui::vec2(self.scroll_x.target(), self.scroll_y.target())
    }

    /// Starts an animated scroll towards `target` clamped against `max`.
    /// Returns false when the clamped target matches the current position at
    /// whole-pixel granularity, so callers can fall through to paging.
    pub fn scroll_to(
        &mut self,
        target: Vec2,
        max: Vec2,
        duration_ms: u32,
        easing: Easing,
        now: Instant,
    ) -> bool {
        let target = clamp_scroll(target, max);
        let from = self.scroll(now);
        if from.x as i32 == target.x as i32 && from.y as i32 == target.y as i32 {
            return false;
        }
        self.scroll_x = Tween::new(from.x, target.x, duration_ms, easing, now);
        self.scroll_y = Tween::new(from.y, target.y, duration_ms, easing, now);
        true
    }

    pub fn scroll_by(&mut self, delta: Vec2, max: Vec2, now: Instant) -> bool {
        self.scroll_to(
            self.scroll(now) + delta,
            max,
            self.scroll_animation,
            Easing::EaseOutCubic,
            now,
        )
    }

    /// Direct pan while dragging, no animation.
    pub fn drag_by(&mut self, delta: Vec2, max: Vec2, now: Instant) {
        let target = clamp_scroll(self.scroll(now) + delta, max);
        self.scroll_x = Tween::fixed(target.x, now);
        self.scroll_y = Tween::fixed(target.y, now);
    }

    /// Momentum after a drag ends, continuing along the last drag vector.
    pub fn fling(&mut self, velocity: Vec2, max: Vec2, now: Instant) {
        self.scroll_to(
            self.scroll(now) - velocity * FLING_MULTIPLIER,
            max,
            FLING_MS,
            Easing::EaseOutCubic,
            now,
        );
    }

    pub fn scroll_home(&mut self, now: Instant) -> bool {
        self.scroll_to(Vec2::ZERO, Vec2::ZERO, self.scroll_animation, Easing::EaseOutCubic, now)
    }

    pub fn scroll_end(&mut self, max: Vec2, now: Instant) -> bool {
        self.scroll_to(max, max, self.scroll_animation, Easing::EaseOutCubic, now)
    }

    /// Re-clamps the scroll target, e.g. after the zoom level or the content
    /// size changed under it.
    pub fn reclamp(&mut self, max: Vec2, now: Instant) {
        let target = self.target_scroll();
        let clamped = clamp_scroll(target, max);
        if clamped != target {
            self.scroll_x = Tween::fixed(clamped.x, now);
            self.scroll_y = Tween::fixed(clamped.y, now);
        }
    }

    pub fn reset_scroll(&mut self, now: Instant) {
        self.scroll_x = Tween::fixed(0.0, now);
        self.scroll_y = Tween::fixed(0.0, now);
    }

    pub fn animating(&self, now: Instant) -> bool {
        !(self.zoom.finished(now) && self.scroll_x.finished(now) && self.scroll_y.finished(now))
    }
}
