//! Camera: follow, pan, zoom, draw ordering
//!
//! The camera composites the frame onto a low-resolution back buffer
//! (`resolution / scale`) and scales it up to the window in one blit, so
//! zoom applies uniformly to every drawable kind. Scroll is kept at
//! sub-pixel precision; rectangles snap to the floored scroll, images blit
//! at the sub-pixel offset.
//!
//! Follow targets are passed in each tick as plain rectangles; the camera
//! holds no entity references.

use macroquad::prelude::*;

use crate::physics::TileRect;

/// How drawables are ordered before compositing. Ties keep input order
/// (stable sort), so a frame renders identically every time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RenderOrder {
    ByX,
    ByY,
    #[default]
    ByLayer,
}

/// A single item handed to the camera for one frame: a tinted filled
/// rectangle anchored by its own coordinates, or a texture anchored by an
/// explicit position. Built fresh every render pass.
#[derive(Debug, Clone)]
pub enum Drawable {
    Rect {
        rect: TileRect,
        color: Color,
        layer: i32,
    },
    Image {
        texture: Texture2D,
        pos: Vec2,
        layer: i32,
        rotation: f32,
        flip_x: bool,
    },
}

impl Drawable {
    pub fn rect(rect: TileRect, color: Color, layer: i32) -> Self {
        Drawable::Rect { rect, color, layer }
    }

    fn world_x(&self) -> f32 {
        match self {
            Drawable::Rect { rect, .. } => rect.x as f32,
            Drawable::Image { pos, .. } => pos.x,
        }
    }

    fn world_y(&self) -> f32 {
        match self {
            Drawable::Rect { rect, .. } => rect.y as f32,
            Drawable::Image { pos, .. } => pos.y,
        }
    }

    fn layer(&self) -> i32 {
        match self {
            Drawable::Rect { layer, .. } | Drawable::Image { layer, .. } => *layer,
        }
    }
}

/// What the camera should frame this tick. Multi-target framing takes
/// precedence over single-target follow when both could apply.
#[derive(Debug, Clone, Copy)]
pub enum Focus<'a> {
    None,
    Single(TileRect),
    Multi(&'a [TileRect]),
}

/// Follow/zoom camera with a painter's-algorithm blit list.
pub struct Camera {
    /// Window resolution in pixels. Fixed at startup.
    pub resolution: Vec2,
    scale: f32,
    desired_scale: f32,
    /// Clamp band for the desired zoom.
    pub scale_range: (f32, f32),
    /// Zoom the camera eases back to when nothing forces a zoom-out.
    pub default_scale: f32,
    /// Fraction of the remaining zoom gap closed per update call.
    pub zoom_ease: f32,
    pub true_scroll: Vec2,
    /// Eased follow when true; hard snap to the target when false.
    pub panning: bool,
    /// Inverse responsiveness: higher pans slower. Values below 1 are
    /// treated as 1 so the ease never overshoots.
    pub pan_strength: f32,
    /// Offset added to the followed target's center.
    pub follow_offset: Vec2,
    /// Margin added around every target in multi-target framing.
    pub frame_padding: f32,
    pub render_order: RenderOrder,
    /// Low-res back buffer; created lazily at render time so the follow
    /// and zoom math stays usable without a window.
    screen: Option<RenderTarget>,
}

impl Camera {
    pub fn new(resolution: Vec2, scale: f32) -> Self {
        Self {
            resolution,
            scale,
            desired_scale: scale,
            scale_range: (scale * 0.25, scale * 2.0),
            default_scale: scale,
            zoom_ease: 0.1,
            true_scroll: Vec2::ZERO,
            panning: false,
            pan_strength: 5.0,
            follow_offset: Vec2::ZERO,
            frame_padding: 30.0,
            render_order: RenderOrder::default(),
            screen: None,
        }
    }

    /// Current render scale.
    pub fn scale(&self) -> f32 {
        self.scale
    }

    /// Floored scroll used for pixel-snapped rectangle drawing.
    pub fn scroll(&self) -> IVec2 {
        ivec2(
            self.true_scroll.x.floor() as i32,
            self.true_scroll.y.floor() as i32,
        )
    }

    /// World-units view size at the current zoom.
    pub fn view_size(&self) -> Vec2 {
        self.resolution / self.scale
    }

    /// Map a window-space point (e.g. the mouse cursor) into world space.
    pub fn screen_to_world(&self, screen: Vec2) -> Vec2 {
        screen / self.scale + self.true_scroll
    }

    /// Advance scroll and zoom toward this tick's focus. `dt` is the
    /// normalized tick delta; pan strength is divided by it so follow
    /// responsiveness stays frame-rate independent.
    pub fn update(&mut self, dt: f32, focus: Focus) {
        let pan = if dt.abs() > 1e-6 {
            (self.pan_strength / dt).max(1.0)
        } else {
            self.pan_strength.max(1.0)
        };

        match focus {
            Focus::None => {}
            Focus::Single(target) => {
                let center = target.center() + self.follow_offset;
                let goal = center - self.view_size() * 0.5;
                if self.panning {
                    self.true_scroll += (goal - self.true_scroll) / pan;
                } else {
                    self.true_scroll = goal;
                }
                self.desired_scale = self.default_scale;
            }
            Focus::Multi(targets) if targets.is_empty() => {}
            Focus::Multi(targets) => {
                let bounds = padded_bounds(targets, self.frame_padding);
                let size = bounds.1 - bounds.0;
                let fit = (self.resolution.x / size.x).min(self.resolution.y / size.y);
                let view = self.view_size();
                // Zoom out only when the box no longer fits the current
                // view; otherwise drift back to the default zoom.
                self.desired_scale = if size.x > view.x || size.y > view.y {
                    fit
                } else {
                    self.default_scale
                };
                let center = (bounds.0 + bounds.1) * 0.5 + self.follow_offset;
                let goal = center - view * 0.5;
                if self.panning {
                    self.true_scroll += (goal - self.true_scroll) / pan;
                } else {
                    self.true_scroll = goal;
                }
            }
        }

        self.desired_scale = self
            .desired_scale
            .clamp(self.scale_range.0, self.scale_range.1);
        self.scale += (self.desired_scale - self.scale) * self.zoom_ease;
    }

    /// Composite one frame: stable-sort the drawables by the active order,
    /// draw them scroll-adjusted onto the low-res buffer, then scale the
    /// buffer up to the window in a single blit.
    pub fn render(&mut self, mut drawables: Vec<Drawable>, clear: Color) {
        sort_drawables(&mut drawables, self.render_order);

        let buffer = self.view_size().round().max(Vec2::ONE);
        let target = self.backbuffer(buffer);

        let cam = Camera2D {
            zoom: vec2(2.0 / buffer.x, 2.0 / buffer.y),
            target: buffer * 0.5,
            render_target: Some(target.clone()),
            ..Default::default()
        };
        set_camera(&cam);
        clear_background(clear);

        let scroll = self.scroll();
        for drawable in &drawables {
            match drawable {
                Drawable::Rect { rect, color, .. } => {
                    draw_rectangle(
                        (rect.x - scroll.x) as f32,
                        (rect.y - scroll.y) as f32,
                        rect.w as f32,
                        rect.h as f32,
                        *color,
                    );
                }
                Drawable::Image {
                    texture,
                    pos,
                    rotation,
                    flip_x,
                    ..
                } => {
                    draw_texture_ex(
                        texture,
                        pos.x - self.true_scroll.x,
                        pos.y - self.true_scroll.y,
                        WHITE,
                        DrawTextureParams {
                            rotation: *rotation,
                            flip_x: *flip_x,
                            ..Default::default()
                        },
                    );
                }
            }
        }

        set_default_camera();
        draw_texture_ex(
            &target.texture,
            0.0,
            0.0,
            WHITE,
            DrawTextureParams {
                dest_size: Some(self.resolution),
                ..Default::default()
            },
        );
    }

    /// Back buffer matching the wanted size, regenerated when zoom changed
    /// it.
    fn backbuffer(&mut self, size: Vec2) -> RenderTarget {
        let stale = match &self.screen {
            Some(rt) => {
                rt.texture.width() as i32 != size.x as i32
                    || rt.texture.height() as i32 != size.y as i32
            }
            None => true,
        };
        if stale {
            let rt = render_target(size.x as u32, size.y as u32);
            rt.texture.set_filter(FilterMode::Nearest);
            self.screen = Some(rt);
        }
        self.screen.as_ref().cloned().unwrap_or_else(|| unreachable!())
    }
}

/// Stable sort by the active render order; ties keep input order.
fn sort_drawables(drawables: &mut [Drawable], order: RenderOrder) {
    match order {
        RenderOrder::ByX => drawables.sort_by(|a, b| a.world_x().total_cmp(&b.world_x())),
        RenderOrder::ByY => drawables.sort_by(|a, b| a.world_y().total_cmp(&b.world_y())),
        RenderOrder::ByLayer => drawables.sort_by_key(|d| d.layer()),
    }
}

/// AABB over all targets, each expanded by `padding`. Returns (min, max).
fn padded_bounds(targets: &[TileRect], padding: f32) -> (Vec2, Vec2) {
    let mut min = Vec2::splat(f32::MAX);
    let mut max = Vec2::splat(f32::MIN);
    for t in targets {
        min.x = min.x.min(t.x as f32 - padding);
        min.y = min.y.min(t.y as f32 - padding);
        max.x = max.x.max(t.right() as f32 + padding);
        max.y = max.y.max(t.bottom() as f32 + padding);
    }
    (min, max)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn camera() -> Camera {
        let mut cam = Camera::new(vec2(320.0, 180.0), 1.0);
        cam.panning = true;
        cam
    }

    fn target_scroll(cam: &Camera, target: TileRect) -> Vec2 {
        target.center() + cam.follow_offset - cam.view_size() * 0.5
    }

    #[test]
    fn test_single_target_converges_without_overshoot() {
        let mut cam = camera();
        let target = TileRect::new(400, 200, 10, 10);
        let goal = target_scroll(&cam, target);

        let mut last = (cam.true_scroll - goal).length();
        for _ in 0..200 {
            cam.update(1.0, Focus::Single(target));
            let dist = (cam.true_scroll - goal).length();
            assert!(dist < last, "scroll moved away from a stationary target");
            last = dist;
            if dist < 0.01 {
                break;
            }
        }
        assert!(last < 0.01, "scroll never converged");
    }

    #[test]
    fn test_panning_disabled_snaps_immediately() {
        let mut cam = camera();
        cam.panning = false;
        let target = TileRect::new(400, 200, 10, 10);
        cam.update(1.0, Focus::Single(target));
        assert_eq!(cam.true_scroll, target_scroll(&cam, target));
    }

    #[test]
    fn test_integer_scroll_is_floor_of_true_scroll() {
        let mut cam = camera();
        cam.true_scroll = vec2(10.9, -3.2);
        assert_eq!(cam.scroll(), ivec2(10, -4));
        cam.true_scroll = vec2(-0.1, 0.99);
        assert_eq!(cam.scroll(), ivec2(-1, 0));
    }

    #[test]
    fn test_larger_dt_pans_faster() {
        let target = TileRect::new(500, 0, 10, 10);

        let mut slow = camera();
        slow.update(0.5, Focus::Single(target));
        let mut fast = camera();
        fast.update(2.0, Focus::Single(target));

        let goal = target_scroll(&slow, target);
        assert!((fast.true_scroll - goal).length() < (slow.true_scroll - goal).length());
    }

    #[test]
    fn test_multi_target_zooms_out_to_fit() {
        let mut cam = camera();
        // Far apart: the padded box is wider than the 320px view.
        let targets = [
            TileRect::new(0, 0, 10, 10),
            TileRect::new(900, 0, 10, 10),
        ];
        for _ in 0..300 {
            cam.update(1.0, Focus::Multi(&targets));
        }
        assert!(cam.scale() < cam.default_scale);
        // The eased scale heads for the fit that frames the padded box.
        let bounds = padded_bounds(&targets, cam.frame_padding);
        let size = bounds.1 - bounds.0;
        let fit = (cam.resolution.x / size.x).min(cam.resolution.y / size.y);
        let fit = fit.clamp(cam.scale_range.0, cam.scale_range.1);
        assert!((cam.scale() - fit).abs() < 0.01);
    }

    #[test]
    fn test_multi_target_returns_to_default_zoom_when_close() {
        let mut cam = camera();
        cam.scale = 0.5; // previously zoomed out
        cam.desired_scale = 0.5;
        let targets = [
            TileRect::new(100, 100, 10, 10),
            TileRect::new(130, 110, 10, 10),
        ];
        for _ in 0..300 {
            cam.update(1.0, Focus::Multi(&targets));
        }
        assert!((cam.scale() - cam.default_scale).abs() < 0.01);
    }

    #[test]
    fn test_multi_target_takes_precedence_shape() {
        // Framing centers the scroll on the bounding box center.
        let mut cam = camera();
        cam.panning = false;
        let targets = [
            TileRect::new(0, 0, 10, 10),
            TileRect::new(90, 40, 10, 10),
        ];
        cam.update(1.0, Focus::Multi(&targets));
        let bounds = padded_bounds(&targets, cam.frame_padding);
        let center = (bounds.0 + bounds.1) * 0.5;
        let expected = center - cam.view_size() * 0.5;
        assert!((cam.true_scroll - expected).length() < 1e-4);
    }

    #[test]
    fn test_zoom_clamped_to_band() {
        let mut cam = camera();
        // A box far wider than the minimum zoom can frame.
        let targets = [
            TileRect::new(0, 0, 10, 10),
            TileRect::new(100_000, 0, 10, 10),
        ];
        for _ in 0..500 {
            cam.update(1.0, Focus::Multi(&targets));
        }
        assert!(cam.scale() >= cam.scale_range.0 - 1e-4);
    }

    #[test]
    fn test_sort_by_layer_is_stable() {
        let mk = |x, layer| Drawable::rect(TileRect::new(x, 0, 1, 1), WHITE, layer);
        let mut a = vec![mk(3, 1), mk(1, 0), mk(2, 1), mk(0, 0)];
        let mut b = a.clone();
        sort_drawables(&mut a, RenderOrder::ByLayer);
        sort_drawables(&mut b, RenderOrder::ByLayer);

        let xs: Vec<i32> = a
            .iter()
            .map(|d| match d {
                Drawable::Rect { rect, .. } => rect.x,
                _ => unreachable!(),
            })
            .collect();
        // Equal layers keep their input order.
        assert_eq!(xs, vec![1, 0, 3, 2]);
        let xs_b: Vec<i32> = b
            .iter()
            .map(|d| match d {
                Drawable::Rect { rect, .. } => rect.x,
                _ => unreachable!(),
            })
            .collect();
        assert_eq!(xs, xs_b, "sort not reproducible");
    }

    #[test]
    fn test_sort_by_x_and_y() {
        let mk = |x, y| Drawable::rect(TileRect::new(x, y, 1, 1), WHITE, 0);
        let mut ds = vec![mk(5, 0), mk(1, 9), mk(3, 4)];
        sort_drawables(&mut ds, RenderOrder::ByX);
        let xs: Vec<f32> = ds.iter().map(|d| d.world_x()).collect();
        assert_eq!(xs, vec![1.0, 3.0, 5.0]);

        sort_drawables(&mut ds, RenderOrder::ByY);
        let ys: Vec<f32> = ds.iter().map(|d| d.world_y()).collect();
        assert_eq!(ys, vec![0.0, 4.0, 9.0]);
    }

    #[test]
    fn test_screen_to_world_round_trip() {
        let mut cam = camera();
        cam.true_scroll = vec2(40.0, -12.5);
        let world = cam.screen_to_world(vec2(160.0, 90.0));
        assert_eq!(world, vec2(200.0, 77.5));
    }
}
