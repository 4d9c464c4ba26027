//! Rectangle type for UI layout

/// A rectangle defined by position and size
#[derive(Debug, Clone, Copy, Default)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Rect {
    pub const fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }

    /// Create from screen dimensions
    pub fn screen(width: f32, height: f32) -> Self {
        Self::new(0.0, 0.0, width, height)
    }

    /// Right edge
    pub fn right(&self) -> f32 {
        self.x + self.w
    }

    /// Bottom edge
    pub fn bottom(&self) -> f32 {
        self.y + self.h
    }

    /// Center X
    pub fn center_x(&self) -> f32 {
        self.x + self.w * 0.5
    }

    /// Center Y
    pub fn center_y(&self) -> f32 {
        self.y + self.h * 0.5
    }

    /// Check if point is inside
    pub fn contains(&self, x: f32, y: f32) -> bool {
        x >= self.x && x < self.right() && y >= self.y && y < self.bottom()
    }

    /// Shrink by padding on all sides
    pub fn pad(&self, padding: f32) -> Self {
        Self::new(
            self.x + padding,
            self.y + padding,
            (self.w - padding * 2.0).max(0.0),
            (self.h - padding * 2.0).max(0.0),
        )
    }

    /// A `w` x `h` rectangle centered inside this one
    pub fn centered(&self, w: f32, h: f32) -> Self {
        Self::new(
            self.center_x() - w * 0.5,
            self.center_y() - h * 0.5,
            w,
            h,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_contains_is_half_open() {
        let r = Rect::new(10.0, 10.0, 20.0, 20.0);
        assert!(r.contains(10.0, 10.0));
        assert!(r.contains(29.9, 29.9));
        assert!(!r.contains(30.0, 30.0));
        assert!(!r.contains(9.9, 15.0));
    }

    #[test]
    fn test_pad_never_goes_negative() {
        let r = Rect::new(0.0, 0.0, 10.0, 10.0);
        let padded = r.pad(20.0);
        assert_eq!(padded.w, 0.0);
        assert_eq!(padded.h, 0.0);
    }

    #[test]
    fn test_centered_shares_center() {
        let outer = Rect::screen(640.0, 360.0);
        let inner = outer.centered(100.0, 50.0);
        assert_eq!(inner.center_x(), outer.center_x());
        assert_eq!(inner.center_y(), outer.center_y());
        assert_eq!(inner.w, 100.0);
        assert_eq!(inner.h, 50.0);
    }
}
