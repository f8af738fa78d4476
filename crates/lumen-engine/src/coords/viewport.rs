/// Drawable size in pixels. The projection is rebuilt from it every frame.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    #[inline]
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    #[inline]
    pub fn from_physical(width: u32, height: u32) -> Self {
        Self::new(width as f32, height as f32)
    }

    /// A zero-sized (minimized) or non-finite viewport cannot be drawn into.
    #[inline]
    pub fn is_valid(self) -> bool {
        self.width > 0.0 && self.height > 0.0 && self.width.is_finite() && self.height.is_finite()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn minimized_window_is_not_drawable() {
        assert!(!Viewport::from_physical(0, 0).is_valid());
        assert!(!Viewport::from_physical(800, 0).is_valid());
        assert!(!Viewport::new(f32::INFINITY, 10.0).is_valid());
        assert!(Viewport::from_physical(800, 600).is_valid());
    }
}
