use crate::math::Mat4;

/// Canvas size in physical pixels.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct CanvasSize {
    pub width: u32,
    pub height: u32,
}

impl CanvasSize {
    #[inline]
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

/// Fixed camera-space → clip-space scaling.
///
/// Not a true perspective matrix: it scales camera space into the unit cube
/// and shifts depth by -1. The vertex shader then divides `x`/`y` by
/// `clip.z + 2` to obtain the perspective-like falloff.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Projection {
    camera_width: f32,
    camera_height: f32,
    matrix: Mat4,
}

impl Projection {
    /// `horizontal_window` is the camera-space height that fills the canvas;
    /// the width follows the canvas aspect ratio.
    pub fn new(canvas: CanvasSize, horizontal_window: f32, depth_window: f32) -> Self {
        let camera_width = horizontal_window * canvas.width as f32 / canvas.height as f32;
        let camera_height = horizontal_window;

        let matrix = Mat4::from_rows([
            [2.0 / camera_width, 0.0, 0.0, 0.0],
            [0.0, 2.0 / camera_height, 0.0, 0.0],
            [0.0, 0.0, 2.0 / depth_window, 0.0],
            [0.0, 0.0, -1.0, 1.0],
        ]);

        Self {
            camera_width,
            camera_height,
            matrix,
        }
    }

    #[inline]
    pub fn camera_width(&self) -> f32 {
        self.camera_width
    }

    #[inline]
    pub fn camera_height(&self) -> f32 {
        self.camera_height
    }

    #[inline]
    pub fn matrix(&self) -> Mat4 {
        self.matrix
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn diagonal_follows_windows() {
        let p = Projection::new(CanvasSize::new(640, 480), 10.0, 100.0);
        let m = p.matrix();
        assert_eq!(m.e[0][0], 2.0 / (10.0 * 640.0 / 480.0));
        assert_eq!(m.e[1][1], 2.0 / 10.0);
        assert_eq!(m.e[2][2], 2.0 / 100.0);
        assert_eq!(m.e[3], [0.0, 0.0, -1.0, 1.0]);
    }

    #[test]
    fn camera_width_keeps_aspect() {
        let p = Projection::new(CanvasSize::new(800, 400), 3.0, 1.0);
        assert_eq!(p.camera_width(), 6.0);
        assert_eq!(p.camera_height(), 3.0);
    }

    #[test]
    fn depth_window_maps_to_unit_range() {
        let p = Projection::new(CanvasSize::new(100, 100), 2.0, 8.0);
        let m = p.matrix();
        let near = m.transform_point(crate::math::Vec3::zero());
        let far = m.transform_point(crate::math::Vec3::new(0.0, 0.0, 8.0));
        assert_eq!(near.z, -1.0);
        assert_eq!(far.z, 1.0);
    }
}
