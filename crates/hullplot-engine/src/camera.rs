//! Orbit camera frame.
//!
//! The frame is fully described by two rotation angles and a distance from
//! the origin. The camera is rotated first and then placed along its own
//! local Z axis, so it always faces the origin.

use crate::math::{Mat3, Mat4, Vec3};

/// Camera-to-world orientation + translation as a 4×4 row-vector transform.
///
/// Invariant: the upper-left 3×3 block is a pure rotation (orthonormal). It
/// is built from two single-axis rotations and never scaled.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct CameraFrame {
    rotation: Mat3,
    matrix: Mat4,
}

impl CameraFrame {
    /// Builds the frame for `yaw`/`pitch` (radians) at `distance` from the origin.
    ///
    /// `distance == 0` is legal and places the camera at the origin.
    pub fn orbit(yaw: f32, pitch: f32, distance: f32) -> Self {
        let (s1, c1) = yaw.sin_cos();
        let (s2, c2) = pitch.sin_cos();

        let rotation = Mat3::from_rows([
            [c1, 0.0, s1],
            [s1 * s2, c2, -c1 * s2],
            [-s1 * c2, s2, c1 * c2],
        ]);

        let t = rotation.column(2) * distance;
        let translation = Vec3::new(
            t.dot(rotation.column(0)),
            t.dot(rotation.column(1)),
            t.dot(rotation.column(2)),
        );

        Self {
            rotation,
            matrix: Mat4::from_rotation_translation(&rotation, translation),
        }
    }

    /// Frame at the origin with no rotation.
    pub fn identity() -> Self {
        Self::orbit(0.0, 0.0, 0.0)
    }

    #[inline]
    pub fn rotation(&self) -> Mat3 {
        self.rotation
    }

    #[inline]
    pub fn matrix(&self) -> Mat4 {
        self.matrix
    }

    /// Translation row of the frame.
    #[inline]
    pub fn translation(&self) -> Vec3 {
        self.matrix.row(3).truncate()
    }
}

impl Default for CameraFrame {
    fn default() -> Self {
        Self::identity()
    }
}

/// Tuning for [`OrbitController`].
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct OrbitConfig {
    /// Radians per logical pixel of pointer drag.
    pub drag_speed: f32,

    /// Radians per second while an orbit key is held.
    pub key_speed: f32,

    /// Fractional distance change per wheel line.
    pub zoom_step: f32,
}

impl Default for OrbitConfig {
    fn default() -> Self {
        Self {
            drag_speed: 0.01,
            key_speed: 1.5,
            zoom_step: 0.1,
        }
    }
}

/// Interactive `(yaw, pitch, distance)` state producing [`CameraFrame`]s.
///
/// Pitch is left unclamped; the frame stays orthonormal for any angle.
#[derive(Debug, Clone)]
pub struct OrbitController {
    pub config: OrbitConfig,
    yaw: f32,
    pitch: f32,
    distance: f32,
    home: (f32, f32, f32),
}

impl OrbitController {
    pub fn new(yaw: f32, pitch: f32, distance: f32, config: OrbitConfig) -> Self {
        let distance = distance.max(0.0);
        Self {
            config,
            yaw,
            pitch,
            distance,
            home: (yaw, pitch, distance),
        }
    }

    #[inline]
    pub fn angles(&self) -> (f32, f32) {
        (self.yaw, self.pitch)
    }

    #[inline]
    pub fn distance(&self) -> f32 {
        self.distance
    }

    /// Applies a pointer drag in logical pixels.
    pub fn drag(&mut self, dx: f32, dy: f32) {
        self.rotate(dx * self.config.drag_speed, dy * self.config.drag_speed);
    }

    /// Applies a held-key rotation for `dt` seconds; `dir_*` are -1, 0 or 1.
    pub fn spin(&mut self, dir_yaw: f32, dir_pitch: f32, dt: f32) {
        let step = self.config.key_speed * dt;
        self.rotate(dir_yaw * step, dir_pitch * step);
    }

    pub fn rotate(&mut self, d_yaw: f32, d_pitch: f32) {
        self.yaw += d_yaw;
        self.pitch += d_pitch;
    }

    /// Positive `lines` move the camera towards the origin.
    pub fn zoom(&mut self, lines: f32) {
        let factor = (1.0 - lines * self.config.zoom_step).max(0.0);
        self.distance = (self.distance * factor).max(0.0);
    }

    pub fn reset(&mut self) {
        let (yaw, pitch, distance) = self.home;
        self.yaw = yaw;
        self.pitch = pitch;
        self.distance = distance;
    }

    pub fn frame(&self) -> CameraFrame {
        CameraFrame::orbit(self.yaw, self.pitch, self.distance)
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;

    use super::*;

    fn assert_mat3_near(a: &Mat3, b: &Mat3) {
        for r in 0..3 {
            for c in 0..3 {
                assert_abs_diff_eq!(a.e[r][c], b.e[r][c], epsilon = 1e-5);
            }
        }
    }

    #[test]
    fn rotation_is_orthonormal_for_many_angles() {
        let mut yaw = -7.0f32;
        while yaw < 7.0 {
            let mut pitch = -7.0f32;
            while pitch < 7.0 {
                let r = CameraFrame::orbit(yaw, pitch, 3.0).rotation();
                assert_mat3_near(&(r.transpose() * r), &Mat3::identity());
                pitch += 0.61;
            }
            yaw += 0.53;
        }
    }

    #[test]
    fn initial_frame_is_identity() {
        let frame = CameraFrame::orbit(0.0, 0.0, 0.0);
        assert_eq!(frame.matrix(), Mat4::identity());
        assert_eq!(frame.translation(), Vec3::zero());
    }

    #[test]
    fn translation_lies_on_local_z() {
        let frame = CameraFrame::orbit(0.8, -0.3, 5.0);
        let t = frame.translation();
        assert_abs_diff_eq!(t.x, 0.0, epsilon = 1e-5);
        assert_abs_diff_eq!(t.y, 0.0, epsilon = 1e-5);
        assert_abs_diff_eq!(t.z, 5.0, epsilon = 1e-5);
    }

    #[test]
    fn origin_maps_to_distance_along_view_axis() {
        let frame = CameraFrame::orbit(1.1, 0.4, 2.5);
        let p = frame.matrix().transform_point(Vec3::zero());
        assert_abs_diff_eq!(p.z, 2.5, epsilon = 1e-5);
    }

    #[test]
    fn yaw_only_rotation_about_y() {
        let r = CameraFrame::orbit(core::f32::consts::FRAC_PI_2, 0.0, 0.0).rotation();
        assert_abs_diff_eq!(r.e[0][2], 1.0, epsilon = 1e-6);
        assert_abs_diff_eq!(r.e[2][0], -1.0, epsilon = 1e-6);
        assert_abs_diff_eq!(r.e[1][1], 1.0, epsilon = 1e-6);
    }

    #[test]
    fn zoom_never_goes_negative() {
        let mut orbit = OrbitController::new(0.0, 0.0, 10.0, OrbitConfig::default());
        orbit.zoom(50.0);
        assert_eq!(orbit.distance(), 0.0);
        orbit.zoom(-5.0);
        assert_eq!(orbit.distance(), 0.0);
    }

    #[test]
    fn zoom_out_increases_distance() {
        let mut orbit = OrbitController::new(0.0, 0.0, 10.0, OrbitConfig::default());
        orbit.zoom(-1.0);
        assert_abs_diff_eq!(orbit.distance(), 11.0, epsilon = 1e-5);
    }

    #[test]
    fn reset_restores_home() {
        let mut orbit = OrbitController::new(0.2, 0.1, 4.0, OrbitConfig::default());
        orbit.drag(100.0, -40.0);
        orbit.zoom(2.0);
        orbit.reset();
        assert_eq!(orbit.angles(), (0.2, 0.1));
        assert_eq!(orbit.distance(), 4.0);
    }

    #[test]
    fn spin_scales_with_dt() {
        let mut orbit = OrbitController::new(0.0, 0.0, 1.0, OrbitConfig::default());
        orbit.spin(1.0, -1.0, 0.5);
        let (yaw, pitch) = orbit.angles();
        assert_abs_diff_eq!(yaw, 0.75, epsilon = 1e-6);
        assert_abs_diff_eq!(pitch, -0.75, epsilon = 1e-6);
    }
}
