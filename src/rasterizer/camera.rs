//! Look-at camera with a left-handed, zero-to-one depth perspective
//!
//! Every mutator recomputes the world-to-clip matrix before returning,
//! so `matrix()` never observes stale state.

use std::f32::consts::PI;
use serde::{Serialize, Deserialize};
use super::math::{Matrix, Vec4};

/// Mouse travel (pixels) per radian of orbit
pub const ORBIT_PIXELS_PER_RADIAN: f32 = 100.0;
/// Accumulated pitch is held inside +/- this angle
pub const MAX_PITCH: f32 = PI * 0.45;
/// Eye elevation above the plane normal to `up` stays inside +/- this angle,
/// keeping the right axis well defined
pub const MAX_ELEVATION: f32 = PI * 0.45;
/// Eye scale for a positive wheel delta
pub const ZOOM_OUT: f32 = 1.1;
/// Eye scale for a zero or negative wheel delta
pub const ZOOM_IN: f32 = 0.9;

/// Perspective projection parameters
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Projection {
    /// Vertical field of view in radians
    pub fov: f32,
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
}

impl Default for Projection {
    fn default() -> Self {
        Self {
            fov: PI * 0.25,
            aspect: 4.0 / 3.0,
            near: 1.0,
            far: 200.0,
        }
    }
}

impl Projection {
    pub fn new(fov: f32, aspect: f32, near: f32, far: f32) -> Self {
        Self { fov, aspect, near, far }
    }

    /// Maps view z in [near, far] to clip depth in [0, w]
    pub fn matrix(&self) -> Matrix {
        let f = 1.0 / (self.fov * 0.5).tan();
        let depth = self.far / (self.far - self.near);
        Matrix::new([
            [f / self.aspect, 0.0, 0.0, 0.0],
            [0.0, f, 0.0, 0.0],
            [0.0, 0.0, depth, 1.0],
            [0.0, 0.0, -self.near * depth, 0.0],
        ])
    }
}

/// Camera state
#[derive(Debug, Clone)]
pub struct Camera {
    position: Vec4,
    initial_position: Vec4,
    target: Vec4,
    up: Vec4,
    projection: Projection,
    pitch: f32,

    world_to_view: Matrix,
    view_to_clip: Matrix,
    world_to_clip: Matrix,
}

impl Camera {
    /// Camera at `eye` looking at `target`. Projection starts at
    /// `Projection::default()` until `set_projection` is called.
    /// `eye` must differ from `target`.
    pub fn new(eye: Vec4, target: Vec4, up: Vec4) -> Self {
        Self::with_projection(eye, target, up, Projection::default())
    }

    pub fn with_projection(eye: Vec4, target: Vec4, up: Vec4, projection: Projection) -> Self {
        let mut cam = Self {
            position: eye,
            initial_position: eye,
            target,
            up,
            projection,
            pitch: 0.0,
            world_to_view: Matrix::IDENTITY,
            view_to_clip: Matrix::IDENTITY,
            world_to_clip: Matrix::IDENTITY,
        };
        cam.update_matrix();
        cam
    }

    pub fn set_position(&mut self, eye: Vec4) {
        self.position = eye;
        self.update_matrix();
    }

    pub fn set_projection(&mut self, fov: f32, aspect: f32, near: f32, far: f32) {
        self.projection = Projection::new(fov, aspect, near, far);
        self.update_matrix();
    }

    /// Keep the current projection but follow a new viewport shape
    pub fn set_aspect(&mut self, aspect: f32) {
        let p = self.projection;
        self.set_projection(p.fov, aspect, p.near, p.far);
    }

    /// Orbit the eye about the origin from mouse deltas in pixels.
    ///
    /// Pitches about the camera's right axis, then yaws about the up axis.
    /// Pitch accumulates and is clamped to `MAX_PITCH`; a call that would cross
    /// the limit pins the accumulator and applies no pitch at all. The pitch
    /// step is also shortened so the eye never passes `MAX_ELEVATION`, and
    /// the accumulator only keeps the part that was applied. Only a true
    /// orbit when the target sits at the origin.
    pub fn orbit(&mut self, dx: f32, dy: f32) {
        let yaw = dx / ORBIT_PIXELS_PER_RADIAN;

        let mut pitch = dy / ORBIT_PIXELS_PER_RADIAN;
        self.pitch += pitch;
        if self.pitch < -MAX_PITCH {
            self.pitch = -MAX_PITCH;
            pitch = 0.0;
        }
        if self.pitch > MAX_PITCH {
            self.pitch = MAX_PITCH;
            pitch = 0.0;
        }

        let up_axis = self.up.normalize();
        let applied = limit_elevation_step(self.elevation(), pitch);
        self.pitch -= pitch - applied;

        let forward = (self.target - self.position).normalize();
        let right = self.up.cross(forward).normalize();

        let pitch_matrix = Matrix::rotation_axis(right, applied);
        let yaw_matrix = Matrix::rotation_axis(up_axis, yaw);

        self.position = self.position.transform(&pitch_matrix).transform(&yaw_matrix);
        self.update_matrix();
    }

    /// Scale the eye's absolute position (not its offset from the target)
    pub fn zoom(&mut self, wheel_delta: f32) {
        let t = if wheel_delta > 0.0 { ZOOM_OUT } else { ZOOM_IN };
        self.position = self.position.scale(t);
        self.update_matrix();
    }

    /// Back to the construction-time eye with no accumulated pitch
    pub fn reset(&mut self) {
        self.position = self.initial_position;
        self.pitch = 0.0;
        self.update_matrix();
    }

    /// Combined world-to-clip transform (view first, then projection)
    pub fn matrix(&self) -> &Matrix {
        &self.world_to_clip
    }

    pub fn view_matrix(&self) -> &Matrix {
        &self.world_to_view
    }

    pub fn projection_matrix(&self) -> &Matrix {
        &self.view_to_clip
    }

    pub fn position(&self) -> Vec4 {
        self.position
    }

    pub fn target(&self) -> Vec4 {
        self.target
    }

    pub fn up(&self) -> Vec4 {
        self.up
    }

    /// Angle in radians between the eye (seen from the origin) and the
    /// plane normal to the up hint. Positive above, negative below.
    pub fn elevation(&self) -> f32 {
        let p = self.position;
        let dir = Vec4::new(p.x, p.y, p.z, 0.0).normalize();
        dir.dot(self.up.normalize()).clamp(-1.0, 1.0).asin()
    }

    pub fn projection(&self) -> Projection {
        self.projection
    }

    /// Accumulated orbit pitch in radians
    pub fn pitch(&self) -> f32 {
        self.pitch
    }

    fn update_matrix(&mut self) {
        let eye = self.position;

        // Orthonormal basis: forward, right, and a re-orthogonalized up
        let forward = (self.target - eye).normalize();
        let right = self.up.cross(forward).normalize();
        let up = forward.cross(right);

        self.world_to_view = Matrix::new([
            [right.x, up.x, forward.x, 0.0],
            [right.y, up.y, forward.y, 0.0],
            [right.z, up.z, forward.z, 0.0],
            [-eye.dot(right), -eye.dot(up), -eye.dot(forward), 1.0],
        ]);
        self.view_to_clip = self.projection.matrix();
        self.world_to_clip = self.world_to_view.mul(&self.view_to_clip);
    }
}

/// Largest part of a pitch step that keeps the eye inside +/- `MAX_ELEVATION`.
/// A positive step raises the eye. Steps back toward the horizon always pass.
fn limit_elevation_step(elevation: f32, pitch: f32) -> f32 {
    if pitch > 0.0 {
        pitch.min((MAX_ELEVATION - elevation).max(0.0))
    } else {
        pitch.max((-MAX_ELEVATION - elevation).min(0.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_camera() -> Camera {
        let mut cam = Camera::new(
            Vec4::point(5.0, 5.0, -5.0),
            Vec4::point(0.0, 0.0, 0.0),
            Vec4::UP,
        );
        cam.set_projection(PI * 0.25, 800.0 / 600.0, 1.0, 200.0);
        cam
    }

    fn to_screen(cam: &Camera, p: Vec4, w: usize, h: usize) -> Vec4 {
        let mut v = p.transform(cam.matrix());
        v.perspective_divide();
        v.to_screen(w, h);
        v
    }

    #[test]
    fn test_target_projects_to_center() {
        let cam = test_camera();
        let v = to_screen(&cam, cam.target(), 800, 600);
        assert!((v.x - 400.0).abs() < 0.5);
        assert!((v.y - 300.0).abs() < 0.5);
        assert!(v.z > 0.0 && v.z < 1.0);
    }

    #[test]
    fn test_depth_range_is_zero_to_one() {
        // Eye on -Z looking down +Z: view z equals world z + 10
        let cam = Camera::with_projection(
            Vec4::point(0.0, 0.0, -10.0),
            Vec4::point(0.0, 0.0, 0.0),
            Vec4::UP,
            Projection::new(PI * 0.5, 1.0, 1.0, 100.0),
        );

        let mut near = Vec4::point(0.0, 0.0, -9.0).transform(cam.matrix());
        near.perspective_divide();
        assert!(near.z.abs() < 1e-5);

        let mut far = Vec4::point(0.0, 0.0, 90.0).transform(cam.matrix());
        far.perspective_divide();
        assert!((far.z - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_up_is_screen_up() {
        let cam = test_camera();
        let above = to_screen(&cam, Vec4::point(0.0, 1.0, 0.0), 800, 600);
        assert!(above.y < 300.0);
    }

    #[test]
    fn test_orbit_pitch_clamps() {
        // Eye on the horizon, so the accumulator and the elevation start together
        let mut cam = Camera::new(Vec4::point(0.0, 0.0, -5.0), Vec4::point(0.0, 0.0, 0.0), Vec4::UP);
        for _ in 0..50 {
            cam.orbit(0.0, 40.0);
            assert!(cam.pitch() <= MAX_PITCH);
        }
        assert_eq!(cam.pitch(), MAX_PITCH);
        assert!(cam.elevation() > 1.0 && cam.elevation() < MAX_ELEVATION + 1e-4);

        // Once pinned, further pitch in the same direction leaves the eye alone
        let before = cam.position();
        cam.orbit(0.0, 40.0);
        assert_eq!(cam.position(), before);

        for _ in 0..100 {
            cam.orbit(0.0, -40.0);
            assert!(cam.pitch() >= -MAX_PITCH);
            assert!(cam.elevation() > -MAX_ELEVATION - 1e-4);
        }
        assert_eq!(cam.pitch(), -MAX_PITCH);
        assert!(cam.position().z < 0.0);
    }

    #[test]
    fn test_orbit_never_crosses_the_pole() {
        let mut cam = test_camera();
        let start = cam.elevation();
        let mut last = start;
        for _ in 0..30 {
            cam.orbit(0.0, 10.0);
            let p = cam.position();
            assert!(p.x > 0.0 && p.z < 0.0, "eye flipped sides: {:?}", p);
            let elevation = cam.elevation();
            assert!(elevation >= last - 1e-5);
            assert!(elevation < PI * 0.5 - 0.1);
            last = elevation;
        }
        assert!((last - MAX_ELEVATION).abs() < 1e-3);

        // The accumulator only counts pitch that actually moved the eye
        assert!((cam.pitch() - (last - start)).abs() < 1e-3);
        assert!(cam.pitch() < MAX_PITCH);

        // Dragging back down still works from the limit
        cam.orbit(0.0, -10.0);
        assert!(cam.elevation() < last - 0.05);
    }

    #[test]
    fn test_accessors_report_pose() {
        let cam = test_camera();
        assert_eq!(cam.up(), Vec4::UP);
        assert_eq!(cam.target(), Vec4::point(0.0, 0.0, 0.0));
        // (5, 5, -5) sits atan(1 / sqrt(2)) above the horizon
        assert!((cam.elevation() - (0.5f32).sqrt().atan()).abs() < 1e-5);
    }

    #[test]
    fn test_orbit_yaw_keeps_distance_and_height() {
        let mut cam = test_camera();
        let start = cam.position();
        cam.orbit(157.0, 0.0);
        let p = cam.position();
        assert!((p.len() - start.len()).abs() < 1e-3);
        assert!((p.y - start.y).abs() < 1e-3);
        assert!((p.x - start.x).abs() > 0.1);
    }

    #[test]
    fn test_zoom_scales_eye() {
        let mut cam = test_camera();
        cam.zoom(120.0);
        let p = cam.position();
        assert!((p.x - 5.5).abs() < 1e-4);
        assert!((p.z + 5.5).abs() < 1e-4);
        assert_eq!(p.w, 1.0);

        cam.zoom(-120.0);
        assert!((cam.position().x - 4.95).abs() < 1e-4);

        cam.zoom(0.0);
        assert!((cam.position().x - 4.455).abs() < 1e-4);
    }

    #[test]
    fn test_reset_restores_bit_exact_matrix() {
        let mut cam = test_camera();
        let initial = *cam.matrix();

        cam.orbit(35.0, 12.0);
        cam.zoom(1.0);
        cam.orbit(-80.0, 300.0);
        cam.zoom(-1.0);
        assert_ne!(*cam.matrix(), initial);

        cam.reset();
        assert_eq!(cam.position(), Vec4::point(5.0, 5.0, -5.0));
        assert_eq!(cam.pitch(), 0.0);
        for i in 0..4 {
            for j in 0..4 {
                assert_eq!(cam.matrix().m[i][j].to_bits(), initial.m[i][j].to_bits());
            }
        }
    }

    #[test]
    fn test_matrix_is_view_then_projection() {
        let cam = test_camera();
        let composed = cam.view_matrix().mul(cam.projection_matrix());
        assert_eq!(*cam.matrix(), composed);

        // The view matrix puts the target straight ahead on +Z
        let t = cam.target().transform(cam.view_matrix());
        assert!(t.x.abs() < 1e-5 && t.y.abs() < 1e-5);
        assert!((t.z - cam.position().len()).abs() < 1e-4);
    }

    #[test]
    fn test_set_position_recomputes() {
        let mut cam = test_camera();
        let before = *cam.matrix();
        cam.set_position(Vec4::point(0.0, 2.0, -8.0));
        assert_ne!(*cam.matrix(), before);
        let v = to_screen(&cam, Vec4::point(0.0, 0.0, 0.0), 800, 600);
        assert!((v.x - 400.0).abs() < 0.5);
        assert!((v.y - 300.0).abs() < 0.5);
    }
}
