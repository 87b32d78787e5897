//! Vector and matrix math for the projection pipeline
//!
//! Row-vector convention throughout: a point is transformed as `v * M`,
//! and `a.mul(&b)` applies `a` first, then `b`.

use std::ops::{Add, Sub, Mul};
use serde::{Serialize, Deserialize};

/// Below this magnitude the barycentric denominator is treated as zero
pub const DEGENERATE_EPSILON: f32 = 1e-2;

/// Homogeneous 4-component vector
///
/// Doubles as a 3D point (w = 1), a direction (w = 0), a clip-space
/// coordinate, or an RGB color packed into x/y/z.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Vec4 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
    #[serde(default)]
    pub w: f32,
}

impl Vec4 {
    pub const UP: Vec4 = Vec4 { x: 0.0, y: 1.0, z: 0.0, w: 0.0 };

    pub fn new(x: f32, y: f32, z: f32, w: f32) -> Self {
        Self { x, y, z, w }
    }

    /// A position with w = 1
    pub fn point(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z, w: 1.0 }
    }

    /// Dot product over x, y, z (w ignored)
    pub fn dot(self, other: Vec4) -> f32 {
        self.x * other.x + self.y * other.y + self.z * other.z
    }

    pub fn cross(self, other: Vec4) -> Vec4 {
        Vec4 {
            x: self.y * other.z - self.z * other.y,
            y: self.z * other.x - self.x * other.z,
            z: self.x * other.y - self.y * other.x,
            w: 0.0,
        }
    }

    pub fn len(self) -> f32 {
        self.dot(self).sqrt()
    }

    /// Unit-length direction. A zero-length input yields NaN components;
    /// callers guarantee a non-degenerate vector.
    pub fn normalize(self) -> Vec4 {
        let l = self.len();
        Vec4 {
            x: self.x / l,
            y: self.y / l,
            z: self.z / l,
            w: 0.0,
        }
    }

    /// Scale x, y, z, leaving w alone
    pub fn scale(self, s: f32) -> Vec4 {
        Vec4 {
            x: self.x * s,
            y: self.y * s,
            z: self.z * s,
            w: self.w,
        }
    }

    /// Weighted blend of three vectors by barycentric weights (x, y, z)
    pub fn lerp3(a: Vec4, b: Vec4, c: Vec4, weights: Vec4) -> Vec4 {
        a * weights.x + b * weights.y + c * weights.z
    }

    /// Row vector times matrix: `result[j] = sum_i v[i] * m[i][j]`
    pub fn transform(self, m: &Matrix) -> Vec4 {
        let m = &m.m;
        Vec4 {
            x: self.x * m[0][0] + self.y * m[1][0] + self.z * m[2][0] + self.w * m[3][0],
            y: self.x * m[0][1] + self.y * m[1][1] + self.z * m[2][1] + self.w * m[3][1],
            z: self.x * m[0][2] + self.y * m[1][2] + self.z * m[2][2] + self.w * m[3][2],
            w: self.x * m[0][3] + self.y * m[1][3] + self.z * m[2][3] + self.w * m[3][3],
        }
    }

    /// Homogeneous divide into NDC. Requires w != 0.
    pub fn perspective_divide(&mut self) {
        self.x /= self.w;
        self.y /= self.w;
        self.z /= self.w;
        self.w = 1.0;
    }

    /// NDC x/y in [-1, 1] to pixel coordinates with a top-left origin.
    /// z and w pass through untouched.
    pub fn to_screen(&mut self, width: usize, height: usize) {
        self.x = (self.x + 1.0) * width as f32 * 0.5;
        self.y = (1.0 - self.y) * height as f32 * 0.5;
    }
}

impl Add for Vec4 {
    type Output = Vec4;
    fn add(self, other: Vec4) -> Vec4 {
        Vec4 {
            x: self.x + other.x,
            y: self.y + other.y,
            z: self.z + other.z,
            w: self.w + other.w,
        }
    }
}

impl Sub for Vec4 {
    type Output = Vec4;
    fn sub(self, other: Vec4) -> Vec4 {
        Vec4 {
            x: self.x - other.x,
            y: self.y - other.y,
            z: self.z - other.z,
            w: self.w - other.w,
        }
    }
}

impl Mul<f32> for Vec4 {
    type Output = Vec4;
    fn mul(self, s: f32) -> Vec4 {
        Vec4 {
            x: self.x * s,
            y: self.y * s,
            z: self.z * s,
            w: self.w * s,
        }
    }
}

/// 4x4 row-major transform
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Matrix {
    pub m: [[f32; 4]; 4],
}

impl Default for Matrix {
    fn default() -> Self {
        Matrix::IDENTITY
    }
}

impl Matrix {
    pub const IDENTITY: Matrix = Matrix {
        m: [
            [1.0, 0.0, 0.0, 0.0],
            [0.0, 1.0, 0.0, 0.0],
            [0.0, 0.0, 1.0, 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ],
    };

    pub fn new(m: [[f32; 4]; 4]) -> Self {
        Self { m }
    }

    /// `result[i][j] = sum_k self[i][k] * other[k][j]`
    pub fn mul(&self, other: &Matrix) -> Matrix {
        let mut result = [[0.0; 4]; 4];
        for i in 0..4 {
            for j in 0..4 {
                result[i][j] = self.m[i][0] * other.m[0][j]
                    + self.m[i][1] * other.m[1][j]
                    + self.m[i][2] * other.m[2][j]
                    + self.m[i][3] * other.m[3][j];
            }
        }
        Matrix { m: result }
    }

    /// Right-handed rotation by `angle` radians about a unit `axis`, laid out
    /// for row vectors. About +X and +Y this is exactly the classic pitch and
    /// yaw matrices.
    pub fn rotation_axis(axis: Vec4, angle: f32) -> Matrix {
        let (s, c) = angle.sin_cos();
        let t = 1.0 - c;
        let (x, y, z) = (axis.x, axis.y, axis.z);
        Matrix {
            m: [
                [c + t * x * x, t * x * y + s * z, t * x * z - s * y, 0.0],
                [t * x * y - s * z, c + t * y * y, t * y * z + s * x, 0.0],
                [t * x * z + s * y, t * y * z - s * x, c + t * z * z, 0.0],
                [0.0, 0.0, 0.0, 1.0],
            ],
        }
    }
}

/// Barycentric weights of `p` in the screen-space triangle (a, b, c)
///
/// Solves `p = a + u * (c - a) + v * (b - a)` by crossing the x and y rows of
/// that system. Returns (weight_a, weight_b, weight_c) in x, y, z. Thin or
/// degenerate triangles return a vector with a negative x so callers skip
/// every pixel.
pub fn barycentric(p: Vec4, a: Vec4, b: Vec4, c: Vec4) -> Vec4 {
    let r = Vec4::new(c.x - a.x, b.x - a.x, a.x - p.x, 0.0)
        .cross(Vec4::new(c.y - a.y, b.y - a.y, a.y - p.y, 0.0));

    if r.z.abs() <= DEGENERATE_EPSILON {
        return Vec4::new(-1.0, 1.0, 1.0, 0.0);
    }

    Vec4::new(1.0 - (r.x + r.y) / r.z, r.y / r.z, r.x / r.z, 0.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::FRAC_PI_2;

    fn approx(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-4
    }

    fn approx_vec(a: Vec4, b: Vec4) -> bool {
        approx(a.x, b.x) && approx(a.y, b.y) && approx(a.z, b.z) && approx(a.w, b.w)
    }

    #[test]
    fn test_dot_ignores_w() {
        let a = Vec4::new(1.0, 2.0, 3.0, 100.0);
        let b = Vec4::new(4.0, 5.0, 6.0, 100.0);
        assert!(approx(a.dot(b), 32.0));
    }

    #[test]
    fn test_cross_and_normalize() {
        let c = Vec4::new(1.0, 0.0, 0.0, 1.0).cross(Vec4::new(0.0, 1.0, 0.0, 1.0));
        assert!(approx_vec(c, Vec4::new(0.0, 0.0, 1.0, 0.0)));

        let n = Vec4::new(3.0, 0.0, 4.0, 7.0).normalize();
        assert!(approx_vec(n, Vec4::new(0.6, 0.0, 0.8, 0.0)));
    }

    #[test]
    fn test_composition_matches_sequential_transform() {
        let a = Matrix::new([
            [1.0, 2.0, 0.0, 0.5],
            [0.0, 1.0, 3.0, 0.0],
            [2.0, 0.0, 1.0, 0.0],
            [1.0, -1.0, 0.5, 1.0],
        ]);
        let b = Matrix::rotation_axis(Vec4::new(0.0, 1.0, 0.0, 0.0), 0.7)
            .mul(&Matrix::new([
                [0.5, 0.0, 0.0, 0.0],
                [0.0, 2.0, 0.0, 0.0],
                [0.0, 0.0, 1.0, 1.0],
                [3.0, 0.0, -2.0, 0.0],
            ]));
        let v = Vec4::point(0.3, -1.2, 2.5);

        let sequential = v.transform(&a).transform(&b);
        let composed = v.transform(&a.mul(&b));
        assert!(approx_vec(sequential, composed));
    }

    #[test]
    fn test_rotation_axis_matches_pitch_and_yaw() {
        // Quarter turn about +Y carries +X to -Z
        let yaw = Matrix::rotation_axis(Vec4::UP, FRAC_PI_2);
        let r = Vec4::point(1.0, 0.0, 0.0).transform(&yaw);
        assert!(approx_vec(r, Vec4::point(0.0, 0.0, -1.0)));

        // Quarter turn about +X carries +Y to +Z
        let pitch = Matrix::rotation_axis(Vec4::new(1.0, 0.0, 0.0, 0.0), FRAC_PI_2);
        let r = Vec4::point(0.0, 1.0, 0.0).transform(&pitch);
        assert!(approx_vec(r, Vec4::point(0.0, 0.0, 1.0)));
    }

    #[test]
    fn test_perspective_divide_and_screen() {
        let mut v = Vec4::new(2.0, -2.0, 1.0, 4.0);
        v.perspective_divide();
        assert!(approx_vec(v, Vec4::new(0.5, -0.5, 0.25, 1.0)));

        v.to_screen(800, 600);
        assert!(approx(v.x, 600.0));
        assert!(approx(v.y, 450.0));
        assert!(approx(v.z, 0.25));
    }

    #[test]
    fn test_barycentric_inside_sums_to_one() {
        let a = Vec4::new(0.0, 0.0, 0.0, 1.0);
        let b = Vec4::new(10.0, 0.0, 0.0, 1.0);
        let c = Vec4::new(5.0, 10.0, 0.0, 1.0);
        let bc = barycentric(Vec4::new(5.0, 3.0, 0.0, 0.0), a, b, c);
        assert!(bc.x >= 0.0 && bc.y >= 0.0 && bc.z >= 0.0);
        assert!(approx(bc.x + bc.y + bc.z, 1.0));
    }

    #[test]
    fn test_barycentric_vertices_are_one_hot() {
        let a = Vec4::new(12.5, 40.0, 0.0, 1.0);
        let b = Vec4::new(80.0, 10.25, 0.0, 1.0);
        let c = Vec4::new(60.0, 90.0, 0.0, 1.0);
        assert!(approx_vec(barycentric(a, a, b, c), Vec4::new(1.0, 0.0, 0.0, 0.0)));
        assert!(approx_vec(barycentric(b, a, b, c), Vec4::new(0.0, 1.0, 0.0, 0.0)));
        assert!(approx_vec(barycentric(c, a, b, c), Vec4::new(0.0, 0.0, 1.0, 0.0)));
    }

    #[test]
    fn test_barycentric_outside_and_degenerate() {
        let a = Vec4::new(0.0, 0.0, 0.0, 1.0);
        let b = Vec4::new(10.0, 0.0, 0.0, 1.0);
        let c = Vec4::new(0.0, 10.0, 0.0, 1.0);
        let bc = barycentric(Vec4::new(20.0, 20.0, 0.0, 0.0), a, b, c);
        assert!(bc.x < 0.0 || bc.y < 0.0 || bc.z < 0.0);

        // Collinear vertices
        let flat = barycentric(Vec4::new(1.0, 1.0, 0.0, 0.0), a, Vec4::new(5.0, 5.0, 0.0, 1.0), Vec4::new(9.0, 9.0, 0.0, 1.0));
        assert!(flat.x < 0.0);
    }
}
