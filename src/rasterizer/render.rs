//! Core rendering functions
//! Clip test, projection to pixels, wireframe and filled triangle rasterization

use super::camera::Camera;
use super::math::{barycentric, Matrix, Vec4};
use super::types::{Color, Quad, RasterSettings, RenderMode, Vertex};

/// Depth of an empty pixel (far plane in NDC)
pub const FAR_DEPTH: f32 = 1.0;

/// Color and depth buffers for software rendering
pub struct Framebuffer {
    pub pixels: Vec<u32>,   // 0x00RRGGBB, row-major, top-left origin
    pub zbuffer: Vec<f32>,  // NDC depth, FAR_DEPTH when empty
    pub width: usize,
    pub height: usize,
}

impl Framebuffer {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            pixels: vec![0; width * height],
            zbuffer: vec![FAR_DEPTH; width * height],
            width,
            height,
        }
    }

    /// Reallocate for a new viewport size. No-op when the size is unchanged.
    pub fn resize(&mut self, width: usize, height: usize) {
        if width == self.width && height == self.height {
            return;
        }
        self.width = width;
        self.height = height;
        self.pixels = vec![0; width * height];
        self.zbuffer = vec![FAR_DEPTH; width * height];
    }

    pub fn clear(&mut self, color: Color) {
        self.pixels.fill(color.to_packed());
        self.zbuffer.fill(FAR_DEPTH);
    }

    /// Write a pixel; coordinates outside the buffer are dropped
    pub fn set_pixel(&mut self, x: i32, y: i32, color: u32) {
        if x < 0 || y < 0 || x >= self.width as i32 || y >= self.height as i32 {
            return;
        }
        let idx = y as usize * self.width + x as usize;
        self.pixels[idx] = color;
    }

    /// Depth-tested write. A fragment at equal or smaller depth wins.
    pub fn set_pixel_with_depth(&mut self, x: i32, y: i32, z: f32, color: u32) -> bool {
        if x < 0 || y < 0 || x >= self.width as i32 || y >= self.height as i32 {
            return false;
        }
        let idx = y as usize * self.width + x as usize;
        if z <= self.zbuffer[idx] {
            self.zbuffer[idx] = z;
            self.pixels[idx] = color;
            return true;
        }
        false
    }

    pub fn pixel(&self, x: usize, y: usize) -> Option<u32> {
        if x < self.width && y < self.height {
            Some(self.pixels[y * self.width + x])
        } else {
            None
        }
    }

    pub fn depth(&self, x: usize, y: usize) -> Option<f32> {
        if x < self.width && y < self.height {
            Some(self.zbuffer[y * self.width + x])
        } else {
            None
        }
    }

    /// Opaque RGBA bytes for presentation or export
    pub fn to_rgba8(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(self.pixels.len() * 4);
        for &packed in &self.pixels {
            bytes.extend_from_slice(&Color::from_packed(packed).to_rgba());
        }
        bytes
    }

    /// Draw a line from (x0, y0) to (x1, y1) using Bresenham's algorithm.
    /// Both endpoints are drawn exactly once.
    pub fn draw_line(&mut self, mut x0: i32, mut y0: i32, mut x1: i32, mut y1: i32, color: u32) {
        if x0 == x1 && y0 == y1 {
            self.set_pixel(x0, y0, color);
        } else if x0 == x1 {
            if y0 > y1 {
                std::mem::swap(&mut y0, &mut y1);
            }
            for y in y0..=y1 {
                self.set_pixel(x0, y, color);
            }
        } else if y0 == y1 {
            if x0 > x1 {
                std::mem::swap(&mut x0, &mut x1);
            }
            for x in x0..=x1 {
                self.set_pixel(x, y0, color);
            }
        } else {
            let dx = (x1 - x0).abs();
            let dy = (y1 - y0).abs();
            let mut err = 0;

            if dx > dy {
                // Walk x, step y
                if x0 > x1 {
                    std::mem::swap(&mut x0, &mut x1);
                    std::mem::swap(&mut y0, &mut y1);
                }
                let sy = if y0 < y1 { 1 } else { -1 };
                let mut y = y0;
                for x in x0..x1 {
                    self.set_pixel(x, y, color);
                    err += dy;
                    if err >= dx {
                        err -= dx;
                        y += sy;
                    }
                }
            } else {
                // Walk y, step x
                if y0 > y1 {
                    std::mem::swap(&mut x0, &mut x1);
                    std::mem::swap(&mut y0, &mut y1);
                }
                let sx = if x0 < x1 { 1 } else { -1 };
                let mut x = x0;
                for y in y0..y1 {
                    self.set_pixel(x, y, color);
                    err += dx;
                    if err >= dy {
                        err -= dy;
                        x += sx;
                    }
                }
            }
            self.set_pixel(x1, y1, color);
        }
    }
}

/// Triangle counts for one frame
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RenderStats {
    pub drawn: usize,
    pub clipped: usize,
}

/// Canonical view volume test in clip space: true means reject.
/// A non-positive w is rejected outright so the perspective divide is safe.
/// Written as a negated inside test so NaN coordinates are rejected too.
pub fn outside_cvv(v: Vec4) -> bool {
    let inside = v.w > 0.0
        && v.z >= 0.0
        && v.z <= v.w
        && v.x >= -v.w
        && v.x <= v.w
        && v.y >= -v.w
        && v.y <= v.w;
    !inside
}

/// Round half up to the nearest pixel
fn snap(v: f32) -> i32 {
    (v + 0.5).floor() as i32
}

/// Fill a screen-space triangle with interpolated color, depth-tested
fn fill_triangle(fb: &mut Framebuffer, a: &Vertex, b: &Vertex, c: &Vertex) {
    let (p1, p2, p3) = (a.pos, b.pos, c.pos);

    // Bounding box, limited to the buffer (pixels outside are dropped anyway)
    let min_x = snap(p1.x.min(p2.x).min(p3.x)).max(0);
    let max_x = snap(p1.x.max(p2.x).max(p3.x)).min(fb.width as i32 - 1);
    let min_y = snap(p1.y.min(p2.y).min(p3.y)).max(0);
    let max_y = snap(p1.y.max(p2.y).max(p3.y)).min(fb.height as i32 - 1);

    for y in min_y..=max_y {
        for x in min_x..=max_x {
            let p = Vec4::new(x as f32, y as f32, 0.0, 0.0);
            let bc = barycentric(p, p1, p2, p3);
            if bc.x < 0.0 || bc.y < 0.0 || bc.z < 0.0 {
                continue;
            }

            let z = bc.x * p1.z + bc.y * p2.z + bc.z * p3.z;
            let color = Vec4::lerp3(a.color, b.color, c.color, bc);
            fb.set_pixel_with_depth(x, y, z, Color::from_vec4(color).to_packed());
        }
    }
}

/// Transform, clip, project and rasterize one triangle.
/// Returns false when the triangle was rejected by the clip test.
pub fn draw_primitive(
    fb: &mut Framebuffer,
    a: &Vertex,
    b: &Vertex,
    c: &Vertex,
    world_to_clip: &Matrix,
    settings: &RasterSettings,
) -> bool {
    // Whole-triangle reject: no partial clipping
    let mut clip = [a.pos, b.pos, c.pos].map(|p| p.transform(world_to_clip));
    if clip.iter().any(|&v| outside_cvv(v)) {
        return false;
    }

    for v in clip.iter_mut() {
        v.perspective_divide();
        v.to_screen(fb.width, fb.height);
    }
    let [s1, s2, s3] = clip;

    match settings.mode {
        RenderMode::Wireframe => {
            let (x1, y1) = (snap(s1.x), snap(s1.y));
            let (x2, y2) = (snap(s2.x), snap(s2.y));
            let (x3, y3) = (snap(s3.x), snap(s3.y));
            let color = settings.wire_color.to_packed();
            fb.draw_line(x1, y1, x2, y2, color);
            fb.draw_line(x2, y2, x3, y3, color);
            fb.draw_line(x1, y1, x3, y3, color);
        }
        RenderMode::Color => {
            fill_triangle(fb, &a.with_pos(s1), &b.with_pos(s2), &c.with_pos(s3));
        }
    }
    true
}

/// Render quads to the framebuffer, two triangles per quad.
/// The caller clears the framebuffer beforehand.
pub fn render_mesh(
    fb: &mut Framebuffer,
    vertices: &[Vertex],
    faces: &[Quad],
    camera: &Camera,
    settings: &RasterSettings,
) -> RenderStats {
    let mut stats = RenderStats::default();
    let matrix = camera.matrix();

    for face in faces {
        for [i0, i1, i2] in face.triangles() {
            let (Some(a), Some(b), Some(c)) = (vertices.get(i0), vertices.get(i1), vertices.get(i2)) else {
                stats.clipped += 1;
                continue;
            };
            if draw_primitive(fb, a, b, c, matrix, settings) {
                stats.drawn += 1;
            } else {
                stats.clipped += 1;
            }
        }
    }

    stats
}
