//! Core types for the rasterizer

use serde::{Serialize, Deserialize};
use super::math::Vec4;

/// 8-bit RGB color, packed as 0x00RRGGBB in the color buffer
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const BLACK: Color = Color { r: 0, g: 0, b: 0 };
    pub const GREEN: Color = Color { r: 0, g: 255, b: 0 };
    /// Light blue clear color
    pub const SKY: Color = Color { r: 123, g: 195, b: 221 };

    pub fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// From float channels in x/y/z, each expected in [0, 1]
    pub fn from_vec4(v: Vec4) -> Self {
        let channel = |c: f32| (c.clamp(0.0, 1.0) * 255.0 + 0.5) as u8;
        Self {
            r: channel(v.x),
            g: channel(v.y),
            b: channel(v.z),
        }
    }

    pub fn to_packed(self) -> u32 {
        ((self.r as u32) << 16) | ((self.g as u32) << 8) | (self.b as u32)
    }

    pub fn from_packed(packed: u32) -> Self {
        Self {
            r: ((packed >> 16) & 0xFF) as u8,
            g: ((packed >> 8) & 0xFF) as u8,
            b: (packed & 0xFF) as u8,
        }
    }

    /// Opaque RGBA bytes for presentation
    pub fn to_rgba(self) -> [u8; 4] {
        [self.r, self.g, self.b, 255]
    }
}

/// A scene vertex: world position plus per-vertex color
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Vertex {
    pub pos: Vec4,
    pub color: Vec4,
}

impl Vertex {
    pub fn new(pos: Vec4, color: Vec4) -> Self {
        Self { pos, color }
    }

    /// Same color, different position (used for the per-frame screen-space copy)
    pub fn with_pos(self, pos: Vec4) -> Self {
        Self { pos, color: self.color }
    }
}

/// A quad face (four indices into the vertex array, wound consistently)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Quad(pub [usize; 4]);

impl Quad {
    pub fn new(v0: usize, v1: usize, v2: usize, v3: usize) -> Self {
        Self([v0, v1, v2, v3])
    }

    /// Split along the 0-2 diagonal
    pub fn triangles(&self) -> [[usize; 3]; 2] {
        let [a, b, c, d] = self.0;
        [[a, b, c], [a, c, d]]
    }

    pub fn max_index(&self) -> usize {
        self.0.iter().copied().max().unwrap_or(0)
    }
}

/// How triangles are filled
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderMode {
    Wireframe, // Bresenham edges in a single color
    Color,     // Depth-tested, color-interpolated fill
}

impl RenderMode {
    pub fn toggle(self) -> Self {
        match self {
            RenderMode::Wireframe => RenderMode::Color,
            RenderMode::Color => RenderMode::Wireframe,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            RenderMode::Wireframe => "Wireframe",
            RenderMode::Color => "Color",
        }
    }
}

/// Rasterizer settings
#[derive(Debug, Clone)]
pub struct RasterSettings {
    /// Fill strategy
    pub mode: RenderMode,
    /// Edge color in wireframe mode
    pub wire_color: Color,
    /// Clear color used at the start of every frame
    pub background: Color,
}

impl Default for RasterSettings {
    fn default() -> Self {
        Self {
            mode: RenderMode::Wireframe,
            wire_color: Color::GREEN,
            background: Color::SKY,
        }
    }
}
