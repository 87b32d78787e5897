//! Software rasterizer
//!
//! Pipeline per triangle:
//! - Transform to clip space through the camera's world-to-clip matrix
//! - Whole-triangle reject against the canonical view volume
//! - Perspective divide and NDC-to-pixel mapping
//! - Bresenham wireframe, or barycentric fill with a z-buffer

mod math;
mod types;
mod camera;
mod render;

pub use math::*;
pub use types::*;
pub use camera::*;
pub use render::*;

/// Default viewport dimensions
pub const WIDTH: usize = 800;
pub const HEIGHT: usize = 600;
