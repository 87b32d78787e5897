//! Scene module - vertex and quad data fed to the rasterizer
//!
//! A scene is a flat list of colored vertices, quad faces indexing into it,
//! and the initial camera pose. Scenes live in RON files.

mod file;

pub use file::*;

use serde::{Serialize, Deserialize};
use crate::rasterizer::{Camera, Projection, Quad, Vec4, Vertex};

/// Initial camera pose and projection stored with a scene
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CameraSetup {
    pub eye: Vec4,
    pub target: Vec4,
    pub up: Vec4,
    #[serde(default)]
    pub projection: Projection,
}

impl Default for CameraSetup {
    fn default() -> Self {
        Self {
            eye: Vec4::point(5.0, 5.0, -5.0),
            target: Vec4::point(0.0, 0.0, 0.0),
            up: Vec4::UP,
            projection: Projection::default(),
        }
    }
}

/// Geometry plus camera
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scene {
    #[serde(default)]
    pub camera: CameraSetup,
    pub vertices: Vec<Vertex>,
    pub faces: Vec<Quad>,
}

impl Scene {
    /// Unit cube (corners at +/-1) with a distinct color on every corner.
    /// Vertices 0-3 are the -Z face, 4-7 the +Z face.
    pub fn cube() -> Self {
        let corner = |x: f32, y: f32, z: f32, r: f32, g: f32, b: f32| {
            Vertex::new(Vec4::point(x, y, z), Vec4::new(r, g, b, 0.0))
        };

        let vertices = vec![
            corner(-1.0, 1.0, -1.0, 1.0, 0.0, 0.0),
            corner(1.0, 1.0, -1.0, 0.0, 1.0, 0.0),
            corner(1.0, -1.0, -1.0, 0.0, 0.0, 1.0),
            corner(-1.0, -1.0, -1.0, 1.0, 1.0, 0.0),
            corner(-1.0, 1.0, 1.0, 1.0, 0.0, 1.0),
            corner(1.0, 1.0, 1.0, 0.0, 1.0, 1.0),
            corner(1.0, -1.0, 1.0, 1.0, 0.5, 0.0),
            corner(-1.0, -1.0, 1.0, 0.5, 0.0, 1.0),
        ];

        let faces = vec![
            Quad::new(0, 1, 2, 3), // Front
            Quad::new(1, 5, 6, 2), // Right
            Quad::new(4, 0, 3, 7), // Left
            Quad::new(4, 5, 1, 0), // Top
            Quad::new(3, 2, 6, 7), // Bottom
            Quad::new(5, 4, 7, 6), // Back
        ];

        Self {
            camera: CameraSetup::default(),
            vertices,
            faces,
        }
    }

    /// Check face indices and that the camera pose defines a view basis
    pub fn validate(&self) -> Result<(), SceneError> {
        for (face, quad) in self.faces.iter().enumerate() {
            let index = quad.max_index();
            if index >= self.vertices.len() {
                return Err(SceneError::InvalidFace {
                    face,
                    index,
                    vertex_count: self.vertices.len(),
                });
            }
        }

        let offset = self.camera.target - self.camera.eye;
        if offset.len() == 0.0 {
            return Err(SceneError::DegenerateCamera);
        }
        if self.camera.up.cross(offset).len() == 0.0 {
            return Err(SceneError::DegenerateUp);
        }

        Ok(())
    }

    /// Camera for this scene, following the viewport's aspect ratio
    pub fn build_camera(&self, aspect: f32) -> Camera {
        let setup = &self.camera;
        let projection = Projection {
            aspect,
            ..setup.projection
        };
        Camera::with_projection(setup.eye, setup.target, setup.up, projection)
    }

    /// Positions are points: force w = 1 after loading from a file
    fn normalize_points(&mut self) {
        for v in &mut self.vertices {
            v.pos.w = 1.0;
        }
        self.camera.eye.w = 1.0;
        self.camera.target.w = 1.0;
        self.camera.up.w = 0.0;
    }
}
