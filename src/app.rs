//! Application state
//!
//! Owns the render context (framebuffer + settings), the camera and the
//! loaded scene. Input translation in `main` drives it through the
//! navigation methods below.

use std::path::{Path, PathBuf};
use crate::rasterizer::{Camera, Framebuffer, RasterSettings, RenderStats, render_mesh};
use crate::scene::{load_scene, save_scene, Scene, SceneError};

/// Main application state
pub struct AppState {
    pub scene: Scene,
    pub camera: Camera,
    pub fb: Framebuffer,
    pub settings: RasterSettings,

    /// Triangle counts from the last rendered frame
    pub stats: RenderStats,

    /// File the scene came from (None for the built-in cube)
    pub scene_path: Option<PathBuf>,

    /// Status message (shown in the HUD)
    pub status_message: Option<(String, f64)>, // (message, expiry_time)

    /// Orbit drag tracking
    pub last_mouse: (f32, f32),
    pub dragging: bool,
}

impl AppState {
    pub fn new(scene: Scene, scene_path: Option<PathBuf>, width: usize, height: usize) -> Self {
        let camera = scene.build_camera(width as f32 / height as f32);
        Self {
            scene,
            camera,
            fb: Framebuffer::new(width, height),
            settings: RasterSettings::default(),
            stats: RenderStats::default(),
            scene_path,
            status_message: None,
            last_mouse: (0.0, 0.0),
            dragging: false,
        }
    }

    /// Replace the scene from a RON file. The current scene stays on error.
    pub fn load(&mut self, path: &Path) -> Result<(), SceneError> {
        let scene = load_scene(path)?;
        self.camera = scene.build_camera(self.aspect());
        self.scene = scene;
        self.scene_path = Some(path.to_path_buf());
        Ok(())
    }

    /// Write the scene, with the current eye as its starting pose.
    /// Missing parent directories are created.
    pub fn save(&mut self, path: &Path) -> Result<(), SceneError> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        self.scene.camera.eye = self.camera.position();
        save_scene(&self.scene, path)?;
        self.scene_path = Some(path.to_path_buf());
        Ok(())
    }

    fn aspect(&self) -> f32 {
        self.fb.width as f32 / self.fb.height as f32
    }

    /// Follow a viewport size change: new buffers and a matching aspect
    pub fn resize(&mut self, width: usize, height: usize) {
        if width == 0 || height == 0 || (width == self.fb.width && height == self.fb.height) {
            return;
        }
        self.fb.resize(width, height);
        self.camera.set_aspect(self.aspect());
    }

    /// Clear, then rasterize the whole scene
    pub fn render_frame(&mut self) -> RenderStats {
        self.fb.clear(self.settings.background);
        self.stats = render_mesh(
            &mut self.fb,
            &self.scene.vertices,
            &self.scene.faces,
            &self.camera,
            &self.settings,
        );
        self.stats
    }

    pub fn toggle_mode(&mut self) {
        self.settings.mode = self.settings.mode.toggle();
    }

    /// Feed a mouse position; drags orbit the camera
    pub fn drag_to(&mut self, x: f32, y: f32, button_down: bool) {
        if button_down {
            if self.dragging {
                let dx = x - self.last_mouse.0;
                let dy = y - self.last_mouse.1;
                if dx != 0.0 || dy != 0.0 {
                    self.camera.orbit(dx, dy);
                }
            }
            self.dragging = true;
            self.last_mouse = (x, y);
        } else {
            self.dragging = false;
        }
    }

    /// Save the current frame as a PNG
    #[cfg(not(target_arch = "wasm32"))]
    pub fn save_screenshot(&self, path: &Path) -> Result<(), image::ImageError> {
        let bytes = self.fb.to_rgba8();
        let img = image::RgbaImage::from_raw(self.fb.width as u32, self.fb.height as u32, bytes)
            .ok_or_else(|| {
                image::ImageError::Parameter(image::error::ParameterError::from_kind(
                    image::error::ParameterErrorKind::DimensionMismatch,
                ))
            })?;
        img.save(path)
    }

    /// Set a status message that will be displayed for a duration
    pub fn set_status(&mut self, message: &str, duration_secs: f64) {
        let expiry = macroquad::time::get_time() + duration_secs;
        self.status_message = Some((message.to_string(), expiry));
    }

    /// Get current status message if not expired
    pub fn get_status(&self) -> Option<&str> {
        if let Some((msg, expiry)) = &self.status_message {
            if macroquad::time::get_time() < *expiry {
                return Some(msg);
            }
        }
        None
    }
}
