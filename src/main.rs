//! SoftRaster: minimal software 3D rasterizer
//!
//! Projects a colored cube (or any quad scene loaded from RON) through a
//! look-at camera and fills pixels on the CPU:
//! - Whole-triangle clipping against the canonical view volume
//! - Bresenham wireframe edges
//! - Barycentric color interpolation with a z-buffer
//!
//! Controls: drag to orbit, wheel to zoom, R to reset, Tab/Space to switch
//! between wireframe and color fill, O to open a scene, S to save it with the
//! current eye position, F12 for a screenshot.

/// Version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

mod rasterizer;
mod scene;
mod app;

use macroquad::prelude::*;
use rasterizer::{HEIGHT, WIDTH};
use scene::{load_scene, Scene};
use app::AppState;
use std::path::PathBuf;

fn window_conf() -> Conf {
    Conf {
        window_title: format!("SoftRaster v{}", VERSION),
        window_width: WIDTH as i32,
        window_height: HEIGHT as i32,
        window_resizable: true,
        ..Default::default()
    }
}

/// Scene from the first command-line argument, or the built-in cube
fn initial_scene() -> (Scene, Option<PathBuf>) {
    if let Some(arg) = std::env::args().nth(1) {
        let path = PathBuf::from(arg);
        match load_scene(&path) {
            Ok(scene) => {
                println!(
                    "Loaded scene {} ({} vertices, {} faces)",
                    path.display(),
                    scene.vertices.len(),
                    scene.faces.len()
                );
                return (scene, Some(path));
            }
            Err(e) => {
                eprintln!("Failed to load {}: {}, using built-in cube", path.display(), e);
            }
        }
    }
    (Scene::cube(), None)
}

#[macroquad::main(window_conf)]
async fn main() {
    let (scene, path) = initial_scene();
    let mut app = AppState::new(scene, path, WIDTH, HEIGHT);

    println!("=== SoftRaster v{} ===", VERSION);

    loop {
        let screen_w = screen_width();
        let screen_h = screen_height();
        app.resize(screen_w as usize, screen_h as usize);

        handle_input(&mut app);

        app.render_frame();
        present(&app, screen_w, screen_h);
        draw_hud(&app);

        next_frame().await;
    }
}

/// Translate device input into camera and render-mode commands
fn handle_input(app: &mut AppState) {
    let (mx, my) = mouse_position();
    app.drag_to(mx, my, is_mouse_button_down(MouseButton::Left));

    let wheel = mouse_wheel().1;
    if wheel != 0.0 {
        app.camera.zoom(wheel);
    }

    if is_key_pressed(KeyCode::R) {
        app.camera.reset();
        app.set_status("Camera reset", 2.0);
    }

    if is_key_pressed(KeyCode::Tab) || is_key_pressed(KeyCode::Space) {
        app.toggle_mode();
        let msg = format!("Mode: {}", app.settings.mode.label());
        app.set_status(&msg, 2.0);
    }

    #[cfg(not(target_arch = "wasm32"))]
    {
        if is_key_pressed(KeyCode::O) {
            prompt_load(app);
        }
        if is_key_pressed(KeyCode::S) {
            save_current(app);
        }
        if is_key_pressed(KeyCode::F12) {
            save_screenshot(app);
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn save_current(app: &mut AppState) {
    let path = app
        .scene_path
        .clone()
        .unwrap_or_else(|| PathBuf::from("assets/scenes/untitled.ron"));
    match app.save(&path) {
        Ok(()) => {
            println!("Saved scene {}", path.display());
            app.set_status(&format!("Saved to {}", path.display()), 3.0);
        }
        Err(e) => {
            eprintln!("Save failed: {}", e);
            app.set_status(&format!("Save failed: {}", e), 5.0);
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn save_screenshot(app: &mut AppState) {
    let path = PathBuf::from(format!("softraster-{}.png", (get_time() * 1000.0) as u64));
    match app.save_screenshot(&path) {
        Ok(()) => {
            println!("Saved screenshot {}", path.display());
            app.set_status(&format!("Saved {}", path.display()), 3.0);
        }
        Err(e) => {
            eprintln!("Screenshot failed: {}", e);
            app.set_status(&format!("Screenshot failed: {}", e), 5.0);
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn prompt_load(app: &mut AppState) {
    let default_dir = PathBuf::from("assets/scenes");

    let dialog = rfd::FileDialog::new()
        .add_filter("RON Scene", &["ron"])
        .set_directory(&default_dir);

    if let Some(path) = dialog.pick_file() {
        match app.load(&path) {
            Ok(()) => {
                println!("Loaded scene {}", path.display());
                app.set_status(&format!("Loaded {}", path.display()), 3.0);
            }
            Err(e) => {
                eprintln!("Failed to load {}: {}", path.display(), e);
                app.set_status(&format!("Load failed: {}", e), 5.0);
            }
        }
    }
}

/// Blit the framebuffer to the window
fn present(app: &AppState, screen_w: f32, screen_h: f32) {
    let texture = Texture2D::from_rgba8(app.fb.width as u16, app.fb.height as u16, &app.fb.to_rgba8());
    texture.set_filter(FilterMode::Nearest);

    draw_texture_ex(
        &texture,
        0.0,
        0.0,
        WHITE,
        DrawTextureParams {
            dest_size: Some(vec2(screen_w, screen_h)),
            ..Default::default()
        },
    );
}

fn draw_hud(app: &AppState) {
    let pos = app.camera.position();
    let text_color = Color::from_rgba(20, 20, 20, 255);

    draw_text(
        &format!(
            "{} | Tris: {} drawn, {} clipped | Cam: ({:.2}, {:.2}, {:.2}) | Pitch: {:.2}",
            app.settings.mode.label(),
            app.stats.drawn,
            app.stats.clipped,
            pos.x,
            pos.y,
            pos.z,
            app.camera.pitch(),
        ),
        8.0,
        18.0,
        16.0,
        text_color,
    );

    if let Some(status) = app.get_status() {
        draw_text(status, 8.0, screen_height() - 8.0, 16.0, text_color);
    }
}
