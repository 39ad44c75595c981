//! Vibescope - audio-reactive visualizer.
//!
//! Drop an audio file on the window; keys 1/2/3 switch between the
//! network, grid and circle modes.

use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use glam::Vec2;
use tracing::{error, info, warn};
use winit::{
    application::ApplicationHandler,
    event::*,
    event_loop::{ActiveEventLoop, EventLoop},
    keyboard::{KeyCode, PhysicalKey},
    window::{Window, WindowId},
};

use vibescope::canvas::PixmapCanvas;
use vibescope::cli::Args;
use vibescope::playback::device_transport;
use vibescope::rendering::RenderSystem;
use vibescope::visual::Mode;
use vibescope::visualizer::Visualizer;
use vibescope::{logging, recording};

/// Main application state
struct App {
    // Window and rendering
    window: Option<Arc<Window>>,
    render_system: Option<RenderSystem>,
    canvas: PixmapCanvas,

    visualizer: Visualizer,
    last_status: String,
}

impl App {
    fn new(visualizer: Visualizer) -> Result<Self> {
        let render = &visualizer.config().render;
        let canvas = PixmapCanvas::new(render.canvas_width, render.canvas_height)
            .context("Failed to allocate canvas")?;
        Ok(Self {
            window: None,
            render_system: None,
            canvas,
            visualizer,
            last_status: String::new(),
        })
    }

    fn resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        if let Some(render_system) = &mut self.render_system {
            render_system.resize(width, height);
        }
        if let Err(e) = self.canvas.resize(width, height) {
            warn!("Canvas resize failed: {}", e);
            return;
        }
        self.visualizer.on_resize(width, height);
    }

    fn handle_key(&mut self, key: KeyCode, event_loop: &ActiveEventLoop) {
        let playback = &self.visualizer.config().playback;
        let (seek_step, volume_step) = (playback.seek_step_s, playback.volume_step);

        match key {
            KeyCode::Escape => event_loop.exit(),
            KeyCode::Digit1 => self.visualizer.set_mode(Mode::Network),
            KeyCode::Digit2 => self.visualizer.set_mode(Mode::Grid),
            KeyCode::Digit3 => self.visualizer.set_mode(Mode::Circle),
            KeyCode::Space => self.visualizer.toggle_play(),
            KeyCode::ArrowLeft => self.visualizer.seek_by(-seek_step),
            KeyCode::ArrowRight => self.visualizer.seek_by(seek_step),
            KeyCode::ArrowUp => {
                if let Some(v) = self.visualizer.adjust_volume(volume_step) {
                    info!("Volume: {:.0}%", v * 100.0);
                }
            }
            KeyCode::ArrowDown => {
                if let Some(v) = self.visualizer.adjust_volume(-volume_step) {
                    info!("Volume: {:.0}%", v * 100.0);
                }
            }
            _ => {}
        }
    }

    /// Render a single frame
    fn render_frame(&mut self) {
        self.visualizer.render(&mut self.canvas);

        if let Some(render_system) = &mut self.render_system {
            match render_system.render(&self.canvas) {
                Ok(()) => {}
                // Surface needs reconfiguring after minimize or display change
                Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                    render_system.resize(self.canvas.width(), self.canvas.height());
                }
                Err(e) => error!("Render error: {:?}", e),
            }
        }

        self.update_title();
    }

    fn update_title(&mut self) {
        let Some(window) = &self.window else {
            return;
        };
        let mode = self
            .visualizer
            .mode()
            .map(|m| m.name())
            .unwrap_or("none");
        let status = format!("Vibescope ({}) - {}", mode, self.visualizer.status_line());
        if status != self.last_status {
            window.set_title(&status);
            self.last_status = status;
        }
    }
}

impl ApplicationHandler for App {
    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }

    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return; // Already initialized
        }

        let render = &self.visualizer.config().render;
        let window_attributes = Window::default_attributes()
            .with_title("Vibescope")
            .with_inner_size(winit::dpi::PhysicalSize::new(
                render.canvas_width,
                render.canvas_height,
            ));

        let window = match event_loop.create_window(window_attributes) {
            Ok(window) => Arc::new(window),
            Err(e) => {
                error!("Failed to create window: {}", e);
                event_loop.exit();
                return;
            }
        };

        let render_system = match pollster::block_on(RenderSystem::new(Arc::clone(&window))) {
            Ok(render_system) => render_system,
            Err(e) => {
                error!("{}", e);
                event_loop.exit();
                return;
            }
        };

        info!("Keys: 1/2/3 modes, Space play/pause, Left/Right seek, Up/Down volume, Esc quit");

        let size = window.inner_size();
        self.window = Some(window);
        self.render_system = Some(render_system);
        self.resize(size.width, size.height);
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _window_id: WindowId, event: WindowEvent) {
        match event {
            WindowEvent::CloseRequested => event_loop.exit(),
            WindowEvent::Resized(size) => self.resize(size.width, size.height),
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        state: ElementState::Pressed,
                        physical_key: PhysicalKey::Code(key),
                        repeat,
                        ..
                    },
                ..
            } => {
                // Held arrows keep seeking/adjusting; everything else fires once
                let repeatable = matches!(
                    key,
                    KeyCode::ArrowLeft | KeyCode::ArrowRight | KeyCode::ArrowUp | KeyCode::ArrowDown
                );
                if !repeat || repeatable {
                    self.handle_key(key, event_loop);
                }
            }
            WindowEvent::DroppedFile(path) => self.visualizer.select_file(&path),
            WindowEvent::CursorMoved { position, .. } => {
                self.visualizer
                    .set_pointer(Some(Vec2::new(position.x as f32, position.y as f32)));
            }
            WindowEvent::CursorLeft { .. } => self.visualizer.set_pointer(None),
            WindowEvent::RedrawRequested => self.render_frame(),
            _ => {}
        }
    }
}

fn main() -> Result<()> {
    let args = Args::parse();
    logging::init(args.verbose);

    let mode = args.parse_mode();
    let config = args.into_config();

    if let Some(recording_config) = args.recording_config() {
        let file = args
            .file
            .as_deref()
            .context("--record needs an audio file (--file PATH)")?;
        let frames = recording::record(config, mode, file, &recording_config)
            .with_context(|| format!("Recording {} failed", file.display()))?;
        info!(
            "Wrote {} frames and audio to {}",
            frames,
            recording_config.output_dir.display()
        );
        return Ok(());
    }

    let mut visualizer = Visualizer::with_analyzer(config, mode, device_transport())
        .context("Failed to set up the visualizer")?;
    if let Some(file) = &args.file {
        visualizer.select_file(file);
    }

    let mut app = App::new(visualizer)?;
    let event_loop = EventLoop::new().context("Failed to create event loop")?;
    event_loop.run_app(&mut app).context("Event loop error")?;
    Ok(())
}
