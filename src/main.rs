//! Cubepulse - a field of cubes breathing with the microphone
//!
//! One frequency bin of the live input scales and spins every cube while
//! the camera circles the field.

use anyhow::Result;
use clap::Parser;
use log::{error, info, warn};
use std::sync::Arc;
use std::time::Instant;
use winit::{
    application::ApplicationHandler,
    dpi::{LogicalSize, PhysicalSize},
    event::*,
    event_loop::{ActiveEventLoop, EventLoop},
    keyboard::{KeyCode, PhysicalKey},
    window::{Fullscreen, Window, WindowId},
};

use cubepulse::app::Visualizer;
use cubepulse::audio::{list_input_devices, MicrophoneCapability};
use cubepulse::cli::Args;
use cubepulse::params::VisualizerConfig;
use cubepulse::rendering::RenderSystem;

const TITLE: &str = "Cubepulse";

/// Main application state
struct App {
    config: VisualizerConfig,
    capability: MicrophoneCapability,

    // Window and rendering
    window: Option<Arc<Window>>,
    render_system: Option<RenderSystem>,

    visualizer: Option<Visualizer>,

    /// Setup failure reported once the event loop returns
    fatal: Option<anyhow::Error>,
}

impl App {
    fn new(config: VisualizerConfig, capability: MicrophoneCapability) -> Self {
        Self {
            config,
            capability,
            window: None,
            render_system: None,
            visualizer: None,
            fatal: None,
        }
    }

    /// Create window and renderer, then request the microphone
    fn start(&mut self, event_loop: &ActiveEventLoop) -> Result<()> {
        let render_config = &self.config.render;
        let mut window_attributes = Window::default_attributes()
            .with_title(TITLE)
            .with_inner_size(LogicalSize::new(
                render_config.window_width,
                render_config.window_height,
            ));
        if render_config.fullscreen {
            window_attributes =
                window_attributes.with_fullscreen(Some(Fullscreen::Borderless(None)));
        }

        let window = Arc::new(event_loop.create_window(window_attributes)?);

        let render_system = pollster::block_on(RenderSystem::new(
            Arc::clone(&window),
            render_config,
            self.config.field.box_size,
            self.config.field.box_count,
        ))?;

        let scale = window.scale_factor();
        let size = window.inner_size();
        let mut visualizer = Visualizer::new(self.config.clone(), size.width, size.height, scale);

        match visualizer.initialize(&self.capability, &mut rand::rng()) {
            Ok(()) => info!("Cubepulse is running! Press ESC to quit"),
            Err(_) => {
                if let Some(overlay) = visualizer.overlay() {
                    window.set_title(&format!("{} - {}", TITLE, overlay.message()));
                }
            }
        }

        // First animation frame, or a single cleared frame behind the overlay
        window.request_redraw();

        self.window = Some(window);
        self.render_system = Some(render_system);
        self.visualizer = Some(visualizer);
        Ok(())
    }

    fn resize(&mut self, size: PhysicalSize<u32>) {
        let (Some(window), Some(visualizer)) = (&self.window, &mut self.visualizer) else {
            return;
        };
        if visualizer.resize(size.width, size.height, window.scale_factor()) {
            if let Some(render_system) = &mut self.render_system {
                render_system.resize(size.width, size.height);
            }
        }
    }

    /// Run the armed animation step (if any) and present
    fn redraw(&mut self, event_loop: &ActiveEventLoop) {
        let Some(window) = &self.window else {
            return;
        };
        let Some(render_system) = &mut self.render_system else {
            return;
        };
        let Some(visualizer) = &mut self.visualizer else {
            return;
        };

        let outcome = visualizer.frame(Instant::now());

        render_system.update_scene(
            visualizer.camera(),
            visualizer.uniforms(),
            visualizer.field(),
        );

        match render_system.render() {
            Ok(()) => {}
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                render_system.reconfigure()
            }
            Err(wgpu::SurfaceError::OutOfMemory) => {
                error!("GPU out of memory");
                visualizer.cancel();
                event_loop.exit();
                return;
            }
            Err(e) => warn!("Render error: {:?}", e),
        }

        if outcome.is_some_and(|o| o.rearmed) {
            window.request_redraw();
        }
    }

    fn quit(&mut self, event_loop: &ActiveEventLoop) {
        if let Some(visualizer) = &mut self.visualizer {
            visualizer.cancel();
        }
        event_loop.exit();
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return; // Already initialized
        }

        if let Err(e) = self.start(event_loop) {
            error!("Startup failed: {:#}", e);
            self.fatal = Some(e);
            event_loop.exit();
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        match event {
            WindowEvent::CloseRequested => self.quit(event_loop),
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        state: ElementState::Pressed,
                        physical_key: PhysicalKey::Code(KeyCode::Escape),
                        ..
                    },
                ..
            } => self.quit(event_loop),
            WindowEvent::Resized(size) => self.resize(size),
            WindowEvent::RedrawRequested => self.redraw(event_loop),
            _ => {}
        }
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();

    if args.list_devices {
        for name in list_input_devices() {
            println!("{}", name);
        }
        return Ok(());
    }

    let config = args.to_config();
    config.validate()?;

    info!(
        "Cubepulse - {} cubes, orbit radius {}",
        config.field.box_count, config.orbit.distance
    );

    let capability = MicrophoneCapability::new(args.device.clone(), config.analyser.clone());
    let mut app = App::new(config, capability);

    let event_loop = EventLoop::new()?;
    event_loop.run_app(&mut app)?;

    match app.fatal {
        Some(e) => Err(e),
        None => Ok(()),
    }
}
