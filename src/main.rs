//! Betelgeuse: stellar lifecycle visualizer
//!
//! Scrub or auto-play a massive star from nebula to final form, tweak its mass
//! and metallicity, and record sessions as PNG sequences.

mod gui;
mod painter;
mod recorder;
mod scene;

use std::collections::VecDeque;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use clap::Parser;
use gui::{Gui, UiState};
use painter::ShapeCanvas;
use scene::{Scene, SceneConfig, BACKGROUND};
use star_physics::PARTICLE_COUNT;
use winit::{
    application::ApplicationHandler,
    event::*,
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    keyboard::{KeyCode, PhysicalKey},
    window::{Fullscreen, Window, WindowId},
};

#[derive(Parser, Debug)]
#[command(version, about = "Stellar lifecycle visualizer")]
struct Args {
    /// Initial window width (logical pixels)
    #[arg(long, default_value_t = 1200)]
    width: u32,

    /// Initial window height (logical pixels)
    #[arg(long, default_value_t = 800)]
    height: u32,

    /// Orbiting particles around the star
    #[arg(long, default_value_t = PARTICLE_COUNT)]
    particles: usize,

    /// Seed every random source for a reproducible run
    #[arg(long)]
    seed: Option<u64>,

    /// Simulation ticks per second
    #[arg(long, default_value_t = 60)]
    fps: u32,

    /// Directory that receives recording sessions
    #[arg(long, default_value = "recordings")]
    record_dir: PathBuf,

    /// Capture every Nth tick while recording
    #[arg(long, default_value_t = 2)]
    capture_interval: u32,

    /// Fade palettes across stage changes
    #[arg(long)]
    crossfade: bool,
}

/// sRGB byte to the linear value a wgpu clear color expects on sRGB targets
fn srgb_to_linear(channel: u8) -> f64 {
    let c = channel as f64 / 255.0;
    if c <= 0.04045 {
        c / 12.92
    } else {
        ((c + 0.055) / 1.055).powf(2.4)
    }
}

struct GpuState {
    surface: wgpu::Surface<'static>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,
    clear_color: wgpu::Color,

    scene: Scene,
    gui: Gui,
    ui_state: UiState,

    frame_times: VecDeque<f32>,
    last_frame_time: Instant,
    started: Instant,
}

impl GpuState {
    async fn new(window: Arc<Window>, scene: Scene) -> Result<Self> {
        let size = window.inner_size();

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::PRIMARY,
            ..Default::default()
        });

        let surface = instance
            .create_surface(window.clone())
            .context("failed to create window surface")?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::default(),
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .context("no compatible GPU adapter")?;

        log::info!("✓ Using GPU: {}", adapter.get_info().name);

        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: Some("Device"),
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::default(),
                memory_hints: wgpu::MemoryHints::default(),
                experimental_features: wgpu::ExperimentalFeatures::default(),
                trace: wgpu::Trace::Off,
            })
            .await
            .context("failed to open GPU device")?;

        let surface_caps = surface.get_capabilities(&adapter);
        let surface_format = surface_caps
            .formats
            .iter()
            .find(|f| f.is_srgb())
            .or_else(|| surface_caps.formats.first())
            .copied()
            .context("surface reports no formats")?;

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: wgpu::PresentMode::AutoVsync,
            alpha_mode: surface_caps
                .alpha_modes
                .first()
                .copied()
                .unwrap_or(wgpu::CompositeAlphaMode::Auto),
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        let channel = |c: u8| {
            if surface_format.is_srgb() {
                srgb_to_linear(c)
            } else {
                c as f64 / 255.0
            }
        };
        let clear_color = wgpu::Color {
            r: channel(BACKGROUND.r),
            g: channel(BACKGROUND.g),
            b: channel(BACKGROUND.b),
            a: 1.0,
        };

        let gui = Gui::new(&device, config.format, &window);
        log::info!("✓ GUI initialized");

        Ok(Self {
            surface,
            device,
            queue,
            config,
            clear_color,
            scene,
            gui,
            ui_state: UiState::default(),
            frame_times: VecDeque::with_capacity(100),
            last_frame_time: Instant::now(),
            started: Instant::now(),
        })
    }

    fn resize(&mut self, new_size: winit::dpi::PhysicalSize<u32>) {
        if new_size.width > 0 && new_size.height > 0 {
            self.config.width = new_size.width;
            self.config.height = new_size.height;
            self.surface.configure(&self.device, &self.config);
        }
    }

    /// One simulation tick; recording failures are logged, not fatal
    fn tick(&mut self) {
        let time_ms = self.started.elapsed().as_secs_f64() * 1000.0;
        if let Err(e) = self.scene.tick(time_ms) {
            log::error!("Recording stopped: {e:#}");
        }
    }

    fn render(&mut self, window: &Window) -> Result<(), wgpu::SurfaceError> {
        let now = Instant::now();
        let frame_time = (now - self.last_frame_time).as_secs_f32() * 1000.0;
        self.last_frame_time = now;

        self.frame_times.push_back(frame_time);
        if self.frame_times.len() > 100 {
            self.frame_times.pop_front();
        }
        let avg_frame_time = self.frame_times.iter().sum::<f32>() / self.frame_times.len() as f32;
        self.ui_state.frame_time = avg_frame_time;
        self.ui_state.fps = 1000.0 / avg_frame_time.max(f32::EPSILON);

        let output = self.surface.get_current_texture()?;
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        // The star is drawn in logical points, same as the panels
        let logical = window.inner_size().to_logical::<f32>(window.scale_factor());
        let mut canvas = ShapeCanvas::new(logical.width, logical.height);
        self.scene.draw(&mut canvas);

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Frame Encoder"),
            });

        {
            let _clear = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Clear Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(self.clear_color),
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
            });
        }

        self.gui.render(
            &self.device,
            &self.queue,
            &mut encoder,
            window,
            &view,
            &mut self.ui_state,
            &mut self.scene,
            canvas.into_shapes(),
        );

        self.queue.submit(std::iter::once(encoder.finish()));
        output.present();
        Ok(())
    }

    /// Start a recording sized to the current window
    fn start_recording(&mut self, window: &Window) {
        let logical = window.inner_size().to_logical::<u32>(window.scale_factor());
        if let Err(e) = self.scene.start_recording(logical.width, logical.height) {
            log::error!("Could not start recording: {e:#}");
        }
    }
}

struct App {
    args: Args,
    window: Option<Arc<Window>>,
    gpu_state: Option<GpuState>,
    init_error: Option<anyhow::Error>,

    tick_interval: Duration,
    next_tick: Instant,

    right_mouse_pressed: bool,
    last_mouse_pos: Option<(f64, f64)>,
}

impl App {
    fn new(args: Args) -> Self {
        let tick_interval = Duration::from_secs_f64(1.0 / args.fps.max(1) as f64);
        Self {
            args,
            window: None,
            gpu_state: None,
            init_error: None,
            tick_interval,
            next_tick: Instant::now(),
            right_mouse_pressed: false,
            last_mouse_pos: None,
        }
    }

    fn init(&mut self, event_loop: &ActiveEventLoop) -> Result<()> {
        let window_attributes = Window::default_attributes()
            .with_title("Betelgeuse - Stellar Lifecycle")
            .with_inner_size(winit::dpi::LogicalSize::new(
                self.args.width,
                self.args.height,
            ));

        let window = Arc::new(
            event_loop
                .create_window(window_attributes)
                .context("failed to create window")?,
        );

        let scene = Scene::new(&SceneConfig {
            width: self.args.width,
            height: self.args.height,
            particles: self.args.particles,
            seed: self.args.seed,
            record_dir: self.args.record_dir.clone(),
            capture_interval: self.args.capture_interval,
            crossfade: self.args.crossfade,
        });
        log::info!(
            "✓ Scene ready: {} particles, seed {:?}",
            scene.simulation.particle_count(),
            self.args.seed
        );

        self.gpu_state = Some(pollster::block_on(GpuState::new(window.clone(), scene))?);
        self.window = Some(window);
        Ok(())
    }

    fn handle_key(&mut self, event_loop: &ActiveEventLoop, key_code: KeyCode) {
        let (Some(window), Some(gpu_state)) = (&self.window, &mut self.gpu_state) else {
            return;
        };
        let scene = &mut gpu_state.scene;

        match key_code {
            KeyCode::Space => scene.paused = !scene.paused,
            KeyCode::KeyR => scene.reset(),
            KeyCode::KeyG => scene.show_graphs = !scene.show_graphs,
            KeyCode::KeyI => scene.show_analysis = !scene.show_analysis,
            KeyCode::KeyH => gpu_state.ui_state.show_hints = !gpu_state.ui_state.show_hints,
            KeyCode::KeyV => gpu_state.start_recording(window),
            KeyCode::Equal | KeyCode::NumpadAdd => scene.starfield.apply_zoom(1.1),
            KeyCode::Minus | KeyCode::NumpadSubtract => scene.starfield.apply_zoom(0.9),
            KeyCode::KeyF => {
                if window.fullscreen().is_some() {
                    window.set_fullscreen(None);
                } else {
                    window.set_fullscreen(Some(Fullscreen::Borderless(None)));
                }
            }
            KeyCode::Escape => {
                if window.fullscreen().is_some() {
                    window.set_fullscreen(None);
                } else {
                    event_loop.exit();
                }
            }
            _ => {}
        }
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_none() {
            if let Err(e) = self.init(event_loop) {
                self.init_error = Some(e);
                event_loop.exit();
            }
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        // Handle GUI events
        if let (Some(gpu_state), Some(window)) = (&mut self.gpu_state, &self.window) {
            if gpu_state.gui.handle_event(window, &event) {
                return;
            }
        }

        match event {
            WindowEvent::CloseRequested => {
                if let Some(gpu_state) = &mut self.gpu_state {
                    gpu_state.scene.stop_recording();
                }
                event_loop.exit();
            }

            WindowEvent::Resized(physical_size) => {
                if let Some(gpu_state) = &mut self.gpu_state {
                    gpu_state.resize(physical_size);
                }
            }

            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        physical_key: PhysicalKey::Code(key_code),
                        state: ElementState::Pressed,
                        repeat: false,
                        ..
                    },
                ..
            } => self.handle_key(event_loop, key_code),

            WindowEvent::MouseInput { state, button, .. } => {
                if button == MouseButton::Right {
                    self.right_mouse_pressed = state == ElementState::Pressed;
                    if !self.right_mouse_pressed {
                        self.last_mouse_pos = None;
                    }
                }
            }

            WindowEvent::CursorMoved { position, .. } => {
                if self.right_mouse_pressed {
                    if let (Some(last_pos), Some(gpu_state), Some(window)) =
                        (self.last_mouse_pos, &mut self.gpu_state, &self.window)
                    {
                        let scale = window.scale_factor();
                        let delta_x = ((position.x - last_pos.0) / scale) as f32;
                        let delta_y = ((position.y - last_pos.1) / scale) as f32;
                        gpu_state.scene.starfield.move_camera(delta_x, delta_y);
                    }
                    self.last_mouse_pos = Some((position.x, position.y));
                }
            }

            WindowEvent::RedrawRequested => {
                if let (Some(window), Some(gpu_state)) = (&self.window, &mut self.gpu_state) {
                    gpu_state.tick();
                    match gpu_state.render(window) {
                        Ok(()) => {}
                        Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                            gpu_state.resize(window.inner_size())
                        }
                        Err(wgpu::SurfaceError::OutOfMemory) => event_loop.exit(),
                        Err(e) => log::warn!("Render error: {e:?}"),
                    }
                }
            }

            _ => {}
        }
    }

    /// Fixed-rate loop: one redraw (tick + frame) per interval
    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        let now = Instant::now();
        if now >= self.next_tick {
            if let Some(window) = &self.window {
                window.request_redraw();
            }
            self.next_tick = (self.next_tick + self.tick_interval).max(now);
        }
        event_loop.set_control_flow(ControlFlow::WaitUntil(self.next_tick));
    }
}

fn main() -> Result<()> {
    // Initialize logger (RUST_LOG=debug for verbose output)
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    log::info!("Starting stellar lifecycle visualizer...");

    let event_loop = EventLoop::new().context("failed to create event loop")?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = App::new(args);
    event_loop.run_app(&mut app).context("event loop failed")?;

    match app.init_error {
        Some(e) => Err(e),
        None => Ok(()),
    }
}
