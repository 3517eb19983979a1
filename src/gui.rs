use std::collections::VecDeque;

use egui::{Color32, Context, RichText, Shape, Stroke};
use egui_wgpu::Renderer;
use egui_winit::State;
use star_physics::MAX_TIME;
use star_simulation::{star_class, ParameterControls, Series, HISTORY_LEN};
use wgpu::{Device, TextureFormat};
use winit::{event::WindowEvent, window::Window};

use crate::scene::Scene;

const GRAPH_SIZE: egui::Vec2 = egui::vec2(260.0, 60.0);

const HINTS: [&str; 9] = [
    "Space - Pause",
    "R - Reset",
    "G - Toggle graphs",
    "I - Toggle analysis",
    "F - Fullscreen",
    "V - Record a random star",
    "+ / - - Zoom background",
    "Right drag - Pan background",
    "H - Toggle hints",
];

fn mocha(color: &catppuccin::Color) -> Color32 {
    Color32::from_rgb(color.rgb.r, color.rgb.g, color.rgb.b)
}

pub struct UiState {
    pub fps: f32,
    pub frame_time: f32,
    pub show_hints: bool,
}

impl Default for UiState {
    fn default() -> Self {
        Self {
            fps: 0.0,
            frame_time: 0.0,
            show_hints: true,
        }
    }
}

pub struct Gui {
    context: Context,
    state: State,
    renderer: Renderer,
}

impl Gui {
    pub fn new(device: &Device, output_color_format: TextureFormat, window: &Window) -> Self {
        let context = Context::default();
        let id = context.viewport_id();

        let state = State::new(
            context.clone(),
            id,
            window,
            Some(window.scale_factor() as f32),
            None,
            Some(device.limits().max_texture_dimension_2d as usize),
        );

        let renderer = Renderer::new(
            device,
            output_color_format,
            egui_wgpu::RendererOptions {
                msaa_samples: 1,
                depth_stencil_format: None,
                dithering: false,
                predictable_texture_filtering: false,
            },
        );

        Self {
            context,
            state,
            renderer,
        }
    }

    pub fn handle_event(&mut self, window: &Window, event: &WindowEvent) -> bool {
        let response = self.state.on_window_event(window, event);
        response.consumed
    }

    /// Run the UI and paint it over `view`. `star_shapes` go underneath every
    /// panel.
    #[allow(clippy::too_many_arguments)]
    pub fn render(
        &mut self,
        device: &Device,
        queue: &wgpu::Queue,
        encoder: &mut wgpu::CommandEncoder,
        window: &Window,
        view: &wgpu::TextureView,
        ui_state: &mut UiState,
        scene: &mut Scene,
        star_shapes: Vec<Shape>,
    ) {
        let raw_input = self.state.take_egui_input(window);

        let full_output = self.context.run(raw_input, |ctx| {
            ctx.layer_painter(egui::LayerId::background())
                .extend(star_shapes.iter().cloned());
            Self::ui(ctx, ui_state, scene);
        });

        self.state
            .handle_platform_output(window, full_output.platform_output);

        let clipped_primitives = self
            .context
            .tessellate(full_output.shapes, full_output.pixels_per_point);

        let size = window.inner_size();
        let screen_descriptor = egui_wgpu::ScreenDescriptor {
            size_in_pixels: [size.width, size.height],
            pixels_per_point: window.scale_factor() as f32,
        };

        for (id, image_delta) in &full_output.textures_delta.set {
            self.renderer
                .update_texture(device, queue, *id, image_delta);
        }

        self.renderer.update_buffers(
            device,
            queue,
            encoder,
            &clipped_primitives,
            &screen_descriptor,
        );

        let mut render_pass = encoder
            .begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Egui Render Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Load,
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
            })
            .forget_lifetime();

        self.renderer
            .render(&mut render_pass, &clipped_primitives, &screen_descriptor);

        for id in &full_output.textures_delta.free {
            self.renderer.free_texture(id);
        }
    }

    fn ui(ctx: &Context, ui_state: &mut UiState, scene: &mut Scene) {
        let colors = &catppuccin::PALETTE.mocha.colors;

        if ui_state.show_hints {
            egui::Window::new("Controls")
                .anchor(egui::Align2::LEFT_TOP, [10.0, 10.0])
                .resizable(false)
                .collapsible(true)
                .show(ctx, |ui| {
                    for hint in HINTS {
                        ui.label(RichText::new(hint).color(mocha(&colors.lavender)));
                    }
                });
        }

        // Diagnostics (top right)
        egui::Window::new("Diagnostics")
            .anchor(egui::Align2::RIGHT_TOP, [-10.0, 10.0])
            .resizable(false)
            .collapsible(true)
            .show(ctx, |ui| {
                let sim = &scene.simulation;
                let stats = scene.last_stats;

                ui.label(format!("FPS: {:.1}", ui_state.fps));
                ui.label(format!("Frame Time: {:.2} ms", ui_state.frame_time));
                ui.separator();

                let stage_color = sim
                    .stage()
                    .palette()
                    .last()
                    .map_or(Color32::WHITE, |c| Color32::from_rgb(c.r, c.g, c.b));
                ui.label(
                    RichText::new(sim.stage().label())
                        .heading()
                        .color(stage_color),
                );
                ui.label(format!("Time: {:.2} Gyr", sim.elapsed_time()));
                ui.add(
                    egui::ProgressBar::new(sim.transition_progress())
                        .text(format!("Transition from {}", sim.previous_stage())),
                );
                ui.label(format!(
                    "Size: {:.1} → {:.1}",
                    sim.displayed_size(),
                    sim.target_size()
                ));
                ui.label(format!("Tick: {}", sim.tick()));
                ui.separator();
                ui.label(format!(
                    "Drawn: {} glow, {} particles, {} rings, {} flares",
                    stats.glow_layers, stats.particles, stats.core_rings, stats.flares
                ));
                ui.label(format!("Background zoom: {:.2}x", scene.starfield.zoom()));

                if let Some(dir) = scene.recording_dir() {
                    ui.label(
                        RichText::new(format!(
                            "● REC {} frames → {}",
                            scene.recorded_frames(),
                            dir.display()
                        ))
                        .color(mocha(&colors.red)),
                    );
                }
            });

        // Star parameters (bottom left)
        egui::Window::new("Star Parameters")
            .anchor(egui::Align2::LEFT_BOTTOM, [10.0, -10.0])
            .resizable(false)
            .collapsible(true)
            .show(ctx, |ui| {
                let mut mass = scene.controls.mass();
                if ui
                    .add(
                        egui::Slider::new(&mut mass, ParameterControls::MASS_RANGE)
                            .text("Mass (M☉)")
                            .fixed_decimals(3),
                    )
                    .changed()
                {
                    scene.controls.set_mass(mass);
                }

                let mut metallicity = scene.controls.metallicity();
                if ui
                    .add(
                        egui::Slider::new(&mut metallicity, ParameterControls::METALLICITY_RANGE)
                            .text("Metallicity (Z)")
                            .fixed_decimals(3),
                    )
                    .changed()
                {
                    scene.controls.set_metallicity(metallicity);
                }

                ui.label(
                    RichText::new(star_class(scene.controls.mass())).color(mocha(&colors.peach)),
                );

                let mut crossfade = scene.renderer.crossfade();
                if ui.checkbox(&mut crossfade, "Cross-fade stages").changed() {
                    scene.renderer.set_crossfade(crossfade);
                }
            });

        // Timeline (bottom centre)
        egui::Window::new("Timeline")
            .anchor(egui::Align2::CENTER_BOTTOM, [0.0, -10.0])
            .resizable(false)
            .collapsible(false)
            .show(ctx, |ui| {
                let mut time = scene.timeline.current_time();
                ui.spacing_mut().slider_width = 480.0;
                if ui
                    .add(
                        egui::Slider::new(&mut time, 0.0..=MAX_TIME)
                            .text("Gyr")
                            .fixed_decimals(2),
                    )
                    .changed()
                {
                    scene.scrub(time);
                }

                let mut jump = None;
                ui.horizontal(|ui| {
                    for marker in scene.timeline.markers() {
                        if ui
                            .small_button(marker.stage.label())
                            .on_hover_text(format!("{:.2} Gyr", marker.time))
                            .clicked()
                        {
                            jump = Some(marker.time);
                        }
                    }
                });
                if let Some(time) = jump {
                    scene.timeline.set_time(time);
                }

                ui.horizontal(|ui| {
                    ui.checkbox(&mut scene.timeline.auto_play, "Auto play");
                    ui.checkbox(&mut scene.paused, "Paused");
                });
            });

        if scene.show_graphs {
            egui::Window::new("Star Data")
                .anchor(egui::Align2::RIGHT_CENTER, [-10.0, 0.0])
                .resizable(false)
                .collapsible(true)
                .show(ctx, |ui| {
                    let line_colors = [&colors.peach, &colors.sky, &colors.yellow];
                    for (series, color) in Series::ALL.into_iter().zip(line_colors) {
                        let latest = scene
                            .history
                            .latest(series)
                            .map_or_else(|| "-".to_owned(), |v| format!("{v:.2}"));
                        ui.label(format!("{}: {}", series.label(), latest));
                        sparkline(
                            ui,
                            scene.history.values(series),
                            scene.history.bounds(series),
                            mocha(color),
                            mocha(&colors.mantle),
                        );
                    }
                });
        }

        if scene.show_analysis {
            egui::Window::new("Analysis")
                .anchor(egui::Align2::RIGHT_BOTTOM, [-10.0, -10.0])
                .resizable(false)
                .collapsible(true)
                .show(ctx, |ui| {
                    let mass = scene.simulation.mass();
                    let prediction = scene
                        .predictor
                        .predict(mass, scene.simulation.metallicity());

                    ui.heading(star_class(mass));
                    ui.label(
                        RichText::new(format!("Predicted end: {}", prediction.outcome))
                            .color(mocha(&colors.mauve)),
                    );
                    ui.label(format!("Confidence: {:.1}%", prediction.confidence));
                    ui.label(format!(
                        "Neutron star: {:.1}%   Black hole: {:.1}%",
                        prediction.neutron_star_probability, prediction.black_hole_probability
                    ));
                    ui.label(format!(
                        "Split mass: {:.2} M☉",
                        scene.predictor.split_mass()
                    ));
                    ui.separator();
                    ui.label(format!("Current stage: {}", scene.simulation.stage()));
                    for series in [Series::Temperature, Series::Luminosity] {
                        if let Some(value) = scene.history.latest(series) {
                            ui.label(format!("{}: {:.1}", series.label(), value));
                        }
                    }
                    ui.label(
                        RichText::new("Illustrative model, not astrophysics")
                            .small()
                            .color(mocha(&colors.overlay1)),
                    );
                });
        }
    }
}

/// Line plot of one history series, scaled to its own bounds
fn sparkline(
    ui: &mut egui::Ui,
    values: &VecDeque<f32>,
    bounds: Option<(f32, f32)>,
    color: Color32,
    background: Color32,
) {
    let (response, painter) = ui.allocate_painter(GRAPH_SIZE, egui::Sense::hover());
    let rect = response.rect;
    painter.rect_filled(rect, 2.0, background);

    let Some((lo, hi)) = bounds else {
        return;
    };
    if values.len() < 2 {
        return;
    }

    let span = (hi - lo).max(f32::EPSILON);
    let step = rect.width() / (HISTORY_LEN - 1) as f32;
    let points = values
        .iter()
        .enumerate()
        .map(|(i, &v)| {
            egui::pos2(
                rect.left() + i as f32 * step,
                rect.bottom() - (v - lo) / span * rect.height(),
            )
        })
        .collect();

    painter.add(Shape::line(points, Stroke::new(1.5, color)));
}
