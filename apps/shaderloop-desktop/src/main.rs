use anyhow::{Context as _, Result};
use clap::Parser;
use egui::Context as EguiContext;
use shaderloop_common::Color;
use shaderloop_input::{HostEvent, InputMapper};
use shaderloop_kernel::{DemoConfig, MonotonicClock, SceneContext, Variant};
use shaderloop_render::ShapeScene;
use shaderloop_render_wgpu::{GpuFrame, WgpuRenderer};
use shaderloop_tools::{ControlKind, ControlPanel, SceneInspector};
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;
use winit::application::ApplicationHandler;
use winit::dpi::PhysicalSize;
use winit::event::{ElementState, KeyEvent, MouseButton, MouseScrollDelta, TouchPhase, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::{Window, WindowId};

/// Pixels of page scroll per wheel line.
const LINE_HEIGHT: f32 = 100.0;

#[derive(Parser)]
#[command(name = "shaderloop-desktop", about = "Interactive noise shader demos")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Demo variant: orbit, scroll, hover or plane
    #[arg(long, default_value = "orbit")]
    variant: Variant,

    /// YAML config overriding the variant defaults
    #[arg(long)]
    config: Option<PathBuf>,
}

/// Scene state plus the host-side input bookkeeping.
struct AppState {
    ctx: SceneContext,
    mapper: InputMapper,
    panel: ControlPanel,
    scene: ShapeScene,
    clock: MonotonicClock,
    show_panel: bool,
    dragging: bool,
    last_cursor: Option<(f32, f32)>,
}

impl AppState {
    fn new(config: DemoConfig) -> Result<Self> {
        let mapper = InputMapper::new(config.pointer)
            .with_page_height_factor(config.page_height_factor)
            .with_wheel_zoom(config.orbit.is_some());
        let scene = ShapeScene::from_geometry(config.mesh_id, &config.geometry);
        let ctx = SceneContext::new(config)?;
        let panel = ControlPanel::from_uniforms(ctx.uniforms());
        Ok(Self {
            ctx,
            mapper,
            panel,
            scene,
            clock: MonotonicClock::start(),
            show_panel: true,
            dragging: false,
            last_cursor: None,
        })
    }

    fn feed(&mut self, event: HostEvent) {
        if let Some(msg) = self.mapper.map(event) {
            self.ctx.post(msg);
        }
    }

    fn cursor_moved(&mut self, x: f32, y: f32) {
        if let (true, Some((lx, ly))) = (self.dragging, self.last_cursor) {
            self.feed(HostEvent::Dragged {
                dx: x - lx,
                dy: y - ly,
            });
        }
        self.last_cursor = Some((x, y));
        self.feed(HostEvent::CursorMoved { x, y });
    }

    fn draw_ui(&mut self, ui_ctx: &EguiContext) {
        if !self.show_panel {
            return;
        }
        let summary = SceneInspector::summary(&self.ctx);

        egui::SidePanel::right("controls")
            .default_width(260.0)
            .show(ui_ctx, |ui| {
                ui.heading(format!("shaderloop: {}", summary.variant));
                ui.label(format!("Frame: {}  t={:.2}s", summary.frame, summary.time));
                ui.label(format!(
                    "Camera: ({:.1}, {:.1}, {:.1})",
                    summary.camera[0], summary.camera[1], summary.camera[2]
                ));
                if let Some(h) = summary.hovered {
                    ui.label(format!("Hovered: {h}"));
                }
                ui.label(format!("Scroll: {:.3}", summary.scroll_fraction));
                ui.separator();

                for control in self.panel.controls().to_vec() {
                    let uniforms = self.ctx.uniforms_mut();
                    match control.kind {
                        ControlKind::Slider { min, max, step } => {
                            let Some(mut v) = uniforms.scalar(control.name) else {
                                continue;
                            };
                            let changed = ui
                                .add(
                                    egui::Slider::new(&mut v, min..=max)
                                        .step_by(step as f64)
                                        .text(control.label),
                                )
                                .changed();
                            if changed {
                                self.panel.apply_scalar(uniforms, control.name, v);
                            }
                        }
                        ControlKind::ColorPicker => {
                            let Some(c) = uniforms.color(control.name) else {
                                continue;
                            };
                            let mut rgb = [c.r, c.g, c.b];
                            ui.horizontal(|ui| {
                                if ui.color_edit_button_rgb(&mut rgb).changed() {
                                    let color = Color::rgba(rgb[0], rgb[1], rgb[2], c.a);
                                    self.panel.apply_color(uniforms, control.name, color);
                                }
                                ui.label(control.label);
                            });
                        }
                    }
                }
                ui.separator();
                egui::CollapsingHeader::new("Uniforms").show(ui, |ui| {
                    egui::Grid::new("uniform_rows").striped(true).show(ui, |ui| {
                        for (name, value) in SceneInspector::uniform_rows(&self.ctx) {
                            ui.monospace(name);
                            ui.monospace(value);
                            ui.end_row();
                        }
                    });
                });
                ui.separator();
                ui.small("F1 toggles this panel");
            });
    }
}

struct Gpu {
    window: Arc<Window>,
    surface: wgpu::Surface<'static>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,
    renderer: WgpuRenderer,
    egui_winit: egui_winit::State,
    egui_renderer: egui_wgpu::Renderer,
}

struct GpuApp {
    state: AppState,
    gpu: Option<Gpu>,
    egui_ctx: EguiContext,
}

impl GpuApp {
    fn new(state: AppState) -> Self {
        Self {
            state,
            gpu: None,
            egui_ctx: EguiContext::default(),
        }
    }

    fn init_gpu(&mut self, event_loop: &ActiveEventLoop) -> Result<Gpu> {
        let attrs = Window::default_attributes()
            .with_title(format!("shaderloop: {}", self.state.ctx.config().variant))
            .with_inner_size(PhysicalSize::new(1280u32, 720));
        let window = Arc::new(event_loop.create_window(attrs)?);

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });
        let surface = instance.create_surface(window.clone())?;

        let adapter = pollster::block_on(instance.request_adapter(&wgpu::RequestAdapterOptions {
            power_preference: wgpu::PowerPreference::HighPerformance,
            compatible_surface: Some(&surface),
            force_fallback_adapter: false,
        }))
        .context("no compatible GPU adapter")?;

        let (device, queue) = pollster::block_on(adapter.request_device(
            &wgpu::DeviceDescriptor {
                label: Some("shaderloop_device"),
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::default(),
                memory_hints: Default::default(),
            },
            None,
        ))?;

        let size = window.inner_size();
        let surface_caps = surface.get_capabilities(&adapter);
        let surface_format = surface_caps
            .formats
            .iter()
            .find(|f| f.is_srgb())
            .or(surface_caps.formats.first())
            .copied()
            .context("surface reports no formats")?;
        let alpha_mode = surface_caps
            .alpha_modes
            .first()
            .copied()
            .unwrap_or(wgpu::CompositeAlphaMode::Auto);

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: wgpu::PresentMode::AutoVsync,
            alpha_mode,
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        let renderer = WgpuRenderer::new(
            &device,
            surface_format,
            config.width,
            config.height,
            &self.state.ctx.config().geometry,
        );

        let egui_winit = egui_winit::State::new(
            self.egui_ctx.clone(),
            egui::ViewportId::ROOT,
            &window,
            Some(window.scale_factor() as f32),
            None,
            None,
        );
        let egui_renderer = egui_wgpu::Renderer::new(&device, surface_format, None, 1, false);

        tracing::info!(
            "GPU initialized with {} backend",
            adapter.get_info().backend.to_str()
        );

        self.state.feed(HostEvent::Resized {
            width: size.width,
            height: size.height,
            scale: window.scale_factor() as f32,
        });

        Ok(Gpu {
            window,
            surface,
            device,
            queue,
            config,
            renderer,
            egui_winit,
            egui_renderer,
        })
    }

    fn redraw(&mut self) {
        let Some(gpu) = &mut self.gpu else {
            return;
        };

        let output = match gpu.surface.get_current_texture() {
            Ok(t) => t,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                gpu.surface.configure(&gpu.device, &gpu.config);
                return;
            }
            Err(e) => {
                tracing::error!("surface error: {e}");
                return;
            }
        };
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        {
            let mut frame = GpuFrame {
                renderer: &mut gpu.renderer,
                device: &gpu.device,
                queue: &gpu.queue,
                view: &view,
                scene: &self.state.scene,
            };
            self.state.ctx.tick_with(&self.state.clock, &mut frame);
        }

        let raw_input = gpu.egui_winit.take_egui_input(&gpu.window);
        let full_output = self.egui_ctx.run(raw_input, |ui_ctx| {
            self.state.draw_ui(ui_ctx);
        });
        gpu.egui_winit
            .handle_platform_output(&gpu.window, full_output.platform_output);

        let paint_jobs = self
            .egui_ctx
            .tessellate(full_output.shapes, full_output.pixels_per_point);
        let screen_descriptor = egui_wgpu::ScreenDescriptor {
            size_in_pixels: [gpu.config.width, gpu.config.height],
            pixels_per_point: full_output.pixels_per_point,
        };

        for (id, image_delta) in &full_output.textures_delta.set {
            gpu.egui_renderer
                .update_texture(&gpu.device, &gpu.queue, *id, image_delta);
        }
        let mut encoder = gpu
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("egui_encoder"),
            });
        gpu.egui_renderer.update_buffers(
            &gpu.device,
            &gpu.queue,
            &mut encoder,
            &paint_jobs,
            &screen_descriptor,
        );
        {
            let mut pass = encoder
                .begin_render_pass(&wgpu::RenderPassDescriptor {
                    label: Some("egui_pass"),
                    color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                        view: &view,
                        resolve_target: None,
                        ops: wgpu::Operations {
                            load: wgpu::LoadOp::Load,
                            store: wgpu::StoreOp::Store,
                        },
                    })],
                    depth_stencil_attachment: None,
                    ..Default::default()
                })
                .forget_lifetime();
            gpu.egui_renderer
                .render(&mut pass, &paint_jobs, &screen_descriptor);
        }
        gpu.queue.submit(std::iter::once(encoder.finish()));
        for id in &full_output.textures_delta.free {
            gpu.egui_renderer.free_texture(id);
        }

        output.present();
        gpu.window.request_redraw();
    }
}

impl ApplicationHandler for GpuApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.gpu.is_some() {
            return;
        }
        match self.init_gpu(event_loop) {
            Ok(gpu) => self.gpu = Some(gpu),
            Err(e) => {
                tracing::error!("failed to initialize GPU: {e:#}");
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
        if let Some(gpu) = &mut self.gpu {
            if gpu.egui_winit.on_window_event(&gpu.window, &event).consumed {
                return;
            }
        }

        match event {
            WindowEvent::CloseRequested => {
                event_loop.exit();
            }
            WindowEvent::Resized(new_size) => {
                let Some(gpu) = &mut self.gpu else {
                    return;
                };
                if new_size.width > 0 && new_size.height > 0 {
                    gpu.config.width = new_size.width;
                    gpu.config.height = new_size.height;
                    gpu.surface.configure(&gpu.device, &gpu.config);
                }
                let scale = gpu.window.scale_factor() as f32;
                self.state.feed(HostEvent::Resized {
                    width: new_size.width,
                    height: new_size.height,
                    scale,
                });
            }
            WindowEvent::CursorMoved { position, .. } => {
                self.state
                    .cursor_moved(position.x as f32, position.y as f32);
            }
            WindowEvent::CursorLeft { .. } => {
                self.state.last_cursor = None;
            }
            WindowEvent::MouseInput {
                button: MouseButton::Left,
                state: btn_state,
                ..
            } => {
                self.state.dragging = btn_state == ElementState::Pressed;
            }
            WindowEvent::MouseWheel { delta, .. } => {
                // winit reports positive y for scrolling up
                let delta_y = match delta {
                    MouseScrollDelta::LineDelta(_, y) => -y * LINE_HEIGHT,
                    MouseScrollDelta::PixelDelta(p) => -p.y as f32,
                };
                self.state.feed(HostEvent::Wheel { delta_y });
            }
            WindowEvent::Touch(touch) => {
                let (x, y) = (touch.location.x as f32, touch.location.y as f32);
                match touch.phase {
                    TouchPhase::Moved => self.state.feed(HostEvent::TouchMoved { x, y }),
                    TouchPhase::Started => self.state.feed(HostEvent::CursorMoved { x, y }),
                    TouchPhase::Ended | TouchPhase::Cancelled => {}
                }
            }
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        physical_key: PhysicalKey::Code(KeyCode::F1),
                        state: ElementState::Pressed,
                        ..
                    },
                ..
            } => {
                self.state.show_panel = !self.state.show_panel;
            }
            WindowEvent::RedrawRequested => {
                self.redraw();
            }
            _ => {}
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(gpu) = &self.gpu {
            gpu.window.request_redraw();
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    let config = match &cli.config {
        Some(path) => DemoConfig::load(path)
            .with_context(|| format!("loading {}", path.display()))?,
        None => DemoConfig::for_variant(cli.variant),
    };
    tracing::info!(variant = %config.variant, "shaderloop-desktop starting");

    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = GpuApp::new(AppState::new(config)?);
    event_loop.run_app(&mut app)?;

    Ok(())
}
