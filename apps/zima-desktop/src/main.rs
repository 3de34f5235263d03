use anyhow::{Result, anyhow};
use clap::Parser;
use egui::Context as EguiContext;
use glam::Vec2;
use std::collections::VecDeque;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;
use tracing_subscriber::EnvFilter;
use winit::application::ApplicationHandler;
use winit::dpi::PhysicalSize;
use winit::event::{DeviceEvent, ElementState, KeyEvent, MouseButton, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::{CursorGrabMode, Window, WindowId};
use zima_input::{Action, InputState, Key};
use zima_kernel::{GameConfig, GameEvent, World};
use zima_render::{plan_frame, scene_manifest};
use zima_render_wgpu::WgpuRenderer;

/// Game time at which the status block is logged once.
const STATUS_REPORT_AT: f32 = 5.0;
const MAX_NOTICES: usize = 6;

#[derive(Parser)]
#[command(name = "zima-desktop", about = "Winter airship delivery")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// YAML game config; defaults are used when omitted
    #[arg(long)]
    config: Option<PathBuf>,

    /// Directory holding Field.png, ChrTree.*, shar.* and sled.obj
    #[arg(long, default_value = "assets")]
    assets: PathBuf,

    /// Override the config seed
    #[arg(long)]
    seed: Option<u64>,
}

fn map_key(code: KeyCode) -> Option<Key> {
    Some(match code {
        KeyCode::KeyW => Key::W,
        KeyCode::KeyA => Key::A,
        KeyCode::KeyS => Key::S,
        KeyCode::KeyD => Key::D,
        KeyCode::Space => Key::Space,
        KeyCode::ShiftLeft | KeyCode::ShiftRight => Key::Shift,
        KeyCode::ArrowUp => Key::Up,
        KeyCode::ArrowDown => Key::Down,
        KeyCode::ArrowLeft => Key::Left,
        KeyCode::ArrowRight => Key::Right,
        KeyCode::KeyC => Key::C,
        KeyCode::KeyF => Key::F,
        KeyCode::KeyM => Key::M,
        KeyCode::Enter | KeyCode::NumpadEnter => Key::Enter,
        _ => return None,
    })
}

/// Application state.
struct AppState {
    world: World,
    input: InputState,
    asset_dir: PathBuf,
    show_hud: bool,
    status_reported: bool,
    notices: VecDeque<String>,
    // Last real cursor position; becomes the virtual cursor under mouse look.
    cursor: Vec2,
    last_frame: Instant,
}

impl AppState {
    fn new(config: GameConfig, asset_dir: PathBuf) -> Self {
        Self {
            world: World::new(config),
            input: InputState::new(),
            asset_dir,
            show_hud: true,
            status_reported: false,
            notices: VecDeque::new(),
            cursor: Vec2::ZERO,
            last_frame: Instant::now(),
        }
    }

    /// Step the world and return the events it produced.
    fn update(&mut self, dt: f32) -> Vec<GameEvent> {
        let frame = self.input.take_frame();
        self.world.step(dt, &frame);
        let events = self.world.drain_events();

        for event in &events {
            if let Some(notice) = notice_for(event) {
                if self.notices.len() == MAX_NOTICES {
                    self.notices.pop_front();
                }
                self.notices.push_back(notice);
            }
        }

        if !self.status_reported && self.world.game_time() > STATUS_REPORT_AT {
            self.status_reported = true;
            tracing::info!("\n=== WINTER AIRSHIP DELIVERY ===\n{}", self.world.summary());
        }
        events
    }

    fn handle_key(&mut self, code: KeyCode, pressed: bool) {
        if code == KeyCode::F1 && pressed {
            self.show_hud = !self.show_hud;
            return;
        }
        let Some(key) = map_key(code) else {
            return;
        };
        if pressed {
            self.input.key_down(key);
        } else {
            self.input.key_up(key);
        }
    }

    fn draw_ui(&self, ctx: &EguiContext) {
        if !self.show_hud {
            return;
        }

        let summary = self.world.summary();
        egui::Window::new("Winter Airship Delivery")
            .default_pos([12.0, 12.0])
            .resizable(false)
            .show(ctx, |ui| {
                ui.label(format!(
                    "Score: {}  Deliveries: {}/{}",
                    summary.score, summary.deliveries, summary.houses
                ));
                ui.label(format!(
                    "Waiting houses: {}  Packages: {}",
                    summary.houses_waiting, summary.packages_in_flight
                ));
                ui.label(format!("Time: {} s", summary.game_time as u64));
                ui.label(format!(
                    "Airship: ({:.0}, {:.0}, {:.0})",
                    summary.airship.x, summary.airship.y, summary.airship.z
                ));
                ui.label(format!(
                    "Camera: {}  pitch {:.1}  yaw {:.1}",
                    summary.camera_mode, summary.pitch, summary.yaw
                ));
                ui.label(format!(
                    "Mouse look: {}  Spotlight: {}",
                    on_off(summary.mouse_look),
                    on_off(summary.spotlight)
                ));

                if !self.notices.is_empty() {
                    ui.separator();
                    for notice in &self.notices {
                        ui.small(notice);
                    }
                }

                ui.separator();
                ui.collapsing("Controls", |ui| {
                    ui.small("WASD: fly  Space/Shift: altitude");
                    ui.small("Arrows: look (mouse look off)");
                    ui.small("RMB / M: mouse look  C: aim view");
                    ui.small("F: spotlight  Enter: drop package");
                    ui.small("F1: HUD  Esc: quit");
                });
            });
    }

    fn report_game_over(&self) {
        tracing::info!(
            "\n=== GAME OVER ===\nFinal score: {} points\nDeliveries completed: {} of {}\nTotal time: {} seconds",
            self.world.score(),
            self.world.deliveries(),
            self.world.houses().len(),
            self.world.game_time() as u64
        );
    }
}

fn on_off(on: bool) -> &'static str {
    if on {
        "on"
    } else {
        "off"
    }
}

fn notice_for(event: &GameEvent) -> Option<String> {
    match event {
        GameEvent::HouseDelivered {
            house,
            score,
            deliveries,
        } => Some(format!(
            "Delivered to house {house}! Score {score}, deliveries {deliveries}"
        )),
        GameEvent::HouseNeedsDelivery { house } => {
            Some(format!("House {house} needs delivery again"))
        }
        GameEvent::CameraModeChanged { mode } => Some(format!("Camera: {mode}")),
        GameEvent::SpotlightToggled { on } => Some(format!("Spotlight {}", on_off(*on))),
        GameEvent::MouseLookToggled { enabled } => {
            Some(format!("Mouse look {}", on_off(*enabled)))
        }
        GameEvent::PackageDropped { .. } => None,
    }
}

struct GpuApp {
    state: AppState,
    window: Option<Arc<Window>>,
    surface: Option<wgpu::Surface<'static>>,
    device: Option<wgpu::Device>,
    queue: Option<wgpu::Queue>,
    config: Option<wgpu::SurfaceConfiguration>,
    renderer: Option<WgpuRenderer>,
    egui_ctx: EguiContext,
    egui_winit: Option<egui_winit::State>,
    egui_renderer: Option<egui_wgpu::Renderer>,
}

impl GpuApp {
    fn new(state: AppState) -> Self {
        Self {
            state,
            window: None,
            surface: None,
            device: None,
            queue: None,
            config: None,
            renderer: None,
            egui_ctx: EguiContext::default(),
            egui_winit: None,
            egui_renderer: None,
        }
    }

    fn init_gpu(&mut self, event_loop: &ActiveEventLoop) -> Result<()> {
        let attrs = Window::default_attributes()
            .with_title("Zima: Winter Airship Delivery")
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
        .ok_or_else(|| anyhow!("no suitable GPU adapter"))?;

        let (device, queue) = pollster::block_on(adapter.request_device(
            &wgpu::DeviceDescriptor {
                label: Some("zima_device"),
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
            .or_else(|| surface_caps.formats.first())
            .copied()
            .ok_or_else(|| anyhow!("surface reports no formats"))?;
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

        let mut renderer =
            WgpuRenderer::new(&device, &queue, surface_format, config.width, config.height);
        let manifest = scene_manifest(&self.state.world, &self.state.asset_dir);
        renderer.load_scene(&device, &queue, &manifest);

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

        self.window = Some(window);
        self.surface = Some(surface);
        self.device = Some(device);
        self.queue = Some(queue);
        self.config = Some(config);
        self.renderer = Some(renderer);
        self.egui_winit = Some(egui_winit);
        self.egui_renderer = Some(egui_renderer);
        Ok(())
    }

    fn set_mouse_look(&self, enabled: bool) {
        let Some(window) = &self.window else {
            return;
        };
        if enabled {
            let grabbed = window
                .set_cursor_grab(CursorGrabMode::Locked)
                .or_else(|_| window.set_cursor_grab(CursorGrabMode::Confined));
            if let Err(e) = grabbed {
                tracing::warn!("cursor grab unavailable: {e}");
            }
        } else if let Err(e) = window.set_cursor_grab(CursorGrabMode::None) {
            tracing::warn!("cursor release failed: {e}");
        }
        window.set_cursor_visible(!enabled);
    }

    fn redraw(&mut self) {
        let now = Instant::now();
        let dt = (now - self.state.last_frame).as_secs_f32().min(0.1);
        self.state.last_frame = now;

        for event in self.state.update(dt) {
            if let GameEvent::MouseLookToggled { enabled } = event {
                self.set_mouse_look(enabled);
            }
        }

        let (Some(window), Some(surface), Some(device), Some(queue), Some(config)) = (
            &self.window,
            &self.surface,
            &self.device,
            &self.queue,
            &self.config,
        ) else {
            return;
        };
        let (Some(renderer), Some(egui_winit), Some(egui_renderer)) = (
            &mut self.renderer,
            &mut self.egui_winit,
            &mut self.egui_renderer,
        ) else {
            return;
        };

        let output = match surface.get_current_texture() {
            Ok(t) => t,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                surface.configure(device, config);
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

        let aspect = config.width as f32 / config.height.max(1) as f32;
        let plan = plan_frame(&self.state.world, aspect);
        renderer.render(device, queue, &view, &plan);

        let raw_input = egui_winit.take_egui_input(window);
        let state = &self.state;
        let full_output = self.egui_ctx.run(raw_input, |ctx| {
            state.draw_ui(ctx);
        });
        egui_winit.handle_platform_output(window, full_output.platform_output);

        let paint_jobs = self
            .egui_ctx
            .tessellate(full_output.shapes, full_output.pixels_per_point);
        let screen_descriptor = egui_wgpu::ScreenDescriptor {
            size_in_pixels: [config.width, config.height],
            pixels_per_point: full_output.pixels_per_point,
        };

        for (id, image_delta) in &full_output.textures_delta.set {
            egui_renderer.update_texture(device, queue, *id, image_delta);
        }
        let mut encoder = device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("egui_encoder"),
        });
        egui_renderer.update_buffers(device, queue, &mut encoder, &paint_jobs, &screen_descriptor);
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
            egui_renderer.render(&mut pass, &paint_jobs, &screen_descriptor);
        }
        queue.submit(std::iter::once(encoder.finish()));
        for id in &full_output.textures_delta.free {
            egui_renderer.free_texture(id);
        }

        output.present();
        window.request_redraw();
    }
}

impl ApplicationHandler for GpuApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }
        if let Err(e) = self.init_gpu(event_loop) {
            tracing::error!("failed to initialize graphics: {e:#}");
            event_loop.exit();
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        if let (Some(egui_winit), Some(window)) = (&mut self.egui_winit, &self.window) {
            let response = egui_winit.on_window_event(window, &event);
            if response.consumed {
                return;
            }
        }

        match event {
            WindowEvent::CloseRequested => {
                event_loop.exit();
            }
            WindowEvent::Resized(new_size) => {
                if let (Some(surface), Some(device), Some(config)) =
                    (&self.surface, &self.device, &mut self.config)
                {
                    config.width = new_size.width.max(1);
                    config.height = new_size.height.max(1);
                    surface.configure(device, config);
                    if let Some(renderer) = &mut self.renderer {
                        renderer.resize(device, config.width, config.height);
                    }
                }
            }
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        physical_key: PhysicalKey::Code(key),
                        state: key_state,
                        ..
                    },
                ..
            } => {
                if key == KeyCode::Escape {
                    event_loop.exit();
                    return;
                }
                self.state
                    .handle_key(key, key_state == ElementState::Pressed);
            }
            WindowEvent::MouseInput {
                button: MouseButton::Right,
                state: ElementState::Pressed,
                ..
            } => {
                self.state.input.push_action(Action::ToggleMouseLook);
            }
            WindowEvent::CursorMoved { position, .. } => {
                if !self.state.world.mouse_look() {
                    self.state.cursor = Vec2::new(position.x as f32, position.y as f32);
                    self.state.input.cursor_moved(self.state.cursor);
                }
            }
            WindowEvent::RedrawRequested => self.redraw(),
            _ => {}
        }
    }

    fn device_event(
        &mut self,
        _event_loop: &ActiveEventLoop,
        _device_id: winit::event::DeviceId,
        event: DeviceEvent,
    ) {
        // A grabbed cursor stops moving; integrate raw motion instead.
        if let DeviceEvent::MouseMotion { delta } = event {
            if self.state.world.mouse_look() {
                self.state.cursor += Vec2::new(delta.0 as f32, delta.1 as f32);
                self.state.input.cursor_moved(self.state.cursor);
            }
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    let mut config = GameConfig::load(cli.config.as_deref())?;
    if let Some(seed) = cli.seed {
        config.seed = seed;
    }

    tracing::info!(
        "zima-desktop starting. RMB/M: mouse look, WASD: fly, Space/Shift: altitude, \
         arrows: look, C: aim view, F: spotlight, Enter: drop, Esc: quit"
    );

    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = GpuApp::new(AppState::new(config, cli.assets));
    event_loop.run_app(&mut app)?;
    app.state.report_game_over();

    Ok(())
}
