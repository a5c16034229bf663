use anyhow::Result;
use campfire_fire::{FireBlend, FireParams, MAX_ITERATIONS, MAX_OCTAVES};
use campfire_input::{Action, Pointer, Viewport};
use campfire_render_wgpu::{CampfireRenderer, GpuContext, OrthoCamera};
use campfire_scene::{Animator, Scene, SceneConfig};
use clap::Parser;
use egui::Context as EguiContext;
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing_subscriber::EnvFilter;
use winit::application::ApplicationHandler;
use winit::dpi::PhysicalSize;
use winit::event::{ElementState, KeyEvent, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::{Window, WindowId};

#[derive(Parser)]
#[command(name = "campfire-desktop", about = "Campfire scene viewer")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// YAML scene configuration
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Seed for the fire RNG (random when omitted)
    #[arg(long)]
    seed: Option<u64>,
}

fn key_action(key: KeyCode) -> Action {
    match key {
        KeyCode::F1 => Action::TogglePanel,
        KeyCode::Space => Action::TogglePause,
        KeyCode::KeyR => Action::ReseedFire,
        KeyCode::Backspace => Action::ResetFire,
        KeyCode::Escape => Action::Quit,
        _ => Action::Noop,
    }
}

/// Application state.
struct AppState {
    scene: Scene,
    animator: Animator,
    initial_fire: FireParams,
    rng: StdRng,
    camera: OrthoCamera,
    pointer: Pointer,
    show_panel: bool,
    quit: bool,
    // Scene clock
    started: Instant,
    paused_since: Option<Instant>,
    paused_total: Duration,
}

impl AppState {
    fn new(config: SceneConfig, mut rng: StdRng) -> Self {
        let scene = Scene::campground(config.fire, &mut rng);
        Self {
            scene,
            animator: Animator::new(config.animation),
            initial_fire: config.fire,
            rng,
            camera: OrthoCamera::default(),
            pointer: Pointer::default(),
            show_panel: true,
            quit: false,
            started: Instant::now(),
            paused_since: None,
            paused_total: Duration::ZERO,
        }
    }

    fn paused(&self) -> bool {
        self.paused_since.is_some()
    }

    /// Seconds since start, not counting time spent paused.
    fn scene_time(&self) -> f32 {
        let now = self.paused_since.unwrap_or_else(Instant::now);
        now.saturating_duration_since(self.started)
            .saturating_sub(self.paused_total)
            .as_secs_f32()
    }

    fn update(&mut self) {
        if self.paused() {
            return;
        }
        let view = self.camera.view();
        let viewport = Viewport::new(view.viewport.x, view.viewport.y);
        let input = self
            .animator
            .frame_input(self.pointer.in_viewport(&viewport), self.scene_time());
        self.animator.update(&mut self.scene, &input);
    }

    fn apply(&mut self, action: Action) {
        match action {
            Action::TogglePanel => self.show_panel = !self.show_panel,
            Action::TogglePause => match self.paused_since.take() {
                Some(since) => {
                    self.paused_total += since.elapsed();
                    tracing::info!("resumed");
                }
                None => {
                    self.paused_since = Some(Instant::now());
                    tracing::info!(t = self.scene_time(), "paused");
                }
            },
            Action::ReseedFire => {
                self.scene.campfire.material.reseed(&mut self.rng);
            }
            Action::ResetFire => {
                self.scene.campfire.material.set_params(self.initial_fire);
                tracing::info!("fire parameters reset");
            }
            Action::Quit => self.quit = true,
            Action::Noop => {}
        }
    }

    fn draw_ui(&mut self, ctx: &EguiContext) {
        if !self.show_panel {
            return;
        }

        let mut actions = Vec::new();
        egui::SidePanel::left("inspector")
            .default_width(260.0)
            .show(ctx, |ui| {
                ui.heading("Campfire");
                ui.separator();
                ui.label(format!(
                    "Frame: {}  t: {:.2}s{}",
                    self.scene.frame(),
                    self.scene.elapsed(),
                    if self.paused() { " (paused)" } else { "" }
                ));
                ui.label(format!("Seed: {:.3}", self.scene.campfire.material.seed()));
                ui.label(format!("Ambient: {:.3}", self.scene.ambient.intensity));
                ui.label(format!(
                    "Prism glow: {:.3}",
                    self.scene.prism.material.emissive_intensity
                ));
                let target = self.scene.spot.target.world_position();
                ui.label(format!("Spot target: ({:.2}, {:.2})", target.x, target.y));
                ui.separator();

                ui.heading("Fire");
                let mut params = *self.scene.campfire.material.params();
                ui.add(egui::Slider::new(&mut params.magnitude, 0.0..=5.0).text("magnitude"));
                ui.add(egui::Slider::new(&mut params.lacunarity, 1.0..=6.0).text("lacunarity"));
                ui.add(egui::Slider::new(&mut params.gain, 0.0..=1.0).text("gain"));
                ui.label("Noise scale:");
                for (value, name) in params.noise_scale.iter_mut().zip(["x/z", "y", "w", "speed"]) {
                    ui.add(egui::Slider::new(value, 0.0..=4.0).text(name));
                }
                ui.add(egui::Slider::new(&mut params.iterations, 1..=MAX_ITERATIONS).text("iterations"));
                ui.add(egui::Slider::new(&mut params.octaves, 1..=MAX_OCTAVES).text("octaves"));
                ui.horizontal(|ui| {
                    ui.label("Blend:");
                    ui.radio_value(&mut params.blend, FireBlend::Alpha, "alpha");
                    ui.radio_value(&mut params.blend, FireBlend::Additive, "additive");
                });
                ui.horizontal(|ui| {
                    ui.label("Tint:");
                    ui.color_edit_button_rgb(&mut params.color);
                });
                if params != *self.scene.campfire.material.params() {
                    self.scene.campfire.material.set_params(params);
                }
                ui.separator();

                for (action, label) in [
                    (Action::ReseedFire, "Reseed"),
                    (Action::ResetFire, "Reset"),
                    (Action::TogglePause, "Pause / Resume"),
                ] {
                    if ui.button(format!("{label} ({})", action.hint())).clicked() {
                        actions.push(action);
                    }
                }

                ui.separator();
                ui.small("F1: Toggle Panel | Space: Pause | Esc: Quit");
            });

        for action in actions {
            self.apply(action);
        }
    }
}

/// Everything that exists only once the window is up.
struct Gpu {
    window: Arc<Window>,
    ctx: GpuContext,
    renderer: CampfireRenderer,
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
            .with_title("Campfire")
            .with_inner_size(PhysicalSize::new(1280u32, 720));
        let window = Arc::new(event_loop.create_window(attrs)?);
        let size = window.inner_size();

        let ctx = GpuContext::new(window.clone(), size.width, size.height)?;
        self.state.camera.resize(ctx.config.width, ctx.config.height);

        let renderer = CampfireRenderer::new(
            &ctx.device,
            &ctx.queue,
            ctx.config.format,
            ctx.config.width,
            ctx.config.height,
            &self.state.scene,
        );

        let egui_winit = egui_winit::State::new(
            self.egui_ctx.clone(),
            egui::ViewportId::ROOT,
            &window,
            Some(window.scale_factor() as f32),
            None,
            None,
        );
        let egui_renderer = egui_wgpu::Renderer::new(&ctx.device, ctx.config.format, None, 1, false);

        Ok(Gpu {
            window,
            ctx,
            renderer,
            egui_winit,
            egui_renderer,
        })
    }

    fn redraw(&mut self) {
        self.state.update();

        let Some(gpu) = &mut self.gpu else {
            return;
        };

        let output = match gpu.ctx.surface.get_current_texture() {
            Ok(t) => t,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                gpu.ctx.reconfigure();
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

        let device = &gpu.ctx.device;
        let queue = &gpu.ctx.queue;
        gpu.renderer
            .render(device, queue, &view, &self.state.camera, &self.state.scene);

        let raw_input = gpu.egui_winit.take_egui_input(&gpu.window);
        let state = &mut self.state;
        let full_output = self.egui_ctx.run(raw_input, |ctx| {
            state.draw_ui(ctx);
        });
        gpu.egui_winit
            .handle_platform_output(&gpu.window, full_output.platform_output);

        let paint_jobs = self
            .egui_ctx
            .tessellate(full_output.shapes, full_output.pixels_per_point);
        let screen_descriptor = egui_wgpu::ScreenDescriptor {
            size_in_pixels: [gpu.ctx.config.width, gpu.ctx.config.height],
            pixels_per_point: full_output.pixels_per_point,
        };

        for (id, image_delta) in &full_output.textures_delta.set {
            gpu.egui_renderer
                .update_texture(device, queue, *id, image_delta);
        }
        let mut encoder = device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("egui_encoder"),
        });
        gpu.egui_renderer.update_buffers(
            device,
            queue,
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
        queue.submit(std::iter::once(encoder.finish()));
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
            let response = gpu.egui_winit.on_window_event(&gpu.window, &event);
            if response.consumed {
                return;
            }
        }

        match event {
            WindowEvent::CloseRequested => {
                event_loop.exit();
            }
            WindowEvent::Resized(new_size) => {
                if let Some(gpu) = &mut self.gpu {
                    gpu.ctx.resize(new_size.width, new_size.height);
                    let (w, h) = (gpu.ctx.config.width, gpu.ctx.config.height);
                    gpu.renderer.resize(&gpu.ctx.device, w, h);
                    self.state.camera.resize(w, h);
                }
            }
            WindowEvent::CursorMoved { position, .. } => {
                if let Some(gpu) = &self.gpu {
                    self.state.pointer = Pointer::from_cursor(
                        position.x,
                        position.y,
                        gpu.ctx.config.width,
                        gpu.ctx.config.height,
                    );
                }
            }
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        physical_key: PhysicalKey::Code(key),
                        state: ElementState::Pressed,
                        repeat: false,
                        ..
                    },
                ..
            } => {
                self.state.apply(key_action(key));
                if self.state.quit {
                    event_loop.exit();
                }
            }
            WindowEvent::RedrawRequested => {
                self.redraw();
                if self.state.quit {
                    event_loop.exit();
                }
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

    tracing::info!("campfire-desktop starting");

    let config = match &cli.config {
        Some(path) => SceneConfig::load(path)?,
        None => SceneConfig::default(),
    };
    let rng = match cli.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    };

    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = GpuApp::new(AppState::new(config, rng));
    event_loop.run_app(&mut app)?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state() -> AppState {
        AppState::new(SceneConfig::default(), StdRng::seed_from_u64(5))
    }

    #[test]
    fn keys_map_to_actions() {
        assert_eq!(key_action(KeyCode::F1), Action::TogglePanel);
        assert_eq!(key_action(KeyCode::Space), Action::TogglePause);
        assert_eq!(key_action(KeyCode::KeyR), Action::ReseedFire);
        assert_eq!(key_action(KeyCode::Escape), Action::Quit);
        assert_eq!(key_action(KeyCode::KeyQ), Action::Noop);
    }

    #[test]
    fn pause_freezes_the_scene() {
        let mut s = state();
        s.update();
        assert_eq!(s.scene.frame(), 1);
        s.apply(Action::TogglePause);
        s.update();
        assert_eq!(s.scene.frame(), 1);
        s.apply(Action::TogglePause);
        assert!(!s.paused());
        s.update();
        assert_eq!(s.scene.frame(), 2);
    }

    #[test]
    fn reset_restores_initial_fire() {
        let mut s = state();
        s.scene.campfire.material.set_params(FireParams {
            magnitude: 4.0,
            ..FireParams::default()
        });
        s.apply(Action::ResetFire);
        assert_eq!(*s.scene.campfire.material.params(), s.initial_fire);
    }

    #[test]
    fn reseed_changes_seed_only() {
        let mut s = state();
        let params = *s.scene.campfire.material.params();
        let before = s.scene.campfire.material.seed();
        let mut changed = false;
        for _ in 0..8 {
            s.apply(Action::ReseedFire);
            changed |= s.scene.campfire.material.seed() != before;
        }
        assert!(changed);
        assert_eq!(*s.scene.campfire.material.params(), params);
    }

    #[test]
    fn toggles() {
        let mut s = state();
        s.apply(Action::TogglePanel);
        assert!(!s.show_panel);
        s.apply(Action::Quit);
        assert!(s.quit);
    }
}
