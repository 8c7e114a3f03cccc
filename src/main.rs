use anyhow::Result;
use clap::Parser;
use serde::Serialize;
use std::sync::Arc;
use winit::{
    application::ApplicationHandler,
    event::*,
    event_loop::{ActiveEventLoop, EventLoop},
    keyboard::{KeyCode, PhysicalKey},
    window::{Window as WinitWindow, WindowId},
};

use fridge_farm::camera::{CameraSettings, OrbitCamera};
use fridge_farm::cli::Cli;
use fridge_farm::core::{GpuContext, WinitController};
use fridge_farm::farm::{layout, HelixParams, PodPlacement, DEFAULT_POD_COUNT, DEFAULT_TURNS};
use fridge_farm::frame::{FpsCounter, FrameClock};
use fridge_farm::interaction::{InteractionController, ScaleFactor};
use fridge_farm::overlay::{Overlay, OverlayStatus, UiAction};
use fridge_farm::renderer::MeshRenderer;
use fridge_farm::scenes::{FridgeDimensions, FridgeScene};
use fridge_farm::types::Lighting;
use fridge_farm::window::Window;

/// Everything that only exists while there is a window
struct Graphics {
    window: Window,
    gpu: GpuContext,
    renderer: MeshRenderer,
    overlay: Option<Overlay>,
}

struct App {
    cli: Cli,
    scene: FridgeScene,
    interaction: InteractionController,
    camera: OrbitCamera,
    input: WinitController,
    clock: FrameClock,
    fps: FpsCounter,
    graphics: Option<Graphics>,
}

impl App {
    fn new(cli: Cli) -> Result<Self> {
        let dims = FridgeDimensions::default();
        let scene = FridgeScene::build(dims, DEFAULT_TURNS, DEFAULT_POD_COUNT)?;
        let interaction = InteractionController::new(scene.door_pivot(), scene.fridge_root(), dims.height);
        let camera = OrbitCamera::new(CameraSettings::default(), cli.width as f32 / cli.height as f32);

        Ok(Self {
            cli,
            scene,
            interaction,
            camera,
            input: WinitController::new(),
            clock: FrameClock::new(),
            fps: FpsCounter::default(),
            graphics: None,
        })
    }

    fn create_graphics(&self, event_loop: &ActiveEventLoop) -> Result<Graphics> {
        let window = Arc::new(
            event_loop.create_window(
                WinitWindow::default_attributes()
                    .with_title("Fridge Farm")
                    .with_inner_size(winit::dpi::LogicalSize::new(self.cli.width, self.cli.height)),
            )?,
        );
        let gpu = pollster::block_on(GpuContext::new(window.clone()))?;
        let renderer = MeshRenderer::new(&gpu, Lighting::default());
        let overlay = (!self.cli.no_ui).then(|| Overlay::new(&window, &gpu));
        Ok(Graphics {
            window: Window::new(window),
            gpu,
            renderer,
            overlay,
        })
    }

    fn resize(&mut self, width: u32, height: u32) {
        let Some(graphics) = self.graphics.as_mut() else {
            return;
        };
        if graphics.gpu.resize(width, height) {
            graphics.renderer.resize(&graphics.gpu);
            self.camera.set_viewport(width, height);
        }
    }

    fn redraw(&mut self, event_loop: &ActiveEventLoop) {
        let frame = self.clock.tick();
        if let Some(fps) = self.fps.record(frame.delta) {
            log::debug!("FPS: {:.1}", fps);
        }

        if let Err(e) = self.interaction.update(&mut self.scene.graph, frame.delta) {
            log::error!("Door update failed: {:#}", e);
        }

        let Some(graphics) = self.graphics.as_mut() else {
            return;
        };
        let pointer_on_panel = graphics.overlay.as_ref().is_some_and(Overlay::wants_pointer);
        if !pointer_on_panel {
            let (_, height) = graphics.gpu.size();
            self.camera.handle_input(&self.input, height as f32, frame.delta);
        }
        self.input.reset_deltas();
        self.camera.update();

        let status = OverlayStatus {
            fps: self.fps.fps(),
            door: self.interaction.door(),
            pods: self.scene.helix_params().pod_count,
            nodes: self.scene.graph.len(),
        };
        let actions = match graphics.window.draw(
            &graphics.gpu,
            &mut graphics.renderer,
            graphics.overlay.as_mut(),
            &self.scene,
            &self.camera,
            &status,
        ) {
            Ok(actions) => actions,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                log::warn!("Surface lost, reconfiguring");
                graphics.gpu.reconfigure();
                Vec::new()
            }
            Err(wgpu::SurfaceError::OutOfMemory) => {
                log::error!("Out of GPU memory");
                event_loop.exit();
                return;
            }
            Err(e) => {
                log::warn!("Frame skipped: {}", e);
                Vec::new()
            }
        };

        for action in actions {
            self.apply(action);
        }
    }

    fn apply(&mut self, action: UiAction) {
        match action {
            UiAction::ToggleDoor => {
                self.interaction.toggle_door();
            }
            UiAction::SetScale(value) => {
                let applied = ScaleFactor::new(value)
                    .and_then(|scale| self.interaction.set_scale(&mut self.scene.graph, scale));
                if let Err(e) = applied {
                    log::warn!("Scale {} rejected: {:#}", value, e);
                }
            }
        }
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.graphics.is_some() {
            return;
        }
        match self.create_graphics(event_loop) {
            Ok(graphics) => {
                let size = graphics.window.inner_size();
                self.camera.set_viewport(size.width, size.height);
                self.graphics = Some(graphics);
            }
            Err(e) => {
                log::error!("Failed to initialize graphics: {:#}", e);
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
        // Let egui handle the event first
        if let Some(graphics) = self.graphics.as_mut() {
            if let Some(overlay) = graphics.overlay.as_mut() {
                if overlay.handle_event(graphics.window.inner(), &event) {
                    // A drag that ends over the panel must still let go
                    if is_release(&event) {
                        self.input.process_event(&event);
                    }
                    return;
                }
            }
        }
        self.input.process_event(&event);

        match event {
            WindowEvent::CloseRequested
            | WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        state: ElementState::Pressed,
                        physical_key: PhysicalKey::Code(KeyCode::Escape),
                        ..
                    },
                ..
            } => event_loop.exit(),
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        state: ElementState::Pressed,
                        physical_key: PhysicalKey::Code(KeyCode::Space),
                        repeat: false,
                        ..
                    },
                ..
            } => {
                self.interaction.toggle_door();
            }
            WindowEvent::Resized(size) => self.resize(size.width, size.height),
            WindowEvent::RedrawRequested => self.redraw(event_loop),
            _ => {}
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(graphics) = &self.graphics {
            graphics.window.request_redraw();
        }
    }
}

fn is_release(event: &WindowEvent) -> bool {
    matches!(
        event,
        WindowEvent::MouseInput {
            state: ElementState::Released,
            ..
        } | WindowEvent::KeyboardInput {
            event: KeyEvent {
                state: ElementState::Released,
                ..
            },
            ..
        }
    )
}

#[derive(Serialize)]
struct LayoutReport {
    helix: HelixParams,
    pods: Vec<PodPlacement>,
}

fn print_layout() -> Result<()> {
    let helix = FridgeDimensions::default().helix_params(DEFAULT_TURNS, DEFAULT_POD_COUNT)?;
    let pods = layout(&helix.curve(), helix.pod_count, helix.pole_center());
    println!("{}", serde_json::to_string_pretty(&LayoutReport { helix, pods })?);
    Ok(())
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    if cli.print_layout {
        return print_layout();
    }

    let event_loop = EventLoop::new()?;
    let mut app = App::new(cli)?;

    log::info!("Fridge Farm - Controls: drag or arrows/WASD to orbit, wheel to zoom, Space door, Escape quit");
    event_loop.run_app(&mut app)?;

    Ok(())
}
