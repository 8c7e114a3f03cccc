use winit::event::WindowEvent;
use winit::window::Window;

use crate::core::GpuContext;
use crate::interaction::{DoorState, SCALE_RANGE};

/// What the panel shows each frame
#[derive(Debug, Clone, Copy)]
pub struct OverlayStatus {
    pub fps: f32,
    pub door: DoorState,
    pub pods: usize,
    pub nodes: usize,
}

/// Requests raised by the panel widgets
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum UiAction {
    ToggleDoor,
    SetScale(f32),
}

/// Controls panel: door button, scale slider, status lines
pub fn show_panel(ctx: &egui::Context, status: &OverlayStatus, scale_value: &mut f32) -> Vec<UiAction> {
    let mut actions = Vec::new();
    egui::Window::new("Fridge Farm")
        .resizable(false)
        .collapsible(true)
        .default_pos(egui::pos2(10.0, 10.0))
        .show(ctx, |ui| {
            if ui
                .add_enabled(status.door.is_stable(), egui::Button::new("Toggle Door"))
                .clicked()
            {
                actions.push(UiAction::ToggleDoor);
            }

            let slider = egui::Slider::new(scale_value, SCALE_RANGE)
                .text("Scale")
                .step_by(0.01);
            if ui.add(slider).changed() {
                actions.push(UiAction::SetScale(*scale_value));
            }

            ui.separator();
            ui.label(
                egui::RichText::new(format!("{:.0} FPS", status.fps))
                    .color(egui::Color32::from_rgb(74, 158, 255)),
            );
            ui.label(format!("Door: {}", status.door));
            ui.label(format!("Pods: {}", status.pods));
            ui.label(format!("Nodes: {}", status.nodes));
        });
    actions
}

/// egui context, winit glue and wgpu painter for the panel
pub struct Overlay {
    ctx: egui::Context,
    state: egui_winit::State,
    renderer: egui_wgpu::Renderer,
    scale_value: f32,
}

impl Overlay {
    pub fn new(window: &Window, gpu: &GpuContext) -> Self {
        let ctx = egui::Context::default();
        let state = egui_winit::State::new(
            ctx.clone(),
            egui::ViewportId::ROOT,
            window,
            Some(window.scale_factor() as f32),
            None,
            None,
        );
        let renderer = egui_wgpu::Renderer::new(
            gpu.device(),
            gpu.surface_format(),
            egui_wgpu::RendererOptions::default(),
        );
        Self {
            ctx,
            state,
            renderer,
            scale_value: 1.0,
        }
    }

    /// Feed a window event to egui, true when egui consumed it
    pub fn handle_event(&mut self, window: &Window, event: &WindowEvent) -> bool {
        self.state.on_window_event(window, event).consumed
    }

    /// Whether the pointer is over a panel, so drags there do not orbit
    pub fn wants_pointer(&self) -> bool {
        self.ctx.wants_pointer_input()
    }

    /// Run the panel and record its pass on top of `view`
    pub fn render(
        &mut self,
        gpu: &GpuContext,
        encoder: &mut wgpu::CommandEncoder,
        view: &wgpu::TextureView,
        window: &Window,
        status: &OverlayStatus,
    ) -> Vec<UiAction> {
        let raw_input = self.state.take_egui_input(window);
        let mut actions = Vec::new();
        let scale_value = &mut self.scale_value;
        let full_output = self.ctx.run(raw_input, |ctx| {
            actions = show_panel(ctx, status, scale_value);
        });

        self.state
            .handle_platform_output(window, full_output.platform_output);

        let tris = self
            .ctx
            .tessellate(full_output.shapes, self.ctx.pixels_per_point());
        for (id, image_delta) in &full_output.textures_delta.set {
            self.renderer
                .update_texture(gpu.device(), gpu.queue(), *id, image_delta);
        }

        let (width, height) = gpu.size();
        let screen_descriptor = egui_wgpu::ScreenDescriptor {
            size_in_pixels: [width, height],
            pixels_per_point: window.scale_factor() as f32,
        };
        self.renderer.update_buffers(
            gpu.device(),
            gpu.queue(),
            encoder,
            &tris,
            &screen_descriptor,
        );

        {
            let mut pass = encoder
                .begin_render_pass(&wgpu::RenderPassDescriptor {
                    label: Some("egui Pass"),
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
                    occlusion_query_set: None,
                    timestamp_writes: None,
                })
                .forget_lifetime();
            self.renderer.render(&mut pass, &tris, &screen_descriptor);
        }

        for id in &full_output.textures_delta.free {
            self.renderer.free_texture(id);
        }
        actions
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn status() -> OverlayStatus {
        OverlayStatus {
            fps: 60.0,
            door: DoorState::Closed,
            pods: 20,
            nodes: 80,
        }
    }

    #[test]
    fn test_panel_without_input_raises_nothing() {
        let ctx = egui::Context::default();
        let mut scale = 1.0;
        let mut actions = Vec::new();
        let _ = ctx.run(egui::RawInput::default(), |ctx| {
            actions = show_panel(ctx, &status(), &mut scale);
        });
        assert!(actions.is_empty());
        assert_eq!(scale, 1.0);
    }
}
