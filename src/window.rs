use std::sync::Arc;
use winit::window::Window as WinitWindow;

use crate::camera::OrbitCamera;
use crate::core::GpuContext;
use crate::overlay::{Overlay, OverlayStatus, UiAction};
use crate::renderer::MeshRenderer;
use crate::scenes::FridgeScene;

/// Wrapper around winit Window with imperative draw API
pub struct Window {
    inner: Arc<WinitWindow>,
}

impl Window {
    pub fn new(window: Arc<WinitWindow>) -> Self {
        Self { inner: window }
    }

    pub fn inner(&self) -> &Arc<WinitWindow> {
        &self.inner
    }

    /// Draw one frame: the scene, then the panel when there is one
    ///
    /// Returns the panel's requests for this frame.
    pub fn draw(
        &self,
        gpu: &GpuContext,
        renderer: &mut MeshRenderer,
        overlay: Option<&mut Overlay>,
        scene: &FridgeScene,
        camera: &OrbitCamera,
        status: &OverlayStatus,
    ) -> Result<Vec<UiAction>, wgpu::SurfaceError> {
        let output = gpu.acquire()?;
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());
        let mut encoder = gpu
            .device()
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Frame Encoder"),
            });

        renderer.render(gpu, &mut encoder, &view, &scene.graph, &scene.materials, camera);
        let actions = match overlay {
            Some(overlay) => overlay.render(gpu, &mut encoder, &view, &self.inner, status),
            None => Vec::new(),
        };

        gpu.queue().submit(std::iter::once(encoder.finish()));
        self.inner.pre_present_notify();
        output.present();
        Ok(actions)
    }

    pub fn request_redraw(&self) {
        self.inner.request_redraw();
    }

    pub fn inner_size(&self) -> winit::dpi::PhysicalSize<u32> {
        self.inner.inner_size()
    }
}
