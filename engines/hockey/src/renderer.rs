//! Hooks the scene into the windowing framework's surface lifecycle.

use crate::{
    assets::DirectoryStore,
    gpu::{GpuResources, GraphicsApi, WgpuApi},
    scene::SceneRenderer,
};
use log::error;

pub struct RendererBuilder {
    assets: DirectoryStore,
}

impl RendererBuilder {
    #[must_use]
    pub fn new(assets: DirectoryStore) -> Self {
        Self { assets }
    }
}

impl airhockey_framework::renderer::RendererBuilder for RendererBuilder {
    type Renderer = Renderer;

    fn build(
        self,
        _adapter: &wgpu::Adapter,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        surface: &wgpu::SurfaceConfiguration,
    ) -> Self::Renderer {
        let mut resources = GpuResources::new(device, surface.format);

        let mut api = WgpuApi::new(device, queue, &mut resources);
        // a failed scene leaves a renderer that only clears the frame
        let scene = match SceneRenderer::new(&mut api, &self.assets) {
            Ok(mut scene) => {
                scene.surface_changed(&mut api, surface.width, surface.height);
                Some(scene)
            }
            Err(scene_error) => {
                error!("failed to create scene: {scene_error}");
                None
            }
        };

        Renderer { resources, scene }
    }
}

pub struct Renderer {
    resources: GpuResources,
    scene: Option<SceneRenderer>,
}

impl airhockey_framework::renderer::Renderer for Renderer {
    fn resize(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        surface: &wgpu::SurfaceConfiguration,
    ) {
        if let Some(scene) = &mut self.scene {
            let mut api = WgpuApi::new(device, queue, &mut self.resources);
            scene.surface_changed(&mut api, surface.width, surface.height);
        }
    }

    fn render(&mut self, texture_view: &wgpu::TextureView, device: &wgpu::Device, queue: &wgpu::Queue) {
        let mut api = WgpuApi::new(device, queue, &mut self.resources);
        match &mut self.scene {
            Some(scene) => scene.draw_frame(&mut api),
            None => api.clear(),
        }
        api.flush(texture_view);
    }
}
