//! The contract between the hosting surface and a renderer.

/// Builds a renderer once a fresh graphics context is available.
///
/// This is the surface-created event: every GPU resource the renderer will
/// use during its lifetime is created here. When the context is lost the old
/// renderer is dropped and a new one is built from a fresh builder.
pub trait RendererBuilder {
    type Renderer: Renderer;

    fn build(
        self,
        adapter: &wgpu::Adapter,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        surface: &wgpu::SurfaceConfiguration,
    ) -> Self::Renderer;
}

pub trait Renderer {
    /// Surface-dimension change; `surface` carries the new extent.
    fn resize(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        surface: &wgpu::SurfaceConfiguration,
    );

    /// Draws one frame into `texture_view`. Runs to completion before the
    /// next invocation; the host serializes all callbacks.
    fn render(
        &mut self,
        texture_view: &wgpu::TextureView,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
    );
}
