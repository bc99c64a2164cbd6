use crate::renderer::{self, RendererBuilder};
use log::{debug, info, trace, warn};
use std::sync::Arc;
use wgpu::PresentMode;
use winit::{dpi::PhysicalSize, window::Window};

/// The window surface backed by properly set up wgpu-managed resources,
/// together with the renderer drawing on it.
pub(crate) struct RenderSurface<Renderer: renderer::Renderer> {
    window: Arc<Window>,
    /// the specific surface of our main window where wgpu draws all content
    surface: wgpu::Surface<'static>,
    /// the current configuration of the shown surface;
    /// this may change over time (e.g. for resizing)
    config: wgpu::SurfaceConfiguration,
    /// the logical device used to render on the surface
    device: wgpu::Device,
    /// the command queue where to schedule the workload
    queue: wgpu::Queue,
    renderer: Renderer,
}

impl<Renderer: renderer::Renderer> RenderSurface<Renderer> {
    pub(crate) async fn new(
        window: Arc<Window>,
        renderer_builder: impl RendererBuilder<Renderer = Renderer>,
    ) -> Self {
        info!("creating new render surface");
        // caution: the window size can be (0, 0) as the resizing seems to occur later on some platforms
        let surface_size = window.inner_size();
        debug!("window size: {surface_size:?}");

        let instance_descriptor = wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..wgpu::InstanceDescriptor::default()
        };
        let instance = wgpu::Instance::new(instance_descriptor);

        debug!("create wgpu surface for window");
        let surface = instance.create_surface(Arc::clone(&window)).unwrap();

        debug!("get an adapter responsible for drawing on the surface");
        let request_adapter_options = wgpu::RequestAdapterOptions {
            power_preference: wgpu::PowerPreference::default(),
            force_fallback_adapter: false,
            compatible_surface: Some(&surface),
        };
        let adapter = instance
            .request_adapter(&request_adapter_options)
            .await
            .expect("no suitable graphics adapter found");

        let adapter_info = adapter.get_info();
        info!("using {} ({:?})", adapter_info.name, adapter_info.backend);

        debug!("get a logical device with queue for the adapter");
        let required_limits =
            wgpu::Limits::downlevel_webgl2_defaults().using_resolution(adapter.limits());
        let device_descriptor = wgpu::DeviceDescriptor {
            label: None,
            required_features: wgpu::Features::empty(),
            required_limits,
            memory_hints: wgpu::MemoryHints::MemoryUsage,
        };
        let (device, queue) = adapter
            .request_device(&device_descriptor, None)
            .await
            .expect("failed to create a logical graphics device");

        debug!("create the start configuration of the surface");
        let mut config = surface
            .get_default_config(&adapter, surface_size.width.max(1), surface_size.height.max(1))
            .expect("surface is not supported by the adapter");
        config.present_mode = PresentMode::AutoVsync;
        surface.configure(&device, &config);

        debug!("create renderer");
        let renderer = renderer_builder.build(&adapter, &device, &queue, &config);

        Self {
            window,
            surface,
            config,
            device,
            queue,
            renderer,
        }
    }

    /// Resizes the surface, making sure not to resize to zero.
    pub(crate) fn resize(&mut self, size: PhysicalSize<u32>) {
        debug!("surface resize {size:?}");
        if size.width == 0 || size.height == 0 {
            trace!("surface would be empty");
            return;
        }

        self.config.width = size.width;
        self.config.height = size.height;
        self.surface.configure(&self.device, &self.config);

        self.renderer.resize(&self.device, &self.queue, &self.config);
        self.window.request_redraw();
    }

    pub(crate) fn redraw(&mut self) {
        let surface_texture = match self.surface.get_current_texture() {
            Ok(frame) => frame,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                // the swapchain belongs to a stale configuration; rebuild it
                // and draw again on the next redraw request
                warn!("surface lost or outdated; reconfiguring");
                self.surface.configure(&self.device, &self.config);
                self.window.request_redraw();
                return;
            }
            Err(error) => panic!("failed to acquire next swap chain texture: {error}"),
        };

        let texture_view = surface_texture
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        self.renderer
            .render(&texture_view, &self.device, &self.queue);

        // make the newly drawn frame visible
        self.window.pre_present_notify();
        surface_texture.present();
        self.window.request_redraw();
    }
}
