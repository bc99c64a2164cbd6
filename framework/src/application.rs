use crate::{render_surface::RenderSurface, renderer};
use log::{debug, info, trace};
use std::{
    sync::Arc,
    time::{Duration, Instant},
};
use winit::{
    application::ApplicationHandler,
    event::{KeyEvent, WindowEvent},
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    keyboard::{Key, NamedKey},
    window::{WindowAttributes, WindowId},
};

/// Drives the main window and forwards its lifecycle to the renderer.
pub struct Application<Builder: renderer::RendererBuilder> {
    title: String,
    renderer_builder: Option<Builder>,
    surface: Option<RenderSurface<Builder::Renderer>>,
    frame_counter: u32,
    frame_time: Instant,
}

impl<Builder: renderer::RendererBuilder> Application<Builder> {
    #[must_use]
    pub fn new(title: String, renderer_builder: Builder) -> Self {
        Self {
            title,
            renderer_builder: Some(renderer_builder),
            surface: None,
            frame_counter: 0,
            frame_time: Instant::now(),
        }
    }

    /// Opens the main window and runs the event loop until it is closed.
    pub fn run(mut self) -> Result<(), winit::error::EventLoopError> {
        let event_loop = EventLoop::new()?;
        // continuously run the event loop, even if the OS hasn't dispatched
        // any events; this is ideal for games and similar applications
        event_loop.set_control_flow(ControlFlow::Poll);

        info!("entering window event loop");
        event_loop.run_app(&mut self)
    }

    fn update_fps(&mut self) {
        self.frame_counter += 1;
        let span = self.frame_time.elapsed();
        if span >= Duration::from_secs(1) {
            debug!(
                "{} fps",
                (f64::from(self.frame_counter) / span.as_secs_f64()).round()
            );
            self.frame_counter = 0;
            self.frame_time += span;
        }
    }
}

impl<Builder: renderer::RendererBuilder> ApplicationHandler for Application<Builder> {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        // first-time init of the surface and the scene behind it
        if self.surface.is_some() {
            return;
        }

        let attributes = WindowAttributes::default().with_title(&self.title);
        let window = Arc::new(event_loop.create_window(attributes).unwrap());

        let builder = self.renderer_builder.take().unwrap();
        self.surface
            .replace(pollster::block_on(RenderSurface::new(window, builder)));
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        match event {
            WindowEvent::Resized(size) => {
                trace!("WindowEvent::Resized({size:?})");
                if let Some(surface) = self.surface.as_mut() {
                    surface.resize(size);
                }
            }

            WindowEvent::CloseRequested => {
                trace!("WindowEvent::CloseRequested");
                event_loop.exit();
            }

            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        logical_key: Key::Named(NamedKey::Escape),
                        ..
                    },
                ..
            } => {
                info!("escape pressed; shutting down the event loop");
                event_loop.exit();
            }

            WindowEvent::RedrawRequested => {
                // on macOS a redraw can be requested before the surface exists;
                // drop it on the floor in that case
                let Some(surface) = self.surface.as_mut() else {
                    return;
                };
                surface.redraw();
                self.update_fps();
            }

            _ => {}
        }
    }

    fn suspended(&mut self, _event_loop: &ActiveEventLoop) {
        trace!("window event loop was suspended");
    }

    fn exiting(&mut self, _event_loop: &ActiveEventLoop) {
        trace!("window event loop is exiting");
    }
}
