use anyhow::{Context, Result};
use ouroboros::self_referencing;

use winit::application::ApplicationHandler;
use winit::dpi::LogicalSize;
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::window::{Window, WindowId};

use crate::core::{App, AppControl};
use crate::device::{GpuInit, WgpuDevice, WgpuProvider, WindowSurface};
use crate::diagnostics::{report_startup_failure, PlatformInfo};
use crate::error::RenderError;
use crate::render::{Renderer, RendererConfig};
use crate::surface::SurfaceMetrics;

/// Renderer bound to one winit window.
pub type WindowRenderer<'w> = Renderer<WgpuDevice, WindowSurface<'w>>;

/// Window/runtime configuration.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub title: String,
    pub initial_size: LogicalSize<f64>,
    pub renderer: RendererConfig,
    /// Redraw every loop iteration instead of only on demand.
    pub continuous: bool,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            title: "easel".to_string(),
            initial_size: LogicalSize::new(800.0, 600.0),
            renderer: RendererConfig::default(),
            continuous: false,
        }
    }
}

/// Entry point for the runtime.
pub struct Runtime;

impl Runtime {
    /// Runs the event loop until the window closes.
    ///
    /// Returns an error when the renderer failed to start or the loop itself failed.
    pub fn run<A>(config: RuntimeConfig, gpu_init: GpuInit, app: A) -> Result<()>
    where
        A: App + 'static,
    {
        let event_loop = EventLoop::new().context("failed to create winit EventLoop")?;
        let mut state = AppState::new(config, gpu_init, app);

        event_loop
            .run_app(&mut state)
            .context("winit event loop terminated with error")?;

        match state.failure.take() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

#[self_referencing]
struct WindowEntry {
    window: Window,

    #[borrows(window)]
    #[covariant]
    renderer: WindowRenderer<'this>,
}

struct AppState<A>
where
    A: App + 'static,
{
    config: RuntimeConfig,
    gpu_init: GpuInit,
    app: A,

    entry: Option<WindowEntry>,
    started: bool,
    failure: Option<anyhow::Error>,
}

impl<A> AppState<A>
where
    A: App + 'static,
{
    fn new(config: RuntimeConfig, gpu_init: GpuInit, app: A) -> Self {
        Self {
            config,
            gpu_init,
            app,
            entry: None,
            started: false,
            failure: None,
        }
    }

    /// Creates the window, starts the renderer and lets the app register its scene.
    ///
    /// On failure the diagnostics are reported and the window is dropped.
    fn start(&mut self, event_loop: &ActiveEventLoop) -> Result<()> {
        let attrs = Window::default_attributes()
            .with_title(self.config.title.clone())
            .with_inner_size(self.config.initial_size);

        let window = event_loop
            .create_window(attrs)
            .context("failed to create window")?;

        let gpu_init = self.gpu_init.clone();
        let renderer_config = self.config.renderer.clone();
        let shaders = self.app.shader_loader();

        let entry = WindowEntry::try_new(window, |w| {
            let metrics = SurfaceMetrics::of_window(w);
            pollster::block_on(Renderer::initialize(
                WgpuProvider::new(w, gpu_init),
                renderer_config,
                metrics,
                shaders,
            ))
        });

        let mut entry = match entry {
            Ok(entry) => entry,
            Err(err) => {
                report_startup_failure(&PlatformInfo::host(), &err);
                log::info!("window closed after startup failure");
                return Err(err).context("renderer failed to start");
            }
        };

        let app = &mut self.app;
        let setup = entry.with_renderer_mut(|renderer| {
            pollster::block_on(app.setup(renderer))
                .map_err(|err| (renderer.platform().clone(), err))
        });

        if let Err((platform, err)) = setup {
            report_startup_failure(&platform, &err);
            drop(entry);
            log::info!("window closed after startup failure");
            return Err(err).context("scene setup failed");
        }

        entry.with_window(|w| w.request_redraw());
        self.entry = Some(entry);
        Ok(())
    }

    /// Logs a frame error; returns `true` if the runtime must stop.
    fn frame_failed(err: &RenderError) -> bool {
        if err.is_fatal() {
            log::error!("rendering stopped: {err}");
            true
        } else {
            log::debug!("frame skipped: {err}");
            false
        }
    }

    fn exit(&mut self, event_loop: &ActiveEventLoop) {
        self.entry = None;
        event_loop.exit();
    }
}

impl<A> ApplicationHandler for AppState<A>
where
    A: App + 'static,
{
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.started {
            return;
        }
        self.started = true;

        if let Err(e) = self.start(event_loop) {
            self.failure = Some(e);
            self.exit(event_loop);
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        event_loop.set_control_flow(ControlFlow::Wait);

        if self.config.continuous {
            if let Some(entry) = &self.entry {
                entry.with_window(|w| w.request_redraw());
            }
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        window_id: WindowId,
        event: WindowEvent,
    ) {
        // Split borrows to avoid `self` capture inside `ouroboros` closures.
        let (app, entry) = (&mut self.app, &mut self.entry);

        let Some(entry) = entry.as_mut() else {
            return;
        };
        if entry.with_window(|w| w.id()) != window_id {
            return;
        }

        if app.on_window_event(window_id, &event) == AppControl::Exit {
            self.exit(event_loop);
            return;
        }

        let outcome = match &event {
            WindowEvent::CloseRequested => {
                self.exit(event_loop);
                return;
            }

            WindowEvent::Resized(size) => entry.with_mut(|fields| {
                let metrics = SurfaceMetrics::from_physical(*size, fields.window.scale_factor());
                log::debug!(
                    "resize: {}x{} logical @ {}",
                    metrics.logical_width,
                    metrics.logical_height,
                    metrics.pixel_density
                );
                fields.renderer.resize(metrics)
            }),

            // The inner size is not updated yet; winit follows up with `Resized`
            // when the physical size changes.
            WindowEvent::ScaleFactorChanged { scale_factor, .. } => {
                log::debug!("scale factor changed to {scale_factor}");
                Ok(())
            }

            WindowEvent::RedrawRequested => entry.with_mut(|fields| {
                fields.window.pre_present_notify();
                fields.renderer.render()
            }),

            _ => Ok(()),
        };

        if let Err(err) = outcome {
            if Self::frame_failed(&err) {
                self.failure = Some(anyhow::Error::new(err).context("rendering failed"));
                self.exit(event_loop);
            }
        }
    }
}
