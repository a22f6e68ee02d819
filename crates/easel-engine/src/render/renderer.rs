use crate::color::Color;
use crate::device::{Acquired, CommandRecorder, DeviceProvider, GraphicsDevice};
use crate::diagnostics::PlatformInfo;
use crate::error::RenderError;
use crate::scene::{initialize, DrawableInit, InitCtx, ObjectCounter, ObjectLabel, SceneGraph};
use crate::shader::ShaderLoader;
use crate::surface::{SurfaceFrame, SurfaceManager, SurfaceMetrics, SurfaceTarget};

/// Renderer configuration.
#[derive(Debug, Clone)]
pub struct RendererConfig {
    /// Color every frame's render pass clears to.
    pub clear_color: Color,
}

impl Default for RendererConfig {
    fn default() -> Self {
        Self {
            clear_color: Color::new(0.0, 56.0 / 255.0, 101.0 / 255.0, 1.0),
        }
    }
}

/// Owns the device, the output surface and the scene, and drives frames.
///
/// Frame protocol (see [`render_frame`](Self::render_frame)):
/// 1) `update_geometry` on every drawable
/// 2) one render pass: clear, then `render` on every drawable
/// 3) one compute pass: `compute` on every drawable
/// 4) exactly one submission
///
/// Drawables are always visited in insertion order.
pub struct Renderer<D: GraphicsDevice, S: SurfaceTarget<D>> {
    device: D,
    surface: SurfaceManager<S>,
    format: wgpu::TextureFormat,

    scene: SceneGraph<D>,
    labels: ObjectCounter,
    shaders: Box<dyn ShaderLoader>,

    clear_color: Color,
    platform: PlatformInfo,
    frames: u64,
}

impl<D, S> Renderer<D, S>
where
    D: GraphicsDevice,
    S: SurfaceTarget<D>,
{
    /// Acquires the device, configures the surface and renders the first frame.
    ///
    /// A first frame the surface cannot provide (non-fatal surface error) is
    /// skipped; the renderer is still returned.
    pub async fn initialize<P>(
        provider: P,
        config: RendererConfig,
        metrics: SurfaceMetrics,
        shaders: Box<dyn ShaderLoader>,
    ) -> Result<Self, RenderError>
    where
        P: DeviceProvider<Device = D, Surface = S>,
    {
        let Acquired {
            device,
            surface,
            preferred_format,
            platform,
        } = provider.acquire().await?;

        log::info!("GPU acquired: {platform}");

        let mut surface = SurfaceManager::new(surface, metrics);
        surface.configure(&device, preferred_format);
        log::debug!(
            "surface configured: {preferred_format:?} at {}x{}",
            surface.backing_size().width,
            surface.backing_size().height
        );

        if !config.clear_color.is_finite() {
            log::warn!("clear color {:?} is not finite; clamping", config.clear_color);
        }

        let mut renderer = Self {
            device,
            surface,
            format: preferred_format,
            scene: SceneGraph::new(),
            labels: ObjectCounter::new(),
            shaders,
            clear_color: config.clear_color.clamped(),
            platform,
            frames: 0,
        };

        if renderer.surface.is_renderable() {
            match renderer.render() {
                Ok(()) => {}
                Err(e) if !e.is_fatal() => log::warn!("first frame skipped: {e}"),
                Err(e) => return Err(e),
            }
        }

        Ok(renderer)
    }

    /// Allocates the next creation-order label for a drawable of `kind`.
    pub fn next_label(&mut self, kind: &'static str) -> ObjectLabel {
        self.labels.allocate(kind)
    }

    /// Runs the drawable's initialization protocol and registers it on success.
    ///
    /// On failure the drawable is dropped and the scene is left unchanged.
    pub async fn append_drawable<T>(&mut self, mut drawable: T) -> Result<ObjectLabel, RenderError>
    where
        T: DrawableInit<D> + 'static,
    {
        let ctx = InitCtx {
            device: &self.device,
            color_format: self.format,
            shaders: self.shaders.as_ref(),
        };

        if let Err(e) = initialize(&mut drawable, &ctx).await {
            log::warn!("{} rejected: {e}", drawable.label());
            return Err(e);
        }

        let label = drawable.label().clone();
        self.scene.push(Box::new(drawable));
        log::info!("{label} registered ({} drawables)", self.scene.len());

        Ok(label)
    }

    /// Records and submits one frame into `view`.
    pub fn render_frame(&mut self, view: &D::TextureView) {
        self.scene.update_all();

        let mut encoder = self.device.create_command_encoder("Frame Encoder");

        {
            let mut pass = encoder.begin_render_pass("Render Pass", view, self.clear_color);
            for obj in self.scene.iter() {
                obj.render(&mut pass);
            }
        }

        {
            let mut pass = encoder.begin_compute_pass("Compute Pass");
            for obj in self.scene.iter() {
                obj.compute(&mut pass);
            }
        }

        self.device.submit(encoder);
        self.frames += 1;

        log::trace!("frame {} submitted ({} drawables)", self.frames, self.scene.len());
    }

    /// Acquires the current surface frame, renders into it and presents it.
    pub fn render(&mut self) -> Result<(), RenderError> {
        let frame = self.surface.acquire(&self.device)?;
        self.render_frame(frame.view());
        frame.present();
        Ok(())
    }

    /// Resizes the surface and renders once at the new size.
    ///
    /// Nothing is rendered while the backing store has zero area.
    pub fn resize(&mut self, metrics: SurfaceMetrics) -> Result<(), RenderError> {
        if !self.surface.resize(&self.device, metrics) {
            log::debug!("surface not renderable after resize; skipping frame");
            return Ok(());
        }
        self.render()
    }

    #[inline]
    pub fn device(&self) -> &D {
        &self.device
    }

    #[inline]
    pub fn scene(&self) -> &SceneGraph<D> {
        &self.scene
    }

    #[inline]
    pub fn surface(&self) -> &SurfaceManager<S> {
        &self.surface
    }

    /// Color format render pipelines must target.
    #[inline]
    pub fn format(&self) -> wgpu::TextureFormat {
        self.format
    }

    #[inline]
    pub fn clear_color(&self) -> Color {
        self.clear_color
    }

    #[inline]
    pub fn platform(&self) -> &PlatformInfo {
        &self.platform
    }

    /// Number of frames submitted so far.
    #[inline]
    pub fn frames(&self) -> u64 {
        self.frames
    }
}
