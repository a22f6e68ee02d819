use crate::device::{ComputePassEncoder, GraphicsDevice, RenderPassEncoder};
use crate::error::RenderError;
use crate::shader::ShaderLoader;

use super::ObjectLabel;

/// Borrowed collaborators available to a drawable while it initializes.
pub struct InitCtx<'a, D: GraphicsDevice> {
    pub device: &'a D,
    /// Format of the output surface; render pipelines must target it.
    pub color_format: wgpu::TextureFormat,
    pub shaders: &'a dyn ShaderLoader,
}

/// Per-frame capability of a registered drawable.
///
/// The renderer drives every drawable uniformly: `update_geometry`, then `render`
/// inside the frame's render pass, then `compute` inside its compute pass.
pub trait Drawable<D: GraphicsDevice> {
    fn label(&self) -> &ObjectLabel;

    /// CPU-side per-frame mutation. Must not submit GPU work.
    fn update_geometry(&mut self) {}

    /// Binds pipeline + vertex buffer and issues the draw call.
    fn render(&self, pass: &mut dyn RenderPassEncoder<D>);

    fn compute(&self, pass: &mut dyn ComputePassEncoder<D>) {
        let _ = pass;
    }
}

/// Initialization protocol run by [`Renderer::append_drawable`](crate::render::Renderer::append_drawable).
///
/// Steps run in declaration order and each may rely on the state produced by the
/// previous one. Geometry, shaders and the render pipeline are mandatory; compute is
/// optional.
#[allow(async_fn_in_trait)]
pub trait DrawableInit<D: GraphicsDevice>: Drawable<D> {
    /// Uploads vertex data and defines the vertex layout.
    async fn create_geometry(&mut self, ctx: &InitCtx<'_, D>) -> Result<(), RenderError>;

    /// Loads shader source through `ctx.shaders` and compiles it.
    async fn create_shaders(&mut self, ctx: &InitCtx<'_, D>) -> Result<(), RenderError>;

    async fn create_render_pipeline(&mut self, ctx: &InitCtx<'_, D>) -> Result<(), RenderError>;

    async fn create_compute_pipeline(&mut self, ctx: &InitCtx<'_, D>) -> Result<(), RenderError> {
        let _ = ctx;
        Ok(())
    }
}

/// Runs the full protocol, stopping at the first failing step.
///
/// Resources created by completed steps are kept by the drawable and released when
/// it is dropped.
pub async fn initialize<D, T>(drawable: &mut T, ctx: &InitCtx<'_, D>) -> Result<(), RenderError>
where
    D: GraphicsDevice,
    T: DrawableInit<D>,
{
    drawable.create_geometry(ctx).await?;
    drawable.create_shaders(ctx).await?;
    drawable.create_render_pipeline(ctx).await?;
    drawable.create_compute_pipeline(ctx).await?;
    log::trace!("{} initialized", drawable.label());
    Ok(())
}

/// Fetches `id` through the loader and compiles it, labelled after `label`.
///
/// Shared `create_shaders` body for drawables with a single WGSL module.
pub async fn load_shader_module<D: GraphicsDevice>(
    ctx: &InitCtx<'_, D>,
    label: &ObjectLabel,
    id: &str,
) -> Result<D::ShaderModule, RenderError> {
    let source = ctx
        .shaders
        .load(id)
        .await
        .map_err(|source| RenderError::ShaderLoadFailed {
            label: label.to_string(),
            source,
        })?;

    ctx.device
        .create_shader_module(&label.resource("Shader"), &source)
        .await
}
