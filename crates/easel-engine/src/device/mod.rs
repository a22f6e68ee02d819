//! GPU device abstraction.
//!
//! The orchestration layer only talks to the GPU through the traits in this module:
//! - [`GraphicsDevice`] creates buffers, shader modules and pipelines, and submits
//!   finished command streams to its queue
//! - [`CommandRecorder`] is one command-recording session; it opens render and
//!   compute pass sections
//! - [`RenderPassEncoder`] / [`ComputePassEncoder`] record draws and dispatches
//!
//! Pass sections end when the returned pass value is dropped.
//!
//! The production implementation wraps `wgpu` (see [`WgpuDevice`]).

use std::ops::Range;

use crate::color::Color;
use crate::error::RenderError;

mod init;
mod layout;
mod provider;
mod wgpu_backend;

#[cfg(test)]
pub(crate) mod testing;

pub use init::GpuInit;
pub use layout::VertexLayout;
pub use provider::{Acquired, DeviceProvider};
pub use wgpu_backend::{WgpuDevice, WgpuProvider, WindowFrame, WindowSurface};

pub(crate) use layout::{check_shader_source, check_vertex_data};

/// Resource creation and command submission.
///
/// Handles are associated types so that drawables stay backend-agnostic.
/// Creation methods fail with [`RenderError::PipelineCreationFailed`] both for
/// descriptions rejected by the CPU-side checks and for those the device itself
/// rejects; they are async because device validation reports asynchronously.
#[allow(async_fn_in_trait)]
pub trait GraphicsDevice {
    type Buffer;
    type ShaderModule;
    type RenderPipeline;
    type ComputePipeline;
    type TextureView;
    type Encoder: CommandRecorder<Self>;

    /// Creates a vertex buffer initialized with `contents`.
    async fn create_vertex_buffer(&self, label: &str, contents: &[u8])
        -> Result<Self::Buffer, RenderError>;

    /// Compiles WGSL `source` into a shader module.
    async fn create_shader_module(&self, label: &str, source: &str)
        -> Result<Self::ShaderModule, RenderError>;

    async fn create_render_pipeline(
        &self,
        desc: &RenderPipelineDesc<'_, Self>,
    ) -> Result<Self::RenderPipeline, RenderError>;

    async fn create_compute_pipeline(
        &self,
        desc: &ComputePipelineDesc<'_, Self>,
    ) -> Result<Self::ComputePipeline, RenderError>;

    /// Opens a new command-recording session.
    fn create_command_encoder(&self, label: &str) -> Self::Encoder;

    /// Finishes `encoder` and submits it to the queue.
    fn submit(&self, encoder: Self::Encoder);
}

/// A single command-recording session.
pub trait CommandRecorder<D: GraphicsDevice + ?Sized> {
    type RenderPass<'a>: RenderPassEncoder<D>
    where
        Self: 'a;
    type ComputePass<'a>: ComputePassEncoder<D>
    where
        Self: 'a;

    /// Opens a render pass that clears `target` to `clear` and stores the result.
    fn begin_render_pass<'a>(
        &'a mut self,
        label: &str,
        target: &D::TextureView,
        clear: Color,
    ) -> Self::RenderPass<'a>;

    fn begin_compute_pass<'a>(&'a mut self, label: &str) -> Self::ComputePass<'a>;
}

/// Draw-only recording context.
pub trait RenderPassEncoder<D: GraphicsDevice + ?Sized> {
    fn set_pipeline(&mut self, pipeline: &D::RenderPipeline);
    fn set_vertex_buffer(&mut self, slot: u32, buffer: &D::Buffer);
    fn draw(&mut self, vertices: Range<u32>, instances: Range<u32>);
}

/// Dispatch-only recording context.
pub trait ComputePassEncoder<D: GraphicsDevice + ?Sized> {
    fn set_pipeline(&mut self, pipeline: &D::ComputePipeline);
    fn dispatch_workgroups(&mut self, x: u32, y: u32, z: u32);
}

/// Render pipeline description: one vertex buffer layout, one shader module for
/// both stages, one color target.
pub struct RenderPipelineDesc<'a, D: GraphicsDevice + ?Sized> {
    pub label: &'a str,
    pub shader: &'a D::ShaderModule,
    pub vertex_entry: &'a str,
    pub fragment_entry: &'a str,
    pub vertex_layout: &'a VertexLayout,
    pub color_format: wgpu::TextureFormat,
}

impl<D: GraphicsDevice + ?Sized> RenderPipelineDesc<'_, D> {
    pub fn validate(&self) -> Result<(), RenderError> {
        let what = || format!("render pipeline `{}`", self.label);

        if self.vertex_entry.is_empty() || self.fragment_entry.is_empty() {
            return Err(RenderError::pipeline(what(), "missing shader entry point"));
        }
        if self.color_format.is_depth_stencil_format() {
            return Err(RenderError::pipeline(
                what(),
                format!("{:?} is not a color format", self.color_format),
            ));
        }
        self.vertex_layout
            .validate()
            .map_err(|reason| RenderError::pipeline(what(), reason))
    }
}

pub struct ComputePipelineDesc<'a, D: GraphicsDevice + ?Sized> {
    pub label: &'a str,
    pub shader: &'a D::ShaderModule,
    pub entry_point: &'a str,
}

impl<D: GraphicsDevice + ?Sized> ComputePipelineDesc<'_, D> {
    pub fn validate(&self) -> Result<(), RenderError> {
        if self.entry_point.is_empty() {
            return Err(RenderError::pipeline(
                format!("compute pipeline `{}`", self.label),
                "missing shader entry point",
            ));
        }
        Ok(())
    }
}
