use bytemuck::{Pod, Zeroable};

use crate::device::{GraphicsDevice, RenderPassEncoder, RenderPipelineDesc, VertexLayout};
use crate::error::RenderError;
use crate::scene::{load_shader_module, Drawable, DrawableInit, InitCtx, ObjectLabel};

pub(crate) const SHADER_ID: &str = "standard2d.wgsl";
pub(crate) const SHADER_SOURCE: &str = include_str!("shaders/standard2d.wgsl");

const VERTEX_ENTRY: &str = "vertexMain";
const FRAGMENT_ENTRY: &str = "fragmentMain";

/// Interleaved vertex: clip-space position + RGB color.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct ColoredVertex {
    pub position: [f32; 2],
    pub color: [f32; 3],
}

impl ColoredVertex {
    const ATTRS: [wgpu::VertexAttribute; 2] = wgpu::vertex_attr_array![
        0 => Float32x2, // position
        1 => Float32x3  // color
    ];

    #[inline]
    pub const fn new(x: f32, y: f32, r: f32, g: f32, b: f32) -> Self {
        Self {
            position: [x, y],
            color: [r, g, b],
        }
    }

    pub fn layout() -> VertexLayout {
        VertexLayout::new(std::mem::size_of::<Self>() as u64, Self::ATTRS)
    }
}

/// Static triangle-list geometry with per-vertex colors and no compute stage.
pub struct Standard2DVertexObject<D: GraphicsDevice> {
    label: ObjectLabel,
    vertices: Vec<ColoredVertex>,
    shader_id: String,

    layout: Option<VertexLayout>,
    vertex_buffer: Option<D::Buffer>,
    shader: Option<D::ShaderModule>,
    render_pipeline: Option<D::RenderPipeline>,
}

impl<D: GraphicsDevice> Standard2DVertexObject<D> {
    /// Type tag used for [`ObjectLabel`]s.
    pub const KIND: &'static str = "Standard2DVertexObject";

    pub fn new(label: ObjectLabel, vertices: impl Into<Vec<ColoredVertex>>) -> Self {
        Self {
            label,
            vertices: vertices.into(),
            shader_id: SHADER_ID.to_owned(),
            layout: None,
            vertex_buffer: None,
            shader: None,
            render_pipeline: None,
        }
    }

    /// Builds from flat `x, y, r, g, b` floats.
    ///
    /// Fails if `data` is not a whole number of vertices.
    pub fn from_interleaved(label: ObjectLabel, data: &[f32]) -> Result<Self, RenderError> {
        let vertices: &[ColoredVertex] = bytemuck::try_cast_slice(data).map_err(|e| {
            RenderError::pipeline(
                label.resource("Vertices"),
                format!("{} floats do not form whole vertices: {e}", data.len()),
            )
        })?;
        Ok(Self::new(label, vertices))
    }

    /// Uses a different shader id; the shader must expose the same entry points.
    pub fn with_shader(mut self, id: impl Into<String>) -> Self {
        self.shader_id = id.into();
        self
    }

    pub fn vertices(&self) -> &[ColoredVertex] {
        &self.vertices
    }

    pub fn vertex_count(&self) -> u32 {
        self.vertices.len() as u32
    }

    /// `true` once the render pipeline exists.
    pub fn is_initialized(&self) -> bool {
        self.render_pipeline.is_some()
    }
}

impl<D: GraphicsDevice> Drawable<D> for Standard2DVertexObject<D> {
    fn label(&self) -> &ObjectLabel {
        &self.label
    }

    fn render(&self, pass: &mut dyn RenderPassEncoder<D>) {
        let (Some(pipeline), Some(vbo)) = (self.render_pipeline.as_ref(), self.vertex_buffer.as_ref())
        else {
            return;
        };

        pass.set_pipeline(pipeline);
        pass.set_vertex_buffer(0, vbo);
        pass.draw(0..self.vertex_count(), 0..1);
    }
}

impl<D: GraphicsDevice> DrawableInit<D> for Standard2DVertexObject<D> {
    async fn create_geometry(&mut self, ctx: &InitCtx<'_, D>) -> Result<(), RenderError> {
        let vbo = ctx.device.create_vertex_buffer(
            &self.label.resource("Vertices"),
            bytemuck::cast_slice(&self.vertices),
        )
        .await?;

        self.vertex_buffer = Some(vbo);
        self.layout = Some(ColoredVertex::layout());
        Ok(())
    }

    async fn create_shaders(&mut self, ctx: &InitCtx<'_, D>) -> Result<(), RenderError> {
        self.shader = Some(load_shader_module(ctx, &self.label, &self.shader_id).await?);
        Ok(())
    }

    async fn create_render_pipeline(&mut self, ctx: &InitCtx<'_, D>) -> Result<(), RenderError> {
        let what = self.label.resource("Render Pipeline");
        let (Some(shader), Some(layout)) = (self.shader.as_ref(), self.layout.as_ref()) else {
            return Err(RenderError::pipeline(what, "geometry and shaders must be created first"));
        };

        let pipeline = ctx.device.create_render_pipeline(&RenderPipelineDesc {
            label: &what,
            shader,
            vertex_entry: VERTEX_ENTRY,
            fragment_entry: FRAGMENT_ENTRY,
            vertex_layout: layout,
            color_format: ctx.color_format,
        })
        .await?;

        self.render_pipeline = Some(pipeline);
        Ok(())
    }
}
