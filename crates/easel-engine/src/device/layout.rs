use crate::error::RenderError;

/// wgpu requires vertex strides and offsets to be multiples of 4 bytes.
const VERTEX_ALIGN: u64 = 4;

/// Per-vertex buffer layout: stride plus attribute formats, offsets and shader
/// locations.
#[derive(Debug, Clone, PartialEq)]
pub struct VertexLayout {
    pub array_stride: u64,
    pub attributes: Vec<wgpu::VertexAttribute>,
}

impl VertexLayout {
    pub fn new(array_stride: u64, attributes: impl Into<Vec<wgpu::VertexAttribute>>) -> Self {
        Self {
            array_stride,
            attributes: attributes.into(),
        }
    }

    /// Borrows the layout as a wgpu vertex buffer layout (per-vertex stepping).
    pub fn as_wgpu(&self) -> wgpu::VertexBufferLayout<'_> {
        wgpu::VertexBufferLayout {
            array_stride: self.array_stride,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &self.attributes,
        }
    }

    /// Checks the rules wgpu enforces at pipeline creation.
    pub(crate) fn validate(&self) -> Result<(), String> {
        if self.array_stride == 0 {
            return Err("vertex stride is zero".into());
        }
        if self.array_stride % VERTEX_ALIGN != 0 {
            return Err(format!(
                "vertex stride {} is not a multiple of {VERTEX_ALIGN}",
                self.array_stride
            ));
        }
        if self.attributes.is_empty() {
            return Err("vertex layout has no attributes".into());
        }

        for (i, attr) in self.attributes.iter().enumerate() {
            let end = attr.offset + attr.format.size();
            if attr.offset % VERTEX_ALIGN != 0 {
                return Err(format!(
                    "attribute @location({}) offset {} is misaligned",
                    attr.shader_location, attr.offset
                ));
            }
            if end > self.array_stride {
                return Err(format!(
                    "attribute @location({}) ends at byte {end}, past stride {}",
                    attr.shader_location, self.array_stride
                ));
            }
            if self.attributes[..i]
                .iter()
                .any(|a| a.shader_location == attr.shader_location)
            {
                return Err(format!(
                    "duplicate attribute @location({})",
                    attr.shader_location
                ));
            }
        }

        Ok(())
    }
}

pub(crate) fn check_vertex_data(label: &str, contents: &[u8]) -> Result<(), RenderError> {
    if contents.is_empty() {
        return Err(RenderError::pipeline(
            format!("vertex buffer `{label}`"),
            "no vertex data",
        ));
    }
    Ok(())
}

pub(crate) fn check_shader_source(label: &str, source: &str) -> Result<(), RenderError> {
    if source.trim().is_empty() {
        return Err(RenderError::pipeline(
            format!("shader module `{label}`"),
            "empty shader source",
        ));
    }
    Ok(())
}
