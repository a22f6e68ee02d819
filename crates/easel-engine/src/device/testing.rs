//! Recording device for unit tests.
//!
//! Every resource handle is its label. Every device, pass and surface operation is
//! appended to one shared [`Event`] log so tests can assert on exact ordering.

use std::cell::RefCell;
use std::ops::Range;
use std::rc::Rc;

use winit::dpi::PhysicalSize;

use crate::color::Color;
use crate::diagnostics::PlatformInfo;
use crate::error::RenderError;
use crate::scene::{load_shader_module, Drawable, DrawableInit, InitCtx, ObjectLabel};
use crate::shader::EmbeddedShaderLoader;
use crate::surface::{SurfaceErrorAction, SurfaceFrame, SurfaceTarget};

use super::{
    check_shader_source, check_vertex_data, Acquired, CommandRecorder, ComputePassEncoder,
    ComputePipelineDesc, DeviceProvider, GraphicsDevice, RenderPassEncoder, RenderPipelineDesc,
    VertexLayout, WgpuDevice,
};

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Event {
    CreateBuffer(String),
    CreateShader(String),
    CreateRenderPipeline(String),
    CreateComputePipeline(String),
    Update(String),
    BeginRenderPass { target: String, clear: Color },
    SetRenderPipeline(String),
    SetVertexBuffer(u32, String),
    Draw { pipeline: String, vertices: Range<u32> },
    EndRenderPass,
    BeginComputePass,
    SetComputePipeline(String),
    Dispatch { pipeline: String },
    EndComputePass,
    Submit,
    Configure { format: wgpu::TextureFormat, size: PhysicalSize<u32> },
    Present,
}

pub(crate) type EventLog = Rc<RefCell<Vec<Event>>>;

/// Real wgpu device on the noop backend: full validation, no GPU required.
pub(crate) fn noop_device() -> WgpuDevice {
    let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
        backends: wgpu::Backends::NOOP,
        backend_options: wgpu::BackendOptions {
            noop: wgpu::NoopBackendOptions { enable: true },
            ..Default::default()
        },
        ..Default::default()
    });
    let adapter = pollster::block_on(instance.request_adapter(&wgpu::RequestAdapterOptions::default()))
        .expect("noop adapter");
    let (device, queue) = pollster::block_on(adapter.request_device(&wgpu::DeviceDescriptor::default()))
        .expect("noop device");

    WgpuDevice::new(device, queue)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Handle(pub String);

#[derive(Default)]
pub(crate) struct RecordingDevice {
    log: EventLog,
}

impl RecordingDevice {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn log(&self) -> EventLog {
        Rc::clone(&self.log)
    }

    pub(crate) fn events(&self) -> Vec<Event> {
        self.log.borrow().clone()
    }

    pub(crate) fn clear(&self) {
        self.log.borrow_mut().clear();
    }

    pub(crate) fn view(&self, name: &str) -> Handle {
        Handle(name.to_owned())
    }

    fn push(&self, event: Event) {
        self.log.borrow_mut().push(event);
    }
}

impl GraphicsDevice for RecordingDevice {
    type Buffer = Handle;
    type ShaderModule = Handle;
    type RenderPipeline = Handle;
    type ComputePipeline = Handle;
    type TextureView = Handle;
    type Encoder = RecordingEncoder;

    async fn create_vertex_buffer(&self, label: &str, contents: &[u8]) -> Result<Handle, RenderError> {
        check_vertex_data(label, contents)?;
        self.push(Event::CreateBuffer(label.to_owned()));
        Ok(Handle(label.to_owned()))
    }

    async fn create_shader_module(&self, label: &str, source: &str) -> Result<Handle, RenderError> {
        check_shader_source(label, source)?;
        self.push(Event::CreateShader(label.to_owned()));
        Ok(Handle(label.to_owned()))
    }

    async fn create_render_pipeline(&self, desc: &RenderPipelineDesc<'_, Self>) -> Result<Handle, RenderError> {
        desc.validate()?;
        self.push(Event::CreateRenderPipeline(desc.label.to_owned()));
        Ok(Handle(desc.label.to_owned()))
    }

    async fn create_compute_pipeline(&self, desc: &ComputePipelineDesc<'_, Self>) -> Result<Handle, RenderError> {
        desc.validate()?;
        self.push(Event::CreateComputePipeline(desc.label.to_owned()));
        Ok(Handle(desc.label.to_owned()))
    }

    fn create_command_encoder(&self, _label: &str) -> RecordingEncoder {
        RecordingEncoder::new(self.log())
    }

    fn submit(&self, _encoder: RecordingEncoder) {
        self.push(Event::Submit);
    }
}

pub(crate) struct RecordingEncoder {
    log: EventLog,
}

impl RecordingEncoder {
    pub(crate) fn new(log: EventLog) -> Self {
        Self { log }
    }
}

impl CommandRecorder<RecordingDevice> for RecordingEncoder {
    type RenderPass<'a>
        = RecordingRenderPass<'a>
    where
        Self: 'a;
    type ComputePass<'a>
        = RecordingComputePass<'a>
    where
        Self: 'a;

    fn begin_render_pass<'a>(&'a mut self, _label: &str, target: &Handle, clear: Color) -> RecordingRenderPass<'a> {
        self.log.borrow_mut().push(Event::BeginRenderPass {
            target: target.0.clone(),
            clear,
        });
        RecordingRenderPass {
            log: &self.log,
            pipeline: String::new(),
        }
    }

    fn begin_compute_pass<'a>(&'a mut self, _label: &str) -> RecordingComputePass<'a> {
        self.log.borrow_mut().push(Event::BeginComputePass);
        RecordingComputePass {
            log: &self.log,
            pipeline: String::new(),
        }
    }
}

pub(crate) struct RecordingRenderPass<'a> {
    log: &'a EventLog,
    pipeline: String,
}

impl RenderPassEncoder<RecordingDevice> for RecordingRenderPass<'_> {
    fn set_pipeline(&mut self, pipeline: &Handle) {
        self.pipeline = pipeline.0.clone();
        self.log
            .borrow_mut()
            .push(Event::SetRenderPipeline(pipeline.0.clone()));
    }

    fn set_vertex_buffer(&mut self, slot: u32, buffer: &Handle) {
        self.log
            .borrow_mut()
            .push(Event::SetVertexBuffer(slot, buffer.0.clone()));
    }

    fn draw(&mut self, vertices: Range<u32>, _instances: Range<u32>) {
        self.log.borrow_mut().push(Event::Draw {
            pipeline: self.pipeline.clone(),
            vertices,
        });
    }
}

impl Drop for RecordingRenderPass<'_> {
    fn drop(&mut self) {
        self.log.borrow_mut().push(Event::EndRenderPass);
    }
}

pub(crate) struct RecordingComputePass<'a> {
    log: &'a EventLog,
    pipeline: String,
}

impl ComputePassEncoder<RecordingDevice> for RecordingComputePass<'_> {
    fn set_pipeline(&mut self, pipeline: &Handle) {
        self.pipeline = pipeline.0.clone();
        self.log
            .borrow_mut()
            .push(Event::SetComputePipeline(pipeline.0.clone()));
    }

    fn dispatch_workgroups(&mut self, _x: u32, _y: u32, _z: u32) {
        self.log.borrow_mut().push(Event::Dispatch {
            pipeline: self.pipeline.clone(),
        });
    }
}

impl Drop for RecordingComputePass<'_> {
    fn drop(&mut self) {
        self.log.borrow_mut().push(Event::EndComputePass);
    }
}

pub(crate) struct RecordingSurface {
    log: EventLog,
    /// Error returned by the next `acquire`, if any.
    pub(crate) fail_next: Option<SurfaceErrorAction>,
}

impl RecordingSurface {
    pub(crate) fn new(log: EventLog) -> Self {
        Self {
            log,
            fail_next: None,
        }
    }
}

impl SurfaceTarget<RecordingDevice> for RecordingSurface {
    type Frame = RecordingFrame;

    fn configure(&mut self, _device: &RecordingDevice, format: wgpu::TextureFormat, size: PhysicalSize<u32>) {
        self.log
            .borrow_mut()
            .push(Event::Configure { format, size });
    }

    fn acquire(&mut self, _device: &RecordingDevice) -> Result<RecordingFrame, RenderError> {
        if let Some(action) = self.fail_next.take() {
            return Err(RenderError::Surface {
                action,
                reason: "injected".into(),
            });
        }
        Ok(RecordingFrame {
            log: Rc::clone(&self.log),
            view: Handle("surface".into()),
        })
    }
}

pub(crate) struct RecordingFrame {
    log: EventLog,
    view: Handle,
}

impl SurfaceFrame<RecordingDevice> for RecordingFrame {
    fn view(&self) -> &Handle {
        &self.view
    }

    fn present(self) {
        self.log.borrow_mut().push(Event::Present);
    }
}

/// What a [`RecordingProvider`] pretends the platform offers.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub(crate) enum Capability {
    Available,
    Missing,
    DeviceLost,
}

pub(crate) struct RecordingProvider {
    pub(crate) capability: Capability,
    pub(crate) device: RecordingDevice,
    /// Error injected into the first frame acquisition.
    pub(crate) first_frame: Option<SurfaceErrorAction>,
}

impl RecordingProvider {
    pub(crate) fn new(capability: Capability) -> Self {
        Self {
            capability,
            device: RecordingDevice::new(),
            first_frame: None,
        }
    }
}

impl DeviceProvider for RecordingProvider {
    type Device = RecordingDevice;
    type Surface = RecordingSurface;

    async fn acquire(self) -> Result<Acquired<RecordingDevice, RecordingSurface>, RenderError> {
        match self.capability {
            Capability::Missing => Err(RenderError::UnsupportedPlatform),
            Capability::DeviceLost => Err(RenderError::DeviceAcquisitionFailed("device request failed".into())),
            Capability::Available => {
                let mut surface = RecordingSurface::new(self.device.log());
                surface.fail_next = self.first_frame;
                Ok(Acquired {
                    device: self.device,
                    surface,
                    preferred_format: wgpu::TextureFormat::Bgra8UnormSrgb,
                    platform: PlatformInfo::host(),
                })
            }
        }
    }
}

/// Protocol step a [`StubDrawable`] fails at.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub(crate) enum Step {
    Geometry,
    Shaders,
    RenderPipeline,
    ComputePipeline,
}

/// Shader id every [`StubDrawable`] loads; register it with [`stub_shaders`].
pub(crate) const STUB_SHADER: &str = "stub.wgsl";

const STUB_SOURCE: &str = "@vertex fn vs() {} @fragment fn fs() {} @compute fn cs() {}";

/// Loader that knows [`STUB_SHADER`].
pub(crate) fn stub_shaders() -> EmbeddedShaderLoader {
    let mut loader = EmbeddedShaderLoader::new();
    loader.insert(STUB_SHADER, STUB_SOURCE);
    loader
}

/// Drawable that records its lifecycle.
///
/// Every resource it creates is named after its label kind, so a stub allocated as
/// `"A"` draws with pipeline `"A"` and dispatches with pipeline `"A"`.
pub(crate) struct StubDrawable {
    label: ObjectLabel,
    log: EventLog,
    fail_at: Option<Step>,
    shader: Option<Handle>,
    render_pipeline: Option<Handle>,
    compute_pipeline: Option<Handle>,
}

impl StubDrawable {
    pub(crate) fn new(label: ObjectLabel, log: EventLog) -> Self {
        Self {
            label,
            log,
            fail_at: None,
            shader: None,
            render_pipeline: None,
            compute_pipeline: None,
        }
    }

    pub(crate) fn failing_at(mut self, step: Step) -> Self {
        self.fail_at = Some(step);
        self
    }

    fn name(&self) -> &'static str {
        self.label.kind()
    }
}

impl Drawable<RecordingDevice> for StubDrawable {
    fn label(&self) -> &ObjectLabel {
        &self.label
    }

    fn update_geometry(&mut self) {
        self.log.borrow_mut().push(Event::Update(self.name().to_owned()));
    }

    fn render(&self, pass: &mut dyn RenderPassEncoder<RecordingDevice>) {
        if let Some(pipeline) = &self.render_pipeline {
            pass.set_pipeline(pipeline);
            pass.draw(0..3, 0..1);
        }
    }

    fn compute(&self, pass: &mut dyn ComputePassEncoder<RecordingDevice>) {
        if let Some(pipeline) = &self.compute_pipeline {
            pass.set_pipeline(pipeline);
            pass.dispatch_workgroups(1, 1, 1);
        }
    }
}

impl DrawableInit<RecordingDevice> for StubDrawable {
    async fn create_geometry(&mut self, ctx: &InitCtx<'_, RecordingDevice>) -> Result<(), RenderError> {
        // An empty upload is what makes the device reject the step.
        let bytes: &[u8] = if self.fail_at == Some(Step::Geometry) { &[] } else { &[0; 12] };
        ctx.device.create_vertex_buffer(self.name(), bytes).await?;
        Ok(())
    }

    async fn create_shaders(&mut self, ctx: &InitCtx<'_, RecordingDevice>) -> Result<(), RenderError> {
        let id = if self.fail_at == Some(Step::Shaders) { "missing.wgsl" } else { STUB_SHADER };
        self.shader = Some(load_shader_module(ctx, &self.label, id).await?);
        Ok(())
    }

    async fn create_render_pipeline(&mut self, ctx: &InitCtx<'_, RecordingDevice>) -> Result<(), RenderError> {
        let Some(shader) = self.shader.as_ref() else {
            return Err(RenderError::pipeline(self.name(), "no shader"));
        };
        let layout = if self.fail_at == Some(Step::RenderPipeline) {
            VertexLayout::new(0, Vec::<wgpu::VertexAttribute>::new())
        } else {
            VertexLayout::new(8, wgpu::vertex_attr_array![0 => Float32x2])
        };

        let pipeline = ctx.device.create_render_pipeline(&RenderPipelineDesc {
            label: self.name(),
            shader,
            vertex_entry: "vs",
            fragment_entry: "fs",
            vertex_layout: &layout,
            color_format: ctx.color_format,
        })
        .await?;
        self.render_pipeline = Some(pipeline);
        Ok(())
    }

    async fn create_compute_pipeline(&mut self, ctx: &InitCtx<'_, RecordingDevice>) -> Result<(), RenderError> {
        let Some(shader) = self.shader.as_ref() else {
            return Err(RenderError::pipeline(self.name(), "no shader"));
        };
        let entry_point = if self.fail_at == Some(Step::ComputePipeline) { "" } else { "cs" };

        let pipeline = ctx.device.create_compute_pipeline(&ComputePipelineDesc {
            label: self.name(),
            shader,
            entry_point,
        })
        .await?;
        self.compute_pipeline = Some(pipeline);
        Ok(())
    }
}
