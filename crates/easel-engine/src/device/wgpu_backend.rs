use std::ops::Range;

use wgpu::util::DeviceExt;
use winit::dpi::PhysicalSize;
use winit::window::Window;

use crate::color::Color;
use crate::diagnostics::PlatformInfo;
use crate::error::RenderError;
use crate::surface::{SurfaceErrorAction, SurfaceFrame, SurfaceTarget};

use super::{
    check_shader_source, check_vertex_data, Acquired, CommandRecorder, ComputePassEncoder,
    ComputePipelineDesc, DeviceProvider, GpuInit, GraphicsDevice, RenderPassEncoder,
    RenderPipelineDesc,
};

/// wgpu logical device + queue.
pub struct WgpuDevice {
    device: wgpu::Device,
    queue: wgpu::Queue,
}

impl WgpuDevice {
    pub fn new(device: wgpu::Device, queue: wgpu::Queue) -> Self {
        Self { device, queue }
    }

    /// Returns a reference to the logical device.
    pub fn raw(&self) -> &wgpu::Device {
        &self.device
    }

    /// Returns a reference to the command queue.
    pub fn queue(&self) -> &wgpu::Queue {
        &self.queue
    }

    /// Runs `create` inside a validation error scope.
    ///
    /// Errors the device raises for the created object come back as
    /// [`RenderError::PipelineCreationFailed`] instead of reaching the uncaptured
    /// error handler (which panics by default).
    async fn validated<T>(
        &self,
        what: String,
        create: impl FnOnce(&wgpu::Device) -> T,
    ) -> Result<T, RenderError> {
        let scope = self.device.push_error_scope(wgpu::ErrorFilter::Validation);
        let created = create(&self.device);

        match scope.pop().await {
            None => Ok(created),
            Some(err) => Err(RenderError::pipeline(what, err.to_string())),
        }
    }
}

impl GraphicsDevice for WgpuDevice {
    type Buffer = wgpu::Buffer;
    type ShaderModule = wgpu::ShaderModule;
    type RenderPipeline = wgpu::RenderPipeline;
    type ComputePipeline = wgpu::ComputePipeline;
    type TextureView = wgpu::TextureView;
    type Encoder = wgpu::CommandEncoder;

    async fn create_vertex_buffer(&self, label: &str, contents: &[u8]) -> Result<wgpu::Buffer, RenderError> {
        check_vertex_data(label, contents)?;

        self.validated(format!("vertex buffer `{label}`"), |device| {
            device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some(label),
                contents,
                usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            })
        })
        .await
    }

    async fn create_shader_module(&self, label: &str, source: &str) -> Result<wgpu::ShaderModule, RenderError> {
        check_shader_source(label, source)?;

        self.validated(format!("shader module `{label}`"), |device| {
            device.create_shader_module(wgpu::ShaderModuleDescriptor {
                label: Some(label),
                source: wgpu::ShaderSource::Wgsl(source.into()),
            })
        })
        .await
    }

    async fn create_render_pipeline(
        &self,
        desc: &RenderPipelineDesc<'_, Self>,
    ) -> Result<wgpu::RenderPipeline, RenderError> {
        desc.validate()?;

        let buffers = [desc.vertex_layout.as_wgpu()];
        let targets = [Some(wgpu::ColorTargetState {
            format: desc.color_format,
            blend: Some(wgpu::BlendState::REPLACE),
            write_mask: wgpu::ColorWrites::ALL,
        })];

        self.validated(format!("render pipeline `{}`", desc.label), |device| {
            device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
                label: Some(desc.label),
                // Derived from the shader's bindings.
                layout: None,

                vertex: wgpu::VertexState {
                    module: desc.shader,
                    entry_point: Some(desc.vertex_entry),
                    compilation_options: Default::default(),
                    buffers: &buffers,
                },

                fragment: Some(wgpu::FragmentState {
                    module: desc.shader,
                    entry_point: Some(desc.fragment_entry),
                    compilation_options: Default::default(),
                    targets: &targets,
                }),

                primitive: wgpu::PrimitiveState {
                    topology: wgpu::PrimitiveTopology::TriangleList,
                    strip_index_format: None,
                    front_face: wgpu::FrontFace::Ccw,
                    cull_mode: None,
                    polygon_mode: wgpu::PolygonMode::Fill,
                    unclipped_depth: false,
                    conservative: false,
                },

                depth_stencil: None,
                multisample: wgpu::MultisampleState::default(),
                multiview_mask: None,
                cache: None,
            })
        })
        .await
    }

    async fn create_compute_pipeline(
        &self,
        desc: &ComputePipelineDesc<'_, Self>,
    ) -> Result<wgpu::ComputePipeline, RenderError> {
        desc.validate()?;

        self.validated(format!("compute pipeline `{}`", desc.label), |device| {
            device.create_compute_pipeline(&wgpu::ComputePipelineDescriptor {
                label: Some(desc.label),
                layout: None,
                module: desc.shader,
                entry_point: Some(desc.entry_point),
                compilation_options: Default::default(),
                cache: None,
            })
        })
        .await
    }

    fn create_command_encoder(&self, label: &str) -> wgpu::CommandEncoder {
        self.device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor { label: Some(label) })
    }

    fn submit(&self, encoder: wgpu::CommandEncoder) {
        self.queue.submit(std::iter::once(encoder.finish()));
    }
}

impl CommandRecorder<WgpuDevice> for wgpu::CommandEncoder {
    type RenderPass<'a>
        = wgpu::RenderPass<'a>
    where
        Self: 'a;
    type ComputePass<'a>
        = wgpu::ComputePass<'a>
    where
        Self: 'a;

    fn begin_render_pass<'a>(
        &'a mut self,
        label: &str,
        target: &wgpu::TextureView,
        clear: Color,
    ) -> wgpu::RenderPass<'a> {
        wgpu::CommandEncoder::begin_render_pass(
            self,
            &wgpu::RenderPassDescriptor {
                label: Some(label),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: target,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(clear.into()),
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
                multiview_mask: None,
            },
        )
    }

    fn begin_compute_pass<'a>(&'a mut self, label: &str) -> wgpu::ComputePass<'a> {
        wgpu::CommandEncoder::begin_compute_pass(
            self,
            &wgpu::ComputePassDescriptor {
                label: Some(label),
                timestamp_writes: None,
            },
        )
    }
}

impl RenderPassEncoder<WgpuDevice> for wgpu::RenderPass<'_> {
    fn set_pipeline(&mut self, pipeline: &wgpu::RenderPipeline) {
        wgpu::RenderPass::set_pipeline(self, pipeline);
    }

    fn set_vertex_buffer(&mut self, slot: u32, buffer: &wgpu::Buffer) {
        wgpu::RenderPass::set_vertex_buffer(self, slot, buffer.slice(..));
    }

    fn draw(&mut self, vertices: Range<u32>, instances: Range<u32>) {
        wgpu::RenderPass::draw(self, vertices, instances);
    }
}

impl ComputePassEncoder<WgpuDevice> for wgpu::ComputePass<'_> {
    fn set_pipeline(&mut self, pipeline: &wgpu::ComputePipeline) {
        wgpu::ComputePass::set_pipeline(self, pipeline);
    }

    fn dispatch_workgroups(&mut self, x: u32, y: u32, z: u32) {
        wgpu::ComputePass::dispatch_workgroups(self, x, y, z);
    }
}

/// Window-bound wgpu surface (swapchain).
///
/// Surface lifetime is tied to the window via `'w`; the runtime keeps the window
/// alive for as long as the surface exists.
pub struct WindowSurface<'w> {
    surface: wgpu::Surface<'w>,
    config: wgpu::SurfaceConfiguration,
}

impl WindowSurface<'_> {
    /// Active surface configuration.
    pub fn config(&self) -> &wgpu::SurfaceConfiguration {
        &self.config
    }

    fn handle_error(&self, device: &WgpuDevice, err: &wgpu::SurfaceError) -> SurfaceErrorAction {
        match err {
            wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated => {
                if self.config.width > 0 && self.config.height > 0 {
                    self.surface.configure(device.raw(), &self.config);
                }
                SurfaceErrorAction::Reconfigured
            }
            wgpu::SurfaceError::OutOfMemory => SurfaceErrorAction::Fatal,
            wgpu::SurfaceError::Timeout => SurfaceErrorAction::SkipFrame,
            wgpu::SurfaceError::Other => SurfaceErrorAction::SkipFrame,
        }
    }
}

impl SurfaceTarget<WgpuDevice> for WindowSurface<'_> {
    type Frame = WindowFrame;

    fn configure(&mut self, device: &WgpuDevice, format: wgpu::TextureFormat, size: PhysicalSize<u32>) {
        self.config.format = format;
        self.config.width = size.width;
        self.config.height = size.height;
        self.surface.configure(device.raw(), &self.config);
    }

    fn acquire(&mut self, device: &WgpuDevice) -> Result<WindowFrame, RenderError> {
        let texture = match self.surface.get_current_texture() {
            Ok(texture) => texture,
            Err(err) => match self.handle_error(device, &err) {
                SurfaceErrorAction::Reconfigured => {
                    log::debug!("surface reconfigured after {err}; retrying acquisition");
                    self.surface
                        .get_current_texture()
                        .map_err(|retry| RenderError::Surface {
                            action: SurfaceErrorAction::SkipFrame,
                            reason: retry.to_string(),
                        })?
                }
                action => {
                    return Err(RenderError::Surface {
                        action,
                        reason: err.to_string(),
                    });
                }
            },
        };

        let view = texture
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        Ok(WindowFrame { texture, view })
    }
}

/// One acquired swapchain image.
///
/// Short-lived: holding it prevents acquisition of subsequent frames.
pub struct WindowFrame {
    texture: wgpu::SurfaceTexture,
    view: wgpu::TextureView,
}

impl SurfaceFrame<WgpuDevice> for WindowFrame {
    fn view(&self) -> &wgpu::TextureView {
        &self.view
    }

    fn present(self) {
        let Self { texture, view } = self;
        drop(view);
        texture.present();
    }
}

/// Acquires adapter, device and surface for a winit window.
pub struct WgpuProvider<'w> {
    window: &'w Window,
    init: GpuInit,
}

impl<'w> WgpuProvider<'w> {
    pub fn new(window: &'w Window, init: GpuInit) -> Self {
        Self { window, init }
    }
}

impl<'w> DeviceProvider for WgpuProvider<'w> {
    type Device = WgpuDevice;
    type Surface = WindowSurface<'w>;

    async fn acquire(self) -> Result<Acquired<WgpuDevice, WindowSurface<'w>>, RenderError> {
        let backends = self.init.usable_backends().ok_or(RenderError::UnsupportedPlatform)?;
        let GpuInit {
            power_preference,
            prefer_srgb,
            present_mode,
            alpha_mode,
            required_features,
            required_limits,
            desired_maximum_frame_latency,
            ..
        } = self.init;

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends,
            ..Default::default()
        });

        let surface = instance.create_surface(self.window).map_err(|e| {
            RenderError::DeviceAcquisitionFailed(format!("failed to create surface: {e}"))
        })?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .map_err(|e| RenderError::DeviceAcquisitionFailed(format!("no suitable adapter: {e}")))?;

        let platform = PlatformInfo::with_adapter(&adapter.get_info());

        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: Some("easel device"),
                required_features,
                required_limits,
                experimental_features: wgpu::ExperimentalFeatures::disabled(),
                memory_hints: wgpu::MemoryHints::Performance,
                trace: wgpu::Trace::Off,
            })
            .await
            .map_err(|e| RenderError::DeviceAcquisitionFailed(format!("device request failed: {e}")))?;

        let caps = surface.get_capabilities(&adapter);
        let preferred_format = choose_surface_format(&caps, prefer_srgb).ok_or_else(|| {
            RenderError::DeviceAcquisitionFailed("surface reports no supported formats".into())
        })?;

        let size = self.window.inner_size();
        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: preferred_format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode,
            alpha_mode: choose_alpha_mode(&caps, alpha_mode),
            view_formats: vec![],
            desired_maximum_frame_latency,
        };

        Ok(Acquired {
            device: WgpuDevice::new(device, queue),
            surface: WindowSurface { surface, config },
            preferred_format,
            platform,
        })
    }
}

fn choose_surface_format(
    caps: &wgpu::SurfaceCapabilities,
    prefer_srgb: bool,
) -> Option<wgpu::TextureFormat> {
    let first = caps.formats.first().copied()?;

    if prefer_srgb {
        let srgb = caps.formats.iter().copied().find(|f| f.is_srgb());
        if srgb.is_some() {
            return srgb;
        }
    }

    Some(first)
}

fn choose_alpha_mode(
    caps: &wgpu::SurfaceCapabilities,
    requested: Option<wgpu::CompositeAlphaMode>,
) -> wgpu::CompositeAlphaMode {
    requested
        .filter(|m| caps.alpha_modes.contains(m))
        .or_else(|| caps.alpha_modes.first().copied())
        .unwrap_or(wgpu::CompositeAlphaMode::Auto)
}
