//! [`GraphicsDevice`] over the engine's wgpu context.

use anyhow::{bail, Result};
use curves_engine::device::{Gpu, GpuFrame};
use wgpu::util::DeviceExt;

use crate::gfx::{Backend, BindingLayoutDesc, DrawCall, GraphicsDevice, PipelineDesc};
use crate::shaders::{ShaderArtifacts, ShaderBlob, FRAGMENT_ENTRY, VERTEX_ENTRY};

/// Resource types of the wgpu backend.
pub enum Wgpu {}

impl Backend for Wgpu {
    type Layout = wgpu::PipelineLayout;
    type Pipeline = WgpuPipeline;
    type Region = wgpu::Buffer;
    type Commands = wgpu::CommandEncoder;
    type Frame = WgpuFrame;
}

pub struct WgpuPipeline {
    pipeline: wgpu::RenderPipeline,
    topology: wgpu::PrimitiveTopology,
}

/// An acquired frame plus its pending clear.
///
/// The first pass recorded into the frame clears; later ones load.
pub struct WgpuFrame {
    inner: GpuFrame,
    clear: wgpu::Color,
    cleared: bool,
}

/// Borrows the engine's GPU context for the duration of a callback.
pub struct WgpuDevice<'a, 'w> {
    gpu: &'a mut Gpu<'w>,
}

impl<'a, 'w> WgpuDevice<'a, 'w> {
    pub fn new(gpu: &'a mut Gpu<'w>) -> Self {
        Self { gpu }
    }

    fn shader_module(&self, blob: &ShaderBlob, entry: &str) -> Result<wgpu::ShaderModule> {
        anyhow::ensure!(
            blob.source.contains(entry),
            "shader {} does not export `{entry}`",
            blob.name,
        );

        Ok(self.gpu.device().create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some(&blob.name),
            source: wgpu::ShaderSource::Wgsl(blob.source.as_str().into()),
        }))
    }

    fn record_pass(&self, frame: &mut WgpuFrame) -> wgpu::RenderPass<'static> {
        let (color_load, depth_load) = if frame.cleared {
            (wgpu::LoadOp::Load, wgpu::LoadOp::Load)
        } else {
            (wgpu::LoadOp::Clear(frame.clear), wgpu::LoadOp::Clear(1.0))
        };
        frame.cleared = true;

        frame
            .inner
            .encoder
            .begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("curves strip pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &frame.inner.view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: color_load,
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: self.gpu.depth_view().map(|view| {
                    wgpu::RenderPassDepthStencilAttachment {
                        view,
                        depth_ops: Some(wgpu::Operations {
                            load: depth_load,
                            store: wgpu::StoreOp::Store,
                        }),
                        stencil_ops: None,
                    }
                }),
                timestamp_writes: None,
                occlusion_query_set: None,
                multiview_mask: None,
            })
            .forget_lifetime()
    }
}

impl GraphicsDevice<Wgpu> for WgpuDevice<'_, '_> {
    fn create_binding_layout(&mut self, desc: &BindingLayoutDesc) -> Result<wgpu::PipelineLayout> {
        // wgpu pipelines always accept vertex buffers; nothing to switch on.
        Ok(self
            .gpu
            .device()
            .create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
                label: Some(desc.label),
                bind_group_layouts: &[],
                immediate_size: 0,
            }))
    }

    fn create_pipeline(
        &mut self,
        layout: &wgpu::PipelineLayout,
        shaders: &ShaderArtifacts,
        desc: &PipelineDesc<'_>,
    ) -> Result<WgpuPipeline> {
        let depth_format = match (desc.depth, self.gpu.depth_format()) {
            (Some(_), None) => bail!("`{}` needs a depth target but none was created", desc.label),
            (_, format) => format,
        };

        let polygon_mode = if desc.polygon_mode != wgpu::PolygonMode::Fill
            && !self.gpu.features().contains(wgpu::Features::POLYGON_MODE_LINE)
        {
            log::warn!("adapter lacks POLYGON_MODE_LINE; drawing {:?} with Fill", desc.topology);
            wgpu::PolygonMode::Fill
        } else {
            desc.polygon_mode
        };

        let surface_format = self.gpu.surface_format();

        let vertex = self.shader_module(&shaders.vertex, VERTEX_ENTRY)?;
        let fragment = self.shader_module(&shaders.fragment, FRAGMENT_ENTRY)?;

        let pipeline = self
            .gpu
            .device()
            .create_render_pipeline(&wgpu::RenderPipelineDescriptor {
                label: Some(desc.label),
                layout: Some(layout),

                vertex: wgpu::VertexState {
                    module: &vertex,
                    entry_point: Some(VERTEX_ENTRY),
                    compilation_options: Default::default(),
                    buffers: &[wgpu::VertexBufferLayout {
                        array_stride: desc.vertex_stride,
                        step_mode: wgpu::VertexStepMode::Vertex,
                        attributes: desc.vertex_attributes,
                    }],
                },

                fragment: Some(wgpu::FragmentState {
                    module: &fragment,
                    entry_point: Some(FRAGMENT_ENTRY),
                    compilation_options: Default::default(),
                    targets: &[Some(wgpu::ColorTargetState {
                        format: surface_format,
                        blend: desc.blend,
                        write_mask: wgpu::ColorWrites::ALL,
                    })],
                }),

                primitive: wgpu::PrimitiveState {
                    topology: desc.topology,
                    strip_index_format: None,
                    front_face: wgpu::FrontFace::Cw,
                    cull_mode: desc.cull_mode,
                    polygon_mode,
                    unclipped_depth: false,
                    conservative: false,
                },

                depth_stencil: desc.depth.zip(depth_format).map(|(test, format)| {
                    wgpu::DepthStencilState {
                        format,
                        depth_write_enabled: test.write,
                        depth_compare: test.compare,
                        stencil: wgpu::StencilState::default(),
                        bias: wgpu::DepthBiasState::default(),
                    }
                }),

                multisample: wgpu::MultisampleState {
                    count: desc.sample_count,
                    mask: !0,
                    alpha_to_coverage_enabled: desc.alpha_to_coverage,
                },

                multiview_mask: None,
                cache: None,
            });

        Ok(WgpuPipeline {
            pipeline,
            topology: desc.topology,
        })
    }

    fn create_vertex_region(&mut self, size: u64) -> Result<wgpu::Buffer> {
        anyhow::ensure!(
            size > 0 && size % wgpu::COPY_BUFFER_ALIGNMENT == 0,
            "vertex region size {size} is not a non-zero multiple of {}",
            wgpu::COPY_BUFFER_ALIGNMENT,
        );

        Ok(self.gpu.device().create_buffer(&wgpu::BufferDescriptor {
            label: Some("curves point vbo"),
            size,
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        }))
    }

    fn begin_commands(&mut self) -> wgpu::CommandEncoder {
        self.gpu.create_encoder("curves upload encoder")
    }

    fn copy_to_region(&mut self, commands: &mut wgpu::CommandEncoder, bytes: &[u8], region: &wgpu::Buffer) {
        // Staging stays alive until the copy executes even though it drops here.
        let staging = self
            .gpu
            .device()
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("curves point staging"),
                contents: bytes,
                usage: wgpu::BufferUsages::COPY_SRC,
            });

        commands.copy_buffer_to_buffer(&staging, 0, region, 0, bytes.len() as u64);
    }

    fn submit_commands(&mut self, commands: wgpu::CommandEncoder) {
        self.gpu.submit_encoder(commands);
    }

    fn begin_frame(&mut self, clear: wgpu::Color) -> Result<Option<WgpuFrame>> {
        match self.gpu.begin_frame() {
            Ok(inner) => Ok(Some(WgpuFrame {
                inner,
                clear,
                cleared: false,
            })),
            Err(err) => {
                let reason = err.to_string();
                if self.gpu.handle_surface_error(err).is_recoverable() {
                    Ok(None)
                } else {
                    bail!("failed to acquire surface texture: {reason}")
                }
            }
        }
    }

    fn draw(&mut self, frame: &mut WgpuFrame, pipeline: &WgpuPipeline, region: &wgpu::Buffer, call: DrawCall) {
        debug_assert_eq!(call.topology, pipeline.topology, "topology is baked into the pipeline");

        let mut rpass = self.record_pass(frame);
        rpass.set_pipeline(&pipeline.pipeline);
        rpass.set_vertex_buffer(0, region.slice(..));
        rpass.draw(call.vertices, 0..1);
    }

    fn present(&mut self, mut frame: WgpuFrame) {
        if !frame.cleared {
            drop(self.record_pass(&mut frame));
        }
        self.gpu.submit(frame.inner);
    }
}
