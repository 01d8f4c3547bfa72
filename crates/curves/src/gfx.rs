//! Graphics-device seam.
//!
//! The core never talks to wgpu directly. It describes what it wants
//! (layouts, pipeline state, copies, draws) and a [`GraphicsDevice`] carries it
//! out. [`Backend`] names the resource types a device hands back so the core can
//! own them across frames without borrowing the device.

use std::ops::Range;

use anyhow::Result;

use crate::shaders::ShaderArtifacts;

/// Resource types produced by a device implementation.
pub trait Backend {
    /// Resource-binding layout a pipeline is built against.
    type Layout;
    /// Immutable pipeline state object.
    type Pipeline;
    /// GPU-visible vertex memory.
    type Region;
    /// An open command recording.
    type Commands;
    /// An acquired, not yet presented frame.
    type Frame;
}

/// Device operations the core depends on.
///
/// Everything here is synchronous within one frame cycle. Command batches are
/// executed in submission order, so a copy submitted before a frame's draw is
/// visible to that draw.
pub trait GraphicsDevice<B: Backend> {
    fn create_binding_layout(&mut self, desc: &BindingLayoutDesc) -> Result<B::Layout>;

    fn create_pipeline(
        &mut self,
        layout: &B::Layout,
        shaders: &ShaderArtifacts,
        desc: &PipelineDesc<'_>,
    ) -> Result<B::Pipeline>;

    /// Allocates `size` bytes of vertex memory that can be a copy destination.
    fn create_vertex_region(&mut self, size: u64) -> Result<B::Region>;

    fn begin_commands(&mut self) -> B::Commands;

    /// Records a copy of `bytes` from CPU-visible staging memory into `region` at offset 0.
    fn copy_to_region(&mut self, commands: &mut B::Commands, bytes: &[u8], region: &B::Region);

    fn submit_commands(&mut self, commands: B::Commands);

    /// Acquires the next frame and schedules its clear.
    ///
    /// `Ok(None)` means the device wants this frame skipped (transient surface
    /// trouble); `Err` is fatal.
    fn begin_frame(&mut self, clear: wgpu::Color) -> Result<Option<B::Frame>>;

    fn draw(&mut self, frame: &mut B::Frame, pipeline: &B::Pipeline, region: &B::Region, call: DrawCall);

    fn present(&mut self, frame: B::Frame);
}

/// Resource-binding layout description.
///
/// Layouts built from this declare no bound resources: no uniforms, no
/// textures, no samplers.
#[derive(Debug, Clone, PartialEq)]
pub struct BindingLayoutDesc {
    pub label: &'static str,
    /// Whether pipelines on this layout may consume vertex buffers.
    pub allow_vertex_input: bool,
}

/// Depth test settings.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct DepthTest {
    pub compare: wgpu::CompareFunction,
    pub write: bool,
}

/// Declarative pipeline state.
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineDesc<'a> {
    pub label: &'static str,

    /// Byte distance between consecutive vertices.
    pub vertex_stride: u64,
    pub vertex_attributes: &'a [wgpu::VertexAttribute],

    pub topology: wgpu::PrimitiveTopology,
    pub polygon_mode: wgpu::PolygonMode,
    pub cull_mode: Option<wgpu::Face>,

    pub sample_count: u32,
    pub alpha_to_coverage: bool,

    /// `None` writes fragments straight through.
    pub blend: Option<wgpu::BlendState>,
    pub depth: Option<DepthTest>,
}

/// A non-indexed draw.
#[derive(Debug, Clone, PartialEq)]
pub struct DrawCall {
    pub topology: wgpu::PrimitiveTopology,
    pub vertices: Range<u32>,
}

impl DrawCall {
    #[inline]
    pub fn vertex_count(&self) -> u32 {
        self.vertices.end.saturating_sub(self.vertices.start)
    }
}
