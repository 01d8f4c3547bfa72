//! Test doubles: a recording graphics device and scripted input.

use anyhow::{bail, Result};

use crate::controller::InputSource;
use crate::gfx::{Backend, BindingLayoutDesc, DepthTest, DrawCall, GraphicsDevice, PipelineDesc};
use crate::point::Point;
use crate::shaders::ShaderArtifacts;

/// Decodes a region's bytes; regions are plain byte vectors, so reads are unaligned.
pub fn read_points(bytes: &[u8]) -> Vec<Point> {
    bytes
        .chunks_exact(Point::STRIDE as usize)
        .map(bytemuck::pod_read_unaligned::<Point>)
        .collect()
}

pub fn test_shaders() -> ShaderArtifacts {
    ShaderArtifacts::from_sources("// vs_main", "// fs_main")
}

/// What `create_pipeline` was asked for.
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineRecord {
    pub layout: usize,
    pub shader_names: Vec<String>,
    pub stride: u64,
    pub attributes: Vec<wgpu::VertexAttribute>,
    pub topology: wgpu::PrimitiveTopology,
    pub polygon_mode: wgpu::PolygonMode,
    pub cull_mode: Option<wgpu::Face>,
    pub depth: Option<DepthTest>,
}

/// A draw as the device saw it, with the region contents it would have read.
#[derive(Debug, Clone)]
pub struct DrawRecord {
    pub pipeline: usize,
    pub region: usize,
    pub call: DrawCall,
    pub vertices: Vec<Point>,
}

#[derive(Debug, Clone)]
pub struct FakeFrame {
    pub clear: wgpu::Color,
    pub draws: Vec<DrawRecord>,
}

/// Device that applies copies to in-memory regions and records everything.
///
/// Handles are indices into the record vectors.
#[derive(Debug, Default)]
pub struct FakeDevice {
    pub fail_layout: bool,
    pub fail_pipeline: bool,
    pub fail_region: bool,
    pub skip_frames: bool,
    pub fail_frames: bool,

    pub layouts: Vec<BindingLayoutDesc>,
    pub pipelines: Vec<PipelineRecord>,
    pub regions: Vec<Vec<u8>>,
    /// One entry per submitted batch: `(region, bytes)` per copy.
    pub submissions: Vec<Vec<(usize, Vec<u8>)>>,
    pub presented: Vec<FakeFrame>,
}

impl Backend for FakeDevice {
    type Layout = usize;
    type Pipeline = usize;
    type Region = usize;
    type Commands = Vec<(usize, Vec<u8>)>;
    type Frame = FakeFrame;
}

impl GraphicsDevice<FakeDevice> for FakeDevice {
    fn create_binding_layout(&mut self, desc: &BindingLayoutDesc) -> Result<usize> {
        if self.fail_layout {
            bail!("layout rejected");
        }
        self.layouts.push(desc.clone());
        Ok(self.layouts.len() - 1)
    }

    fn create_pipeline(
        &mut self,
        layout: &usize,
        shaders: &ShaderArtifacts,
        desc: &PipelineDesc<'_>,
    ) -> Result<usize> {
        if self.fail_pipeline {
            bail!("pipeline rejected");
        }
        self.pipelines.push(PipelineRecord {
            layout: *layout,
            shader_names: vec![shaders.vertex.name.clone(), shaders.fragment.name.clone()],
            stride: desc.vertex_stride,
            attributes: desc.vertex_attributes.to_vec(),
            topology: desc.topology,
            polygon_mode: desc.polygon_mode,
            cull_mode: desc.cull_mode,
            depth: desc.depth,
        });
        Ok(self.pipelines.len() - 1)
    }

    fn create_vertex_region(&mut self, size: u64) -> Result<usize> {
        if self.fail_region {
            bail!("out of memory");
        }
        self.regions.push(vec![0; size as usize]);
        Ok(self.regions.len() - 1)
    }

    fn begin_commands(&mut self) -> Vec<(usize, Vec<u8>)> {
        Vec::new()
    }

    fn copy_to_region(&mut self, commands: &mut Vec<(usize, Vec<u8>)>, bytes: &[u8], region: &usize) {
        commands.push((*region, bytes.to_vec()));
    }

    fn submit_commands(&mut self, commands: Vec<(usize, Vec<u8>)>) {
        for (region, bytes) in &commands {
            self.regions[*region][..bytes.len()].copy_from_slice(bytes);
        }
        self.submissions.push(commands);
    }

    fn begin_frame(&mut self, clear: wgpu::Color) -> Result<Option<FakeFrame>> {
        if self.fail_frames {
            bail!("surface out of memory");
        }
        if self.skip_frames {
            return Ok(None);
        }
        Ok(Some(FakeFrame { clear, draws: Vec::new() }))
    }

    fn draw(&mut self, frame: &mut FakeFrame, pipeline: &usize, region: &usize, call: DrawCall) {
        let vertices = read_points(&self.regions[*region])
            [call.vertices.start as usize..call.vertices.end as usize]
            .to_vec();
        frame.draws.push(DrawRecord {
            pipeline: *pipeline,
            region: *region,
            call,
            vertices,
        });
    }

    fn present(&mut self, frame: FakeFrame) {
        self.presented.push(frame);
    }
}

/// Input with fixed answers.
#[derive(Debug, Clone, Default)]
pub struct ScriptedInput {
    pub capture: bool,
    pub clear: bool,
    pub exit: bool,
    pub pointer: Option<(f32, f32)>,
}

impl ScriptedInput {
    /// Capture held with the pointer at `(x, y)`.
    pub fn clicking(x: f32, y: f32) -> Self {
        Self {
            capture: true,
            pointer: Some((x, y)),
            ..Default::default()
        }
    }
}

impl InputSource for ScriptedInput {
    fn capture_active(&self) -> bool {
        self.capture
    }

    fn clear_active(&self) -> bool {
        self.clear
    }

    fn exit_active(&self) -> bool {
        self.exit
    }

    fn pointer(&self) -> Option<(f32, f32)> {
        self.pointer
    }
}
