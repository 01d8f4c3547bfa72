use anyhow::{Context, Result};

use crate::gfx::{Backend, BindingLayoutDesc, DepthTest, GraphicsDevice, PipelineDesc};
use crate::point::Point;
use crate::shaders::ShaderArtifacts;

/// Binding layout for the strip: nothing bound, vertex input allowed.
pub fn strip_layout_desc() -> BindingLayoutDesc {
    BindingLayoutDesc {
        label: "curves strip layout",
        allow_vertex_input: true,
    }
}

/// Fixed pipeline state for the strip.
///
/// Wireframe line strip, no culling, single sample, opaque writes, depth test
/// `Less` with writes on. Vertex attributes mirror [`Point`] byte for byte.
pub fn strip_pipeline_desc() -> PipelineDesc<'static> {
    PipelineDesc {
        label: "curves strip pipeline",

        vertex_stride: Point::STRIDE,
        vertex_attributes: &Point::ATTRS,

        topology: wgpu::PrimitiveTopology::LineStrip,
        polygon_mode: wgpu::PolygonMode::Line,
        cull_mode: None,

        sample_count: 1,
        alpha_to_coverage: false,

        blend: Some(wgpu::BlendState::REPLACE),
        depth: Some(DepthTest {
            compare: wgpu::CompareFunction::Less,
            write: true,
        }),
    }
}

/// The strip's binding layout and pipeline object.
///
/// Built once at startup and only read afterwards. Both resources are released
/// when this value drops.
pub struct StripPipeline<B: Backend> {
    layout: B::Layout,
    state: B::Pipeline,
    topology: wgpu::PrimitiveTopology,
}

impl<B: Backend> StripPipeline<B> {
    /// Builds the layout, then the pipeline state. Either failure is fatal to startup.
    pub fn configure<D>(device: &mut D, shaders: &ShaderArtifacts) -> Result<Self>
    where
        D: GraphicsDevice<B>,
    {
        let layout_desc = strip_layout_desc();
        let desc = strip_pipeline_desc();

        anyhow::ensure!(
            layout_desc.allow_vertex_input || desc.vertex_attributes.is_empty(),
            "binding layout `{}` does not permit vertex input",
            layout_desc.label,
        );

        let layout = device
            .create_binding_layout(&layout_desc)
            .context("failed to build binding layout")?;

        let state = device
            .create_pipeline(&layout, shaders, &desc)
            .with_context(|| format!("failed to build `{}`", desc.label))?;

        log::info!(
            "pipeline ready: {:?}, {} vertex attributes, stride {}",
            desc.topology,
            desc.vertex_attributes.len(),
            desc.vertex_stride,
        );

        Ok(Self {
            layout,
            state,
            topology: desc.topology,
        })
    }

    #[inline]
    pub fn layout(&self) -> &B::Layout {
        &self.layout
    }

    #[inline]
    pub fn state(&self) -> &B::Pipeline {
        &self.state
    }

    #[inline]
    pub fn topology(&self) -> wgpu::PrimitiveTopology {
        self.topology
    }
}
