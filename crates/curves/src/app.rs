use anyhow::{Context, Result};
use curves_engine::core::{App, AppControl, FrameCtx, InitCtx};

use crate::config::{BoundInput, CurvesConfig};
use crate::controller::{Controller, InputSource, Transition, Viewport};
use crate::gfx::{Backend, GraphicsDevice};
use crate::pipeline::StripPipeline;
use crate::renderer::FrameRenderer;
use crate::shaders::ShaderArtifacts;
use crate::sync::VertexMirror;
use crate::wgpu_device::{Wgpu, WgpuDevice};

/// Everything the demo owns between frames.
pub struct Curves<B: Backend> {
    controller: Controller,
    mirror: VertexMirror<B>,
    pipeline: StripPipeline<B>,
    renderer: FrameRenderer,
}

impl<B: Backend> Curves<B> {
    /// Builds the pipeline and vertex mirror, then syncs the empty buffer so the
    /// first frame has defined vertex memory.
    pub fn init<D>(device: &mut D, shaders: &ShaderArtifacts, clear: wgpu::Color) -> Result<Self>
    where
        D: GraphicsDevice<B>,
    {
        let pipeline = StripPipeline::configure(device, shaders).context("pipeline setup failed")?;
        let mut mirror = VertexMirror::new(device)?;
        let controller = Controller::new();
        mirror.sync(device, controller.points());

        Ok(Self {
            controller,
            mirror,
            pipeline,
            renderer: FrameRenderer::new(clear),
        })
    }

    /// One frame cycle: input, then render unless exiting.
    pub fn cycle<D, I>(&mut self, device: &mut D, input: &I, viewport: Viewport) -> Result<AppControl>
    where
        D: GraphicsDevice<B>,
        I: InputSource + ?Sized,
    {
        match self.controller.poll(input, viewport, device, &mut self.mirror) {
            Transition::Exit => {
                log::info!("exit requested");
                return Ok(AppControl::Exit);
            }
            Transition::Redraw => {
                log::trace!("redrawing {} points", self.mirror.valid_count());
            }
            // Nothing was synced; the frame repeats the last upload.
            Transition::Idle => {}
        }

        self.renderer.render(device, &self.pipeline, &self.mirror)?;
        Ok(AppControl::Continue)
    }

    pub fn controller(&self) -> &Controller {
        &self.controller
    }

    pub fn mirror(&self) -> &VertexMirror<B> {
        &self.mirror
    }
}

/// Engine app wiring [`Curves`] to the wgpu device and bound input.
pub struct CurvesApp {
    config: CurvesConfig,
    curves: Option<Curves<Wgpu>>,
}

impl CurvesApp {
    pub fn new(config: CurvesConfig) -> Self {
        Self { config, curves: None }
    }
}

impl App for CurvesApp {
    fn on_init(&mut self, ctx: &mut InitCtx<'_, '_>) -> Result<()> {
        let shaders = ShaderArtifacts::load(&self.config.shader_dir)?;

        let mut device = WgpuDevice::new(ctx.gpu);
        self.curves = Some(Curves::init(&mut device, &shaders, self.config.clear_color)?);

        log::info!("curves ready; shaders from {}", self.config.shader_dir.display());
        Ok(())
    }

    fn on_frame(&mut self, ctx: &mut FrameCtx<'_, '_>) -> Result<AppControl> {
        let curves = self
            .curves
            .as_mut()
            .context("frame requested before init")?;

        let (width, height) = ctx.window.logical_size();
        let input = BoundInput {
            state: ctx.input,
            bindings: &self.config.bindings,
        };

        let mut device = WgpuDevice::new(ctx.gpu);
        curves.cycle(&mut device, &input, Viewport::new(width, height))
    }
}
