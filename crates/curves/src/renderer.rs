use crate::gfx::{Backend, DrawCall, GraphicsDevice};
use crate::pipeline::StripPipeline;
use crate::sync::VertexMirror;

/// Draws the synced points as one line strip.
#[derive(Debug, Clone)]
pub struct FrameRenderer {
    clear: wgpu::Color,
}

impl FrameRenderer {
    pub fn new(clear: wgpu::Color) -> Self {
        Self { clear }
    }

    /// Issues a draw over vertices `0..valid_count` and presents.
    ///
    /// An empty mirror still draws (zero vertices) and presents a cleared frame.
    /// Frames the device asks to skip are dropped without drawing.
    pub fn render<B, D>(
        &self,
        device: &mut D,
        pipeline: &StripPipeline<B>,
        mirror: &VertexMirror<B>,
    ) -> anyhow::Result<()>
    where
        B: Backend,
        D: GraphicsDevice<B>,
    {
        let Some(mut frame) = device.begin_frame(self.clear)? else {
            log::trace!("frame skipped");
            return Ok(());
        };

        let call = DrawCall {
            topology: pipeline.topology(),
            vertices: 0..mirror.valid_count() as u32,
        };
        device.draw(&mut frame, pipeline.state(), mirror.region(), call);
        device.present(frame);

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::points::PointBuffer;
    use crate::testing::{test_shaders, FakeDevice};

    fn setup() -> (FakeDevice, StripPipeline<FakeDevice>, VertexMirror<FakeDevice>) {
        let mut dev = FakeDevice::default();
        let pipeline = StripPipeline::<FakeDevice>::configure(&mut dev, &test_shaders()).unwrap();
        let mirror = VertexMirror::<FakeDevice>::new(&mut dev).unwrap();
        (dev, pipeline, mirror)
    }

    #[test]
    fn empty_mirror_draws_zero_and_presents() {
        let (mut dev, pipeline, mirror) = setup();
        FrameRenderer::new(wgpu::Color::BLACK)
            .render(&mut dev, &pipeline, &mirror)
            .unwrap();

        assert_eq!(dev.presented.len(), 1);
        let frame = &dev.presented[0];
        assert_eq!(frame.clear, wgpu::Color::BLACK);
        assert_eq!(frame.draws.len(), 1);
        assert_eq!(frame.draws[0].call.vertex_count(), 0);
    }

    #[test]
    fn draws_only_synced_count() {
        let (mut dev, pipeline, mut mirror) = setup();
        let mut points = PointBuffer::new();
        points.capture([0.0, 0.0]);
        points.capture([0.5, 0.5]);
        mirror.sync(&mut dev, &points);

        // Not synced yet, so the renderer must not see it.
        points.capture([0.9, 0.9]);

        FrameRenderer::new(wgpu::Color::BLACK)
            .render(&mut dev, &pipeline, &mirror)
            .unwrap();

        let draw = &dev.presented[0].draws[0];
        assert_eq!(draw.call.vertices, 0..2);
        assert_eq!(draw.call.topology, wgpu::PrimitiveTopology::LineStrip);
        assert_eq!(draw.region, *mirror.region());
        assert_eq!(draw.pipeline, *pipeline.state());
    }

    #[test]
    fn skipped_frame_draws_nothing() {
        let (mut dev, pipeline, mirror) = setup();
        dev.skip_frames = true;
        FrameRenderer::new(wgpu::Color::BLACK)
            .render(&mut dev, &pipeline, &mirror)
            .unwrap();
        assert!(dev.presented.is_empty());
    }

    #[test]
    fn lost_device_is_fatal() {
        let (mut dev, pipeline, mirror) = setup();
        dev.fail_frames = true;
        assert!(
            FrameRenderer::new(wgpu::Color::BLACK)
                .render(&mut dev, &pipeline, &mirror)
                .is_err()
        );
    }
}
