use crate::gfx::{Backend, GraphicsDevice};
use crate::points::PointBuffer;
use crate::sync::VertexMirror;

/// Level-triggered input queries, asked once per cycle.
pub trait InputSource {
    fn capture_active(&self) -> bool;
    fn clear_active(&self) -> bool;
    fn exit_active(&self) -> bool;
    /// Pointer position in viewport pixels, `None` when unknown.
    fn pointer(&self) -> Option<(f32, f32)>;
}

/// Viewport geometry in the same pixel space as the pointer.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    #[inline]
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    #[inline]
    pub fn center(self) -> (f32, f32) {
        (self.width * 0.5, self.height * 0.5)
    }

    /// Maps a pixel position to device coordinates: center is `(0, 0)`, edges
    /// are `±1`, +Y up.
    ///
    /// Returns `None` for a degenerate (zero or non-finite) viewport.
    pub fn normalize(self, px: f32, py: f32) -> Option<[f32; 2]> {
        let (cx, cy) = self.center();
        if !(cx > 0.0 && cy > 0.0 && cx.is_finite() && cy.is_finite()) {
            return None;
        }
        Some([(px - cx) / cx, (cy - py) / cy])
    }
}

/// What a poll cycle asked for.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Transition {
    /// Nothing changed.
    Idle,
    /// Points changed and were synced; the frame should be redrawn.
    Redraw,
    /// Shut down. Nothing was mutated.
    Exit,
}

/// Turns input signals into point-buffer mutations.
///
/// Sole owner of the [`PointBuffer`]. Every mutation is followed by a sync so
/// the mirror never lags the buffer at the end of a poll.
#[derive(Debug, Default)]
pub struct Controller {
    points: PointBuffer,
}

impl Controller {
    pub fn new() -> Self {
        Self::default()
    }

    /// Read-only view of the captured points.
    pub fn points(&self) -> &PointBuffer {
        &self.points
    }

    /// Evaluates one input cycle.
    ///
    /// Exit wins and stops evaluation. Otherwise clear and capture are checked
    /// in that order, so holding both clears and then records one point.
    /// Held signals repeat every cycle.
    pub fn poll<B, D, I>(
        &mut self,
        input: &I,
        viewport: Viewport,
        device: &mut D,
        mirror: &mut VertexMirror<B>,
    ) -> Transition
    where
        B: Backend,
        D: GraphicsDevice<B>,
        I: InputSource + ?Sized,
    {
        if input.exit_active() {
            return Transition::Exit;
        }

        let mut transition = Transition::Idle;

        if input.clear_active() {
            self.points.clear();
            mirror.sync(device, &self.points);
            log::debug!("cleared points");
            transition = Transition::Redraw;
        }

        if input.capture_active() {
            let normalized = input
                .pointer()
                .and_then(|(px, py)| viewport.normalize(px, py));

            match normalized {
                Some(pos) => {
                    self.points.capture(pos);
                    mirror.sync(device, &self.points);
                    log::debug!(
                        "captured ({:.3}, {:.3}), {} valid",
                        pos[0],
                        pos[1],
                        self.points.valid_count(),
                    );
                    transition = Transition::Redraw;
                }
                None => log::trace!("capture ignored: no pointer position"),
            }
        }

        transition
    }
}
