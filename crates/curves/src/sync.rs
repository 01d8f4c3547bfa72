use anyhow::{Context, Result};

use crate::gfx::{Backend, GraphicsDevice};
use crate::points::PointBuffer;

/// GPU-side mirror of a [`PointBuffer`].
///
/// Holds the vertex region and the valid count as of the last sync. The
/// renderer reads only this, never the buffer itself.
pub struct VertexMirror<B: Backend> {
    region: B::Region,
    valid_count: usize,
}

impl<B: Backend> VertexMirror<B> {
    /// Allocates a region sized for the whole ring. Starts with nothing valid.
    pub fn new<D>(device: &mut D) -> Result<Self>
    where
        D: GraphicsDevice<B>,
    {
        let region = device
            .create_vertex_region(PointBuffer::BYTE_SIZE)
            .context("failed to allocate point vertex region")?;

        Ok(Self {
            region,
            valid_count: 0,
        })
    }

    /// Uploads the full slot array (stale and zeroed slots included) in one
    /// command batch and records the buffer's valid count.
    pub fn sync<D>(&mut self, device: &mut D, points: &PointBuffer)
    where
        D: GraphicsDevice<B>,
    {
        let (bytes, valid_count) = points.snapshot();

        let mut commands = device.begin_commands();
        device.copy_to_region(&mut commands, bytes, &self.region);
        device.submit_commands(commands);

        self.valid_count = valid_count;
        log::debug!("synced {} bytes, {valid_count} valid points", bytes.len());
    }

    #[inline]
    pub fn region(&self) -> &B::Region {
        &self.region
    }

    #[inline]
    pub fn valid_count(&self) -> usize {
        self.valid_count
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::point::Point;
    use crate::points::CAPACITY;
    use crate::testing::{read_points, FakeDevice};

    fn region_points(dev: &FakeDevice, mirror: &VertexMirror<FakeDevice>) -> Vec<Point> {
        read_points(&dev.regions[*mirror.region()])
    }

    #[test]
    fn region_sized_for_full_ring() {
        let mut dev = FakeDevice::default();
        let mirror = VertexMirror::<FakeDevice>::new(&mut dev).unwrap();
        assert_eq!(dev.regions[*mirror.region()].len() as u64, PointBuffer::BYTE_SIZE);
        assert_eq!(mirror.valid_count(), 0);
    }

    #[test]
    fn sync_is_one_full_copy_per_batch() {
        let mut dev = FakeDevice::default();
        let mut mirror = VertexMirror::<FakeDevice>::new(&mut dev).unwrap();
        let mut points = PointBuffer::new();
        points.capture([0.5, 0.5]);

        mirror.sync(&mut dev, &points);

        assert_eq!(dev.submissions.len(), 1);
        assert_eq!(dev.submissions[0].len(), 1);
        assert_eq!(dev.submissions[0][0].1.len() as u64, PointBuffer::BYTE_SIZE);
    }

    #[test]
    fn round_trip_after_capture() {
        let mut dev = FakeDevice::default();
        let mut mirror = VertexMirror::<FakeDevice>::new(&mut dev).unwrap();
        let mut points = PointBuffer::new();
        for i in 0..(CAPACITY + 4) {
            points.capture([i as f32 * 0.1, 0.3]);
            mirror.sync(&mut dev, &points);

            let n = mirror.valid_count();
            assert_eq!(n, points.valid_count());
            assert_eq!(&region_points(&dev, &mirror)[..n], points.points());
        }
    }

    #[test]
    fn round_trip_after_clear() {
        let mut dev = FakeDevice::default();
        let mut mirror = VertexMirror::<FakeDevice>::new(&mut dev).unwrap();
        let mut points = PointBuffer::new();
        points.capture([0.1, 0.1]);
        points.capture([0.2, 0.2]);
        mirror.sync(&mut dev, &points);

        points.clear();
        mirror.sync(&mut dev, &points);

        assert_eq!(mirror.valid_count(), 0);
        assert!(dev.regions[*mirror.region()].iter().all(|b| *b == 0));
    }

    #[test]
    fn region_failure_is_reported() {
        let mut dev = FakeDevice { fail_region: true, ..Default::default() };
        assert!(VertexMirror::<FakeDevice>::new(&mut dev).is_err());
    }
}
