use crate::point::Point;

/// Number of slots in the point ring.
pub const CAPACITY: usize = 10;

/// Fixed-capacity ring of captured points.
///
/// Points are written at a wrapping cursor. The valid points are always the
/// first `valid_count` slots in *physical* order. Until the ring wraps that is
/// also capture order; after a wrap the newest point sits at `next_slot - 1`
/// while slot 0 is still drawn first, so the strip connects slots in array
/// order rather than by age:
///
/// ```text
/// 12 captures, capacity 10:  [p11 p12 p3 p4 p5 p6 p7 p8 p9 p10]
///                                     ^ next_slot = 2
/// ```
///
/// Insertion stays O(1) and the whole array uploads as one contiguous range.
#[derive(Debug, Clone)]
pub struct PointBuffer {
    slots: [Point; CAPACITY],
    next_slot: usize,
    valid_count: usize,
}

impl Default for PointBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl PointBuffer {
    /// Size in bytes of the full slot array (what a sync uploads).
    pub const BYTE_SIZE: u64 = CAPACITY as u64 * Point::STRIDE;

    pub fn new() -> Self {
        Self {
            slots: [Point::default(); CAPACITY],
            next_slot: 0,
            valid_count: 0,
        }
    }

    /// Records a white point at `position`, overwriting the slot under the cursor.
    pub fn capture(&mut self, position: [f32; 2]) {
        self.slots[self.next_slot] = Point::at(position[0], position[1]);
        self.next_slot = (self.next_slot + 1) % CAPACITY;
        self.valid_count = (self.valid_count + 1).min(CAPACITY);
    }

    /// Zeroes every slot and rewinds the cursor.
    pub fn clear(&mut self) {
        self.slots = [Point::default(); CAPACITY];
        self.next_slot = 0;
        self.valid_count = 0;
    }

    /// Raw bytes of the whole slot array, stale slots included, plus the valid count.
    pub fn snapshot(&self) -> (&[u8], usize) {
        (bytemuck::cast_slice(&self.slots), self.valid_count)
    }

    #[inline]
    pub fn valid_count(&self) -> usize {
        self.valid_count
    }

    #[inline]
    pub fn next_slot(&self) -> usize {
        self.next_slot
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.valid_count == 0
    }

    /// The points a draw would connect, in draw order.
    pub fn points(&self) -> &[Point] {
        &self.slots[..self.valid_count]
    }

    /// Every slot, including ones past `valid_count`.
    pub fn slots(&self) -> &[Point; CAPACITY] {
        &self.slots
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn captured(n: usize) -> PointBuffer {
        let mut buf = PointBuffer::new();
        for i in 0..n {
            buf.capture(pos(i));
        }
        buf
    }

    /// Distinct position for the i-th capture.
    fn pos(i: usize) -> [f32; 2] {
        [i as f32 * 0.01, -(i as f32) * 0.02]
    }

    fn positions(buf: &PointBuffer) -> Vec<[f32; 2]> {
        buf.points()
            .iter()
            .map(|p| [p.position[0], p.position[1]])
            .collect()
    }

    // ── below capacity ────────────────────────────────────────────────────

    #[test]
    fn starts_empty_and_zeroed() {
        let buf = PointBuffer::new();
        assert!(buf.is_empty());
        assert_eq!(buf.next_slot(), 0);
        assert!(buf.snapshot().0.iter().all(|b| *b == 0));
    }

    #[test]
    fn up_to_capacity_keeps_capture_order() {
        for n in 0..=CAPACITY {
            let buf = captured(n);
            assert_eq!(buf.valid_count(), n);
            assert_eq!(positions(&buf), (0..n).map(pos).collect::<Vec<_>>());
        }
    }

    #[test]
    fn cursor_wraps_at_capacity() {
        let buf = captured(CAPACITY);
        assert_eq!(buf.next_slot(), 0);
        assert_eq!(buf.valid_count(), CAPACITY);
    }

    // ── past capacity ─────────────────────────────────────────────────────

    #[test]
    fn wrap_keeps_last_points_in_slot_order() {
        let buf = captured(CAPACITY + 2);
        assert_eq!(buf.valid_count(), CAPACITY);
        assert_eq!(buf.next_slot(), 2);

        // 11th and 12th captures overwrote slots 0 and 1.
        let expected: Vec<[f32; 2]> = [10, 11, 2, 3, 4, 5, 6, 7, 8, 9]
            .into_iter()
            .map(pos)
            .collect();
        assert_eq!(positions(&buf), expected);

        // Not chronological: the newest point is not last.
        assert_ne!(*positions(&buf).last().unwrap(), pos(11));
    }

    #[test]
    fn long_runs_hold_exactly_the_last_capacity_points() {
        let n = CAPACITY * 3 + 7;
        let buf = captured(n);
        let mut held = positions(&buf);
        let mut last: Vec<[f32; 2]> = (n - CAPACITY..n).map(pos).collect();
        held.sort_by(|a, b| a[0].total_cmp(&b[0]));
        last.sort_by(|a, b| a[0].total_cmp(&b[0]));
        assert_eq!(held, last);
        assert_eq!(buf.next_slot(), n % CAPACITY);
    }

    // ── clear ─────────────────────────────────────────────────────────────

    #[test]
    fn clear_resets_everything() {
        let mut buf = captured(7);
        buf.clear();
        assert_eq!(buf.valid_count(), 0);
        assert_eq!(buf.next_slot(), 0);
        assert!(buf.slots().iter().all(|p| *p == Point::default()));
    }

    #[test]
    fn clear_is_idempotent() {
        let mut buf = PointBuffer::new();
        buf.clear();
        buf.clear();
        assert!(buf.is_empty());
        assert!(buf.snapshot().0.iter().all(|b| *b == 0));

        buf.capture([0.5, 0.5]);
        buf.clear();
        buf.clear();
        assert!(buf.is_empty());
        assert!(buf.snapshot().0.iter().all(|b| *b == 0));
    }

    #[test]
    fn capture_after_clear_starts_at_slot_zero() {
        let mut buf = captured(CAPACITY + 3);
        buf.clear();
        buf.capture([0.1, 0.2]);
        assert_eq!(buf.valid_count(), 1);
        assert_eq!(buf.slots()[0], Point::at(0.1, 0.2));
    }

    // ── snapshot ──────────────────────────────────────────────────────────

    #[test]
    fn snapshot_covers_full_array() {
        let buf = captured(3);
        let (bytes, count) = buf.snapshot();
        assert_eq!(count, 3);
        assert_eq!(bytes.len() as u64, PointBuffer::BYTE_SIZE);
        assert_eq!(&bytes[..Point::STRIDE as usize], bytemuck::bytes_of(&buf.slots()[0]));
    }
}
