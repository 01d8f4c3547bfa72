use bytemuck::{Pod, Zeroable};

/// A captured point: position plus RGBA color, laid out exactly as the vertex
/// shader reads it (28 bytes, position at offset 0, color at offset 12).
#[repr(C)]
#[derive(Debug, Copy, Clone, Default, PartialEq, Pod, Zeroable)]
pub struct Point {
    pub position: [f32; 3],
    pub color: [f32; 4],
}

impl Point {
    /// Color every captured point gets.
    pub const WHITE: [f32; 4] = [1.0, 1.0, 1.0, 1.0];

    pub const ATTRS: [wgpu::VertexAttribute; 2] = wgpu::vertex_attr_array![
        0 => Float32x3, // position
        1 => Float32x4  // color
    ];

    pub const STRIDE: u64 = std::mem::size_of::<Point>() as u64;

    /// Creates an opaque white point at `(x, y)` on the z = 0 plane.
    #[inline]
    pub const fn at(x: f32, y: f32) -> Self {
        Self {
            position: [x, y, 0.0],
            color: Self::WHITE,
        }
    }
}
