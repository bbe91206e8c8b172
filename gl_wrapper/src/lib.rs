/// Quad corners as `x, y, u, v`, counter-clockwise from the bottom left.
#[rustfmt::skip]
pub const QUAD_VERTICES: [f32; 16] = [
    -0.5, -0.5, 0.0, 0.0,
     0.5, -0.5, 1.0, 0.0,
     0.5,  0.5, 1.0, 1.0,
    -0.5,  0.5, 0.0, 1.0,
];

#[rustfmt::skip]
pub const QUAD_INDICES: [u32; 6] = [
    0, 1, 2,
    2, 3, 0,
];

pub mod error;
pub mod geometry;
pub mod program;
pub mod renderer;
pub mod shader_source;
pub mod texture;
