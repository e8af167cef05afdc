//! Fixed shader programs used by every batch.

use super::{AttributeLocation, UniformLocation};

/// Attribute slot of the vertex position (3 × f32).
pub const POSITION_LOCATION: AttributeLocation = AttributeLocation(0);

/// Attribute slot of the vertex color (4 × u8, normalized).
pub const COLOR_LOCATION: AttributeLocation = AttributeLocation(1);

/// Uniform slot of the camera × projection matrix.
pub const MATRIX_LOCATION: UniformLocation = UniformLocation(0);

pub const VERTEX_ENTRY: &str = "vs_main";
pub const FRAGMENT_ENTRY: &str = "fs_main";

/// The matrix arrives as rows; WGSL reads it column-major, so
/// `u.matrix * p` evaluates the row-vector product `p · M`.
///
/// `x`/`y` are divided by `z + 2` instead of the usual `w` divide. Depth
/// leaves the matrix in `[-1, 1]` and is remapped to wgpu's `[0, 1]`.
pub const VERTEX_SHADER: &str = r#"
struct Uniforms {
    matrix: mat4x4<f32>,
};

@group(0) @binding(0)
var<uniform> u: Uniforms;

struct VsOut {
    @builtin(position) clip: vec4<f32>,
    @location(0) color: vec4<f32>,
};

@vertex
fn vs_main(@location(0) position: vec3<f32>, @location(1) color: vec4<f32>) -> VsOut {
    var clip = u.matrix * vec4<f32>(position, 1.0);
    let divisor = clip.z + 2.0;
    clip.x = clip.x / divisor;
    clip.y = clip.y / divisor;
    clip.z = (clip.z + clip.w) * 0.5;

    var out: VsOut;
    out.clip = clip;
    out.color = color;
    return out;
}
"#;

pub const FRAGMENT_SHADER: &str = r#"
@fragment
fn fs_main(@location(0) color: vec4<f32>) -> @location(0) vec4<f32> {
    return color;
}
"#;
