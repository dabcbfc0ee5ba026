//! WGSL sources

/// Point cloud shader.
///
/// Every point is one instance of a six-vertex quad expanded in clip space,
/// so `point_size` stays in screen pixels whatever the camera distance.
pub const POINT_SHADER: &str = r#"
struct Camera {
    view_proj: mat4x4<f32>,
    viewport: vec2<f32>,
    point_size: f32,
    _padding: f32,
};

@group(0) @binding(0)
var<uniform> camera: Camera;

struct PointInput {
    @location(0) position: vec3<f32>,
    @location(1) color: vec3<f32>,
};

struct VertexOutput {
    @builtin(position) clip_position: vec4<f32>,
    @location(0) color: vec3<f32>,
};

@vertex
fn vs_main(@builtin(vertex_index) corner: u32, point: PointInput) -> VertexOutput {
    var offsets = array<vec2<f32>, 6>(
        vec2<f32>(-1.0, -1.0),
        vec2<f32>(1.0, -1.0),
        vec2<f32>(1.0, 1.0),
        vec2<f32>(-1.0, -1.0),
        vec2<f32>(1.0, 1.0),
        vec2<f32>(-1.0, 1.0),
    );

    let center = camera.view_proj * vec4<f32>(point.position, 1.0);
    let offset = offsets[corner] * camera.point_size / camera.viewport;

    var out: VertexOutput;
    out.clip_position = vec4<f32>(center.xy + offset * center.w, center.z, center.w);
    out.color = point.color;
    return out;
}

@fragment
fn fs_main(in: VertexOutput) -> @location(0) vec4<f32> {
    return vec4<f32>(in.color, 1.0);
}
"#;
