/// WGSL shader for the opaque props: ambient + one spot light + emission.
///
/// The frame block starts with `view_proj` and `camera_position` so the fire
/// program can bind the same buffer at group 0.
pub const SCENE_SHADER: &str = r#"
struct Frame {
    view_proj: mat4x4<f32>,
    camera_position: vec4<f32>,
    ambient: vec4<f32>,
    spot_position: vec4<f32>,
    spot_direction: vec4<f32>,
    spot_color: vec4<f32>,
    // x: distance, y: cos(outer angle), z: cos(inner angle)
    spot_params: vec4<f32>,
};

@group(0) @binding(0)
var<uniform> frame: Frame;

struct VertexInput {
    @location(0) position: vec3<f32>,
    @location(1) normal: vec3<f32>,
};

struct InstanceInput {
    @location(2) model_0: vec4<f32>,
    @location(3) model_1: vec4<f32>,
    @location(4) model_2: vec4<f32>,
    @location(5) model_3: vec4<f32>,
    @location(6) color: vec4<f32>,
    @location(7) emissive: vec4<f32>,
};

struct VertexOutput {
    @builtin(position) clip_position: vec4<f32>,
    @location(0) world_pos: vec3<f32>,
    @location(1) world_normal: vec3<f32>,
    @location(2) color: vec4<f32>,
    @location(3) emissive: vec3<f32>,
};

@vertex
fn vs_main(vertex: VertexInput, instance: InstanceInput) -> VertexOutput {
    let model = mat4x4<f32>(
        instance.model_0,
        instance.model_1,
        instance.model_2,
        instance.model_3,
    );
    let world_pos = model * vec4<f32>(vertex.position, 1.0);
    let world_normal = (model * vec4<f32>(vertex.normal, 0.0)).xyz;

    var out: VertexOutput;
    out.clip_position = frame.view_proj * world_pos;
    out.world_pos = world_pos.xyz;
    out.world_normal = normalize(world_normal);
    out.color = instance.color;
    out.emissive = instance.emissive.rgb;
    return out;
}

fn spot_light(pos: vec3<f32>, normal: vec3<f32>) -> vec3<f32> {
    let to_light = frame.spot_position.xyz - pos;
    let dist = length(to_light);
    let l = to_light / max(dist, 1e-4);

    let range = frame.spot_params.x;
    var falloff = 1.0;
    if (range > 0.0) {
        let t = clamp(1.0 - dist / range, 0.0, 1.0);
        falloff = t * t;
    }

    let cos_theta = dot(-l, frame.spot_direction.xyz);
    let cone = smoothstep(frame.spot_params.y, frame.spot_params.z, cos_theta);

    let lambert = max(dot(normal, l), 0.0);
    return frame.spot_color.rgb * lambert * cone * falloff;
}

@fragment
fn fs_main(in: VertexOutput) -> @location(0) vec4<f32> {
    let n = normalize(in.world_normal);
    let light = frame.ambient.rgb + spot_light(in.world_pos, n);
    let rgb = in.color.rgb * max(light, vec3<f32>(0.0)) + in.emissive;
    return vec4<f32>(rgb, in.color.a);
}
"#;
