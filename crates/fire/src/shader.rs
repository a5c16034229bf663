use crate::params::{MAX_ITERATIONS, MAX_OCTAVES};

/// WGSL program for the ray-marched fire.
///
/// Bindings:
/// - group 0, binding 0: `Camera` (view-projection + camera position). A
///   renderer may bind a larger frame block as long as it starts with these
///   two fields.
/// - group 1, binding 0: `FireUniforms` (see [`crate::FireUniforms`]).
/// - group 1, binding 1/2: ramp texture and its sampler.
///
/// Vertex inputs: location 0 is the unit-cube position, locations 2..=5 the
/// per-instance model matrix columns.
///
/// `{{ITERATIONS}}` and `{{OCTAVES}}` are substituted by
/// [`fire_shader_source`].
const FIRE_SHADER_TEMPLATE: &str = r#"
const ITERATIONS: i32 = {{ITERATIONS}};
const OCTAVES: i32 = {{OCTAVES}};

struct Camera {
    view_proj: mat4x4<f32>,
    camera_position: vec4<f32>,
};

struct FireUniforms {
    time: f32,
    seed: f32,
    inv_model_matrix: mat4x4<f32>,
    scale: vec3<f32>,
    noise_scale: vec4<f32>,
    magnitude: f32,
    lacunarity: f32,
    gain: f32,
    color: vec3<f32>,
};

@group(0) @binding(0)
var<uniform> camera: Camera;

@group(1) @binding(0)
var<uniform> fire: FireUniforms;
@group(1) @binding(1)
var fire_tex: texture_2d<f32>;
@group(1) @binding(2)
var fire_sampler: sampler;

struct VertexInput {
    @location(0) position: vec3<f32>,
};

struct InstanceInput {
    @location(2) model_0: vec4<f32>,
    @location(3) model_1: vec4<f32>,
    @location(4) model_2: vec4<f32>,
    @location(5) model_3: vec4<f32>,
};

struct FireVaryings {
    @builtin(position) clip_position: vec4<f32>,
    @location(0) world_pos: vec3<f32>,
};

@vertex
fn vs_fire(vertex: VertexInput, instance: InstanceInput) -> FireVaryings {
    let model = mat4x4<f32>(
        instance.model_0,
        instance.model_1,
        instance.model_2,
        instance.model_3,
    );
    let world_pos = model * vec4<f32>(vertex.position, 1.0);

    var out: FireVaryings;
    out.clip_position = camera.view_proj * world_pos;
    out.world_pos = world_pos.xyz;
    return out;
}

fn mod289(x: vec4<f32>) -> vec4<f32> {
    return x - floor(x * (1.0 / 289.0)) * 289.0;
}

fn perm(x: vec4<f32>) -> vec4<f32> {
    return mod289(((x * 34.0) + 1.0) * x);
}

fn snoise(p: vec3<f32>) -> f32 {
    let a = floor(p);
    var d = p - a;
    d = d * d * (3.0 - 2.0 * d);

    let b = a.xxyy + vec4<f32>(0.0, 1.0, 0.0, 1.0);
    let k1 = perm(b.xyxy);
    let k2 = perm(k1.xyxy + b.zzww);

    let c = k2 + a.zzzz;
    let k3 = perm(c);
    let k4 = perm(c + 1.0);

    let o1 = fract(k3 * (1.0 / 41.0));
    let o2 = fract(k4 * (1.0 / 41.0));

    let o3 = o2 * d.z + o1 * (1.0 - d.z);
    let o4 = o3.yw * d.x + o3.xz * (1.0 - d.x);

    return o4.y * d.y + o4.x * (1.0 - d.y);
}

fn turbulence(p: vec3<f32>) -> f32 {
    var sum = 0.0;
    var freq = 1.0;
    var amp = 1.0;
    for (var i = 0; i < OCTAVES; i++) {
        sum += abs(snoise(p * freq)) * amp;
        freq *= fire.lacunarity;
        amp *= fire.gain;
    }
    return sum;
}

fn sample_fire(p_in: vec3<f32>, scale: vec4<f32>) -> vec4<f32> {
    var p = p_in;
    var st = vec2<f32>(length(p.xz), p.y);
    if (st.x <= 0.0 || st.x >= 1.0 || st.y <= 0.0 || st.y >= 1.0) {
        return vec4<f32>(0.0);
    }
    p.y -= (fire.seed + fire.time) * scale.w;
    p *= scale.xyz;
    st.y += sqrt(st.y) * fire.magnitude * turbulence(p);
    if (st.y <= 0.0 || st.y >= 1.0) {
        return vec4<f32>(0.0);
    }
    // Explicit LOD: the early returns above make control flow non-uniform.
    return textureSampleLevel(fire_tex, fire_sampler, st, 0.0);
}

fn localize(p: vec3<f32>) -> vec3<f32> {
    return (fire.inv_model_matrix * vec4<f32>(p, 1.0)).xyz;
}

@fragment
fn fs_fire(in: FireVaryings) -> @location(0) vec4<f32> {
    var ray_pos = in.world_pos;
    let ray_dir = normalize(ray_pos - camera.camera_position.xyz);
    let ray_len = 0.0288 * length(fire.scale);
    var col = vec4<f32>(0.0);
    for (var i = 0; i < ITERATIONS; i++) {
        ray_pos += ray_dir * ray_len;
        var lp = localize(ray_pos);
        lp = vec3<f32>(lp.x * 2.0, lp.y + 0.5, lp.z * 2.0);
        col += sample_fire(lp, fire.noise_scale);
    }
    col = vec4<f32>(col.rgb * fire.color, col.a);
    col.r *= 1.5;
    col.a = col.r;
    return col;
}
"#;

/// Fire shader source with the ray-march step count and turbulence octave
/// count baked in, clamped to `1..=MAX_ITERATIONS` and `1..=MAX_OCTAVES`.
pub fn fire_shader_source(iterations: u32, octaves: u32) -> String {
    FIRE_SHADER_TEMPLATE
        .replace(
            "{{ITERATIONS}}",
            &iterations.clamp(1, MAX_ITERATIONS).to_string(),
        )
        .replace("{{OCTAVES}}", &octaves.clamp(1, MAX_OCTAVES).to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn placeholders_are_substituted() {
        let src = fire_shader_source(10, 3);
        assert!(src.contains("const ITERATIONS: i32 = 10;"));
        assert!(src.contains("const OCTAVES: i32 = 3;"));
        assert!(!src.contains("{{"));
    }

    #[test]
    fn zero_counts_are_clamped() {
        let src = fire_shader_source(0, 0);
        assert!(src.contains("const ITERATIONS: i32 = 1;"));
        assert!(src.contains("const OCTAVES: i32 = 1;"));
    }

    #[test]
    fn huge_counts_are_capped() {
        let src = fire_shader_source(3_000_000_000, u32::MAX);
        assert!(src.contains(&format!("const ITERATIONS: i32 = {MAX_ITERATIONS};")));
        assert!(src.contains(&format!("const OCTAVES: i32 = {MAX_OCTAVES};")));
        validate(&src);
    }

    fn validate(src: &str) -> naga::Module {
        let module = naga::front::wgsl::parse_str(src).expect("fire WGSL parses");
        naga::valid::Validator::new(
            naga::valid::ValidationFlags::all(),
            naga::valid::Capabilities::all(),
        )
        .validate(&module)
        .expect("fire WGSL validates");
        module
    }

    #[test]
    fn program_is_valid_wgsl() {
        validate(&fire_shader_source(10, 3));
        validate(&fire_shader_source(1, 1));
    }

    #[test]
    fn uniform_block_layout_matches_host_record() {
        let module = validate(&fire_shader_source(10, 3));
        let mut layouter = naga::proc::Layouter::default();
        layouter.update(module.to_ctx()).expect("layout");

        let (handle, ty) = module
            .types
            .iter()
            .find(|(_, ty)| ty.name.as_deref() == Some("FireUniforms"))
            .expect("FireUniforms struct");
        let naga::TypeInner::Struct { members, span } = &ty.inner else {
            panic!("FireUniforms is not a struct");
        };
        let offsets: Vec<u32> = members.iter().map(|m| m.offset).collect();
        assert_eq!(offsets, [0, 4, 16, 80, 96, 112, 116, 120, 128]);
        assert_eq!(*span, 144);
        assert_eq!(layouter[handle].size, 144);
        assert_eq!(
            *span as usize,
            std::mem::size_of::<crate::FireUniforms>()
        );
    }

    #[test]
    fn entry_points_present() {
        let src = fire_shader_source(10, 3);
        assert!(src.contains("fn vs_fire("));
        assert!(src.contains("fn fs_fire("));
    }
}
