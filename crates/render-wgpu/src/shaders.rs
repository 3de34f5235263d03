/// WGSL shader for every scene object: textured or flat colour, lanterns,
/// spotlight, glow vertices and the cloud sway mode.
pub const SCENE_SHADER: &str = r#"
struct Frame {
    view_proj: mat4x4<f32>,
    eye: vec4<f32>,
    light_dir: vec4<f32>,
    // w = 1 when the spotlight is on.
    spot_pos: vec4<f32>,
    spot_dir: vec4<f32>,
    lanterns: array<vec4<f32>, 10>,
    // x = time, y = lantern count.
    params: vec4<f32>,
};

struct Object {
    model: mat4x4<f32>,
    color: vec4<f32>,
    // x = instanced, y = cloud, z = textured, w = normal mapped.
    flags: vec4<f32>,
};

@group(0) @binding(0)
var<uniform> globals: Frame;

@group(1) @binding(0)
var<uniform> draw: Object;

@group(2) @binding(0)
var diffuse_tex: texture_2d<f32>;
@group(2) @binding(1)
var normal_tex: texture_2d<f32>;
@group(2) @binding(2)
var tex_sampler: sampler;

struct VertexInput {
    @location(0) position: vec3<f32>,
    @location(1) uv: vec2<f32>,
    @location(2) normal: vec3<f32>,
    @location(3) tangent: vec3<f32>,
    @location(4) kind: f32,
};

struct InstanceInput {
    @location(5) offset: vec3<f32>,
};

struct VertexOutput {
    @builtin(position) clip_position: vec4<f32>,
    @location(0) uv: vec2<f32>,
    @location(1) world_pos: vec3<f32>,
    @location(2) kind: f32,
    @location(3) instance: f32,
    @location(4) tangent: vec3<f32>,
    @location(5) bitangent: vec3<f32>,
    @location(6) normal: vec3<f32>,
};

fn rand(n: f32) -> f32 {
    return fract(sin(n) * 43758.5453123);
}

@vertex
fn vs_main(
    vertex: VertexInput,
    instance: InstanceInput,
    @builtin(instance_index) instance_index: u32,
) -> VertexOutput {
    let time = globals.params.x;
    let id = f32(instance_index);

    var offset = instance.offset;
    if (draw.flags.y > 0.5) {
        offset.x += sin(time * 0.4 + id) * 300.0;
        offset.z += cos(time * 0.3 + id * 1.5) * 300.0;
        offset.y += sin(time * 0.7 + id * 2.0) * 40.0;
    }

    var world = draw.model * vec4<f32>(vertex.position, 1.0);
    if (draw.flags.x > 0.5) {
        world += vec4<f32>(offset, 0.0);
    }

    let n = normalize((draw.model * vec4<f32>(vertex.normal, 0.0)).xyz);
    var t = normalize((draw.model * vec4<f32>(vertex.tangent, 0.0)).xyz);
    t = normalize(t - dot(t, n) * n);

    var out: VertexOutput;
    out.clip_position = globals.view_proj * world;
    out.uv = vertex.uv;
    out.world_pos = world.xyz;
    out.kind = vertex.kind;
    out.instance = id;
    out.tangent = t;
    out.bitangent = cross(n, t);
    out.normal = n;
    return out;
}

@fragment
fn fs_main(in: VertexOutput) -> @location(0) vec4<f32> {
    // Sample before any branch so derivatives stay uniform.
    let sampled = textureSample(diffuse_tex, tex_sampler, in.uv);
    let bump = textureSample(normal_tex, tex_sampler, in.uv).rgb;
    let time = globals.params.x;

    var tex = vec4<f32>(draw.color.rgb, 1.0);
    if (draw.flags.z > 0.5) {
        tex = sampled;
    }
    if (tex.a < 0.1) {
        discard;
    }
    if (in.kind > 0.5) {
        return vec4<f32>(1.0, 1.0, 1.0, 1.0);
    }

    var n = normalize(in.normal);
    if (draw.flags.w > 0.5) {
        let tbn = mat3x3<f32>(in.tangent, in.bitangent, in.normal);
        n = normalize(tbn * normalize(bump * 2.0 - 1.0));
    }

    let ambient = vec3<f32>(0.3, 0.3, 0.4);
    var lighting = ambient + max(dot(n, normalize(globals.light_dir.xyz)), 0.0) * 0.5;

    let lantern_count = u32(globals.params.y);
    for (var i = 0u; i < lantern_count; i++) {
        let light_pos = globals.lanterns[i].xyz + vec3<f32>(0.0, 60.0, 0.0);
        let dist = length(light_pos - in.world_pos);
        let atten = 1.0 / (1.0 + 0.0006 * dist + 0.00002 * dist * dist);
        let diffuse = max(dot(n, normalize(light_pos - in.world_pos)), 0.0);
        lighting += vec3<f32>(1.0, 0.85, 0.6) * diffuse * atten * 3.0;
    }

    if (globals.spot_pos.w > 0.5) {
        let to_light = normalize(globals.spot_pos.xyz - in.world_pos);
        let theta = dot(to_light, normalize(-globals.spot_dir.xyz));
        let epsilon = 0.3;
        let intensity = clamp((theta - (1.0 - epsilon)) / epsilon, 0.0, 1.0);
        let dist = length(globals.spot_pos.xyz - in.world_pos);
        let atten = 1.0 / (1.0 + 0.001 * dist + 0.0001 * dist * dist);
        let diffuse = max(dot(n, to_light), 0.0);
        lighting += vec3<f32>(1.0, 0.98, 0.9) * diffuse * intensity * atten * 2.5;
    }

    if (draw.flags.y > 0.5) {
        let target_cloud = floor(rand(floor(time * 1.5)) * 8.0);
        if (abs(in.instance - target_cloud) < 0.1) {
            let pulse = pow(max(0.0, sin(time * 20.0)), 3.0);
            lighting += vec3<f32>(0.8, 0.9, 1.0) * pulse * 3.0;
        }
        lighting *= 0.9 + 0.1 * sin(time * 5.0 + in.instance * 10.0);
    }

    return vec4<f32>(tex.rgb * lighting, tex.a);
}
"#;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shader_declares_entry_points() {
        assert!(SCENE_SHADER.contains("fn vs_main"));
        assert!(SCENE_SHADER.contains("fn fs_main"));
    }

    #[test]
    fn lantern_array_matches_planner() {
        let decl = format!("array<vec4<f32>, {}>", zima_render::MAX_LANTERNS);
        assert!(SCENE_SHADER.contains(&decl));
    }

    #[test]
    fn moonlight_uses_light_dir_unnegated() {
        assert!(SCENE_SHADER.contains("dot(n, normalize(globals.light_dir.xyz))"));
        assert!(!SCENE_SHADER.contains("-normalize(globals.light_dir"));
    }
}
