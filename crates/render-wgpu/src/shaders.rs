/// WGSL for the noise-displaced mesh.
///
/// The vertex stage pushes each vertex along its normal by 3D Perlin noise
/// and twists it around Y; the fragment stage blends the two colors by the
/// displacement.
pub const NOISE_SHADER: &str = r#"
struct Uniforms {
    view_proj: mat4x4<f32>,
    color_a: vec4<f32>,
    color_b: vec4<f32>,
    pointer: vec2<f32>,
    time: f32,
    noise_density: f32,
    noise_strength: f32,
    rotation_frequency: f32,
    rotation_amplitude: f32,
    speed: f32,
};

@group(0) @binding(0)
var<uniform> u: Uniforms;

struct VertexInput {
    @location(0) position: vec3<f32>,
    @location(1) normal: vec3<f32>,
};

struct VertexOutput {
    @builtin(position) clip_position: vec4<f32>,
    @location(0) distortion: f32,
    @location(1) normal: vec3<f32>,
};

fn mod289_3(x: vec3<f32>) -> vec3<f32> {
    return x - floor(x * (1.0 / 289.0)) * 289.0;
}

fn mod289_4(x: vec4<f32>) -> vec4<f32> {
    return x - floor(x * (1.0 / 289.0)) * 289.0;
}

fn permute(x: vec4<f32>) -> vec4<f32> {
    return mod289_4(((x * 34.0) + 1.0) * x);
}

fn taylor_inv_sqrt(r: vec4<f32>) -> vec4<f32> {
    return 1.79284291400159 - 0.85373472095314 * r;
}

fn fade(t: vec3<f32>) -> vec3<f32> {
    return t * t * t * (t * (t * 6.0 - 15.0) + 10.0);
}

// Classic Perlin noise, roughly in [-1, 1].
fn cnoise(p: vec3<f32>) -> f32 {
    let pi0 = mod289_3(floor(p));
    let pi1 = mod289_3(floor(p) + vec3<f32>(1.0));
    let pf0 = fract(p);
    let pf1 = pf0 - vec3<f32>(1.0);
    let ix = vec4<f32>(pi0.x, pi1.x, pi0.x, pi1.x);
    let iy = vec4<f32>(pi0.yy, pi1.yy);
    let iz0 = vec4<f32>(pi0.z);
    let iz1 = vec4<f32>(pi1.z);

    let ixy = permute(permute(ix) + iy);
    let ixy0 = permute(ixy + iz0);
    let ixy1 = permute(ixy + iz1);

    var gx0 = ixy0 * (1.0 / 7.0);
    var gy0 = fract(floor(gx0) * (1.0 / 7.0)) - 0.5;
    gx0 = fract(gx0);
    let gz0 = vec4<f32>(0.5) - abs(gx0) - abs(gy0);
    let sz0 = step(gz0, vec4<f32>(0.0));
    gx0 -= sz0 * (step(vec4<f32>(0.0), gx0) - 0.5);
    gy0 -= sz0 * (step(vec4<f32>(0.0), gy0) - 0.5);

    var gx1 = ixy1 * (1.0 / 7.0);
    var gy1 = fract(floor(gx1) * (1.0 / 7.0)) - 0.5;
    gx1 = fract(gx1);
    let gz1 = vec4<f32>(0.5) - abs(gx1) - abs(gy1);
    let sz1 = step(gz1, vec4<f32>(0.0));
    gx1 -= sz1 * (step(vec4<f32>(0.0), gx1) - 0.5);
    gy1 -= sz1 * (step(vec4<f32>(0.0), gy1) - 0.5);

    var g000 = vec3<f32>(gx0.x, gy0.x, gz0.x);
    var g100 = vec3<f32>(gx0.y, gy0.y, gz0.y);
    var g010 = vec3<f32>(gx0.z, gy0.z, gz0.z);
    var g110 = vec3<f32>(gx0.w, gy0.w, gz0.w);
    var g001 = vec3<f32>(gx1.x, gy1.x, gz1.x);
    var g101 = vec3<f32>(gx1.y, gy1.y, gz1.y);
    var g011 = vec3<f32>(gx1.z, gy1.z, gz1.z);
    var g111 = vec3<f32>(gx1.w, gy1.w, gz1.w);

    let norm0 = taylor_inv_sqrt(vec4<f32>(dot(g000, g000), dot(g010, g010), dot(g100, g100), dot(g110, g110)));
    g000 *= norm0.x;
    g010 *= norm0.y;
    g100 *= norm0.z;
    g110 *= norm0.w;
    let norm1 = taylor_inv_sqrt(vec4<f32>(dot(g001, g001), dot(g011, g011), dot(g101, g101), dot(g111, g111)));
    g001 *= norm1.x;
    g011 *= norm1.y;
    g101 *= norm1.z;
    g111 *= norm1.w;

    let n000 = dot(g000, pf0);
    let n100 = dot(g100, vec3<f32>(pf1.x, pf0.yz));
    let n010 = dot(g010, vec3<f32>(pf0.x, pf1.y, pf0.z));
    let n110 = dot(g110, vec3<f32>(pf1.xy, pf0.z));
    let n001 = dot(g001, vec3<f32>(pf0.xy, pf1.z));
    let n101 = dot(g101, vec3<f32>(pf1.x, pf0.y, pf1.z));
    let n011 = dot(g011, vec3<f32>(pf0.x, pf1.yz));
    let n111 = dot(g111, pf1);

    let f = fade(pf0);
    let n_z = mix(vec4<f32>(n000, n100, n010, n110), vec4<f32>(n001, n101, n011, n111), f.z);
    let n_yz = mix(n_z.xy, n_z.zw, f.y);
    return 2.2 * mix(n_yz.x, n_yz.y, f.x);
}

fn rotate_y(v: vec3<f32>, angle: f32) -> vec3<f32> {
    let c = cos(angle);
    let s = sin(angle);
    return vec3<f32>(c * v.x + s * v.z, v.y, -s * v.x + c * v.z);
}

@vertex
fn vs_main(in: VertexInput) -> VertexOutput {
    let t = u.time * u.speed;
    let offset = vec3<f32>(u.pointer.x, 0.0, -u.pointer.y);
    let p = (in.normal + in.position * 0.1 + offset + vec3<f32>(t)) * u.noise_density;
    let distortion = cnoise(p) * u.noise_strength;

    var pos = in.position + in.normal * distortion;
    let angle = sin(pos.y * u.rotation_frequency + t) * u.rotation_amplitude * 0.1;
    pos = rotate_y(pos, angle);

    var out: VertexOutput;
    out.clip_position = u.view_proj * vec4<f32>(pos, 1.0);
    out.distortion = distortion;
    out.normal = rotate_y(in.normal, angle);
    return out;
}

@fragment
fn fs_main(in: VertexOutput) -> @location(0) vec4<f32> {
    let k = clamp(in.distortion * 0.5 + 0.5, 0.0, 1.0);
    let base = mix(u.color_a.rgb, u.color_b.rgb, k);
    let light_dir = normalize(vec3<f32>(0.3, 1.0, 0.5));
    let lighting = 0.6 + 0.4 * max(dot(normalize(in.normal), light_dir), 0.0);
    return vec4<f32>(base * lighting, 1.0);
}
"#;
