//! Demo configuration: the built-in variants and their YAML form.

use glam::{Vec2, Vec3};
use serde::{Deserialize, Serialize};
use shaderloop_common::{Color, ObjectId, PointerConvention};
use std::fmt;
use std::path::Path;
use std::str::FromStr;

use crate::transition::Easing;
use crate::uniform::{UniformDescriptor, UniformError, UniformName, UniformRange, UniformSet};

/// Errors from loading or validating a demo configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("uniform table: {0}")]
    Uniform(#[from] UniformError),
    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Which demo scene to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Variant {
    /// Sphere with damped orbit controls.
    Orbit,
    /// Sphere whose noise and framing follow the page scroll position.
    Scroll,
    /// Sphere that swells while the pointer is over it.
    Hover,
    /// Displaced plane that follows the pointer.
    Plane,
}

impl Variant {
    pub const ALL: [Self; 4] = [Self::Orbit, Self::Scroll, Self::Hover, Self::Plane];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Orbit => "orbit",
            Self::Scroll => "scroll",
            Self::Hover => "hover",
            Self::Plane => "plane",
        }
    }
}

impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Variant {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|v| v.as_str() == s)
            .ok_or_else(|| ConfigError::Invalid(format!("unknown variant {s:?}")))
    }
}

/// Mesh the shader is applied to.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Geometry {
    /// Subdivided icosahedron; `detail` splits every edge into `detail + 1`.
    Sphere { radius: f32, detail: u32 },
    /// Plane in the XZ plane centered at the origin.
    Plane { width: f32, depth: f32, segments: u32 },
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CameraSettings {
    pub position: Vec3,
    pub target: Vec3,
    pub fov_degrees: f32,
    pub near: f32,
    pub far: f32,
}

impl CameraSettings {
    fn at(position: Vec3) -> Self {
        Self {
            position,
            target: Vec3::ZERO,
            fov_degrees: 75.0,
            near: 0.01,
            far: 1000.0,
        }
    }
}

/// Pointer-over-mesh behaviour.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HoverPolicy {
    /// Object whose membership in the hit list counts as hovering.
    pub target: ObjectId,
    pub uniform: UniformName,
    pub active: f32,
    pub inactive: f32,
    pub duration: f32,
}

/// Scroll-threshold behaviour.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScrollPolicy {
    pub uniform: UniformName,
    /// Below this the scene returns to rest; above it the uniform is raised.
    pub lower_threshold: f32,
    /// Above this the camera moves to the framing position.
    pub upper_threshold: f32,
    pub rest_value: f32,
    pub raised_value: f32,
    pub value_duration: f32,
    pub rest_camera: Vec3,
    pub framing_camera: Vec3,
    pub camera_duration: f32,
}

impl Default for ScrollPolicy {
    fn default() -> Self {
        Self {
            uniform: UniformName::NoiseDensity,
            lower_threshold: 0.1,
            upper_threshold: 0.4,
            rest_value: 0.0,
            raised_value: 1.8,
            value_duration: 0.2,
            rest_camera: Vec3::new(0.0, 10.0, 10.0),
            framing_camera: Vec3::new(2.0, 15.0, 15.0),
            camera_duration: 1.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OrbitSettings {
    /// Fraction of pending rotation applied per tick; `None` disables damping.
    pub damping_factor: Option<f32>,
    pub rotate_speed: f32,
    pub zoom_speed: f32,
    pub min_distance: f32,
    pub max_distance: f32,
}

impl Default for OrbitSettings {
    fn default() -> Self {
        Self {
            damping_factor: Some(0.05),
            rotate_speed: 1.0,
            zoom_speed: 1.0,
            min_distance: 0.5,
            max_distance: 100.0,
        }
    }
}

/// Everything one demo variant needs to run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DemoConfig {
    pub variant: Variant,
    pub geometry: Geometry,
    /// Identifier the mesh is registered under for intersection queries.
    pub mesh_id: ObjectId,
    pub camera: CameraSettings,
    pub pointer: PointerConvention,
    pub uniforms: Vec<UniformDescriptor>,
    #[serde(default)]
    pub hover: Option<HoverPolicy>,
    #[serde(default)]
    pub scroll: Option<ScrollPolicy>,
    #[serde(default)]
    pub orbit: Option<OrbitSettings>,
    /// Copy the pointer position into `uPointer` every tick.
    #[serde(default)]
    pub bind_pointer: bool,
    #[serde(default)]
    pub easing: Easing,
    pub clear_color: Color,
    pub max_pixel_ratio: f32,
    /// Scrollable page height as a multiple of the viewport height.
    pub page_height_factor: f32,
}

const SPHERE: Geometry = Geometry::Sphere {
    radius: 5.0,
    detail: 48,
};

const MESH: ObjectId = ObjectId(1);

fn uniform_table(density: f32) -> Vec<UniformDescriptor> {
    let gui = UniformRange::new(0.0, 10.0, 0.001);
    vec![
        UniformDescriptor::scalar(UniformName::Time, 0.0),
        UniformDescriptor::ranged(UniformName::NoiseDensity, density, gui),
        UniformDescriptor::ranged(UniformName::NoiseStrength, 1.0, gui),
        UniformDescriptor::ranged(UniformName::RotationFrequency, 3.0, gui),
        UniformDescriptor::ranged(UniformName::RotationAmplitude, 6.0, gui),
        UniformDescriptor::ranged(UniformName::Speed, 0.2, UniformRange::new(0.0, 4.0, 0.001)),
        UniformDescriptor::vec2(UniformName::Pointer, Vec2::ZERO),
        UniformDescriptor::color(UniformName::ColorA, Color::rgb(0.184, 0.502, 0.929)),
        UniformDescriptor::color(UniformName::ColorB, Color::rgb(0.949, 0.6, 0.29)),
    ]
}

impl DemoConfig {
    /// Built-in defaults for a variant.
    pub fn for_variant(variant: Variant) -> Self {
        let base = Self {
            variant,
            geometry: SPHERE,
            mesh_id: MESH,
            camera: CameraSettings::at(Vec3::new(0.0, 10.0, 10.0)),
            pointer: PointerConvention::Centered,
            uniforms: uniform_table(0.0),
            hover: None,
            scroll: None,
            orbit: None,
            bind_pointer: false,
            easing: Easing::default(),
            clear_color: Color::rgb(0x15 as f32 / 255.0, 0x1B as f32 / 255.0, 0x26 as f32 / 255.0),
            max_pixel_ratio: 2.0,
            page_height_factor: 4.0,
        };
        match variant {
            Variant::Orbit => Self {
                camera: CameraSettings::at(Vec3::new(2.0, 2.0, 2.0)),
                uniforms: uniform_table(1.5),
                orbit: Some(OrbitSettings::default()),
                ..base
            },
            Variant::Scroll => Self {
                scroll: Some(ScrollPolicy::default()),
                ..base
            },
            Variant::Hover => Self {
                camera: CameraSettings::at(Vec3::new(0.0, 0.0, 14.0)),
                hover: Some(HoverPolicy {
                    target: MESH,
                    uniform: UniformName::NoiseDensity,
                    active: 1.5,
                    inactive: 0.0,
                    duration: 0.2,
                }),
                bind_pointer: true,
                ..base
            },
            Variant::Plane => Self {
                geometry: Geometry::Plane {
                    width: 12.0,
                    depth: 12.0,
                    segments: 128,
                },
                camera: CameraSettings::at(Vec3::new(0.0, 6.0, 10.0)),
                pointer: PointerConvention::Unit,
                uniforms: uniform_table(1.0),
                bind_pointer: true,
                ..base
            },
        }
    }

    pub fn from_yaml_str(s: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_yaml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&text)
    }

    pub fn to_yaml(&self) -> Result<String, ConfigError> {
        Ok(serde_yaml::to_string(self)?)
    }

    /// Build the uniform set this config declares.
    pub fn build_uniforms(&self) -> Result<UniformSet, ConfigError> {
        Ok(UniformSet::new(self.uniforms.iter().copied())?)
    }

    /// Check cross-field constraints and build the uniform table once.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let uniforms = self.build_uniforms()?;
        let invalid = |msg: String| Err(ConfigError::Invalid(msg));

        let scalar = |name: UniformName| uniforms.scalar(name).is_some();
        let duration_ok = |d: f32| d.is_finite() && d >= 0.0;
        let in_range = |name: UniformName, v: f32| {
            uniforms
                .range(name)
                .is_none_or(|r| v >= r.min && v <= r.max)
        };

        match self.geometry {
            Geometry::Sphere { radius, .. } if !(radius > 0.0) => {
                return invalid(format!("sphere radius must be positive, got {radius}"));
            }
            Geometry::Plane { width, depth, segments } if !(width > 0.0 && depth > 0.0) || segments == 0 => {
                return invalid("plane needs a positive size and at least one segment".into());
            }
            _ => {}
        }
        let cam = &self.camera;
        if !(cam.near > 0.0 && cam.far > cam.near && cam.fov_degrees > 0.0 && cam.fov_degrees < 180.0) {
            return invalid("camera needs 0 < near < far and 0 < fov < 180".into());
        }
        if cam.position == cam.target {
            return invalid("camera position and target coincide".into());
        }
        if let Some(h) = &self.hover {
            if !scalar(h.uniform) {
                return invalid(format!("hover uniform {} is not a declared scalar", h.uniform));
            }
            if !duration_ok(h.duration) || !h.active.is_finite() || !h.inactive.is_finite() {
                return invalid("hover values must be finite with a non-negative duration".into());
            }
            if !in_range(h.uniform, h.active) || !in_range(h.uniform, h.inactive) {
                return invalid(format!("hover values are outside the range of {}", h.uniform));
            }
        }
        if let Some(s) = &self.scroll {
            if !scalar(s.uniform) {
                return invalid(format!("scroll uniform {} is not a declared scalar", s.uniform));
            }
            if !(s.lower_threshold <= s.upper_threshold) {
                return invalid("scroll lower threshold must not exceed the upper one".into());
            }
            if !duration_ok(s.value_duration) || !duration_ok(s.camera_duration) {
                return invalid("scroll durations must be finite and non-negative".into());
            }
            if !in_range(s.uniform, s.rest_value) || !in_range(s.uniform, s.raised_value) {
                return invalid(format!("scroll values are outside the range of {}", s.uniform));
            }
        }
        if let Some(o) = &self.orbit {
            if self.scroll.is_some() {
                return invalid("orbit controls and scroll framing both drive the camera".into());
            }
            if let Some(f) = o.damping_factor {
                if !(f > 0.0 && f <= 1.0) {
                    return invalid(format!("damping factor must be in (0, 1], got {f}"));
                }
            }
            if !(o.min_distance >= 0.0 && o.max_distance >= o.min_distance) {
                return invalid("orbit distance limits are inverted".into());
            }
        }
        if self.bind_pointer && uniforms.vec2(UniformName::Pointer).is_none() {
            return invalid("bind_pointer requires a uPointer uniform".into());
        }
        if !(self.max_pixel_ratio > 0.0) {
            return invalid("max_pixel_ratio must be positive".into());
        }
        if !(self.page_height_factor >= 1.0) {
            return invalid("page_height_factor must be at least 1".into());
        }
        Ok(())
    }
}
