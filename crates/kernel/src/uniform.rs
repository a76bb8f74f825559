use glam::Vec2;
use serde::{Deserialize, Serialize};
use shaderloop_common::Color;
use std::collections::BTreeMap;
use std::fmt;

/// The closed set of uniforms the demo shaders understand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UniformName {
    Time,
    NoiseDensity,
    NoiseStrength,
    RotationFrequency,
    RotationAmplitude,
    Speed,
    Pointer,
    ColorA,
    ColorB,
}

impl UniformName {
    pub const ALL: [Self; 9] = [
        Self::Time,
        Self::NoiseDensity,
        Self::NoiseStrength,
        Self::RotationFrequency,
        Self::RotationAmplitude,
        Self::Speed,
        Self::Pointer,
        Self::ColorA,
        Self::ColorB,
    ];

    /// Name of the uniform as declared in shader source.
    pub fn shader_name(self) -> &'static str {
        match self {
            Self::Time => "uTime",
            Self::NoiseDensity => "uNoiseDensity",
            Self::NoiseStrength => "uNoiseStrength",
            Self::RotationFrequency => "uRotationFrequency",
            Self::RotationAmplitude => "uRotationAmplitude",
            Self::Speed => "uSpeed",
            Self::Pointer => "uPointer",
            Self::ColorA => "uColorA",
            Self::ColorB => "uColorB",
        }
    }

    pub fn kind(self) -> UniformKind {
        match self {
            Self::Pointer => UniformKind::Vec2,
            Self::ColorA | Self::ColorB => UniformKind::Color,
            _ => UniformKind::Scalar,
        }
    }
}

impl fmt::Display for UniformName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.shader_name())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UniformKind {
    Scalar,
    Vec2,
    Color,
}

/// Current value of a uniform.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum UniformData {
    Scalar(f32),
    Vec2(Vec2),
    Color(Color),
}

impl UniformData {
    pub fn kind(&self) -> UniformKind {
        match self {
            Self::Scalar(_) => UniformKind::Scalar,
            Self::Vec2(_) => UniformKind::Vec2,
            Self::Color(_) => UniformKind::Color,
        }
    }

    pub fn is_finite(&self) -> bool {
        match self {
            Self::Scalar(v) => v.is_finite(),
            Self::Vec2(v) => v.is_finite(),
            Self::Color(c) => c.is_finite(),
        }
    }
}

impl fmt::Display for UniformData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Scalar(v) => write!(f, "{v:.3}"),
            Self::Vec2(v) => write!(f, "({:.3}, {:.3})", v.x, v.y),
            Self::Color(c) => f.write_str(&c.to_hex()),
        }
    }
}

/// Adjustment range for a scalar uniform.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct UniformRange {
    pub min: f32,
    pub max: f32,
    pub step: f32,
}

impl UniformRange {
    pub const fn new(min: f32, max: f32, step: f32) -> Self {
        Self { min, max, step }
    }

    pub fn clamp(&self, v: f32) -> f32 {
        v.clamp(self.min, self.max)
    }

    /// Clamp and round to the nearest step above `min`.
    pub fn snap(&self, v: f32) -> f32 {
        let steps = ((self.clamp(v) - self.min) / self.step).round();
        self.clamp(self.min + steps * self.step)
    }

    fn is_valid(&self) -> bool {
        self.min.is_finite()
            && self.max.is_finite()
            && self.step.is_finite()
            && self.min <= self.max
            && self.step > 0.0
    }
}

/// One row of a uniform table, as written in config.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct UniformDescriptor {
    pub name: UniformName,
    pub value: UniformData,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub range: Option<UniformRange>,
}

impl UniformDescriptor {
    pub fn scalar(name: UniformName, value: f32) -> Self {
        Self {
            name,
            value: UniformData::Scalar(value),
            range: None,
        }
    }

    pub fn ranged(name: UniformName, value: f32, range: UniformRange) -> Self {
        Self {
            name,
            value: UniformData::Scalar(value),
            range: Some(range),
        }
    }

    pub fn vec2(name: UniformName, value: Vec2) -> Self {
        Self {
            name,
            value: UniformData::Vec2(value),
            range: None,
        }
    }

    pub fn color(name: UniformName, value: Color) -> Self {
        Self {
            name,
            value: UniformData::Color(value),
            range: None,
        }
    }
}

/// Errors from building a uniform table.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum UniformError {
    #[error("uniform {0} declared twice")]
    Duplicate(UniformName),
    #[error("uniform {name} must be {expected:?}, got {found:?}")]
    KindMismatch {
        name: UniformName,
        expected: UniformKind,
        found: UniformKind,
    },
    #[error("uniform {0} has a range but is not a scalar")]
    RangeOnNonScalar(UniformName),
    #[error("uniform {name} has an invalid range {min}..{max} step {step}")]
    InvalidRange {
        name: UniformName,
        min: f32,
        max: f32,
        step: f32,
    },
    #[error("uniform {name} starts at {value}, outside {min}..{max}")]
    OutOfRange {
        name: UniformName,
        value: f32,
        min: f32,
        max: f32,
    },
    #[error("uniform {0} has a non-finite value")]
    NonFinite(UniformName),
    #[error("uniform {0} is required")]
    Missing(UniformName),
    #[error("uniform {0} follows the clock and cannot have a range")]
    ClockDriven(UniformName),
}

#[derive(Debug, Clone, Copy)]
struct Slot {
    value: UniformData,
    range: Option<UniformRange>,
}

/// Validated set of uniform values owned by the loop.
///
/// Construction rejects malformed tables; later writes clamp instead of
/// failing so that GUI input can never put a uniform outside its range.
#[derive(Debug, Clone)]
pub struct UniformSet {
    slots: BTreeMap<UniformName, Slot>,
}

impl UniformSet {
    pub fn new(
        descriptors: impl IntoIterator<Item = UniformDescriptor>,
    ) -> Result<Self, UniformError> {
        let mut slots = BTreeMap::new();
        for d in descriptors {
            let expected = d.name.kind();
            let found = d.value.kind();
            if expected != found {
                return Err(UniformError::KindMismatch {
                    name: d.name,
                    expected,
                    found,
                });
            }
            if !d.value.is_finite() {
                return Err(UniformError::NonFinite(d.name));
            }
            if let Some(range) = d.range {
                if d.name == UniformName::Time {
                    return Err(UniformError::ClockDriven(d.name));
                }
                let UniformData::Scalar(value) = d.value else {
                    return Err(UniformError::RangeOnNonScalar(d.name));
                };
                if !range.is_valid() {
                    return Err(UniformError::InvalidRange {
                        name: d.name,
                        min: range.min,
                        max: range.max,
                        step: range.step,
                    });
                }
                if value < range.min || value > range.max {
                    return Err(UniformError::OutOfRange {
                        name: d.name,
                        value,
                        min: range.min,
                        max: range.max,
                    });
                }
            }
            let slot = Slot {
                value: d.value,
                range: d.range,
            };
            if slots.insert(d.name, slot).is_some() {
                return Err(UniformError::Duplicate(d.name));
            }
        }
        if !slots.contains_key(&UniformName::Time) {
            return Err(UniformError::Missing(UniformName::Time));
        }
        Ok(Self { slots })
    }

    pub fn contains(&self, name: UniformName) -> bool {
        self.slots.contains_key(&name)
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn get(&self, name: UniformName) -> Option<UniformData> {
        self.slots.get(&name).map(|s| s.value)
    }

    pub fn range(&self, name: UniformName) -> Option<UniformRange> {
        self.slots.get(&name).and_then(|s| s.range)
    }

    pub fn scalar(&self, name: UniformName) -> Option<f32> {
        match self.get(name)? {
            UniformData::Scalar(v) => Some(v),
            _ => None,
        }
    }

    pub fn vec2(&self, name: UniformName) -> Option<Vec2> {
        match self.get(name)? {
            UniformData::Vec2(v) => Some(v),
            _ => None,
        }
    }

    pub fn color(&self, name: UniformName) -> Option<Color> {
        match self.get(name)? {
            UniformData::Color(c) => Some(c),
            _ => None,
        }
    }

    /// Write a value. Scalars are clamped to their range. Returns `false`
    /// when the uniform is not declared, the kind differs or the value is
    /// not finite; the stored value is left untouched in that case.
    pub fn set(&mut self, name: UniformName, value: UniformData) -> bool {
        let Some(slot) = self.slots.get_mut(&name) else {
            return false;
        };
        if slot.value.kind() != value.kind() || !value.is_finite() {
            tracing::debug!(uniform = %name, ?value, "rejected uniform write");
            return false;
        }
        slot.value = match (value, slot.range) {
            (UniformData::Scalar(v), Some(range)) => UniformData::Scalar(range.clamp(v)),
            _ => value,
        };
        true
    }

    pub fn set_scalar(&mut self, name: UniformName, value: f32) -> bool {
        self.set(name, UniformData::Scalar(value))
    }

    /// All uniforms in `UniformName` order.
    pub fn iter(&self) -> impl Iterator<Item = (UniformName, UniformData)> + '_ {
        self.slots.iter().map(|(n, s)| (*n, s.value))
    }

    /// The current table, ranges included.
    pub fn descriptors(&self) -> Vec<UniformDescriptor> {
        self.slots
            .iter()
            .map(|(name, s)| UniformDescriptor {
                name: *name,
                value: s.value,
                range: s.range,
            })
            .collect()
    }
}
