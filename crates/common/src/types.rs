use glam::{Vec2, Vec3};
use serde::{Deserialize, Serialize};

/// Identifier of a rendered object that intersection queries can report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ObjectId(pub u32);

/// Linear RGBA color with components in `[0, 1]`.
///
/// Serialized as a `#RRGGBB` or `#RRGGBBAA` hex string.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

/// Errors from parsing a hex color string.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ColorParseError {
    #[error("color must start with '#': {0:?}")]
    MissingHash(String),
    #[error("color must have 6 or 8 hex digits, got {0}")]
    BadLength(usize),
    #[error("invalid hex digits in color {0:?}")]
    BadDigit(String),
}

impl Color {
    pub const BLACK: Self = Self::rgb(0.0, 0.0, 0.0);
    pub const WHITE: Self = Self::rgb(1.0, 1.0, 1.0);

    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    pub const fn rgba(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Parse `#RRGGBB` or `#RRGGBBAA`.
    pub fn from_hex(s: &str) -> Result<Self, ColorParseError> {
        let digits = s
            .strip_prefix('#')
            .ok_or_else(|| ColorParseError::MissingHash(s.to_string()))?;
        if digits.len() != 6 && digits.len() != 8 {
            return Err(ColorParseError::BadLength(digits.len()));
        }
        // from_str_radix would accept a sign
        if !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(ColorParseError::BadDigit(s.to_string()));
        }
        let channel = |i: usize| {
            digits
                .get(i..i + 2)
                .and_then(|pair| u8::from_str_radix(pair, 16).ok())
                .map(|v| v as f32 / 255.0)
                .ok_or_else(|| ColorParseError::BadDigit(s.to_string()))
        };
        let a = if digits.len() == 8 { channel(6)? } else { 1.0 };
        Ok(Self::rgba(channel(0)?, channel(2)?, channel(4)?, a))
    }

    pub fn to_hex(&self) -> String {
        let byte = |v: f32| (v.clamp(0.0, 1.0) * 255.0).round() as u8;
        if self.a >= 1.0 {
            format!("#{:02X}{:02X}{:02X}", byte(self.r), byte(self.g), byte(self.b))
        } else {
            format!(
                "#{:02X}{:02X}{:02X}{:02X}",
                byte(self.r),
                byte(self.g),
                byte(self.b),
                byte(self.a)
            )
        }
    }

    pub fn to_array(self) -> [f32; 4] {
        [self.r, self.g, self.b, self.a]
    }

    pub fn is_finite(&self) -> bool {
        self.r.is_finite() && self.g.is_finite() && self.b.is_finite() && self.a.is_finite()
    }
}

impl TryFrom<String> for Color {
    type Error = ColorParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_hex(&value)
    }
}

impl From<Color> for String {
    fn from(c: Color) -> Self {
        c.to_hex()
    }
}

/// Drawable area reported by the host, in physical pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
    pub pixel_ratio: f32,
}

impl Viewport {
    pub fn new(width: u32, height: u32, pixel_ratio: f32) -> Self {
        Self {
            width,
            height,
            pixel_ratio,
        }
    }

    /// A viewport is usable only with both dimensions positive.
    pub fn is_valid(&self) -> bool {
        self.width > 0 && self.height > 0
    }

    /// Width over height, or `None` for a degenerate viewport.
    pub fn aspect(&self) -> Option<f32> {
        self.is_valid()
            .then(|| self.width as f32 / self.height as f32)
    }

    /// Copy with the pixel ratio capped at `max` (non-finite ratios become 1).
    pub fn with_pixel_ratio_cap(self, max: f32) -> Self {
        let ratio = if self.pixel_ratio.is_finite() && self.pixel_ratio > 0.0 {
            self.pixel_ratio.min(max)
        } else {
            1.0
        };
        Self {
            pixel_ratio: ratio,
            ..self
        }
    }
}

/// How a variant expresses a normalized pointer position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PointerConvention {
    /// `[-1, 1]` on both axes, +y up (normalized device coordinates).
    #[default]
    Centered,
    /// `[0, 1]` on both axes, +y down (page coordinates).
    Unit,
}

impl PointerConvention {
    /// Map a position in `[0,1]` page space (+y down) into this convention.
    pub fn from_page(self, page: Vec2) -> Vec2 {
        match self {
            Self::Centered => Vec2::new(page.x * 2.0 - 1.0, 1.0 - page.y * 2.0),
            Self::Unit => page,
        }
    }

    /// Map a position in this convention to normalized device coordinates.
    pub fn to_ndc(self, p: Vec2) -> Vec2 {
        match self {
            Self::Centered => p,
            Self::Unit => Vec2::new(p.x * 2.0 - 1.0, 1.0 - p.y * 2.0),
        }
    }

    /// Clamp a position into this convention's range.
    pub fn clamp(self, p: Vec2) -> Vec2 {
        match self {
            Self::Centered => p.clamp(Vec2::splat(-1.0), Vec2::ONE),
            Self::Unit => p.clamp(Vec2::ZERO, Vec2::ONE),
        }
    }
}

/// A half-line used for picking.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    pub origin: Vec3,
    /// Unit direction.
    pub dir: Vec3,
}

impl Ray {
    pub fn new(origin: Vec3, dir: Vec3) -> Self {
        Self {
            origin,
            dir: dir.normalize_or_zero(),
        }
    }

    pub fn at(&self, t: f32) -> Vec3 {
        self.origin + self.dir * t
    }
}

/// One ray intersection reported by the rendering collaborator.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hit {
    pub object: ObjectId,
    pub distance: f32,
    pub point: Vec3,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clear_color_parses() {
        let c = Color::from_hex("#151B26").unwrap();
        assert!((c.r - 0x15 as f32 / 255.0).abs() < 1e-6);
        assert!((c.b - 0x26 as f32 / 255.0).abs() < 1e-6);
        assert_eq!(c.a, 1.0);
        assert_eq!(c.to_hex(), "#151B26");
    }

    #[test]
    fn color_rejects_malformed() {
        assert!(matches!(
            Color::from_hex("151B26"),
            Err(ColorParseError::MissingHash(_))
        ));
        assert!(matches!(
            Color::from_hex("#151B2"),
            Err(ColorParseError::BadLength(5))
        ));
        assert!(matches!(
            Color::from_hex("#15ZZ26"),
            Err(ColorParseError::BadDigit(_))
        ));
        assert!(matches!(
            Color::from_hex("#+F+F+F"),
            Err(ColorParseError::BadDigit(_))
        ));
    }

    #[test]
    fn degenerate_viewport_has_no_aspect() {
        assert_eq!(Viewport::new(0, 0, 1.0).aspect(), None);
        assert_eq!(Viewport::new(800, 0, 1.0).aspect(), None);
        assert_eq!(Viewport::new(800, 400, 1.0).aspect(), Some(2.0));
    }

    #[test]
    fn pixel_ratio_is_capped() {
        let v = Viewport::new(10, 10, 3.0).with_pixel_ratio_cap(2.0);
        assert_eq!(v.pixel_ratio, 2.0);
        let v = Viewport::new(10, 10, f32::NAN).with_pixel_ratio_cap(2.0);
        assert_eq!(v.pixel_ratio, 1.0);
    }

    #[test]
    fn page_corners_map_into_conventions() {
        let top_left = Vec2::new(0.0, 0.0);
        assert_eq!(
            PointerConvention::Centered.from_page(top_left),
            Vec2::new(-1.0, 1.0)
        );
        assert_eq!(PointerConvention::Unit.from_page(top_left), top_left);
        let p = Vec2::new(0.25, 0.75);
        assert_eq!(
            PointerConvention::Unit.to_ndc(p),
            PointerConvention::Centered.from_page(p)
        );
    }

    #[test]
    fn ray_direction_is_normalized() {
        let r = Ray::new(Vec3::ZERO, Vec3::new(0.0, 0.0, -4.0));
        assert_eq!(r.dir, Vec3::NEG_Z);
        assert_eq!(r.at(2.0), Vec3::new(0.0, 0.0, -2.0));
    }
}
