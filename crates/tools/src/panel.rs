use serde::Serialize;
use shaderloop_common::Color;
use shaderloop_kernel::{UniformData, UniformName, UniformSet};

/// Widget a uniform is edited with.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "widget", rename_all = "snake_case")]
pub enum ControlKind {
    Slider { min: f32, max: f32, step: f32 },
    ColorPicker,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Control {
    pub name: UniformName,
    pub label: &'static str,
    pub kind: ControlKind,
}

/// Toolkit-independent model of the debug slider panel.
///
/// Ranged scalars get sliders and colors get pickers. Time and the pointer
/// are driven by the loop and are not exposed.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ControlPanel {
    controls: Vec<Control>,
}

impl ControlPanel {
    pub fn from_uniforms(uniforms: &UniformSet) -> Self {
        let controls = uniforms
            .iter()
            .filter_map(|(name, value)| {
                let kind = match value {
                    UniformData::Scalar(_) => {
                        let r = uniforms.range(name)?;
                        ControlKind::Slider {
                            min: r.min,
                            max: r.max,
                            step: r.step,
                        }
                    }
                    UniformData::Color(_) => ControlKind::ColorPicker,
                    UniformData::Vec2(_) => return None,
                };
                Some(Control {
                    name,
                    label: name.shader_name(),
                    kind,
                })
            })
            .collect();
        Self { controls }
    }

    pub fn controls(&self) -> &[Control] {
        &self.controls
    }

    pub fn get(&self, name: UniformName) -> Option<&Control> {
        self.controls.iter().find(|c| c.name == name)
    }

    /// Set a slider value, snapped to its step. Returns whether it applied.
    pub fn apply_scalar(&self, uniforms: &mut UniformSet, name: UniformName, value: f32) -> bool {
        let range = match (self.get(name).map(|c| c.kind), uniforms.range(name)) {
            (Some(ControlKind::Slider { .. }), Some(range)) if value.is_finite() => range,
            _ => {
                tracing::debug!(uniform = %name, value, "slider write rejected");
                return false;
            }
        };
        uniforms.set_scalar(name, range.snap(value))
    }

    pub fn apply_color(&self, uniforms: &mut UniformSet, name: UniformName, color: Color) -> bool {
        if !matches!(self.get(name).map(|c| c.kind), Some(ControlKind::ColorPicker)) {
            tracing::debug!(uniform = %name, "color write rejected");
            return false;
        }
        uniforms.set(name, UniformData::Color(color))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shaderloop_kernel::{DemoConfig, Variant};

    fn uniforms() -> UniformSet {
        DemoConfig::for_variant(Variant::Orbit).build_uniforms().unwrap()
    }

    #[test]
    fn panel_lists_adjustable_uniforms() {
        let u = uniforms();
        let panel = ControlPanel::from_uniforms(&u);
        assert!(panel.get(UniformName::Time).is_none());
        assert!(panel.get(UniformName::Pointer).is_none());
        assert_eq!(
            panel.get(UniformName::Speed).map(|c| c.kind),
            Some(ControlKind::Slider {
                min: 0.0,
                max: 4.0,
                step: 0.001
            })
        );
        assert_eq!(
            panel.get(UniformName::ColorA).map(|c| c.kind),
            Some(ControlKind::ColorPicker)
        );
        assert_eq!(panel.controls().len(), 7);
    }

    #[test]
    fn slider_values_are_clamped_and_snapped() {
        let mut u = uniforms();
        let panel = ControlPanel::from_uniforms(&u);
        assert!(panel.apply_scalar(&mut u, UniformName::NoiseStrength, 42.0));
        assert_eq!(u.scalar(UniformName::NoiseStrength), Some(10.0));
        assert!(panel.apply_scalar(&mut u, UniformName::Speed, 1.23456));
        let v = u.scalar(UniformName::Speed).unwrap();
        assert!((v - 1.235).abs() < 1e-4);
        assert!(!panel.apply_scalar(&mut u, UniformName::Speed, f32::NAN));
    }

    #[test]
    fn loop_driven_uniforms_are_not_editable() {
        let mut u = uniforms();
        let panel = ControlPanel::from_uniforms(&u);
        assert!(!panel.apply_scalar(&mut u, UniformName::Time, 5.0));
        assert_eq!(u.scalar(UniformName::Time), Some(0.0));
        assert!(!panel.apply_color(&mut u, UniformName::NoiseDensity, Color::WHITE));
    }

    #[test]
    fn color_edits_apply() {
        let mut u = uniforms();
        let panel = ControlPanel::from_uniforms(&u);
        assert!(panel.apply_color(&mut u, UniformName::ColorB, Color::WHITE));
        assert_eq!(u.color(UniformName::ColorB), Some(Color::WHITE));
    }
}
