use glam::{Mat4, Vec2, Vec3};
use shaderloop_common::Ray;
use std::f32::consts::{PI, TAU};

use crate::config::{CameraSettings, OrbitSettings};

/// Perspective camera that always looks at `target`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    pub position: Vec3,
    pub target: Vec3,
    pub fov_degrees: f32,
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            position: Vec3::new(0.0, 10.0, 10.0),
            target: Vec3::ZERO,
            fov_degrees: 75.0,
            aspect: 1.0,
            near: 0.01,
            far: 1000.0,
        }
    }
}

impl Camera {
    pub fn from_settings(s: &CameraSettings) -> Self {
        Self {
            position: s.position,
            target: s.target,
            fov_degrees: s.fov_degrees,
            near: s.near,
            far: s.far,
            ..Self::default()
        }
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.position, self.target, Vec3::Y)
    }

    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(self.fov_degrees.to_radians(), self.aspect, self.near, self.far)
    }

    pub fn view_projection(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }

    /// Ray from the eye through a point given in normalized device coordinates.
    pub fn picking_ray(&self, ndc: Vec2) -> Ray {
        let inv = self.view_projection().inverse();
        let far = inv.project_point3(Vec3::new(ndc.x, ndc.y, 1.0));
        Ray::new(self.position, far - self.position)
    }
}

const MIN_POLAR: f32 = 1e-4;

/// Damped orbit controls around a fixed target.
///
/// Pending rotation is applied a fraction per update when damping is on, so
/// motion eases out after a drag instead of stopping dead.
#[derive(Debug, Clone, Copy)]
pub struct OrbitControls {
    target: Vec3,
    radius: f32,
    /// Azimuth around +Y, measured from +Z.
    theta: f32,
    /// Polar angle from +Y.
    phi: f32,
    pending_theta: f32,
    pending_phi: f32,
    settings: OrbitSettings,
}

impl OrbitControls {
    pub fn new(position: Vec3, target: Vec3, settings: OrbitSettings) -> Self {
        let offset = position - target;
        let radius = offset.length();
        let (theta, phi) = if radius > 0.0 {
            (
                offset.x.atan2(offset.z),
                (offset.y / radius).clamp(-1.0, 1.0).acos(),
            )
        } else {
            (0.0, PI / 2.0)
        };
        Self {
            target,
            radius: radius.clamp(settings.min_distance, settings.max_distance),
            theta,
            phi,
            pending_theta: 0.0,
            pending_phi: 0.0,
            settings,
        }
    }

    pub fn target(&self) -> Vec3 {
        self.target
    }

    pub fn radius(&self) -> f32 {
        self.radius
    }

    /// Queue a rotation from a pointer drag in pixels.
    pub fn rotate_pixels(&mut self, dx: f32, dy: f32, viewport_height: f32) {
        if viewport_height <= 0.0 || !dx.is_finite() || !dy.is_finite() {
            return;
        }
        let k = TAU / viewport_height * self.settings.rotate_speed;
        self.pending_theta -= dx * k;
        self.pending_phi -= dy * k;
    }

    /// Dolly by wheel steps; positive steps move away from the target.
    pub fn zoom(&mut self, steps: f32) {
        if !steps.is_finite() {
            return;
        }
        let factor = 0.95_f32.powf(-steps * self.settings.zoom_speed);
        self.radius = (self.radius * factor).clamp(self.settings.min_distance, self.settings.max_distance);
    }

    pub fn is_settled(&self) -> bool {
        self.pending_theta.abs() < 1e-6 && self.pending_phi.abs() < 1e-6
    }

    /// Apply pending motion and return the new eye position.
    pub fn update(&mut self) -> Vec3 {
        match self.settings.damping_factor {
            Some(f) => {
                self.theta += self.pending_theta * f;
                self.phi += self.pending_phi * f;
                self.pending_theta *= 1.0 - f;
                self.pending_phi *= 1.0 - f;
            }
            None => {
                self.theta += self.pending_theta;
                self.phi += self.pending_phi;
                self.pending_theta = 0.0;
                self.pending_phi = 0.0;
            }
        }
        self.phi = self.phi.clamp(MIN_POLAR, PI - MIN_POLAR);
        self.position()
    }

    pub fn position(&self) -> Vec3 {
        let sin_phi = self.phi.sin();
        self.target
            + self.radius
                * Vec3::new(
                    sin_phi * self.theta.sin(),
                    self.phi.cos(),
                    sin_phi * self.theta.cos(),
                )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn orbit(damping: Option<f32>) -> OrbitSettings {
        OrbitSettings {
            damping_factor: damping,
            rotate_speed: 1.0,
            zoom_speed: 1.0,
            min_distance: 1.0,
            max_distance: 20.0,
        }
    }

    #[test]
    fn default_camera_matrices_are_finite() {
        let cam = Camera::default();
        let vp = cam.view_projection();
        assert!(vp.is_finite());
    }

    #[test]
    fn center_ray_points_at_target() {
        let cam = Camera {
            position: Vec3::new(0.0, 0.0, 10.0),
            ..Camera::default()
        };
        let ray = cam.picking_ray(Vec2::ZERO);
        assert_eq!(ray.origin, cam.position);
        assert!(ray.dir.abs_diff_eq(Vec3::NEG_Z, 1e-4));
    }

    #[test]
    fn corner_ray_diverges_from_axis() {
        let cam = Camera {
            position: Vec3::new(0.0, 0.0, 10.0),
            aspect: 2.0,
            ..Camera::default()
        };
        let ray = cam.picking_ray(Vec2::new(1.0, 1.0));
        assert!(ray.dir.x > 0.0 && ray.dir.y > 0.0 && ray.dir.z < 0.0);
    }

    #[test]
    fn orbit_preserves_start_position() {
        let start = Vec3::new(2.0, 2.0, 2.0);
        let mut o = OrbitControls::new(start, Vec3::ZERO, orbit(Some(0.05)));
        assert!(o.update().abs_diff_eq(start, 1e-4));
    }

    #[test]
    fn undamped_rotation_applies_at_once() {
        let mut o = OrbitControls::new(Vec3::new(0.0, 0.0, 5.0), Vec3::ZERO, orbit(None));
        // a drag of a quarter of the viewport height turns a quarter circle
        o.rotate_pixels(-100.0, 0.0, 400.0);
        let p = o.update();
        assert!(p.abs_diff_eq(Vec3::new(5.0, 0.0, 0.0), 1e-3));
        assert!(o.is_settled());
    }

    #[test]
    fn damped_rotation_converges() {
        let mut o = OrbitControls::new(Vec3::new(0.0, 0.0, 5.0), Vec3::ZERO, orbit(Some(0.05)));
        o.rotate_pixels(-100.0, 0.0, 400.0);
        let first = o.update();
        assert!(first.x > 0.0 && first.x < 5.0);
        for _ in 0..1000 {
            o.update();
        }
        assert!(o.is_settled());
        assert!(o.position().abs_diff_eq(Vec3::new(5.0, 0.0, 0.0), 1e-3));
    }

    #[test]
    fn polar_angle_is_clamped() {
        let mut o = OrbitControls::new(Vec3::new(0.0, 0.0, 5.0), Vec3::ZERO, orbit(None));
        o.rotate_pixels(0.0, -10_000.0, 100.0);
        let p = o.update();
        assert!(p.is_finite());
        assert!(p.y <= 5.0);
    }

    #[test]
    fn zoom_respects_limits() {
        let mut o = OrbitControls::new(Vec3::new(0.0, 0.0, 5.0), Vec3::ZERO, orbit(None));
        o.zoom(1.0);
        assert!(o.radius() > 5.0);
        o.zoom(1000.0);
        assert_eq!(o.radius(), 20.0);
        o.zoom(-1000.0);
        assert_eq!(o.radius(), 1.0);
        o.zoom(f32::NAN);
        assert_eq!(o.radius(), 1.0);
    }

    #[test]
    fn rotation_ignored_without_viewport() {
        let mut o = OrbitControls::new(Vec3::new(0.0, 0.0, 5.0), Vec3::ZERO, orbit(None));
        o.rotate_pixels(50.0, 50.0, 0.0);
        assert!(o.is_settled());
    }
}
