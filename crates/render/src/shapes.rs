use glam::Vec3;
use shaderloop_common::{Hit, ObjectId, Ray};
use shaderloop_kernel::{Geometry, Intersector};

/// Analytic stand-in for a mesh. Vertex displacement is not modelled, so
/// hits are against the undisplaced surface.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Shape {
    Sphere { center: Vec3, radius: f32 },
    /// Horizontal rectangle facing +Y.
    Plane { center: Vec3, width: f32, depth: f32 },
}

impl Shape {
    pub fn from_geometry(geometry: &Geometry) -> Self {
        match *geometry {
            Geometry::Sphere { radius, .. } => Self::Sphere {
                center: Vec3::ZERO,
                radius,
            },
            Geometry::Plane { width, depth, .. } => Self::Plane {
                center: Vec3::ZERO,
                width,
                depth,
            },
        }
    }

    /// Ray parameters of every crossing with the surface, ascending.
    fn crossings(&self, ray: &Ray) -> Vec<f32> {
        match *self {
            Self::Sphere { center, radius } => {
                let oc = ray.origin - center;
                let b = oc.dot(ray.dir);
                let c = oc.length_squared() - radius * radius;
                let disc = b * b - c;
                if disc < 0.0 {
                    return Vec::new();
                }
                let s = disc.sqrt();
                [-b - s, -b + s].into_iter().filter(|t| *t >= 0.0).collect()
            }
            Self::Plane {
                center,
                width,
                depth,
            } => {
                if ray.dir.y.abs() < 1e-8 {
                    return Vec::new();
                }
                let t = (center.y - ray.origin.y) / ray.dir.y;
                let p = ray.at(t) - center;
                if t >= 0.0 && p.x.abs() <= width / 2.0 && p.z.abs() <= depth / 2.0 {
                    vec![t]
                } else {
                    Vec::new()
                }
            }
        }
    }
}

/// A set of analytic shapes answering ray queries on the CPU.
#[derive(Debug, Clone, Default)]
pub struct ShapeScene {
    shapes: Vec<(ObjectId, Shape)>,
}

impl ShapeScene {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_geometry(id: ObjectId, geometry: &Geometry) -> Self {
        let mut scene = Self::new();
        scene.insert(id, Shape::from_geometry(geometry));
        scene
    }

    /// Add or replace the shape registered under `id`.
    pub fn insert(&mut self, id: ObjectId, shape: Shape) {
        match self.shapes.iter_mut().find(|(i, _)| *i == id) {
            Some(slot) => slot.1 = shape,
            None => self.shapes.push((id, shape)),
        }
    }

    pub fn len(&self) -> usize {
        self.shapes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }
}

impl Intersector for ShapeScene {
    fn intersect(&self, ray: &Ray, object: ObjectId) -> Vec<Hit> {
        let mut hits: Vec<Hit> = self
            .shapes
            .iter()
            .filter(|(id, _)| *id == object)
            .flat_map(|(id, shape)| {
                shape.crossings(ray).into_iter().map(move |t| Hit {
                    object: *id,
                    distance: t,
                    point: ray.at(t),
                })
            })
            .collect();
        hits.sort_by(|a, b| a.distance.total_cmp(&b.distance));
        hits
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sphere_scene() -> ShapeScene {
        ShapeScene::from_geometry(
            ObjectId(1),
            &Geometry::Sphere {
                radius: 5.0,
                detail: 8,
            },
        )
    }

    #[test]
    fn ray_through_center_hits_twice() {
        let ray = Ray::new(Vec3::new(0.0, 0.0, 14.0), Vec3::NEG_Z);
        let hits = sphere_scene().intersect(&ray, ObjectId(1));
        assert_eq!(hits.len(), 2);
        assert!((hits[0].distance - 9.0).abs() < 1e-4);
        assert!((hits[1].distance - 19.0).abs() < 1e-4);
        assert!(hits[0].point.abs_diff_eq(Vec3::new(0.0, 0.0, 5.0), 1e-4));
    }

    #[test]
    fn ray_past_sphere_misses() {
        let ray = Ray::new(Vec3::new(0.0, 6.0, 14.0), Vec3::NEG_Z);
        assert!(sphere_scene().intersect(&ray, ObjectId(1)).is_empty());
    }

    #[test]
    fn sphere_behind_origin_misses() {
        let ray = Ray::new(Vec3::new(0.0, 0.0, 14.0), Vec3::Z);
        assert!(sphere_scene().intersect(&ray, ObjectId(1)).is_empty());
    }

    #[test]
    fn other_ids_are_not_reported() {
        let ray = Ray::new(Vec3::new(0.0, 0.0, 14.0), Vec3::NEG_Z);
        assert!(sphere_scene().intersect(&ray, ObjectId(2)).is_empty());
    }

    #[test]
    fn plane_hit_within_bounds() {
        let scene = ShapeScene::from_geometry(
            ObjectId(3),
            &Geometry::Plane {
                width: 12.0,
                depth: 12.0,
                segments: 4,
            },
        );
        let down = Ray::new(Vec3::new(1.0, 6.0, 1.0), Vec3::NEG_Y);
        let hits = scene.intersect(&down, ObjectId(3));
        assert_eq!(hits.len(), 1);
        assert!((hits[0].distance - 6.0).abs() < 1e-5);

        let outside = Ray::new(Vec3::new(7.0, 6.0, 0.0), Vec3::NEG_Y);
        assert!(scene.intersect(&outside, ObjectId(3)).is_empty());
        let parallel = Ray::new(Vec3::new(0.0, 1.0, 0.0), Vec3::X);
        assert!(scene.intersect(&parallel, ObjectId(3)).is_empty());
    }

    #[test]
    fn insert_replaces_existing_id() {
        let mut scene = sphere_scene();
        scene.insert(
            ObjectId(1),
            Shape::Sphere {
                center: Vec3::ZERO,
                radius: 1.0,
            },
        );
        assert_eq!(scene.len(), 1);
        let ray = Ray::new(Vec3::new(0.0, 2.0, 14.0), Vec3::NEG_Z);
        assert!(scene.intersect(&ray, ObjectId(1)).is_empty());
    }
}
