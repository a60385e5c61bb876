use std::sync::Arc;

use crate::color::Color;
use crate::math::*;

#[derive(Debug, Clone, Copy)]
pub struct RayHit {
    pub ray_param: f32,
    pub hitpoint: Vec3,
    /// Not normalized, oriented the way the producing target defines it.
    pub raw_normal: Vec3,
}

impl RayHit {
    pub fn new(ray_param: f32, hitpoint: Vec3, raw_normal: Vec3) -> RayHit {
        RayHit {
            ray_param,
            hitpoint,
            raw_normal,
        }
    }

    pub fn unit_normal(&self) -> Vec3 {
        self.raw_normal.normalized()
    }

    pub fn is_at_infinity(&self) -> bool {
        self.ray_param.is_infinite()
    }
}

pub trait Hitable: Send + Sync {
    /// Reports the hit on this target with a parameter in `[min_ray_param, max_ray_param]`.
    fn try_hit(&self, ray: &Ray, min_ray_param: f32, max_ray_param: f32) -> Option<RayHit>;

    /// Colour seen by a ray whose nearest hit on this target lies at infinity.
    fn color_at_infinity(&self, _ray: &Ray) -> Option<Color> {
        None
    }
}

pub type ThreadsafeHitable = dyn Hitable + 'static;

pub struct Composite {
    targets: Vec<Arc<ThreadsafeHitable>>,
}

impl Composite {
    pub fn new(targets: Vec<Arc<ThreadsafeHitable>>) -> Composite {
        Composite { targets }
    }

    pub fn len(&self) -> usize {
        self.targets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }
}

impl Hitable for Composite {
    fn try_hit(&self, ray: &Ray, min_ray_param: f32, max_ray_param: f32) -> Option<RayHit> {
        let mut closest_so_far = max_ray_param;
        let mut result = None;

        for target in &self.targets {
            if closest_so_far < min_ray_param {
                break;
            }

            if let Some(hit) = target.try_hit(ray, min_ray_param, closest_so_far) {
                debug_assert!(hit.ray_param <= closest_so_far);

                closest_so_far = hit.ray_param;
                result = Some(hit);
            }
        }

        result
    }

    fn color_at_infinity(&self, ray: &Ray) -> Option<Color> {
        self.targets.iter().filter_map(|target| target.color_at_infinity(ray)).next()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plane::Plane;
    use crate::skybox::SkyboxGradient;
    use crate::sphere::Sphere;

    fn targets() -> Vec<Arc<ThreadsafeHitable>> {
        vec![
            Arc::new(Sphere::new(Vec3::new(0.0, 0.0, 10.0), 1.0)),
            Arc::new(Sphere::new(Vec3::new(0.0, 0.0, 4.0), 1.0)),
            Arc::new(Plane::new(Vec3::new(0.0, 0.0, 6.0), Vec3::new(0.0, 0.0, 1.0))),
            Arc::new(Sphere::new(Vec3::new(5.0, 0.0, 4.0), 1.0)),
        ]
    }

    #[test]
    fn nearest_hit_wins() {
        let ray = Ray::new(Vec3::ZERO, Vec3::new(0.0, 0.0, 1.0));
        let children = targets();

        let min_child_param = children.iter()
            .filter_map(|target| target.try_hit(&ray, 1e-4, std::f32::INFINITY))
            .map(|hit| hit.ray_param)
            .fold(std::f32::INFINITY, f32::min);

        let hit = Composite::new(children).try_hit(&ray, 1e-4, std::f32::INFINITY).unwrap();
        assert!(hit.ray_param <= min_child_param);
        assert!(is_almost_equal(hit.ray_param, 3.0, 1e-5));
    }

    #[test]
    fn result_does_not_depend_on_order() {
        let ray = Ray::new(Vec3::new(0.0, 0.2, 0.0), Vec3::new(0.0, 0.0, 2.0));
        let mut children = targets();
        let forward = Composite::new(children.clone()).try_hit(&ray, 1e-4, std::f32::INFINITY).unwrap();
        children.reverse();
        let backward = Composite::new(children).try_hit(&ray, 1e-4, std::f32::INFINITY).unwrap();

        assert_eq!(forward.ray_param, backward.ray_param);
        assert_eq!(forward.hitpoint, backward.hitpoint);
    }

    #[test]
    fn skybox_sentinel_only_reports_without_finite_hits() {
        let sky: Arc<ThreadsafeHitable> = Arc::new(SkyboxGradient::new(Color::WHITE, Color::BLUE));
        let mut children = targets();
        children.push(sky);
        let composite = Composite::new(children);

        let towards_spheres = Ray::new(Vec3::ZERO, Vec3::new(0.0, 0.0, 1.0));
        let hit = composite.try_hit(&towards_spheres, 1e-4, std::f32::INFINITY).unwrap();
        assert!(!hit.is_at_infinity());

        let away = Ray::new(Vec3::ZERO, Vec3::new(0.0, 0.0, -1.0));
        let hit = composite.try_hit(&away, 1e-4, std::f32::INFINITY).unwrap();
        assert!(hit.is_at_infinity());
        assert!(composite.color_at_infinity(&away).is_some());
    }

    #[test]
    fn empty_range_finds_nothing() {
        let ray = Ray::new(Vec3::ZERO, Vec3::new(0.0, 0.0, 1.0));
        let composite = Composite::new(targets());
        assert!(composite.try_hit(&ray, 1e-4, 1.0).is_none());
        assert!(Composite::new(vec![]).try_hit(&ray, 1e-4, std::f32::INFINITY).is_none());
    }
}
