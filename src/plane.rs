use crate::hitable::*;
use crate::math::*;

pub struct Plane {
    point: Vec3,
    normal: Vec3,
}

impl Plane {
    pub fn new(point: Vec3, normal: Vec3) -> Plane {
        Plane {
            point,
            normal,
        }
    }
}

impl Hitable for Plane {
    fn try_hit(&self, ray: &Ray, min_ray_param: f32, max_ray_param: f32) -> Option<RayHit> {
        let denominator = ray.direction().dot(&self.normal);

        // parallel to the plane
        if denominator.abs() < EPSILON {
            return None;
        }

        let t = (self.point - *ray.origin()).dot(&self.normal) / denominator;
        if t < min_ray_param || t > max_ray_param {
            return None;
        }

        Some(RayHit::new(t, ray.point_at_parameter(t), self.normal))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parallel_ray_misses() {
        let plane = Plane::new(Vec3::new(0.0, -1.0, 0.0), Vec3::new(0.0, 1.0, 0.0));
        let ray = Ray::new(Vec3::ZERO, Vec3::new(1.0, 0.0, 3.0));
        assert!(plane.try_hit(&ray, 1e-4, std::f32::INFINITY).is_none());
    }

    #[test]
    fn normal_is_not_flipped_towards_ray() {
        let normal = Vec3::new(0.0, 2.0, 0.0);
        let plane = Plane::new(Vec3::new(0.0, -1.0, 0.0), normal);

        let from_above = Ray::new(Vec3::ZERO, Vec3::new(0.0, -1.0, 1.0));
        let hit = plane.try_hit(&from_above, 1e-4, std::f32::INFINITY).unwrap();
        assert!(is_almost_equal(hit.ray_param, 1.0, 1e-6));
        assert_eq!(hit.hitpoint, Vec3::new(0.0, -1.0, 1.0));
        assert_eq!(hit.raw_normal, normal);

        let from_below = Ray::new(Vec3::new(0.0, -2.0, 0.0), Vec3::new(0.0, 1.0, 0.0));
        let hit = plane.try_hit(&from_below, 1e-4, std::f32::INFINITY).unwrap();
        assert_eq!(hit.raw_normal, normal);
    }

    #[test]
    fn plane_behind_ray_misses() {
        let plane = Plane::new(Vec3::new(0.0, -1.0, 0.0), Vec3::new(0.0, 1.0, 0.0));
        let ray = Ray::new(Vec3::ZERO, Vec3::new(0.0, 1.0, 0.0));
        assert!(plane.try_hit(&ray, 1e-4, std::f32::INFINITY).is_none());
    }
}
