use crate::hitable::*;
use crate::math::*;

pub struct Sphere {
    center: Vec3,
    radius: f32,
}

impl Sphere {
    pub fn new(center: Vec3, radius: f32) -> Sphere {
        debug_assert!(radius > 0.0, "sphere radius must be positive");
        Sphere {
            center,
            radius,
        }
    }

    pub fn center(&self) -> &Vec3 {
        &self.center
    }

    pub fn radius(&self) -> f32 {
        self.radius
    }
}

impl Hitable for Sphere {
    fn try_hit(&self, ray: &Ray, min_ray_param: f32, max_ray_param: f32) -> Option<RayHit> {
        // |O + tD - C|^2 = r^2
        let oc = *ray.origin() - self.center;
        let (near, far) = solve_quadratic(
            ray.direction().dot(ray.direction()),
            2.0*oc.dot(ray.direction()),
            oc.dot(&oc) - self.radius*self.radius
        )?;

        let in_range = |t: f32| t >= min_ray_param && t <= max_ray_param;
        let t = if in_range(near) {
            near
        } else if in_range(far) {
            far
        } else {
            return None;
        };

        let hitpoint = ray.point_at_parameter(t);
        Some(RayHit::new(t, hitpoint, hitpoint - self.center))
    }
}
