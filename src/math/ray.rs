use crate::math::vec3::Vec3;

#[derive(Debug, Clone, Copy)]
pub struct Ray {
    pub origin: Vec3,
    pub direction: Vec3, // not guaranteed to be normalized, must normalize if being used in angles
}

impl Ray {
    pub fn new(origin: Vec3, direction: Vec3) -> Ray {
        Ray {
            origin,
            direction,
        }
    }

    pub fn origin(&self) -> &Vec3 {
        &self.origin
    }

    pub fn direction(&self) -> &Vec3 {
        &self.direction
    }

    pub fn point_at_parameter(&self, t: f32) -> Vec3 {
        self.origin + self.direction * t
    }

    /// Squared distance from the origin to `point_at_parameter(t)`.
    pub fn squared_distance_at_parameter(&self, t: f32) -> f32 {
        (self.direction * t).squared_length()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn point_at_parameter_follows_unnormalized_direction() {
        let ray = Ray::new(Vec3::new(1.0, 0.0, 0.0), Vec3::new(0.0, 2.0, 0.0));
        assert_eq!(ray.point_at_parameter(0.0), Vec3::new(1.0, 0.0, 0.0));
        assert_eq!(ray.point_at_parameter(1.5), Vec3::new(1.0, 3.0, 0.0));
        assert_eq!(ray.squared_distance_at_parameter(1.5), 9.0);
    }
}
