use crate::color::Color;
use crate::hitable::*;
use crate::math::*;

/// Background sentinel: every unbounded query hits it at infinity.
pub struct SkyboxGradient {
    bottom_color: Color,
    top_color: Color,
}

impl SkyboxGradient {
    pub fn new(bottom_color: Color, top_color: Color) -> SkyboxGradient {
        SkyboxGradient {
            bottom_color,
            top_color,
        }
    }

    pub fn color(&self, ray: &Ray) -> Color {
        vertical_gradient(ray, &self.bottom_color, &self.top_color)
    }
}

pub fn vertical_gradient(ray: &Ray, bottom_color: &Color, top_color: &Color) -> Color {
    let t = 0.5 + 0.5*ray.direction().normalized().y;
    Color::lerp(bottom_color, top_color, t)
}

impl Hitable for SkyboxGradient {
    fn try_hit(&self, ray: &Ray, min_ray_param: f32, max_ray_param: f32) -> Option<RayHit> {
        if max_ray_param != std::f32::INFINITY || min_ray_param == std::f32::INFINITY {
            return None;
        }

        let direction = *ray.direction();
        Some(RayHit::new(
            std::f32::INFINITY,
            ray.point_at_parameter(std::f32::INFINITY),
            -direction
        ))
    }

    fn color_at_infinity(&self, ray: &Ray) -> Option<Color> {
        Some(self.color(ray))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_unbounded_queries_hit() {
        let sky = SkyboxGradient::new(Color::WHITE, Color::BLUE);
        let ray = Ray::new(Vec3::ZERO, Vec3::new(0.0, 1.0, 0.0));

        let hit = sky.try_hit(&ray, 1e-4, std::f32::INFINITY).unwrap();
        assert!(hit.is_at_infinity());
        assert!(sky.try_hit(&ray, 1e-4, 1e30).is_none());
    }

    #[test]
    fn gradient_goes_from_bottom_to_top() {
        let sky = SkyboxGradient::new(Color::WHITE, Color::BLUE);
        let up = Ray::new(Vec3::ZERO, Vec3::new(0.0, 3.0, 0.0));
        let down = Ray::new(Vec3::ZERO, Vec3::new(0.0, -3.0, 0.0));
        let level = Ray::new(Vec3::ZERO, Vec3::new(1.0, 0.0, 0.0));

        assert_eq!(sky.color(&up), Color::BLUE);
        assert_eq!(sky.color(&down), Color::WHITE);
        assert_eq!(sky.color(&level), Color::new(0.5, 0.5, 1.0));
        assert_eq!(sky.color_at_infinity(&up), Some(Color::BLUE));
    }
}
