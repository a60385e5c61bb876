use crate::math::*;

/// Pinhole camera shooting rays through a rectangular projection plane.
#[derive(Debug, Clone)]
pub struct Camera {
    origin: Vec3,
    projection_center: Vec3,
    projection_up: Vec3,
    projection_right: Vec3,
}

impl Camera {
    pub fn new(origin: Vec3, projection_center: Vec3, up: Vec3,
               projection_width: f32, projection_height: f32) -> Camera {

        let forward = projection_center - origin;
        Camera {
            origin,
            projection_center,
            projection_up: up.normalized() * projection_height,
            projection_right: up.cross(&forward).normalized() * projection_width,
        }
    }

    /// Camera at `origin` looking at `projection_center`, with the projection
    /// plane sized to the image's aspect ratio.
    pub fn looking_at(origin: Vec3, projection_center: Vec3, image_width: u32, image_height: u32) -> Camera {
        let aspect = image_width as f32 / image_height as f32;
        Camera::new(origin, projection_center, Vec3::new(0.0, 1.0, 0.0), aspect, 1.0)
    }

    pub fn origin(&self) -> &Vec3 {
        &self.origin
    }

    /// `normalized_x` grows to the right and `normalized_y` upwards, both in `[0, 1]`.
    pub fn create_ray(&self, normalized_x: f32, normalized_y: f32) -> Ray {
        let target = self.projection_center
            + self.projection_right * (normalized_x - 0.5)
            + self.projection_up * (normalized_y - 0.5);

        Ray::new(self.origin, target - self.origin)
    }
}
