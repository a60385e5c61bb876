use rand::Rng;

use crate::math::vec3::Vec3;

/// Uniform value in `[0, 1)` from the calling thread's generator.
pub fn rand() -> f32 {
    rand::thread_rng().gen::<f32>()
}

/// Uniform value in `[min, max)`.
pub fn rand_range(min: f32, max: f32) -> f32 {
    rand::thread_rng().gen_range(min, max)
}

/// Rejection-samples a point strictly inside the unit sphere.
pub fn random_in_unit_sphere() -> Vec3 {
    let mut rng = rand::thread_rng();
    loop {
        let p = Vec3::random_in_range(&mut rng, -1.0, 1.0);
        if p.squared_length() < 1.0 {
            return p;
        }
    }
}
