use crate::color::Color;
use crate::hitable::RayHit;
use crate::math::*;
use crate::math::random;

/// Refractive index of the medium every body sits in.
pub const ENVIRONMENT_REFRACTIVE_INDEX: f32 = 1.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Material {
    pub albedo: Color,
    /// Weight of the metallic behaviour, in `[0, 1]`.
    pub reflectivity: f32,
    /// Inverse of the reflection fuzz, in `[0, 1]`.
    pub smoothness: f32,
    /// Weight of the dielectric behaviour, in `[0, 1]`.
    pub transparency: f32,
    pub refractive_index: f32,
}

impl Material {
    pub fn new(albedo: Color, reflectivity: f32, smoothness: f32, transparency: f32, refractive_index: f32) -> Material {
        debug_assert!(reflectivity >= 0.0 && reflectivity <= 1.0, "reflectivity out of [0, 1]");
        debug_assert!(smoothness >= 0.0 && smoothness <= 1.0, "smoothness out of [0, 1]");
        debug_assert!(transparency >= 0.0 && transparency <= 1.0, "transparency out of [0, 1]");
        debug_assert!(refractive_index > 0.0, "refractive index must be positive");

        Material {
            albedo,
            reflectivity,
            smoothness,
            transparency,
            refractive_index,
        }
    }

    pub fn diffuse(albedo: Color) -> Material {
        Material::new(albedo, 0.0, 0.0, 0.0, 1.0)
    }

    pub fn metal(albedo: Color, smoothness: f32) -> Material {
        Material::new(albedo, 1.0, smoothness, 0.0, 1.0)
    }

    pub fn glass(refractive_index: f32) -> Material {
        Material::new(Color::WHITE, 0.0, 1.0, 1.0, refractive_index)
    }

    /// Roulette-wheel pick over the weights `reflectivity`, `transparency` and
    /// a constant `1` for the diffuse baseline. `roll` is uniform in `[0, 1)`.
    pub fn select_behavior(&self, roll: f32) -> ScatterBehavior {
        let total = self.reflectivity + self.transparency + 1.0;
        let ball = roll * total;

        if ball < self.reflectivity {
            ScatterBehavior::Metallic
        } else if ball < self.reflectivity + self.transparency {
            ScatterBehavior::Dielectric
        } else {
            ScatterBehavior::Diffuse
        }
    }

    /// Picks one behaviour at random and applies it. `None` means the ray was absorbed.
    pub fn scatter(&self, ray: &Ray, hit: &RayHit) -> Option<(Ray, Color)> {
        match self.select_behavior(random::rand()) {
            ScatterBehavior::Diffuse => Some(scatter_diffuse(hit, hit.unit_normal(), &self.albedo)),
            ScatterBehavior::Metallic => scatter_metallic(ray, hit.hitpoint, hit.unit_normal(), &self.albedo, self.smoothness),
            ScatterBehavior::Dielectric => scatter_dielectric(ray, hit, self.refractive_index, self.smoothness),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScatterBehavior {
    Diffuse,
    Metallic,
    Dielectric,
}

pub fn reflect(incident: &Vec3, unit_normal: &Vec3) -> Vec3 {
    *incident - *unit_normal * (2.0*incident.dot(unit_normal))
}

pub fn scatter_diffuse(hit: &RayHit, unit_normal: Vec3, albedo: &Color) -> (Ray, Color) {
    let target = hit.hitpoint + unit_normal + random::random_in_unit_sphere();
    (Ray::new(hit.hitpoint, target - hit.hitpoint), *albedo)
}

pub fn scatter_metallic(ray: &Ray, hitpoint: Vec3, unit_normal: Vec3, albedo: &Color, smoothness: f32) -> Option<(Ray, Color)> {
    let reflected = reflect(&ray.direction().normalized(), &unit_normal);

    if is_almost_equal(smoothness, 1.0, EPSILON) {
        return Some((Ray::new(hitpoint, reflected), *albedo));
    }

    let fuzzed = reflected + random::random_in_unit_sphere() * (1.0 - smoothness);
    if fuzzed.dot(&unit_normal) <= 0.0 {
        return None;
    }

    Some((Ray::new(hitpoint, fuzzed), *albedo))
}

pub fn schlick(cosine: f32, n1: f32, n2: f32) -> f32 {
    let r0 = ((n1 - n2) / (n1 + n2)).powi(2);
    r0 + (1.0 - r0)*(1.0 - cosine).powi(5)
}

pub fn scatter_dielectric(ray: &Ray, hit: &RayHit, refractive_index: f32, smoothness: f32) -> Option<(Ray, Color)> {
    let unit_direction = ray.direction().normalized();
    let normal = hit.unit_normal();
    let direction_dot_normal = unit_direction.dot(&normal);

    // (normal facing the ray, index on the incident side, index on the far side)
    let (outward_normal, n1, n2) = if direction_dot_normal > 0.0 {
        (-normal, refractive_index, ENVIRONMENT_REFRACTIVE_INDEX)
    } else {
        (normal, ENVIRONMENT_REFRACTIVE_INDEX, refractive_index)
    };

    let refraction_ratio = n1 / n2;
    let cosine = -unit_direction.dot(&outward_normal);
    let discriminant = 1.0 - refraction_ratio*refraction_ratio*(1.0 - cosine*cosine);

    // total internal reflection
    if discriminant < 0.0 {
        return scatter_metallic(ray, hit.hitpoint, outward_normal, &Color::WHITE, smoothness);
    }

    if random::rand() < schlick(cosine, n1, n2) {
        return scatter_metallic(ray, hit.hitpoint, outward_normal, &Color::WHITE, smoothness);
    }

    let refracted = (unit_direction + outward_normal*cosine)*refraction_ratio - outward_normal*discriminant.sqrt();
    Some((Ray::new(hit.hitpoint, refracted), Color::WHITE))
}
