use std::cmp::Ordering;

use crate::color::Color;
use crate::hitable::RayHit;
use crate::math::*;
use crate::scene::{Body, Scene};
use crate::skybox::vertical_gradient;

/// Smallest ray parameter accepted as a hit, keeps bounced rays off their own surface.
pub const RAYTRACE_MIN_RAY_PARAM: f32 = 1e-4;
pub const DEFAULT_MAX_DEPTH: u32 = 8;

pub const BACKGROUND_COLOR_BOTTOM: Color = Color::WHITE;
pub const BACKGROUND_COLOR_TOP: Color = Color::new(0.7, 0.7, 0.9);

/// Colour of a ray that leaves the scene.
pub type RayMissFunction = dyn Fn(&Ray) -> Color + Send + Sync;

pub fn get_missed_ray_color(ray: &Ray) -> Color {
    vertical_gradient(ray, &BACKGROUND_COLOR_BOTTOM, &BACKGROUND_COLOR_TOP)
}

pub fn trace_ray(scene: &Scene, ray: &Ray, miss: &RayMissFunction) -> Color {
    trace_ray_with_depth(scene, ray, miss, DEFAULT_MAX_DEPTH)
}

pub fn trace_ray_with_depth(scene: &Scene, ray: &Ray, miss: &RayMissFunction, max_depth: u32) -> Color {
    trace(scene, ray, miss, 0, max_depth)
}

fn trace(scene: &Scene, ray: &Ray, miss: &RayMissFunction, depth: u32, max_depth: u32) -> Color {
    if depth >= max_depth {
        return miss(ray);
    }

    let (body, hit) = match find_nearest_hit(scene, ray) {
        Some(nearest) => nearest,
        None => return miss(ray),
    };

    if hit.is_at_infinity() {
        return body.target.color_at_infinity(ray).unwrap_or_else(|| miss(ray));
    }

    match body.material.scatter(ray, &hit) {
        Some((scattered, attenuation)) => {
            trace(scene, &scattered, miss, depth + 1, max_depth).attenuate(&attenuation)
        },
        None => Color::BLACK,
    }
}

/// Body whose hit lies closest to the ray origin, each body queried on its own.
pub fn find_nearest_hit<'a>(scene: &'a Scene, ray: &Ray) -> Option<(&'a Body, RayHit)> {
    let distance = |hit: &RayHit| {
        if hit.is_at_infinity() {
            std::f32::INFINITY
        } else {
            ray.squared_distance_at_parameter(hit.ray_param)
        }
    };

    scene.bodies().iter()
        .filter_map(|body| {
            body.target
                .try_hit(ray, RAYTRACE_MIN_RAY_PARAM, std::f32::INFINITY)
                .map(|hit| (body, hit))
        })
        .min_by(|(_, lhs), (_, rhs)| {
            distance(lhs).partial_cmp(&distance(rhs)).unwrap_or(Ordering::Equal)
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::material::Material;
    use crate::scene::{mirror_pair, SceneBuilder};
    use std::sync::atomic::{self, AtomicUsize};
    use std::sync::Arc;

    #[test]
    fn empty_scene_returns_miss_color() {
        let scene = Scene::empty();
        let rays = [
            Ray::new(Vec3::ZERO, Vec3::new(0.0, 1.0, 0.0)),
            Ray::new(Vec3::new(1.0, 2.0, 3.0), Vec3::new(0.3, -0.2, 0.9)),
        ];

        for ray in rays.iter() {
            assert_eq!(trace_ray(&scene, ray, &get_missed_ray_color), get_missed_ray_color(ray));
        }

        let magenta = |_: &Ray| Color::MAGENTA;
        assert_eq!(trace_ray(&scene, &rays[0], &magenta), Color::MAGENTA);
    }

    #[test]
    fn nearest_body_is_selected() {
        let scene = SceneBuilder::new()
            .add_sphere(Vec3::new(0.0, 0.0, 10.0), 1.0, Material::diffuse(Color::RED))
            .add_sphere(Vec3::new(0.0, 0.0, 4.0), 1.0, Material::diffuse(Color::GREEN))
            .add_sphere(Vec3::new(0.0, 0.0, -4.0), 1.0, Material::diffuse(Color::BLUE))
            .build();
        let ray = Ray::new(Vec3::ZERO, Vec3::new(0.0, 0.0, 1.0));

        let (body, hit) = find_nearest_hit(&scene, &ray).unwrap();
        assert_eq!(body.material.albedo, Color::GREEN);
        assert!(is_almost_equal(hit.ray_param, 3.0, 1e-5));
    }

    #[test]
    fn mirror_pair_terminates_within_depth_cap() {
        let scene = mirror_pair();
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let miss = move |ray: &Ray| {
            counter.fetch_add(1, atomic::Ordering::SeqCst);
            get_missed_ray_color(ray)
        };

        // bounce back and forth in the gap between the spheres
        let ray = Ray::new(Vec3::new(0.0, 0.0, 0.0), Vec3::new(1.0, 0.0, 0.0));
        let color = trace_ray_with_depth(&scene, &ray, &miss, 5);

        assert!(color.rgb.is_finite());
        // every path ends in at most one miss-function call
        assert!(calls.load(atomic::Ordering::SeqCst) <= 1);
    }

    #[test]
    fn diffuse_corridor_runs_into_depth_cap() {
        // floor and ceiling normals face each other, diffuse bounces never leave
        let grey = Material::diffuse(Color::from_rgb(Vec3::from_float(0.5)));
        let scene = SceneBuilder::new()
            .add_plane(Vec3::ZERO, Vec3::new(0.0, 1.0, 0.0), grey)
            .add_plane(Vec3::new(0.0, 1.0, 0.0), Vec3::new(0.0, -1.0, 0.0), grey)
            .build();
        let white = |_: &Ray| Color::WHITE;
        let ray = Ray::new(Vec3::new(0.0, 0.5, 0.0), Vec3::new(0.0, 1.0, 0.0));

        let color = trace_ray_with_depth(&scene, &ray, &white, 3);
        assert_eq!(color, Color::from_rgb(Vec3::from_float(0.125)));
    }

    #[test]
    fn diffuse_hit_from_behind_scatters_through_the_surface() {
        // the plane's normal points away from the ray, so the bounce continues upwards and escapes
        let scene = SceneBuilder::new()
            .add_plane(Vec3::ZERO, Vec3::new(0.0, 1.0, 0.0), Material::diffuse(Color::from_rgb(Vec3::from_float(0.5))))
            .build();
        let white = |_: &Ray| Color::WHITE;
        let ray = Ray::new(Vec3::new(0.0, -1.0, 0.0), Vec3::new(0.0, 1.0, 0.0));

        let color = trace_ray_with_depth(&scene, &ray, &white, 3);
        assert_eq!(color, Color::from_rgb(Vec3::from_float(0.5)));
    }

    #[test]
    fn zero_depth_returns_miss_color() {
        let scene = mirror_pair();
        let ray = Ray::new(Vec3::ZERO, Vec3::new(1.0, 0.0, 0.0));
        let black = |_: &Ray| Color::BLACK;
        assert_eq!(trace_ray_with_depth(&scene, &ray, &black, 0), Color::BLACK);
    }
}
