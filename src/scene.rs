use std::sync::Arc;

use crate::camera::Camera;
use crate::color::Color;
use crate::hitable::*;
use crate::material::Material;
use crate::math::*;
use crate::plane::Plane;
use crate::skybox::SkyboxGradient;
use crate::sphere::Sphere;

/// A hit target paired with the material it is drawn with. Targets are shared
/// and never mutated once the scene is built.
#[derive(Clone)]
pub struct Body {
    pub target: Arc<ThreadsafeHitable>,
    pub material: Material,
}

impl Body {
    pub fn new(target: Arc<ThreadsafeHitable>, material: Material) -> Body {
        Body {
            target,
            material,
        }
    }
}

#[derive(Clone, Default)]
pub struct Scene {
    bodies: Vec<Body>,
}

impl Scene {
    pub fn new(bodies: Vec<Body>) -> Scene {
        Scene { bodies }
    }

    pub fn empty() -> Scene {
        Scene::default()
    }

    pub fn bodies(&self) -> &[Body] {
        &self.bodies
    }

    pub fn len(&self) -> usize {
        self.bodies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bodies.is_empty()
    }
}

pub struct SceneBuilder {
    bodies: Vec<Body>,
}

impl SceneBuilder {
    pub fn new() -> Self {
        Self {
            bodies: vec![],
        }
    }

    pub fn add_body(&mut self, target: Arc<ThreadsafeHitable>, material: Material) -> &mut Self {
        self.bodies.push(Body::new(target, material));
        self
    }

    pub fn add_sphere(&mut self, center: Vec3, radius: f32, material: Material) -> &mut Self {
        self.add_body(Arc::new(Sphere::new(center, radius)), material)
    }

    pub fn add_plane(&mut self, point: Vec3, normal: Vec3, material: Material) -> &mut Self {
        self.add_body(Arc::new(Plane::new(point, normal)), material)
    }

    pub fn build(&mut self) -> Scene {
        Scene::new(self.bodies.drain(..).collect())
    }
}

impl Default for SceneBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// The built-in scenes the binary can render.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DemoScene {
    Spheres,
    SingleSphere,
    Mirrors,
}

impl DemoScene {
    pub fn from_name(name: &str) -> Option<DemoScene> {
        match name {
            "spheres" => Some(DemoScene::Spheres),
            "single" => Some(DemoScene::SingleSphere),
            "mirrors" => Some(DemoScene::Mirrors),
            _ => None,
        }
    }

    pub fn build(self, image_width: u32, image_height: u32) -> (Scene, Camera) {
        match self {
            DemoScene::Spheres => spheres_scene(image_width, image_height),
            DemoScene::SingleSphere => single_sphere_scene(image_width, image_height),
            DemoScene::Mirrors => mirrors_scene(image_width, image_height),
        }
    }
}

/// Ground plane, one sphere of each material and a cluster of small spheres
/// grouped into a composite body.
pub fn spheres_scene(image_width: u32, image_height: u32) -> (Scene, Camera) {
    let cluster: Vec<Arc<ThreadsafeHitable>> = (0..5)
        .map(|i| {
            let x = -1.0 + 0.5 * i as f32;
            Arc::new(Sphere::new(Vec3::new(x, -0.4, 1.3), 0.1)) as Arc<ThreadsafeHitable>
        })
        .collect();

    let scene = SceneBuilder::new()
        .add_plane(Vec3::new(0.0, -0.5, 0.0), Vec3::new(0.0, 1.0, 0.0), Material::diffuse(Color::new(0.5, 0.5, 0.5)))
        .add_sphere(Vec3::new(0.0, 0.0, 2.0), 0.5, Material::diffuse(Color::new(0.8, 0.3, 0.3)))
        .add_sphere(Vec3::new(-1.05, 0.0, 2.0), 0.5, Material::metal(Color::new(0.8, 0.8, 0.8), 0.7))
        .add_sphere(Vec3::new(1.05, 0.0, 2.0), 0.5, Material::glass(1.5))
        .add_body(Arc::new(Composite::new(cluster)), Material::new(Color::new(0.3, 0.6, 0.9), 0.3, 0.9, 0.0, 1.0))
        .add_body(
            Arc::new(SkyboxGradient::new(Color::WHITE, Color::new(0.5, 0.7, 1.0))),
            Material::diffuse(Color::WHITE)
        )
        .build();

    let camera = Camera::looking_at(Vec3::new(0.0, 0.2, -0.5), Vec3::new(0.0, 0.1, 0.5), image_width, image_height);
    (scene, camera)
}

/// One white diffuse sphere straight ahead of the camera.
pub fn single_sphere_scene(image_width: u32, image_height: u32) -> (Scene, Camera) {
    let scene = SceneBuilder::new()
        .add_sphere(Vec3::new(0.0, 0.0, 1.0), 0.5, Material::diffuse(Color::WHITE))
        .build();

    let camera = Camera::looking_at(Vec3::ZERO, Vec3::new(0.0, 0.0, 1.0), image_width, image_height);
    (scene, camera)
}

/// Two perfect mirrors facing each other, so most paths run into the depth cap.
pub fn mirrors_scene(image_width: u32, image_height: u32) -> (Scene, Camera) {
    let scene = mirror_pair();
    let camera = Camera::looking_at(Vec3::new(0.0, 0.0, -3.0), Vec3::new(0.0, 0.0, -2.0), image_width, image_height);
    (scene, camera)
}

pub fn mirror_pair() -> Scene {
    let mirror = Material::metal(Color::new(0.9, 0.9, 0.9), 1.0);
    SceneBuilder::new()
        .add_sphere(Vec3::new(-1.01, 0.0, 0.0), 1.0, mirror)
        .add_sphere(Vec3::new(1.01, 0.0, 0.0), 1.0, mirror)
        .build()
}
