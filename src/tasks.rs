use std::sync::Arc;

use log::info;

use crate::camera::Camera;
use crate::image::Image;
use crate::jobs::{JobStatus, JobTask};
use crate::math::random::rand_range;
use crate::math::*;
use crate::scene::Scene;
use crate::trace::{trace_ray_with_depth, RayMissFunction};

/// Everything a sampling pass reads but never writes.
pub struct RenderContext {
    pub scene: Scene,
    pub camera: Camera,
    pub miss: Box<RayMissFunction>,
    pub max_depth: u32,
}

impl RenderContext {
    pub fn new(scene: Scene, camera: Camera, miss: Box<RayMissFunction>, max_depth: u32) -> RenderContext {
        RenderContext {
            scene,
            camera,
            miss,
            max_depth,
        }
    }
}

/// Traces one jittered camera ray through pixel `(x, y)`.
pub fn sample_pixel_rgb(context: &RenderContext, image_width: u32, image_height: u32, x: u32, y: u32) -> Vec3 {
    let sample_x = x as f32 + rand_range(-0.5, 0.5);
    let sample_y = y as f32 + rand_range(-0.5, 0.5);

    let normalized_x = sample_x / image_width as f32;
    let normalized_y = 1.0 - sample_y / image_height as f32;

    let ray = context.camera.create_ray(normalized_x, normalized_y);
    trace_ray_with_depth(&context.scene, &ray, &*context.miss, context.max_depth).rgb
}

/// Draws one sample for every pixel of a band per pass.
pub struct SampleBandTask {
    image: Arc<Image>,
    context: Arc<RenderContext>,
    band_index: usize,
    passes: u64,
}

impl SampleBandTask {
    pub fn new(image: Arc<Image>, context: Arc<RenderContext>, band_index: usize) -> SampleBandTask {
        debug_assert!(band_index < image.bands_count());
        SampleBandTask {
            image,
            context,
            band_index,
            passes: 0,
        }
    }

    pub fn band_index(&self) -> usize {
        self.band_index
    }
}

impl JobTask for SampleBandTask {
    fn run(&mut self) -> JobStatus {
        let (min_y, max_y) = self.image.band_y_range(self.band_index);
        let (width, height) = (self.image.width(), self.image.height());
        let mut any_pixel_open = false;

        for y in min_y..max_y {
            for x in 0..width {
                let rgb = sample_pixel_rgb(&self.context, width, height, x, y);

                // held per pixel so a reader never waits for a whole pass
                let mut band = self.image.lock_band(self.band_index);
                any_pixel_open |= band.submit_sample(x, y, &rgb);
            }
        }
        self.passes += 1;

        if any_pixel_open {
            JobStatus::Repeat
        } else {
            info!("Band {} [{}, {}) converged after {} passes", self.band_index, min_y, max_y, self.passes);
            JobStatus::Retire
        }
    }
}

/// Draws one sample for a single pixel per pass.
pub struct SamplePixelTask {
    image: Arc<Image>,
    context: Arc<RenderContext>,
    x: u32,
    y: u32,
    band_index: usize,
}

impl SamplePixelTask {
    pub fn new(image: Arc<Image>, context: Arc<RenderContext>, x: u32, y: u32) -> SamplePixelTask {
        let band_index = image.band_index_for_y(y);
        SamplePixelTask {
            image,
            context,
            x,
            y,
            band_index,
        }
    }
}

impl JobTask for SamplePixelTask {
    fn run(&mut self) -> JobStatus {
        let rgb = sample_pixel_rgb(&self.context, self.image.width(), self.image.height(), self.x, self.y);

        let mut band = self.image.lock_band(self.band_index);
        if band.submit_sample(self.x, self.y, &rgb) {
            JobStatus::Repeat
        } else {
            JobStatus::Retire
        }
    }
}

/// Lets one pool run either granularity.
pub enum SamplingTask {
    Band(SampleBandTask),
    Pixel(SamplePixelTask),
}

impl JobTask for SamplingTask {
    fn run(&mut self) -> JobStatus {
        match self {
            SamplingTask::Band(task) => task.run(),
            SamplingTask::Pixel(task) => task.run(),
        }
    }
}
