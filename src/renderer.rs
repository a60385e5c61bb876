//! The surface a display layer talks to: configure once with a scene, start the
//! workers, then poll the image band by band at whatever cadence suits it.

use std::sync::Arc;
use std::time::Duration;

use log::info;

use crate::camera::Camera;
use crate::error::TracerError;
use crate::image::Image;
use crate::jobs::{default_thread_count, ThreadPool};
use crate::scene::Scene;
use crate::tasks::{RenderContext, SampleBandTask, SamplePixelTask, SamplingTask};
use crate::trace::{RayMissFunction, DEFAULT_MAX_DEPTH};

pub const DEFAULT_BANDS_COUNT: usize = 16;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskGranularity {
    /// One repeating task per image band.
    PerBand,
    /// One repeating task per pixel.
    PerPixel,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RenderSettings {
    pub bands: usize,
    pub threads: usize,
    pub max_depth: u32,
    pub sample_limit: Option<u64>,
    pub granularity: TaskGranularity,
}

impl Default for RenderSettings {
    fn default() -> Self {
        RenderSettings {
            bands: DEFAULT_BANDS_COUNT,
            threads: default_thread_count(),
            max_depth: DEFAULT_MAX_DEPTH,
            sample_limit: None,
            granularity: TaskGranularity::PerBand,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderProgress {
    pub total_pixels: usize,
    pub sampled_pixels: usize,
    pub converged_pixels: usize,
}

impl RenderProgress {
    pub fn converged_fraction(&self) -> f32 {
        self.converged_pixels as f32 / self.total_pixels as f32
    }
}

pub struct ProgressiveRenderer {
    image: Arc<Image>,
    context: Arc<RenderContext>,
    settings: RenderSettings,
    thread_pool: Option<ThreadPool<SamplingTask>>,
}

impl ProgressiveRenderer {
    pub fn new(width: u32, height: u32, scene: Scene, camera: Camera,
               miss: Box<RayMissFunction>, settings: RenderSettings) -> Result<ProgressiveRenderer, TracerError> {

        if settings.threads == 0 {
            return Err(TracerError::NoThreads);
        }

        let image = Image::with_sample_limit(width, height, settings.bands, settings.sample_limit)?;
        let context = RenderContext::new(scene, camera, miss, settings.max_depth);

        Ok(ProgressiveRenderer {
            image: Arc::new(image),
            context: Arc::new(context),
            settings,
            thread_pool: None,
        })
    }

    /// Spawns the workers and seeds them with sampling tasks.
    pub fn start(&mut self) -> Result<(), TracerError> {
        if self.thread_pool.is_some() {
            return Err(TracerError::AlreadyStarted);
        }

        let thread_pool = ThreadPool::new(self.settings.threads)?;
        match self.settings.granularity {
            TaskGranularity::PerBand => {
                for band_index in 0..self.image.bands_count() {
                    let task = SampleBandTask::new(Arc::clone(&self.image), Arc::clone(&self.context), band_index);
                    thread_pool.enqueue(SamplingTask::Band(task));
                }
            },
            TaskGranularity::PerPixel => {
                for y in 0..self.image.height() {
                    for x in 0..self.image.width() {
                        let task = SamplePixelTask::new(Arc::clone(&self.image), Arc::clone(&self.context), x, y);
                        thread_pool.enqueue(SamplingTask::Pixel(task));
                    }
                }
            },
        }

        info!("Rendering {}x{} in {} bands on {} threads ({:?}, {} tasks)",
            self.image.width(), self.image.height(), self.image.bands_count(),
            thread_pool.thread_count(), self.settings.granularity, thread_pool.queued_jobs());

        self.thread_pool = Some(thread_pool);
        Ok(())
    }

    pub fn is_started(&self) -> bool {
        self.thread_pool.is_some()
    }

    pub fn image(&self) -> &Image {
        &self.image
    }

    pub fn settings(&self) -> &RenderSettings {
        &self.settings
    }

    pub fn bands_count(&self) -> usize {
        self.image.bands_count()
    }

    pub fn band_y_range(&self, band_index: usize) -> (u32, u32) {
        self.image.band_y_range(band_index)
    }

    pub fn copy_frame_argb(&self, buffer: &mut [u32]) {
        self.image.copy_frame_argb(buffer);
    }

    pub fn progress(&self) -> RenderProgress {
        let mut progress = RenderProgress {
            total_pixels: self.image.pixel_count(),
            sampled_pixels: 0,
            converged_pixels: 0,
        };

        for band_index in 0..self.image.bands_count() {
            let band = self.image.lock_band(band_index);
            let (min_y, max_y) = band.y_range();
            let band_pixels = self.image.width() as usize * (max_y - min_y) as usize;

            progress.sampled_pixels += band.sampled_pixels();
            progress.converged_pixels += band_pixels - band.open_pixels();
        }

        progress
    }

    pub fn is_converged(&self) -> bool {
        let progress = self.progress();
        progress.converged_pixels == progress.total_pixels
    }

    /// Returns `true` once every sampling task has retired. A renderer that
    /// was never started does not converge.
    pub fn wait_until_converged_timeout(&self, timeout: Duration) -> bool {
        match self.thread_pool {
            Some(ref thread_pool) => thread_pool.wait_for_jobs_timeout(timeout),
            None => false,
        }
    }

    /// Stops the workers after their current pass. The image keeps the samples
    /// gathered so far.
    pub fn shutdown(&mut self) {
        if let Some(mut thread_pool) = self.thread_pool.take() {
            thread_pool.finish_and_join_all();
        }
    }
}

impl Drop for ProgressiveRenderer {
    fn drop(&mut self) {
        self.shutdown();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Color;
    use crate::math::*;
    use crate::scene::single_sphere_scene;
    use crate::trace::get_missed_ray_color;

    fn settings(sample_limit: u64, granularity: TaskGranularity) -> RenderSettings {
        RenderSettings {
            bands: 3,
            threads: 2,
            max_depth: DEFAULT_MAX_DEPTH,
            sample_limit: Some(sample_limit),
            granularity,
        }
    }

    fn center_pixel(renderer: &ProgressiveRenderer) -> Color {
        let image = renderer.image();
        let (x, y) = (image.width() / 2, image.height() / 2);
        image.lock_band(image.band_index_for_y(y)).pixel_color(x, y)
    }

    #[test]
    fn single_sphere_center_converges_between_black_and_white() {
        let (scene, camera) = single_sphere_scene(9, 9);
        let mut renderer = ProgressiveRenderer::new(9, 9, scene, camera,
            Box::new(get_missed_ray_color), settings(64, TaskGranularity::PerBand)).unwrap();

        assert!(!renderer.is_converged());
        renderer.start().unwrap();
        assert!(renderer.wait_until_converged_timeout(Duration::from_secs(30)));
        assert!(renderer.is_converged());

        let color = center_pixel(&renderer);
        for i in 0..3 {
            assert!(color.rgb[i] > 0.0 && color.rgb[i] < 1.0, "channel {} is {}", i, color.rgb[i]);
        }

        let progress = renderer.progress();
        assert_eq!(progress.sampled_pixels, 81);
        assert_eq!(progress.converged_fraction(), 1.0);
    }

    #[test]
    fn lone_sphere_under_black_sky_stays_black() {
        let (scene, camera) = single_sphere_scene(5, 5);
        let mut renderer = ProgressiveRenderer::new(5, 5, scene, camera,
            Box::new(|_: &Ray| Color::BLACK), settings(4, TaskGranularity::PerPixel)).unwrap();

        renderer.start().unwrap();
        assert!(renderer.wait_until_converged_timeout(Duration::from_secs(30)));
        assert_eq!(center_pixel(&renderer), Color::BLACK);
    }

    #[test]
    fn frame_copy_fills_every_pixel_after_convergence() {
        let (scene, camera) = single_sphere_scene(6, 4);
        let mut renderer = ProgressiveRenderer::new(6, 4, scene, camera,
            Box::new(|_: &Ray| Color::RED), settings(2, TaskGranularity::PerBand)).unwrap();

        renderer.start().unwrap();
        assert!(renderer.wait_until_converged_timeout(Duration::from_secs(30)));

        // the sphere fills the middle, red sky shows in the corners
        let mut frame = vec![0; 24];
        renderer.copy_frame_argb(&mut frame);
        assert_eq!(frame[0], Color::RED.to_argb());
        assert!(frame.iter().all(|&pixel| pixel & 0xFF00_FFFF == 0xFF00_0000));
    }

    #[test]
    fn renderer_starts_once_and_shuts_down() {
        let (scene, camera) = single_sphere_scene(16, 16);
        let mut renderer = ProgressiveRenderer::new(16, 16, scene, camera,
            Box::new(get_missed_ray_color), RenderSettings { threads: 1, ..RenderSettings::default() }).unwrap();

        assert!(!renderer.wait_until_converged_timeout(Duration::from_millis(1)));
        renderer.start().unwrap();
        assert!(renderer.start().is_err());

        renderer.shutdown();
        assert!(!renderer.is_started());
        assert!(!renderer.is_converged());
    }

    #[test]
    fn invalid_settings_are_rejected() {
        let (scene, camera) = single_sphere_scene(4, 4);
        let no_threads = RenderSettings { threads: 0, ..RenderSettings::default() };
        assert!(ProgressiveRenderer::new(4, 4, scene.clone(), camera.clone(),
            Box::new(get_missed_ray_color), no_threads).is_err());

        assert!(ProgressiveRenderer::new(0, 4, scene, camera,
            Box::new(get_missed_ray_color), RenderSettings::default()).is_err());
    }
}
