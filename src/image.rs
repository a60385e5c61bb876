//! Progressive image: running per-pixel sums split into horizontal bands, each
//! band behind its own lock so that workers sampling different bands never
//! contend and a reader can copy one band without stalling the others.

use parking_lot::{Mutex, MutexGuard};

use crate::color::Color;
use crate::error::TracerError;
use crate::math::*;

#[derive(Debug, Clone, Copy, Default)]
struct PixelAccumulator {
    accumulated_rgb: Vec3,
    count: u64,
}

struct Band {
    min_y: u32,
    max_y: u32,
    pixels: Mutex<Vec<PixelAccumulator>>,
}

pub struct Image {
    width: u32,
    height: u32,
    bands: Vec<Band>,
    convergence_threshold: u64,
}

/// Smallest sample count `n` for which `1/n` drops below float epsilon, after
/// which another sample can no longer move the mean.
pub fn default_convergence_threshold() -> u64 {
    (1.0 / EPSILON) as u64 + 1
}

impl Image {
    pub fn new(width: u32, height: u32, bands_count_hint: usize) -> Result<Image, TracerError> {
        Image::with_sample_limit(width, height, bands_count_hint, None)
    }

    /// Like `new`, but pixels close after `sample_limit` samples if that comes
    /// before float convergence.
    pub fn with_sample_limit(width: u32, height: u32, bands_count_hint: usize,
                             sample_limit: Option<u64>) -> Result<Image, TracerError> {
        let fits_in_memory = (width as usize).checked_mul(height as usize)
            .and_then(|pixels| pixels.checked_mul(std::mem::size_of::<PixelAccumulator>()))
            .is_some();
        if width == 0 || height == 0 || !fits_in_memory {
            return Err(TracerError::InvalidImageSize { width, height });
        }
        if bands_count_hint == 0 {
            return Err(TracerError::NoBands);
        }

        let convergence_threshold = match sample_limit {
            Some(0) => return Err(TracerError::InvalidSampleLimit),
            Some(limit) => limit.min(default_convergence_threshold()),
            None => default_convergence_threshold(),
        };

        Ok(Image {
            width,
            height,
            bands: create_bands(width, height, bands_count_hint),
            convergence_threshold,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn pixel_count(&self) -> usize {
        self.width as usize * self.height as usize
    }

    pub fn bands_count(&self) -> usize {
        self.bands.len()
    }

    /// `[min_y, max_y)` of the band.
    pub fn band_y_range(&self, band_index: usize) -> (u32, u32) {
        let band = &self.bands[band_index];
        (band.min_y, band.max_y)
    }

    pub fn band_index_for_y(&self, y: u32) -> usize {
        debug_assert!(y < self.height, "y {} outside image of height {}", y, self.height);
        self.bands.partition_point(|band| band.max_y <= y)
    }

    pub fn convergence_threshold(&self) -> u64 {
        self.convergence_threshold
    }

    pub fn lock_band(&self, band_index: usize) -> BandGuard<'_> {
        let band = &self.bands[band_index];
        self.guard(band_index, band.pixels.lock())
    }

    pub fn try_lock_band(&self, band_index: usize) -> Option<BandGuard<'_>> {
        let band = &self.bands[band_index];
        band.pixels.try_lock().map(|pixels| self.guard(band_index, pixels))
    }

    fn guard<'a>(&'a self, band_index: usize, pixels: MutexGuard<'a, Vec<PixelAccumulator>>) -> BandGuard<'a> {
        let band = &self.bands[band_index];
        BandGuard {
            band_index,
            min_y: band.min_y,
            max_y: band.max_y,
            width: self.width,
            convergence_threshold: self.convergence_threshold,
            pixels,
        }
    }

    /// Copies the current estimate into a row-major ARGB buffer, one band at a
    /// time. Pixels without samples yet come out black.
    pub fn copy_frame_argb(&self, buffer: &mut [u32]) {
        assert_eq!(buffer.len(), self.pixel_count(), "frame buffer size mismatch");

        for band_index in 0..self.bands_count() {
            let band = self.lock_band(band_index);
            let (min_y, max_y) = band.y_range();
            for y in min_y..max_y {
                for x in 0..self.width {
                    let color = if band.sample_count(x, y) > 0 {
                        band.pixel_color(x, y)
                    } else {
                        Color::BLACK
                    };
                    buffer[y as usize * self.width as usize + x as usize] = color.to_argb();
                }
            }
        }
    }
}

/// Regular bands of `height / count` rows, the remainder folded into the last one.
fn create_bands(width: u32, height: u32, bands_count_hint: usize) -> Vec<Band> {
    let bands_count = bands_count_hint.min(height as usize) as u32;
    let regular_band_height = height / bands_count;

    (0..bands_count)
        .map(|i| {
            let min_y = i * regular_band_height;
            let max_y = if i + 1 == bands_count { height } else { min_y + regular_band_height };
            let pixel_count = width as usize * (max_y - min_y) as usize;
            Band {
                min_y,
                max_y,
                pixels: Mutex::new(vec![PixelAccumulator::default(); pixel_count]),
            }
        })
        .collect()
}

/// Exclusive access to one band. Dropping the guard unlocks the band.
pub struct BandGuard<'a> {
    band_index: usize,
    min_y: u32,
    max_y: u32,
    width: u32,
    convergence_threshold: u64,
    pixels: MutexGuard<'a, Vec<PixelAccumulator>>,
}

impl<'a> BandGuard<'a> {
    pub fn band_index(&self) -> usize {
        self.band_index
    }

    pub fn y_range(&self) -> (u32, u32) {
        (self.min_y, self.max_y)
    }

    /// Adds one sample to the pixel. Returns whether further samples may still
    /// change its value.
    pub fn submit_sample(&mut self, x: u32, y: u32, rgb: &Vec3) -> bool {
        let index = self.to_pixel_index(x, y);
        let accumulator = &mut self.pixels[index];

        accumulator.accumulated_rgb += *rgb;
        accumulator.count += 1;

        accumulator.count < self.convergence_threshold
    }

    /// Mean of the samples submitted so far. The pixel must have at least one.
    pub fn pixel_color(&self, x: u32, y: u32) -> Color {
        let accumulator = &self.pixels[self.to_pixel_index(x, y)];
        debug_assert!(accumulator.count > 0, "pixel ({}, {}) has no samples", x, y);

        Color::from_rgb(accumulator.accumulated_rgb / accumulator.count as f32)
    }

    pub fn sample_count(&self, x: u32, y: u32) -> u64 {
        self.pixels[self.to_pixel_index(x, y)].count
    }

    pub fn is_pixel_open(&self, x: u32, y: u32) -> bool {
        self.sample_count(x, y) < self.convergence_threshold
    }

    pub fn open_pixels(&self) -> usize {
        self.pixels.iter().filter(|pixel| pixel.count < self.convergence_threshold).count()
    }

    pub fn sampled_pixels(&self) -> usize {
        self.pixels.iter().filter(|pixel| pixel.count > 0).count()
    }

    pub fn unlock(self) {}

    fn to_pixel_index(&self, x: u32, y: u32) -> usize {
        debug_assert!(x < self.width, "x {} outside image of width {}", x, self.width);
        debug_assert!(y >= self.min_y && y < self.max_y,
            "y {} outside locked band [{}, {})", y, self.min_y, self.max_y);

        (y - self.min_y) as usize * self.width as usize + x as usize
    }
}
