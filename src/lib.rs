pub mod math;
pub mod color;
pub mod hitable;
pub mod sphere;
pub mod plane;
pub mod skybox;
pub mod material;
pub mod camera;
pub mod scene;
pub mod trace;
pub mod image;
pub mod jobs;
pub mod tasks;
pub mod renderer;
pub mod error;

use std::time::{Duration, Instant};

use log::{debug, info, LevelFilter};

use crate::error::TracerError;
use crate::renderer::{ProgressiveRenderer, RenderSettings, TaskGranularity};
use crate::scene::DemoScene;
use crate::trace::get_missed_ray_color;

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub width: u32,
    pub height: u32,
    pub scene: DemoScene,
    pub settings: RenderSettings,
    /// Wall-clock budget, zero renders until every pixel has converged.
    pub seconds: u64,
    pub poll_interval: Duration,
    pub log_level: LevelFilter,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            width: 800,
            height: 600,
            scene: DemoScene::Spheres,
            settings: RenderSettings::default(),
            seconds: 0,
            poll_interval: Duration::from_millis(250),
            log_level: LevelFilter::Info,
        }
    }
}

impl Config {
    /// Parses `args` as returned by `env::args()`, program name first.
    pub fn from_cmdline(args: &[String]) -> Result<Config, TracerError> {
        let mut config = Config::default();
        let mut args = args.iter().skip(1);

        while let Some(flag) = args.next() {
            match flag.as_str() {
                "-v" | "--verbose" => config.log_level = LevelFilter::Debug,
                "--per-pixel" => config.settings.granularity = TaskGranularity::PerPixel,
                "--width" => config.width = parse_value(flag, args.next())?,
                "--height" => config.height = parse_value(flag, args.next())?,
                "--bands" => config.settings.bands = parse_value(flag, args.next())?,
                "--threads" => config.settings.threads = parse_value(flag, args.next())?,
                "--max-depth" => config.settings.max_depth = parse_value(flag, args.next())?,
                "--samples" => config.settings.sample_limit = Some(parse_value(flag, args.next())?),
                "--seconds" => config.seconds = parse_value(flag, args.next())?,
                "--poll-ms" => config.poll_interval = Duration::from_millis(parse_value(flag, args.next())?),
                "--scene" => {
                    let name = value_of(flag, args.next())?;
                    config.scene = DemoScene::from_name(name).ok_or_else(|| TracerError::InvalidArgument {
                        flag: flag.clone(),
                        value: name.to_string(),
                    })?;
                },
                _ => return Err(TracerError::UnknownArgument(flag.clone())),
            }
        }

        Ok(config)
    }
}

fn value_of<'a>(flag: &str, value: Option<&'a String>) -> Result<&'a str, TracerError> {
    value.map(|value| value.as_str()).ok_or_else(|| TracerError::MissingArgument { flag: flag.to_string() })
}

fn parse_value<T: std::str::FromStr>(flag: &str, value: Option<&String>) -> Result<T, TracerError> {
    let value = value_of(flag, value)?;
    value.parse().map_err(|_| TracerError::InvalidArgument {
        flag: flag.to_string(),
        value: value.to_string(),
    })
}

/// Renders the configured scene, copying the frame at the poll cadence the way
/// a display layer would, until it converges or the time budget runs out.
pub fn run(config: Config) -> Result<(), failure::Error> {
    let (scene, camera) = config.scene.build(config.width, config.height);
    info!("Scene {:?}: {} bodies", config.scene, scene.len());

    let mut renderer = ProgressiveRenderer::new(config.width, config.height, scene, camera,
        Box::new(get_missed_ray_color), config.settings.clone())?;

    let mut frame = vec![0u32; renderer.image().pixel_count()];
    let budget = if config.seconds > 0 { Some(Duration::from_secs(config.seconds)) } else { None };
    let start_time = Instant::now();

    renderer.start()?;

    loop {
        let converged = renderer.wait_until_converged_timeout(config.poll_interval);

        renderer.copy_frame_argb(&mut frame);
        let progress = renderer.progress();
        debug!("Frame copied, {} of {} pixels sampled", progress.sampled_pixels, progress.total_pixels);
        info!("Progress: {:.1}% converged after {:.1}s",
            100.0 * progress.converged_fraction(), duration_as_secs(start_time.elapsed()));

        if converged {
            info!("Every pixel has converged");
            break;
        }

        if let Some(budget) = budget {
            if start_time.elapsed() >= budget {
                info!("Time budget of {}s spent, stopping", config.seconds);
                break;
            }
        }
    }

    renderer.shutdown();
    Ok(())
}

fn duration_as_secs(duration: Duration) -> f64 {
    duration.as_secs() as f64 + f64::from(duration.subsec_millis()) / 1000.0
}
