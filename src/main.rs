use progressive_tracer::Config;

use std::env;

fn main() {
    let args: Vec<String> = env::args().collect();

    let config = match Config::from_cmdline(&args) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{}", e);
            eprintln!("usage: {} [--width N] [--height N] [--bands N] [--threads N] [--max-depth N] \
                       [--samples N] [--scene spheres|single|mirrors] [--per-pixel] [--seconds N] \
                       [--poll-ms N] [-v]", args.get(0).map_or("progressive_tracer", |s| s.as_str()));
            std::process::exit(2);
        }
    };

    env_logger::Builder::new()
        .filter_level(config.log_level)
        .parse(&env::var("RUST_LOG").unwrap_or_default())
        .init();

    if let Err(e) = progressive_tracer::run(config) {
        if let Some(name) = e.name() {
            log::error!("Exit with {}: {}\n\nBACKTRACE:\n{}", name, e, e.backtrace());
        } else {
            log::error!(
                "Exit with Unnamed Error: {}\n\nBACKTRACE: {}",
                e,
                e.backtrace()
            );
        }
        std::process::exit(1);
    }
}
