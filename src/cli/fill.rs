use {
    crate::{
        backends::kms::DisplayBackend,
        cli::{FillArgs, GlobalArgs, Rgb},
        logger::Logger,
        utils::errorfmt::ErrorFmt,
        video::drm::DriNodes,
    },
    std::thread,
};

const DEFAULT_COLORS: [Rgb; 3] = [Rgb(0xff, 0, 0), Rgb(0, 0xff, 0), Rgb(0, 0, 0xff)];

pub fn main(global: GlobalArgs, args: FillArgs) {
    let _logger = Logger::install_stderr(global.log_level.into());
    let config = global.config();
    let nodes = DriNodes {
        dir: config.dri_dir.clone(),
    };
    let mut backend = match DisplayBackend::init(&config, &nodes) {
        Ok(b) => b,
        Err(e) => fatal!("Could not initialize the display: {}", ErrorFmt(e)),
    };
    let colors = match args.colors.is_empty() {
        true => &DEFAULT_COLORS[..],
        false => &args.colors[..],
    };
    let mut surface = backend.surface();
    for frame in 0..args.frames {
        let Rgb(r, g, b) = colors[frame % colors.len()];
        log::info!("Frame {}: #{:02x}{:02x}{:02x}", frame, r, g, b);
        surface.fill(&config.pixel_format.encode(r, g, b));
        surface = backend.flip();
        thread::sleep(args.interval);
    }
}
