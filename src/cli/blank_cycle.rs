use {
    crate::{
        backends::kms::DisplayBackend,
        cli::{BlankCycleArgs, GlobalArgs},
        logger::Logger,
        utils::errorfmt::ErrorFmt,
        video::drm::DriNodes,
    },
    std::thread,
};

pub fn main(global: GlobalArgs, args: BlankCycleArgs) {
    let _logger = Logger::install_stderr(global.log_level.into());
    let config = global.config();
    let nodes = DriNodes {
        dir: config.dri_dir.clone(),
    };
    let mut backend = match DisplayBackend::init(&config, &nodes) {
        Ok(b) => b,
        Err(e) => fatal!("Could not initialize the display: {}", ErrorFmt(e)),
    };
    let white = config.pixel_format.encode(0xff, 0xff, 0xff);
    backend.surface().fill(&white);
    backend.flip().fill(&white);
    for blank in [true, false] {
        thread::sleep(args.interval);
        log::info!("{} the display", if blank { "Blanking" } else { "Unblanking" });
        backend.blank(blank);
    }
    thread::sleep(args.interval);
}
