use {
    crate::{
        backends::kms::{catalog::PropertyTable, monitor, pipeline, probe, topology},
        cli::GlobalArgs,
        format::FourCc,
        logger::Logger,
        utils::errorfmt::ErrorFmt,
        video::drm::{DRM_CLIENT_CAP_UNIVERSAL_PLANES, DriNodes},
    },
    std::fmt::Write,
};

pub fn main(global: GlobalArgs) {
    let _logger = Logger::install_stderr(global.log_level.into());
    let config = global.config();
    let nodes = DriNodes {
        dir: config.dri_dir.clone(),
    };
    let probed = match probe::probe(&nodes, config.max_minor) {
        Ok(p) => p,
        Err(e) => fatal!("Could not open a drm device: {}", ErrorFmt(e)),
    };
    let dev = &probed.dev;
    if let Err(e) = dev.set_client_cap(DRM_CLIENT_CAP_UNIVERSAL_PLANES, 1) {
        log::warn!("Could not enable universal planes: {}", ErrorFmt(e));
    }
    let monitors = match monitor::resolve(dev, &probed.resources, &config) {
        Ok(m) => m,
        Err(e) => fatal!("Could not find a monitor: {}", ErrorFmt(e)),
    };
    println!("device: {} (card{})", dev.name(), probed.minor);
    let format = config.pixel_format.format();
    println!("pixel format: {} ({})", format.name, FourCc(format.drm));
    let mut claimed = vec![];
    for (idx, m) in monitors.iter().enumerate() {
        println!(
            "display {}: {}-{}",
            idx, m.connector_type, m.connector.connector_type_id
        );
        println!("  mode: {}", m.mode);
        println!("  crtc: {}", m.crtc.0);
        let props = match PropertyTable::collect(dev, m.connector.connector_id) {
            Ok(p) => p,
            Err(e) => {
                println!("  properties: unavailable ({})", ErrorFmt(e));
                continue;
            }
        };
        let lms = topology::resolve(dev, &props, config.default_layer_mixers);
        println!("  layer mixers: {}", lms);
        match pipeline::select_planes(dev, m.crtc_idx, lms, &claimed) {
            Ok(planes) => {
                let mut list = String::new();
                for plane in &planes {
                    if !list.is_empty() {
                        list.push_str(", ");
                    }
                    let _ = write!(list, "{}", plane.0);
                }
                println!("  planes: {}", list);
                claimed.extend(planes);
            }
            Err(e) => println!("  planes: {}", ErrorFmt(e)),
        }
    }
}
