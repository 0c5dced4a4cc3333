use {
    crate::{
        backends::kms::catalog::PropertyTable,
        utils::errorfmt::ErrorFmt,
        video::drm::{DrmBlob, DrmDevice},
    },
    bstr::ByteSlice,
    std::{
        fmt::{Display, Formatter},
        rc::Rc,
    },
};

/// The number of layer mixers, and therefore planes, that drive the panel.
#[derive(Copy, Clone, Debug, Eq, PartialEq, clap::ValueEnum)]
pub enum LayerMixers {
    Single,
    Dual,
}

impl LayerMixers {
    pub fn count(self) -> usize {
        match self {
            LayerMixers::Single => 1,
            LayerMixers::Dual => 2,
        }
    }
}

impl Display for LayerMixers {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.count())
    }
}

pub const MODE_PROPERTIES: &str = "mode_properties";

const TOPOLOGY_KEY: &[u8] = b"topology=";

static TOPOLOGIES: &[(&str, LayerMixers)] = &[
    ("sde_singlepipe", LayerMixers::Single),
    ("sde_singlepipe_dsc", LayerMixers::Single),
    ("sde_singlepipe_vdc", LayerMixers::Single),
    ("sde_ppsplit", LayerMixers::Single),
    ("sde_dualpipe", LayerMixers::Dual),
    ("sde_dualpipe_dsc", LayerMixers::Dual),
    ("sde_dualpipe_vdc", LayerMixers::Dual),
    ("sde_dualpipemerge", LayerMixers::Dual),
    ("sde_dualpipemerge_dsc", LayerMixers::Dual),
    ("sde_dualpipemerge_vdc", LayerMixers::Dual),
    ("sde_dualpipe_dscmerge", LayerMixers::Dual),
];

pub fn layer_mixers_for_topology(name: &[u8]) -> Option<LayerMixers> {
    TOPOLOGIES
        .iter()
        .find(|(n, _)| n.as_bytes() == name)
        .map(|(_, lms)| *lms)
}

/// Scans the text of a mode-properties blob for the first `topology=` line.
///
/// Returns `None` if there is no such line or if its value is not a known topology.
pub fn parse_mode_properties(blob: &[u8]) -> Option<LayerMixers> {
    let text = match blob.find_byte(0) {
        Some(nul) => &blob[..nul],
        None => blob,
    };
    for line in text.lines() {
        if let Some(pos) = line.find(TOPOLOGY_KEY) {
            let value = line[pos + TOPOLOGY_KEY.len()..].trim_ascii();
            return layer_mixers_for_topology(value);
        }
    }
    None
}

/// Determines the layer-mixer count of a connector from its `mode_properties` blob.
pub fn resolve(
    dev: &Rc<dyn DrmDevice>,
    connector_props: &PropertyTable,
    default: LayerMixers,
) -> LayerMixers {
    let blob = match connector_props.value(MODE_PROPERTIES) {
        Some(id) if id != 0 => DrmBlob(id as u32),
        _ => {
            log::info!("Connector has no mode properties, assuming {} layer mixer(s)", default);
            return default;
        }
    };
    let data = match dev.get_blob(blob) {
        Ok(d) => d,
        Err(e) => {
            log::warn!(
                "Could not read the mode properties blob, assuming {} layer mixer(s): {}",
                default,
                ErrorFmt(e),
            );
            return default;
        }
    };
    match parse_mode_properties(&data) {
        Some(lms) => {
            log::info!("Number of layer mixers in topology: {}", lms);
            lms
        }
        None => {
            log::info!("No known topology, assuming {} layer mixer(s)", default);
            default
        }
    }
}
