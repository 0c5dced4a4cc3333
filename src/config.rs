use {
    crate::{
        backends::kms::topology::LayerMixers,
        format::{DEFAULT_PIXEL_FORMAT, PixelFormat},
        video::drm::ConnectorType,
    },
    bstr::BString,
};

/// The maximum number of displays a backend drives.
pub const DRM_MAX: usize = 2;

#[derive(Clone, Debug)]
pub struct BackendConfig {
    /// Directory containing the `card<N>` nodes.
    pub dri_dir: BString,
    /// Nodes `card0` up to but excluding `card<max_minor>` are probed.
    pub max_minor: u32,
    /// Connector types that are considered to be the main screen, in order.
    pub connector_priority: Vec<ConnectorType>,
    /// Used when the connector does not advertise a known topology.
    pub default_layer_mixers: LayerMixers,
    pub pixel_format: PixelFormat,
    pub max_displays: usize,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            dri_dir: "/dev/dri".into(),
            max_minor: 64,
            connector_priority: vec![ConnectorType::LVDS, ConnectorType::eDP, ConnectorType::DSI],
            default_layer_mixers: LayerMixers::Dual,
            pixel_format: DEFAULT_PIXEL_FORMAT,
            max_displays: 1,
        }
    }
}

impl BackendConfig {
    pub fn display_limit(&self) -> usize {
        self.max_displays.clamp(1, DRM_MAX)
    }
}
