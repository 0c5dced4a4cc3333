use {
    crate::{
        backends::kms::KmsError,
        utils::{errorfmt::ErrorFmt, oserror::OsError},
        video::drm::{DRM_CAP_DUMB_BUFFER, DrmCardResources, DrmDevice, DrmError, DrmNodes},
    },
    std::rc::Rc,
    thiserror::Error,
};

#[derive(Debug, Error)]
enum ProbeError {
    #[error("Could not query the dumb buffer capability")]
    GetCap(#[source] OsError),
    #[error("The device does not support dumb buffers")]
    NoDumbBuffers,
    #[error("Could not retrieve the display resources")]
    Resources(#[source] DrmError),
    #[error("The device has no CRTCs")]
    NoCrtcs,
    #[error("The device has no connectors")]
    NoConnectors,
    #[error("The device has no connected monitor")]
    NoConnectedMonitor,
}

pub struct ProbedDevice {
    pub dev: Rc<dyn DrmDevice>,
    pub minor: u32,
    pub resources: DrmCardResources,
}

/// Returns the first device node in `0..max_minor` that can drive a monitor with dumb
/// buffers. Nodes that are rejected are closed again.
pub fn probe(nodes: &dyn DrmNodes, max_minor: u32) -> Result<ProbedDevice, KmsError> {
    for minor in 0..max_minor {
        let dev = match nodes.open(minor) {
            Ok(dev) => dev,
            Err(e) => {
                log::debug!("Skipping card{}: {}", minor, ErrorFmt(e));
                continue;
            }
        };
        match check_device(&dev) {
            Ok(resources) => {
                log::info!("Using drm device {}", dev.name());
                return Ok(ProbedDevice {
                    dev,
                    minor,
                    resources,
                });
            }
            Err(e) => {
                log::debug!("Skipping {}: {}", dev.name(), ErrorFmt(e));
            }
        }
    }
    Err(KmsError::NoDevice)
}

fn check_device(dev: &Rc<dyn DrmDevice>) -> Result<DrmCardResources, ProbeError> {
    let cap = dev
        .get_cap(DRM_CAP_DUMB_BUFFER)
        .map_err(ProbeError::GetCap)?;
    if cap == 0 {
        return Err(ProbeError::NoDumbBuffers);
    }
    let resources = dev.get_resources().map_err(ProbeError::Resources)?;
    if resources.crtcs.is_empty() {
        return Err(ProbeError::NoCrtcs);
    }
    if resources.connectors.is_empty() {
        return Err(ProbeError::NoConnectors);
    }
    for &connector in &resources.connectors {
        if let Ok(info) = dev.get_connector_info(connector)
            && info.is_connected_with_modes()
        {
            return Ok(resources);
        }
    }
    Err(ProbeError::NoConnectedMonitor)
}
