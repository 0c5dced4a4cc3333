use {
    crate::{
        backends::kms::{KmsError, catalog::PropertyTable},
        config::BackendConfig,
        utils::{bitflags::BitflagsExt, errorfmt::ErrorFmt},
        video::drm::{
            Change, ConnectorType, DRM_MODE_ATOMIC_ALLOW_MODESET, DRM_MODE_TYPE_PREFERRED,
            DrmCardResources, DrmConnectorInfo, DrmCrtc, DrmDevice, DrmModeInfo, DrmObject,
        },
    },
    std::rc::Rc,
};

/// A connected connector together with the CRTC and mode that will drive it.
#[derive(Debug)]
pub struct Monitor {
    pub connector: DrmConnectorInfo,
    pub connector_type: ConnectorType,
    pub crtc: DrmCrtc,
    pub crtc_idx: usize,
    pub mode: DrmModeInfo,
}

/// Returns up to `limit` connected connectors with modes whose type is in `priority`,
/// ordered by priority. If there is none, returns the first connected connector with
/// modes.
pub fn find_connectors(
    dev: &Rc<dyn DrmDevice>,
    resources: &DrmCardResources,
    priority: &[ConnectorType],
    limit: usize,
) -> Vec<DrmConnectorInfo> {
    let mut connected = vec![];
    for &connector in &resources.connectors {
        match dev.get_connector_info(connector) {
            Ok(info) if info.is_connected_with_modes() => connected.push(info),
            Ok(_) => {}
            Err(e) => {
                log::warn!("Could not query connector {}: {}", connector.0, ErrorFmt(e));
            }
        }
    }
    let mut found = vec![];
    'outer: for ty in priority {
        for info in &connected {
            if found.len() >= limit {
                break 'outer;
            }
            if ConnectorType::from_drm(info.connector_type) == *ty {
                found.push(info.clone());
            }
        }
    }
    if found.is_empty()
        && limit > 0
        && let Some(first) = connected.into_iter().next()
    {
        found.push(first);
    }
    found
}

/// Returns the CRTC of the connector's current encoder or else the first CRTC that one of
/// its encoders can drive. CRTCs in `claimed` are never returned.
pub fn resolve_crtc(
    dev: &Rc<dyn DrmDevice>,
    resources: &DrmCardResources,
    connector: &DrmConnectorInfo,
    claimed: &[DrmCrtc],
) -> Option<(DrmCrtc, usize)> {
    if connector.encoder_id.is_some() {
        match dev.get_encoder_info(connector.encoder_id) {
            Ok(enc) if enc.crtc_id.is_some() && !claimed.contains(&enc.crtc_id) => {
                if let Some(idx) = resources.crtcs.iter().position(|c| *c == enc.crtc_id) {
                    return Some((enc.crtc_id, idx));
                }
            }
            Ok(_) => {}
            Err(e) => {
                log::warn!(
                    "Could not query encoder {}: {}",
                    connector.encoder_id.0,
                    ErrorFmt(e)
                );
            }
        }
    }
    for &encoder in &connector.encoders {
        let info = match dev.get_encoder_info(encoder) {
            Ok(info) => info,
            Err(e) => {
                log::warn!("Could not query encoder {}: {}", encoder.0, ErrorFmt(e));
                continue;
            }
        };
        for (idx, &crtc) in resources.crtcs.iter().enumerate() {
            if idx < 32 && info.possible_crtcs.contains(1 << idx) && !claimed.contains(&crtc) {
                return Some((crtc, idx));
            }
        }
    }
    None
}

/// Returns the index of the preferred mode, or 0 if no mode is marked as preferred.
pub fn pick_mode(modes: &[DrmModeInfo]) -> usize {
    modes
        .iter()
        .position(|m| m.ty.contains(DRM_MODE_TYPE_PREFERRED))
        .unwrap_or(0)
}

pub fn resolve(
    dev: &Rc<dyn DrmDevice>,
    resources: &DrmCardResources,
    config: &BackendConfig,
) -> Result<Vec<Monitor>, KmsError> {
    let connectors = find_connectors(
        dev,
        resources,
        &config.connector_priority,
        config.display_limit(),
    );
    if connectors.is_empty() {
        return Err(KmsError::NoConnector);
    }
    let mut monitors = vec![];
    let mut claimed = vec![];
    for connector in connectors {
        let connector_type = ConnectorType::from_drm(connector.connector_type);
        let name = format!("{}-{}", connector_type, connector.connector_type_id);
        let Some((crtc, crtc_idx)) = resolve_crtc(dev, resources, &connector, &claimed) else {
            if monitors.is_empty() {
                return Err(KmsError::NoCrtc(connector.connector_id));
            }
            log::warn!("Could not find a CRTC for {}, ignoring it", name);
            continue;
        };
        claimed.push(crtc);
        for (idx, mode) in connector.modes.iter().enumerate() {
            log::info!("{}: display mode {}: {}", name, idx, mode);
        }
        let mode_idx = pick_mode(&connector.modes);
        let mode = connector.modes[mode_idx].clone();
        log::info!("{}: choosing display mode #{} on CRTC {}", name, mode_idx, crtc.0);
        monitors.push(Monitor {
            connector,
            connector_type,
            crtc,
            crtc_idx,
            mode,
        });
    }
    Ok(monitors)
}

/// Sets `ACTIVE = 0` in one commit on every CRTC that drives a connector, except the CRTC
/// of the first monitor.
///
/// Connectors that are not in `monitors` claim CRTCs in the same order as in `resolve`,
/// after the CRTCs of the monitors.
pub fn disable_other_crtcs(
    dev: &Rc<dyn DrmDevice>,
    resources: &DrmCardResources,
    monitors: &[Monitor],
) {
    let mut claimed: Vec<_> = monitors.iter().map(|m| m.crtc).collect();
    let mut crtcs: Vec<_> = monitors.iter().skip(1).map(|m| m.crtc).collect();
    for &connector in &resources.connectors {
        if monitors.iter().any(|m| m.connector.connector_id == connector) {
            continue;
        }
        let Ok(info) = dev.get_connector_info(connector) else {
            continue;
        };
        let Some((crtc, _)) = resolve_crtc(dev, resources, &info, &claimed) else {
            continue;
        };
        claimed.push(crtc);
        crtcs.push(crtc);
    }
    let mut change = Change::default();
    for crtc in crtcs {
        let props = match PropertyTable::collect(dev, crtc) {
            Ok(p) => p,
            Err(e) => {
                log::warn!("Could not query the properties of CRTC {}: {}", crtc.0, ErrorFmt(e));
                continue;
            }
        };
        let Some(active) = props.find("ACTIVE") else {
            continue;
        };
        change.change_object(crtc, |c| c.change(active, 0));
    }
    if change.is_empty() {
        return;
    }
    if let Err(e) = dev.commit(&change, DRM_MODE_ATOMIC_ALLOW_MODESET) {
        log::error!("Could not disable unused CRTCs: {}", ErrorFmt(e));
    }
}
