pub mod catalog;
pub mod monitor;
pub mod pipeline;
pub mod probe;
pub mod surface;
pub mod topology;


use {
    crate::{
        backends::kms::{
            catalog::PropertyTable,
            monitor::Monitor,
            pipeline::{Pipeline, PipelineError},
            probe::ProbedDevice,
            surface::{Surface, SurfaceError},
        },
        config::{BackendConfig, DRM_MAX},
        utils::{errorfmt::ErrorFmt, oserror::OsError},
        video::drm::{
            ConnectorType, DRM_CLIENT_CAP_ATOMIC, DRM_CLIENT_CAP_UNIVERSAL_PLANES,
            DRM_MODE_ATOMIC_ALLOW_MODESET, DrmConnector, DrmDevice, DrmError, DrmModeInfo,
            DrmNodes, DrmPlane, PropBlob,
        },
    },
    arrayvec::ArrayVec,
    std::rc::Rc,
    thiserror::Error,
};

#[derive(Debug, Error)]
pub enum KmsError {
    #[error("Could not find a drm device with dumb buffers and a connected monitor")]
    NoDevice,
    #[error("Could not find a connected connector with modes")]
    NoConnector,
    #[error("Could not find a CRTC for connector {0:?}")]
    NoCrtc(DrmConnector),
    #[error("The device does not support atomic modesetting")]
    AtomicModesetting(#[source] OsError),
    #[error("Could not retrieve the plane resources")]
    PlaneResources(#[source] DrmError),
    #[error("The display needs {0} planes but only {1} are usable")]
    NotEnoughPlanes(usize, usize),
    #[error("Could not retrieve the properties of a kms object")]
    Properties(#[source] DrmError),
    #[error("A plane is missing a required property")]
    Pipeline(#[source] PipelineError),
    #[error("Could not create a surface")]
    CreateSurface(#[source] SurfaceError),
    #[error("Could not create the mode blob")]
    ModeBlob(#[source] DrmError),
}

/// One connector driven through its own CRTC and planes with two surfaces.
pub struct Display {
    pipeline: Pipeline,
    connector_type: ConnectorType,
    mode: DrmModeInfo,
    mode_blob: PropBlob,
    surfaces: [Surface; 2],
    current: usize,
    blanked: bool,
    dev: Rc<dyn DrmDevice>,
}

impl Display {
    fn new(
        dev: &Rc<dyn DrmDevice>,
        monitor: Monitor,
        config: &BackendConfig,
        claimed_planes: &mut Vec<DrmPlane>,
    ) -> Result<Self, KmsError> {
        let connector = monitor.connector.connector_id;
        let connector_props =
            PropertyTable::collect(dev, connector).map_err(KmsError::Properties)?;
        let lms = topology::resolve(dev, &connector_props, config.default_layer_mixers);
        let crtc_props = PropertyTable::collect(dev, monitor.crtc).map_err(KmsError::Properties)?;
        let width = monitor.mode.hdisplay as u32;
        let height = monitor.mode.vdisplay as u32;
        let format = config.pixel_format.drm();
        let surfaces = [
            Surface::create(dev, width, height, format).map_err(KmsError::CreateSurface)?,
            Surface::create(dev, width, height, format).map_err(KmsError::CreateSurface)?,
        ];
        let planes = pipeline::select_planes(dev, monitor.crtc_idx, lms, claimed_planes)?;
        let pipeline = Pipeline::new(
            dev,
            connector,
            connector_props,
            monitor.crtc,
            crtc_props,
            lms,
            &planes,
            width,
            height,
        )?;
        let mode_blob = monitor.mode.create_blob(dev).map_err(KmsError::ModeBlob)?;
        claimed_planes.extend(planes);
        Ok(Self {
            pipeline,
            connector_type: monitor.connector_type,
            mode: monitor.mode,
            mode_blob,
            surfaces,
            current: 0,
            blanked: true,
            dev: dev.clone(),
        })
    }

    /// Enables or disables scanout. Does nothing if the display is already in that state.
    /// If the commit fails, the state is unchanged and the call can be repeated.
    pub fn blank(&mut self, blank: bool) {
        if blank == self.blanked {
            return;
        }
        let change = if blank {
            self.pipeline.teardown()
        } else {
            let fb = self.surfaces[self.current].fb();
            self.pipeline.setup(fb, self.mode_blob.id())
        };
        let change = match change {
            Ok(c) => c,
            Err(e) => {
                log::error!("Could not build the pipeline transaction: {}", ErrorFmt(e));
                return;
            }
        };
        if let Err(e) = self.dev.commit(&change, DRM_MODE_ATOMIC_ALLOW_MODESET) {
            let action = if blank { "tear down" } else { "set up" };
            log::error!("Could not {} the pipeline: {}", action, ErrorFmt(e));
            return;
        }
        self.blanked = blank;
    }

    /// Presents the current surface and returns the other one.
    pub fn flip(&mut self) -> &mut Surface {
        if !self.blanked {
            let fb = self.surfaces[self.current].fb();
            let change = self.pipeline.update_fb(fb);
            if let Err(e) = self.dev.commit(&change, DRM_MODE_ATOMIC_ALLOW_MODESET) {
                log::error!("Could not present framebuffer {}: {}", fb.0, ErrorFmt(e));
                return &mut self.surfaces[self.current];
            }
        }
        self.current = 1 - self.current;
        &mut self.surfaces[self.current]
    }

    pub fn surface(&mut self) -> &mut Surface {
        &mut self.surfaces[self.current]
    }

    pub fn surfaces(&self) -> &[Surface; 2] {
        &self.surfaces
    }

    pub fn current_index(&self) -> usize {
        self.current
    }

    pub fn is_blanked(&self) -> bool {
        self.blanked
    }

    pub fn pipeline(&self) -> &Pipeline {
        &self.pipeline
    }

    pub fn connector_type(&self) -> ConnectorType {
        self.connector_type
    }

    pub fn mode(&self) -> &DrmModeInfo {
        &self.mode
    }
}

/// Double-buffered output on up to `DRM_MAX` displays of a single drm device.
///
/// Dropping the backend blanks every display before the mode blobs, the surfaces and
/// finally the device are released.
pub struct DisplayBackend {
    displays: ArrayVec<Display, DRM_MAX>,
    active: usize,
    dev: Rc<dyn DrmDevice>,
}

impl DisplayBackend {
    /// Opens the first usable device and enables the main display. On error every
    /// resource acquired so far is released.
    pub fn init(config: &BackendConfig, nodes: &dyn DrmNodes) -> Result<Self, KmsError> {
        let ProbedDevice { dev, resources, .. } = probe::probe(nodes, config.max_minor)?;
        enable_atomic(&dev)?;
        let monitors = monitor::resolve(&dev, &resources, config)?;
        if monitors.is_empty() {
            return Err(KmsError::NoConnector);
        }
        monitor::disable_other_crtcs(&dev, &resources, &monitors);
        let mut displays = ArrayVec::new();
        let mut claimed_planes = vec![];
        for monitor in monitors.into_iter().take(DRM_MAX) {
            let connector = monitor.connector.connector_id;
            match Display::new(&dev, monitor, config, &mut claimed_planes) {
                Ok(d) => displays.push(d),
                Err(e) if displays.is_empty() => return Err(e),
                Err(e) => {
                    log::warn!(
                        "Could not initialize secondary connector {}: {}",
                        connector.0,
                        ErrorFmt(e)
                    );
                }
            }
        }
        let mut slf = Self {
            displays,
            active: 0,
            dev,
        };
        slf.displays[0].blank(false);
        Ok(slf)
    }

    /// The surface the caller should draw into next.
    pub fn surface(&mut self) -> &mut Surface {
        self.displays[self.active].surface()
    }

    pub fn flip(&mut self) -> &mut Surface {
        self.displays[self.active].flip()
    }

    pub fn blank(&mut self, blank: bool) {
        self.displays[self.active].blank(blank);
    }

    pub fn blank_display(&mut self, idx: usize, blank: bool) {
        match self.displays.get_mut(idx) {
            Some(d) => d.blank(blank),
            None => log::error!("Invalid display index {}", idx),
        }
    }

    /// Selects the display that `surface`, `flip` and `blank` operate on.
    pub fn set_active_display(&mut self, idx: usize) -> bool {
        if idx >= self.displays.len() {
            log::error!("Invalid display index {}", idx);
            return false;
        }
        self.active = idx;
        true
    }

    pub fn active_display(&self) -> usize {
        self.active
    }

    pub fn has_multiple_connectors(&self) -> bool {
        self.displays.len() > 1
    }

    pub fn displays(&self) -> &[Display] {
        &self.displays
    }

    pub fn device(&self) -> &Rc<dyn DrmDevice> {
        &self.dev
    }
}

impl Drop for DisplayBackend {
    fn drop(&mut self) {
        for display in &mut self.displays {
            display.blank(true);
        }
        self.displays.clear();
    }
}

fn enable_atomic(dev: &Rc<dyn DrmDevice>) -> Result<(), KmsError> {
    if let Err(e) = dev.set_client_cap(DRM_CLIENT_CAP_UNIVERSAL_PLANES, 1) {
        log::warn!("Could not enable universal planes: {}", ErrorFmt(e));
    }
    dev.set_client_cap(DRM_CLIENT_CAP_ATOMIC, 1)
        .map_err(KmsError::AtomicModesetting)
}
