use {
    crate::{
        backends::kms::{KmsError, catalog::PropertyTable, topology::LayerMixers},
        utils::{bitflags::BitflagsExt, errorfmt::ErrorFmt},
        video::drm::{
            Change, DrmBlob, DrmConnector, DrmCrtc, DrmDevice, DrmFb, DrmPlane, DrmProperty,
        },
    },
    arrayvec::ArrayVec,
    std::rc::Rc,
    thiserror::Error,
};

pub const NUM_PLANES: usize = 2;

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("Plane {0:?} is not part of the active plane set")]
    UnknownPlane(DrmPlane),
    #[error("Plane {0:?} does not have a {1} property")]
    MissingPlaneProperty(DrmPlane, &'static str),
}

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum ScreenSide {
    Left,
    Right,
}

impl ScreenSide {
    fn from_index(idx: usize) -> Self {
        match idx {
            0 => ScreenSide::Left,
            _ => ScreenSide::Right,
        }
    }
}

#[derive(Debug)]
pub struct KmsPlane {
    pub id: DrmPlane,
    pub side: ScreenSide,
    pub props: PropertyTable,
    pub fb_id: DrmProperty,
}

/// The part of the screen a plane covers. The source rectangle and the CRTC rectangle
/// are the same.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct SplitRect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

pub fn split_rect(width: u32, height: u32, lms: LayerMixers, idx: usize) -> SplitRect {
    let w = width / lms.count() as u32;
    SplitRect {
        x: w * idx as u32,
        y: 0,
        width: w,
        height,
    }
}

/// Picks the first `lms.count()` planes that can scan out to the CRTC at `crtc_idx` and
/// that have not been claimed by another display.
pub fn select_planes(
    dev: &Rc<dyn DrmDevice>,
    crtc_idx: usize,
    lms: LayerMixers,
    claimed: &[DrmPlane],
) -> Result<ArrayVec<DrmPlane, NUM_PLANES>, KmsError> {
    let mut res = ArrayVec::new();
    let planes = dev.get_planes().map_err(KmsError::PlaneResources)?;
    for plane in planes {
        if res.len() == lms.count() {
            break;
        }
        if claimed.contains(&plane) {
            continue;
        }
        let info = match dev.get_plane_info(plane) {
            Ok(i) => i,
            Err(e) => {
                log::warn!("Could not query plane {}: {}", plane.0, ErrorFmt(e));
                continue;
            }
        };
        if crtc_idx >= 32 || !info.possible_crtcs.contains(1 << crtc_idx) {
            continue;
        }
        res.push(plane);
    }
    if res.len() < lms.count() {
        return Err(KmsError::NotEnoughPlanes(lms.count(), res.len()));
    }
    Ok(res)
}

/// The connector, CRTC and planes of one display together with their properties.
#[derive(Debug)]
pub struct Pipeline {
    pub connector: DrmConnector,
    pub connector_props: PropertyTable,
    pub crtc: DrmCrtc,
    pub crtc_props: PropertyTable,
    pub lms: LayerMixers,
    pub planes: ArrayVec<KmsPlane, NUM_PLANES>,
    pub width: u32,
    pub height: u32,
}

impl Pipeline {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        dev: &Rc<dyn DrmDevice>,
        connector: DrmConnector,
        connector_props: PropertyTable,
        crtc: DrmCrtc,
        crtc_props: PropertyTable,
        lms: LayerMixers,
        planes: &[DrmPlane],
        width: u32,
        height: u32,
    ) -> Result<Self, KmsError> {
        let mut kms_planes = ArrayVec::new();
        for (idx, &id) in planes.iter().take(NUM_PLANES).enumerate() {
            let props = PropertyTable::collect(dev, id).map_err(KmsError::Properties)?;
            let fb_id = match props.find("FB_ID") {
                Some(p) => p,
                None => {
                    return Err(KmsError::Pipeline(PipelineError::MissingPlaneProperty(
                        id, "FB_ID",
                    )));
                }
            };
            kms_planes.push(KmsPlane {
                id,
                side: ScreenSide::from_index(idx),
                props,
                fb_id,
            });
        }
        if kms_planes.len() < lms.count() {
            return Err(KmsError::NotEnoughPlanes(lms.count(), kms_planes.len()));
        }
        Ok(Self {
            connector,
            connector_props,
            crtc,
            crtc_props,
            lms,
            planes: kms_planes,
            width,
            height,
        })
    }

    fn active_planes(&self) -> impl Iterator<Item = &KmsPlane> {
        self.planes.iter().take(self.lms.count())
    }

    /// Looks up a property of one of the active planes.
    pub fn plane_prop(
        &self,
        plane: DrmPlane,
        name: &'static str,
    ) -> Result<DrmProperty, PipelineError> {
        let Some(p) = self.active_planes().find(|p| p.id == plane) else {
            return Err(PipelineError::UnknownPlane(plane));
        };
        p.props
            .find(name)
            .ok_or(PipelineError::MissingPlaneProperty(plane, name))
    }

    /// Builds the transaction that binds the connector, CRTC and planes and shows `fb`.
    pub fn setup(&self, fb: DrmFb, mode: DrmBlob) -> Result<Change, PipelineError> {
        let mut change = Change::default();
        change.change_object(self.connector, |c| {
            c.change_opt(self.connector_props.find("CRTC_ID"), self.crtc.0 as u64);
        });
        change.change_object(self.crtc, |c| {
            c.change_opt(self.crtc_props.find("MODE_ID"), mode.0 as u64);
            c.change_opt(self.crtc_props.find("ACTIVE"), 1);
        });
        for (idx, plane) in self.active_planes().enumerate() {
            let rect = split_rect(self.width, self.height, self.lms, idx);
            let id = plane.id;
            let values = [
                ("SRC_X", (rect.x as u64) << 16),
                ("SRC_Y", (rect.y as u64) << 16),
                ("SRC_W", (rect.width as u64) << 16),
                ("SRC_H", (rect.height as u64) << 16),
                ("CRTC_X", rect.x as u64),
                ("CRTC_Y", rect.y as u64),
                ("CRTC_W", rect.width as u64),
                ("CRTC_H", rect.height as u64),
                ("CRTC_ID", self.crtc.0 as u64),
            ];
            let mut props = ArrayVec::<_, 10>::new();
            for (name, value) in values {
                props.push((self.plane_prop(id, name)?, value));
            }
            change.change_object(id, |c| {
                c.change_opt(plane.props.find("zpos"), 0);
                c.change(plane.fb_id, fb.0 as u64);
                for (prop, value) in props {
                    c.change(prop, value);
                }
            });
        }
        Ok(change)
    }

    /// Builds the transaction that undoes `setup`.
    pub fn teardown(&self) -> Result<Change, PipelineError> {
        let mut change = Change::default();
        change.change_object(self.connector, |c| {
            c.change_opt(self.connector_props.find("CRTC_ID"), 0);
        });
        change.change_object(self.crtc, |c| {
            c.change_opt(self.crtc_props.find("MODE_ID"), 0);
            c.change_opt(self.crtc_props.find("ACTIVE"), 0);
        });
        for plane in self.active_planes() {
            let crtc_id = self.plane_prop(plane.id, "CRTC_ID")?;
            change.change_object(plane.id, |c| {
                c.change(crtc_id, 0);
                c.change(plane.fb_id, 0);
            });
        }
        Ok(change)
    }

    /// Builds the transaction that makes the active planes show `fb`.
    pub fn update_fb(&self, fb: DrmFb) -> Change {
        let mut change = Change::default();
        change.change_object(self.connector, |c| {
            c.change_opt(self.connector_props.find("CRTC_ID"), self.crtc.0 as u64);
        });
        for plane in self.active_planes() {
            change.change_object(plane.id, |c| c.change(plane.fb_id, fb.0 as u64));
        }
        change
    }
}
