mod sys;

use {
    crate::{
        utils::{errorfmt::ErrorFmt, mmap::mmap_shared, oserror::OsError},
        video::drm::sys::{
            DRM_DISPLAY_MODE_LEN, DRM_MODE_OBJECT_BLOB, DRM_MODE_OBJECT_CONNECTOR,
            DRM_MODE_OBJECT_CRTC, DRM_MODE_OBJECT_ENCODER, DRM_MODE_OBJECT_FB,
            DRM_MODE_OBJECT_PLANE, DRM_MODE_OBJECT_PROPERTY, gem_close, get_cap, mode_addfb2,
            mode_atomic, mode_create_blob, mode_create_dumb, mode_destroy_blob,
            mode_get_resources, mode_getconnector, mode_getencoder, mode_getplane,
            mode_getplaneresources, mode_getpropblob, mode_getproperty_name, mode_map_dumb,
            mode_obj_getproperties, mode_rmfb, set_client_cap,
        },
    },
    bstr::{BStr, BString, ByteSlice},
    std::{
        fmt::{Debug, Display, Formatter},
        mem, slice,
        rc::Rc,
    },
    thiserror::Error,
    uapi::{OwnedFd, c},
};

pub use sys::{
    DRM_CAP_DUMB_BUFFER, DRM_CLIENT_CAP_ATOMIC, DRM_CLIENT_CAP_UNIVERSAL_PLANES,
    DRM_MODE_ATOMIC_ALLOW_MODESET, DRM_MODE_TYPE_PREFERRED, drm_mode_modeinfo,
};

#[derive(Debug, Error)]
pub enum DrmError {
    #[error("Could not open {0}")]
    Open(BString, #[source] OsError),
    #[error("Could not perform drm property ioctl")]
    GetProperty(#[source] OsError),
    #[error("Could not perform drm getencoder ioctl")]
    GetEncoder(#[source] OsError),
    #[error("Could not perform drm getresources ioctl")]
    GetResources(#[source] OsError),
    #[error("Could not perform drm getplaneresources ioctl")]
    GetPlaneResources(#[source] OsError),
    #[error("Could not perform drm getplane ioctl")]
    GetPlane(#[source] OsError),
    #[error("Could not create a blob")]
    CreateBlob(#[source] OsError),
    #[error("Could not perform drm getconnector ioctl")]
    GetConnector(#[source] OsError),
    #[error("Could not perform drm getpropblob ioctl")]
    GetPropBlob(#[source] OsError),
    #[error("Could not perform drm properties ioctl")]
    GetProperties(#[source] OsError),
    #[error("Could not perform drm atomic ioctl")]
    Atomic(#[source] OsError),
    #[error("Could not create a dumb buffer")]
    CreateDumb(#[source] OsError),
    #[error("Could not create a framebuffer")]
    AddFb(#[source] OsError),
    #[error("Could not retrieve the map offset of a dumb buffer")]
    MapDumb(#[source] OsError),
    #[error("Could not map a dumb buffer")]
    Mmap(#[source] OsError),
}

/// CPU-accessible memory backing a dumb buffer. Unmapped on drop.
pub trait MappedMemory {
    fn as_mut_slice(&mut self) -> &mut [u8];
}

/// The mode-setting operations the display backend performs on a device.
///
/// `DrmMaster` implements this with ioctls on a card node. Every operation is a blocking
/// call that either succeeds or fails immediately.
pub trait DrmDevice {
    fn name(&self) -> &BStr;
    fn get_cap(&self, cap: u64) -> Result<u64, OsError>;
    fn set_client_cap(&self, cap: u64, value: u64) -> Result<(), OsError>;
    fn get_resources(&self) -> Result<DrmCardResources, DrmError>;
    fn get_connector_info(&self, connector: DrmConnector) -> Result<DrmConnectorInfo, DrmError>;
    fn get_encoder_info(&self, encoder: DrmEncoder) -> Result<DrmEncoderInfo, DrmError>;
    fn get_planes(&self) -> Result<Vec<DrmPlane>, DrmError>;
    fn get_plane_info(&self, plane: DrmPlane) -> Result<DrmPlaneInfo, DrmError>;
    fn get_object_properties(
        &self,
        obj: u32,
        obj_type: u32,
    ) -> Result<Vec<DrmPropertyValue>, DrmError>;
    fn get_property_name(&self, prop: DrmProperty) -> Result<BString, DrmError>;
    fn get_blob(&self, blob: DrmBlob) -> Result<Vec<u8>, DrmError>;
    fn create_blob(&self, data: &[u8]) -> Result<DrmBlob, DrmError>;
    fn destroy_blob(&self, blob: DrmBlob) -> Result<(), OsError>;
    fn create_dumb(&self, width: u32, height: u32, bpp: u32) -> Result<DumbInfo, DrmError>;
    fn destroy_dumb(&self, handle: u32) -> Result<(), OsError>;
    fn add_fb(
        &self,
        width: u32,
        height: u32,
        format: u32,
        handle: u32,
        pitch: u32,
    ) -> Result<DrmFb, DrmError>;
    fn rm_fb(&self, fb: DrmFb) -> Result<(), OsError>;
    fn map_dumb(&self, handle: u32, len: usize) -> Result<Box<dyn MappedMemory>, DrmError>;
    fn commit(&self, change: &Change, flags: u32) -> Result<(), DrmError>;
}

impl dyn DrmDevice {
    pub fn get_properties<T: DrmObject>(&self, t: T) -> Result<Vec<DrmPropertyValue>, DrmError> {
        self.get_object_properties(t.id(), T::TYPE)
    }
}

/// Opens the display-control node with the given minor number.
pub trait DrmNodes {
    fn open(&self, minor: u32) -> Result<Rc<dyn DrmDevice>, DrmError>;
}

/// The `card<minor>` nodes in a directory such as `/dev/dri`.
pub struct DriNodes {
    pub dir: BString,
}

impl DrmNodes for DriNodes {
    fn open(&self, minor: u32) -> Result<Rc<dyn DrmDevice>, DrmError> {
        let path = uapi::format_ustr!("{}/card{}", self.dir, minor);
        Ok(Rc::new(DrmMaster::open(&path)?))
    }
}

pub struct DrmMaster {
    fd: OwnedFd,
    path: BString,
}

impl Debug for DrmMaster {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.path, self.fd.raw())
    }
}

impl DrmMaster {
    pub fn open(path: &uapi::Ustr) -> Result<Self, DrmError> {
        match uapi::open(path, c::O_RDWR | c::O_CLOEXEC, 0) {
            Ok(fd) => Ok(Self {
                fd,
                path: path.as_bytes().to_vec().into(),
            }),
            Err(e) => Err(DrmError::Open(path.as_bytes().to_vec().into(), e.into())),
        }
    }

    pub fn raw(&self) -> c::c_int {
        self.fd.raw()
    }
}

impl DrmDevice for DrmMaster {
    fn name(&self) -> &BStr {
        self.path.as_bstr()
    }

    fn get_cap(&self, cap: u64) -> Result<u64, OsError> {
        get_cap(self.raw(), cap)
    }

    fn set_client_cap(&self, cap: u64, value: u64) -> Result<(), OsError> {
        set_client_cap(self.raw(), cap, value)
    }

    fn get_resources(&self) -> Result<DrmCardResources, DrmError> {
        mode_get_resources(self.raw())
    }

    fn get_connector_info(&self, connector: DrmConnector) -> Result<DrmConnectorInfo, DrmError> {
        mode_getconnector(self.raw(), connector.0)
    }

    fn get_encoder_info(&self, encoder: DrmEncoder) -> Result<DrmEncoderInfo, DrmError> {
        mode_getencoder(self.raw(), encoder.0)
    }

    fn get_planes(&self) -> Result<Vec<DrmPlane>, DrmError> {
        mode_getplaneresources(self.raw())
    }

    fn get_plane_info(&self, plane: DrmPlane) -> Result<DrmPlaneInfo, DrmError> {
        mode_getplane(self.raw(), plane.0)
    }

    fn get_object_properties(
        &self,
        obj: u32,
        obj_type: u32,
    ) -> Result<Vec<DrmPropertyValue>, DrmError> {
        mode_obj_getproperties(self.raw(), obj, obj_type)
    }

    fn get_property_name(&self, prop: DrmProperty) -> Result<BString, DrmError> {
        mode_getproperty_name(self.raw(), prop)
    }

    fn get_blob(&self, blob: DrmBlob) -> Result<Vec<u8>, DrmError> {
        let mut buf = vec![];
        loop {
            let n = mode_getpropblob(self.raw(), blob.0, &mut buf).map_err(DrmError::GetPropBlob)?;
            if n <= buf.len() {
                buf.truncate(n);
                return Ok(buf);
            }
            buf.resize(n, 0);
        }
    }

    fn create_blob(&self, data: &[u8]) -> Result<DrmBlob, DrmError> {
        mode_create_blob(self.raw(), data).map_err(DrmError::CreateBlob)
    }

    fn destroy_blob(&self, blob: DrmBlob) -> Result<(), OsError> {
        mode_destroy_blob(self.raw(), blob)
    }

    fn create_dumb(&self, width: u32, height: u32, bpp: u32) -> Result<DumbInfo, DrmError> {
        mode_create_dumb(self.raw(), width, height, bpp).map_err(DrmError::CreateDumb)
    }

    fn destroy_dumb(&self, handle: u32) -> Result<(), OsError> {
        gem_close(self.raw(), handle)
    }

    fn add_fb(
        &self,
        width: u32,
        height: u32,
        format: u32,
        handle: u32,
        pitch: u32,
    ) -> Result<DrmFb, DrmError> {
        let handles = [handle, 0, 0, 0];
        let strides = [pitch, 0, 0, 0];
        let offsets = [0; 4];
        mode_addfb2(self.raw(), width, height, format, handles, strides, offsets)
            .map_err(DrmError::AddFb)
    }

    fn rm_fb(&self, fb: DrmFb) -> Result<(), OsError> {
        mode_rmfb(self.raw(), fb)
    }

    fn map_dumb(&self, handle: u32, len: usize) -> Result<Box<dyn MappedMemory>, DrmError> {
        let offset = mode_map_dumb(self.raw(), handle).map_err(DrmError::MapDumb)?;
        let map = mmap_shared(len, self.raw(), offset as c::off_t).map_err(DrmError::Mmap)?;
        Ok(Box::new(map))
    }

    fn commit(&self, change: &Change, flags: u32) -> Result<(), DrmError> {
        mode_atomic(
            self.raw(),
            flags,
            &change.objects,
            &change.object_lengths,
            &change.props,
            &change.values,
        )
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct DumbInfo {
    pub handle: u32,
    pub pitch: u32,
    pub bpp: u32,
    pub size: u64,
}

/// A property blob that is destroyed on drop.
pub struct PropBlob {
    dev: Rc<dyn DrmDevice>,
    id: DrmBlob,
}

impl Debug for PropBlob {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PropBlob")
            .field("id", &self.id)
            .finish_non_exhaustive()
    }
}

impl PropBlob {
    pub fn new(dev: &Rc<dyn DrmDevice>, data: &[u8]) -> Result<Self, DrmError> {
        let id = dev.create_blob(data)?;
        Ok(Self {
            dev: dev.clone(),
            id,
        })
    }

    pub fn id(&self) -> DrmBlob {
        self.id
    }
}

impl Drop for PropBlob {
    fn drop(&mut self) {
        if let Err(e) = self.dev.destroy_blob(self.id) {
            log::error!("Could not destroy blob: {}", ErrorFmt(e));
        }
    }
}

/// A framebuffer object that is removed on drop.
pub struct DrmFramebuffer {
    dev: Rc<dyn DrmDevice>,
    fb: DrmFb,
}

impl Debug for DrmFramebuffer {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DrmFramebuffer")
            .field("fb", &self.fb)
            .finish_non_exhaustive()
    }
}

impl DrmFramebuffer {
    pub fn new(
        dev: &Rc<dyn DrmDevice>,
        width: u32,
        height: u32,
        format: u32,
        dumb: &DumbBuffer,
    ) -> Result<Self, DrmError> {
        let fb = dev.add_fb(width, height, format, dumb.info.handle, dumb.info.pitch)?;
        Ok(Self {
            dev: dev.clone(),
            fb,
        })
    }

    pub fn id(&self) -> DrmFb {
        self.fb
    }
}

impl Drop for DrmFramebuffer {
    fn drop(&mut self) {
        if let Err(e) = self.dev.rm_fb(self.fb) {
            log::error!("Could not delete framebuffer: {}", ErrorFmt(e));
        }
    }
}

/// A dumb buffer handle that is released on drop.
pub struct DumbBuffer {
    dev: Rc<dyn DrmDevice>,
    info: DumbInfo,
}

impl Debug for DumbBuffer {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DumbBuffer")
            .field("info", &self.info)
            .finish_non_exhaustive()
    }
}

impl DumbBuffer {
    pub fn new(
        dev: &Rc<dyn DrmDevice>,
        width: u32,
        height: u32,
        bpp: u32,
    ) -> Result<Self, DrmError> {
        let info = dev.create_dumb(width, height, bpp)?;
        Ok(Self {
            dev: dev.clone(),
            info,
        })
    }

    pub fn info(&self) -> &DumbInfo {
        &self.info
    }

    pub fn map(&self) -> Result<Box<dyn MappedMemory>, DrmError> {
        self.dev.map_dumb(self.info.handle, self.info.size as usize)
    }
}

impl Drop for DumbBuffer {
    fn drop(&mut self) {
        if let Err(e) = self.dev.destroy_dumb(self.info.handle) {
            log::error!("Could not close gem handle: {}", ErrorFmt(e));
        }
    }
}

#[derive(Debug, Copy, Clone)]
pub struct DrmPropertyValue {
    pub id: DrmProperty,
    pub value: u64,
}

pub trait DrmObject {
    const TYPE: u32;
    const NONE: Self;
    fn id(&self) -> u32;
    fn is_some(&self) -> bool;
    fn is_none(&self) -> bool;
}

macro_rules! drm_obj {
    ($name:ident, $ty:expr) => {
        #[repr(transparent)]
        #[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Default)]
        pub struct $name(pub u32);

        impl DrmObject for $name {
            const TYPE: u32 = $ty;
            const NONE: Self = Self(0);

            fn id(&self) -> u32 {
                self.0
            }

            fn is_some(&self) -> bool {
                self.0 != 0
            }

            fn is_none(&self) -> bool {
                self.0 == 0
            }
        }
    };
}
drm_obj!(DrmCrtc, DRM_MODE_OBJECT_CRTC);
drm_obj!(DrmConnector, DRM_MODE_OBJECT_CONNECTOR);
drm_obj!(DrmEncoder, DRM_MODE_OBJECT_ENCODER);
drm_obj!(DrmProperty, DRM_MODE_OBJECT_PROPERTY);
drm_obj!(DrmFb, DRM_MODE_OBJECT_FB);
drm_obj!(DrmBlob, DRM_MODE_OBJECT_BLOB);
drm_obj!(DrmPlane, DRM_MODE_OBJECT_PLANE);

#[derive(Debug, Clone, Default)]
pub struct DrmCardResources {
    pub crtcs: Vec<DrmCrtc>,
    pub connectors: Vec<DrmConnector>,
    pub encoders: Vec<DrmEncoder>,
}

#[derive(Debug, Clone)]
pub struct DrmPlaneInfo {
    pub plane_id: DrmPlane,
    pub crtc_id: DrmCrtc,
    pub possible_crtcs: u32,
}

#[derive(Debug, Clone)]
pub struct DrmEncoderInfo {
    pub encoder_id: DrmEncoder,
    pub crtc_id: DrmCrtc,
    pub possible_crtcs: u32,
}

#[derive(Debug, Clone, Eq, PartialEq)]
pub struct DrmModeInfo {
    pub clock: u32,
    pub hdisplay: u16,
    pub hsync_start: u16,
    pub hsync_end: u16,
    pub htotal: u16,
    pub hskew: u16,
    pub vdisplay: u16,
    pub vsync_start: u16,
    pub vsync_end: u16,
    pub vtotal: u16,
    pub vscan: u16,

    pub vrefresh: u32,

    pub flags: u32,
    pub ty: u32,
    pub name: BString,
}

impl DrmModeInfo {
    pub fn create_blob(&self, dev: &Rc<dyn DrmDevice>) -> Result<PropBlob, DrmError> {
        let raw = self.to_raw();
        let bytes = unsafe {
            slice::from_raw_parts(
                &raw as *const drm_mode_modeinfo as *const u8,
                mem::size_of::<drm_mode_modeinfo>(),
            )
        };
        PropBlob::new(dev, bytes)
    }

    pub fn to_raw(&self) -> drm_mode_modeinfo {
        let mut name = [0u8; DRM_DISPLAY_MODE_LEN];
        let len = name.len().min(self.name.len());
        name[..len].copy_from_slice(&self.name.as_bytes()[..len]);
        drm_mode_modeinfo {
            clock: self.clock,
            hdisplay: self.hdisplay,
            hsync_start: self.hsync_start,
            hsync_end: self.hsync_end,
            htotal: self.htotal,
            hskew: self.hskew,
            vdisplay: self.vdisplay,
            vsync_start: self.vsync_start,
            vsync_end: self.vsync_end,
            vtotal: self.vtotal,
            vscan: self.vscan,
            vrefresh: self.vrefresh,
            flags: self.flags,
            ty: self.ty,
            name,
        }
    }

    pub fn refresh_rate_millihz(&self) -> u32 {
        let clock_millihz = self.clock as u64 * 1_000_000;
        let htotal = self.htotal as u64;
        let vtotal = self.vtotal as u64;
        if htotal == 0 || vtotal == 0 {
            return self.vrefresh * 1000;
        }
        (((clock_millihz / htotal) + (vtotal / 2)) / vtotal) as u32
    }
}

impl Display for DrmModeInfo {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let mhz = self.refresh_rate_millihz();
        write!(
            f,
            "{} x {} @ {}.{:03} Hz",
            self.hdisplay,
            self.vdisplay,
            mhz / 1000,
            mhz % 1000
        )
    }
}

#[derive(Debug, Clone)]
pub struct DrmConnectorInfo {
    pub connector_id: DrmConnector,
    pub encoders: Vec<DrmEncoder>,
    pub modes: Vec<DrmModeInfo>,

    pub encoder_id: DrmEncoder,
    pub connector_type: u32,
    pub connector_type_id: u32,

    pub connection: u32,
}

impl DrmConnectorInfo {
    pub fn is_connected_with_modes(&self) -> bool {
        ConnectorStatus::from_drm(self.connection) == ConnectorStatus::Connected
            && !self.modes.is_empty()
    }
}

/// An atomic transaction. Properties of the same object must be added in one
/// `change_object` call to be grouped under that object.
#[derive(Default)]
pub struct Change {
    objects: Vec<u32>,
    object_lengths: Vec<u32>,
    props: Vec<u32>,
    values: Vec<u64>,
}

pub struct ObjectChange<'a> {
    change: &'a mut Change,
}

impl Change {
    pub fn is_empty(&self) -> bool {
        self.props.is_empty()
    }

    pub fn change_object<T, F>(&mut self, obj: T, f: F)
    where
        T: DrmObject,
        F: FnOnce(&mut ObjectChange),
    {
        let old_len = self.props.len();
        let mut oc = ObjectChange { change: self };
        f(&mut oc);
        if self.props.len() > old_len {
            let new = (self.props.len() - old_len) as u32;
            if self.objects.last() == Some(&obj.id())
                && let Some(len) = self.object_lengths.last_mut()
            {
                *len += new;
            } else {
                self.objects.push(obj.id());
                self.object_lengths.push(new);
            }
        }
    }

    /// Iterates over `(object, property, value)` in submission order.
    pub fn iter(&self) -> impl Iterator<Item = (u32, DrmProperty, u64)> + '_ {
        let mut props = self.props.iter().zip(self.values.iter());
        self.objects
            .iter()
            .zip(self.object_lengths.iter())
            .flat_map(move |(obj, len)| {
                props
                    .by_ref()
                    .take(*len as usize)
                    .map(|(p, v)| (*obj, DrmProperty(*p), *v))
                    .collect::<Vec<_>>()
            })
    }
}

impl Debug for Change {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

impl<'a> ObjectChange<'a> {
    pub fn change(&mut self, property_id: DrmProperty, value: u64) {
        self.change.props.push(property_id.0);
        self.change.values.push(value);
    }

    /// Adds the property if the object supports it.
    pub fn change_opt(&mut self, property_id: Option<DrmProperty>, value: u64) {
        if let Some(id) = property_id {
            self.change(id, value);
        }
    }
}

#[expect(non_camel_case_types)]
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum ConnectorType {
    Unknown(u32),
    VGA,
    DVII,
    DVID,
    DVIA,
    Composite,
    SVIDEO,
    LVDS,
    Component,
    _9PinDIN,
    DisplayPort,
    HDMIA,
    HDMIB,
    TV,
    eDP,
    VIRTUAL,
    DSI,
    DPI,
    WRITEBACK,
    SPI,
    USB,
}

impl ConnectorType {
    pub fn from_drm(v: u32) -> Self {
        match v {
            sys::DRM_MODE_CONNECTOR_VGA => Self::VGA,
            sys::DRM_MODE_CONNECTOR_DVII => Self::DVII,
            sys::DRM_MODE_CONNECTOR_DVID => Self::DVID,
            sys::DRM_MODE_CONNECTOR_DVIA => Self::DVIA,
            sys::DRM_MODE_CONNECTOR_Composite => Self::Composite,
            sys::DRM_MODE_CONNECTOR_SVIDEO => Self::SVIDEO,
            sys::DRM_MODE_CONNECTOR_LVDS => Self::LVDS,
            sys::DRM_MODE_CONNECTOR_Component => Self::Component,
            sys::DRM_MODE_CONNECTOR_9PinDIN => Self::_9PinDIN,
            sys::DRM_MODE_CONNECTOR_DisplayPort => Self::DisplayPort,
            sys::DRM_MODE_CONNECTOR_HDMIA => Self::HDMIA,
            sys::DRM_MODE_CONNECTOR_HDMIB => Self::HDMIB,
            sys::DRM_MODE_CONNECTOR_TV => Self::TV,
            sys::DRM_MODE_CONNECTOR_eDP => Self::eDP,
            sys::DRM_MODE_CONNECTOR_VIRTUAL => Self::VIRTUAL,
            sys::DRM_MODE_CONNECTOR_DSI => Self::DSI,
            sys::DRM_MODE_CONNECTOR_DPI => Self::DPI,
            sys::DRM_MODE_CONNECTOR_WRITEBACK => Self::WRITEBACK,
            sys::DRM_MODE_CONNECTOR_SPI => Self::SPI,
            sys::DRM_MODE_CONNECTOR_USB => Self::USB,
            _ => Self::Unknown(v),
        }
    }

    pub fn to_drm(self) -> u32 {
        match self {
            Self::Unknown(n) => n,
            Self::VGA => sys::DRM_MODE_CONNECTOR_VGA,
            Self::DVII => sys::DRM_MODE_CONNECTOR_DVII,
            Self::DVID => sys::DRM_MODE_CONNECTOR_DVID,
            Self::DVIA => sys::DRM_MODE_CONNECTOR_DVIA,
            Self::Composite => sys::DRM_MODE_CONNECTOR_Composite,
            Self::SVIDEO => sys::DRM_MODE_CONNECTOR_SVIDEO,
            Self::LVDS => sys::DRM_MODE_CONNECTOR_LVDS,
            Self::Component => sys::DRM_MODE_CONNECTOR_Component,
            Self::_9PinDIN => sys::DRM_MODE_CONNECTOR_9PinDIN,
            Self::DisplayPort => sys::DRM_MODE_CONNECTOR_DisplayPort,
            Self::HDMIA => sys::DRM_MODE_CONNECTOR_HDMIA,
            Self::HDMIB => sys::DRM_MODE_CONNECTOR_HDMIB,
            Self::TV => sys::DRM_MODE_CONNECTOR_TV,
            Self::eDP => sys::DRM_MODE_CONNECTOR_eDP,
            Self::VIRTUAL => sys::DRM_MODE_CONNECTOR_VIRTUAL,
            Self::DSI => sys::DRM_MODE_CONNECTOR_DSI,
            Self::DPI => sys::DRM_MODE_CONNECTOR_DPI,
            Self::WRITEBACK => sys::DRM_MODE_CONNECTOR_WRITEBACK,
            Self::SPI => sys::DRM_MODE_CONNECTOR_SPI,
            Self::USB => sys::DRM_MODE_CONNECTOR_USB,
        }
    }
}

impl Display for ConnectorType {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Unknown(n) => return write!(f, "Unknown({})", n),
            Self::VGA => "VGA",
            Self::DVII => "DVI-I",
            Self::DVID => "DVI-D",
            Self::DVIA => "DVI-A",
            Self::Composite => "Composite",
            Self::SVIDEO => "SVIDEO",
            Self::LVDS => "LVDS",
            Self::Component => "Component",
            Self::_9PinDIN => "DIN",
            Self::DisplayPort => "DP",
            Self::HDMIA => "HDMI-A",
            Self::HDMIB => "HDMI-B",
            Self::TV => "TV",
            Self::eDP => "eDP",
            Self::VIRTUAL => "Virtual",
            Self::DSI => "DSI",
            Self::DPI => "DPI",
            Self::WRITEBACK => "Writeback",
            Self::SPI => "SPI",
            Self::USB => "USB",
        };
        f.write_str(s)
    }
}

#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub enum ConnectorStatus {
    Connected,
    Disconnected,
    Unknown,
    Other(u32),
}

impl ConnectorStatus {
    pub fn from_drm(v: u32) -> Self {
        match v {
            sys::CONNECTOR_STATUS_CONNECTED => Self::Connected,
            sys::CONNECTOR_STATUS_DISCONNECTED => Self::Disconnected,
            sys::CONNECTOR_STATUS_UNKNOWN => Self::Unknown,
            _ => Self::Other(v),
        }
    }

    pub fn to_drm(self) -> u32 {
        match self {
            Self::Connected => sys::CONNECTOR_STATUS_CONNECTED,
            Self::Disconnected => sys::CONNECTOR_STATUS_DISCONNECTED,
            Self::Unknown => sys::CONNECTOR_STATUS_UNKNOWN,
            Self::Other(v) => v,
        }
    }
}

#[cfg(test)]
mod tests;
