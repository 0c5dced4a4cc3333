use {
    crate::{
        format::bpp,
        video::drm::{
            DrmDevice, DrmError, DrmFb, DrmFramebuffer, DrmObject, DumbBuffer, MappedMemory,
        },
    },
    std::{
        fmt::{Debug, Formatter},
        rc::Rc,
    },
    thiserror::Error,
};

#[derive(Debug, Error)]
pub enum SurfaceError {
    #[error("Could not allocate a dumb buffer")]
    Allocate(#[source] DrmError),
    #[error("Could not attach the dumb buffer to a framebuffer")]
    AddFb(#[source] DrmError),
    #[error("Could not map the dumb buffer")]
    Map(#[source] DrmError),
}

/// A CPU-mapped dumb buffer attached to a framebuffer.
///
/// The stride and pixel size are the values reported by the kernel, which may pad rows.
pub struct Surface {
    map: Option<Box<dyn MappedMemory>>,
    fb: Option<DrmFramebuffer>,
    dumb: Option<DumbBuffer>,
    width: u32,
    height: u32,
    row_bytes: u32,
    pixel_bytes: u32,
}

impl Debug for Surface {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Surface")
            .field("fb", &self.fb)
            .field("dumb", &self.dumb)
            .field("mapped", &self.map.is_some())
            .field("width", &self.width)
            .field("height", &self.height)
            .field("row_bytes", &self.row_bytes)
            .field("pixel_bytes", &self.pixel_bytes)
            .finish()
    }
}

impl Surface {
    /// Allocates, attaches and maps a buffer. On error everything acquired so far is
    /// released again.
    pub fn create(
        dev: &Rc<dyn DrmDevice>,
        width: u32,
        height: u32,
        format: u32,
    ) -> Result<Self, SurfaceError> {
        let mut slf = Self {
            map: None,
            fb: None,
            dumb: None,
            width,
            height,
            row_bytes: 0,
            pixel_bytes: 0,
        };
        let dumb = DumbBuffer::new(dev, width, height, bpp(format)).map_err(SurfaceError::Allocate)?;
        slf.row_bytes = dumb.info().pitch;
        slf.pixel_bytes = dumb.info().bpp / 8;
        let dumb = slf.dumb.insert(dumb);
        let fb = DrmFramebuffer::new(dev, width, height, format, dumb).map_err(SurfaceError::AddFb)?;
        let map = dumb.map().map_err(SurfaceError::Map)?;
        slf.fb = Some(fb);
        slf.map = Some(map);
        Ok(slf)
    }

    /// Unmaps the memory, removes the framebuffer and closes the buffer handle, skipping
    /// whatever was never acquired or has already been released.
    pub fn destroy(&mut self) {
        self.map = None;
        self.fb = None;
        self.dumb = None;
    }

    pub fn is_allocated(&self) -> bool {
        self.map.is_some() || self.fb.is_some() || self.dumb.is_some()
    }

    /// The mapped pixels, `row_bytes * height` bytes. Empty after `destroy`.
    ///
    /// The mapping itself can be longer since the kernel may round the buffer size up.
    pub fn data(&mut self) -> &mut [u8] {
        let len = self.row_bytes as usize * self.height as usize;
        match &mut self.map {
            Some(m) => {
                let data = m.as_mut_slice();
                let len = len.min(data.len());
                &mut data[..len]
            }
            None => &mut [],
        }
    }

    /// Writes `pixel` to every pixel of every row. Row padding is left alone.
    pub fn fill(&mut self, pixel: &[u8]) {
        if pixel.len() != self.pixel_bytes as usize {
            log::warn!(
                "Pixel has {} bytes but the surface uses {}",
                pixel.len(),
                self.pixel_bytes
            );
            return;
        }
        let row_bytes = self.row_bytes as usize;
        let used = self.width as usize * pixel.len();
        if row_bytes == 0 || used > row_bytes {
            return;
        }
        for row in self.data().chunks_exact_mut(row_bytes) {
            for px in row[..used].chunks_exact_mut(pixel.len()) {
                px.copy_from_slice(pixel);
            }
        }
    }

    pub fn fb(&self) -> DrmFb {
        match &self.fb {
            Some(fb) => fb.id(),
            None => DrmFb::NONE,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn row_bytes(&self) -> u32 {
        self.row_bytes
    }

    pub fn pixel_bytes(&self) -> u32 {
        self.pixel_bytes
    }
}

impl Drop for Surface {
    fn drop(&mut self) {
        self.destroy();
    }
}
