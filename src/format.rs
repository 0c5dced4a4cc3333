use {
    ahash::AHashMap,
    arrayvec::ArrayVec,
    std::{
        fmt::{Display, Formatter, Write},
        sync::LazyLock,
    },
};

/// The byte order of a pixel in the mapped buffer, lowest address first.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, clap::ValueEnum)]
pub enum PixelFormat {
    Abgr,
    Bgra,
    Rgbx,
    Argb,
    Rgb565,
}

#[derive(Copy, Clone, Debug)]
pub struct Format {
    pub name: &'static str,
    pub drm: u32,
    pub bpp: u32,
}

impl PartialEq for Format {
    fn eq(&self, other: &Self) -> bool {
        self.drm == other.drm
    }
}

impl Eq for Format {}

static FORMATS_MAP: LazyLock<AHashMap<u32, &'static Format>> = LazyLock::new(|| {
    let mut map = AHashMap::new();
    for format in FORMATS {
        assert!(map.insert(format.drm, format).is_none());
    }
    map
});

#[test]
fn formats_dont_panic() {
    formats();
}

pub fn formats() -> &'static AHashMap<u32, &'static Format> {
    &FORMATS_MAP
}

const fn fourcc_code(a: char, b: char, c: char, d: char) -> u32 {
    (a as u32) | ((b as u32) << 8) | ((c as u32) << 16) | ((d as u32) << 24)
}

/// Prints a fourcc as its four characters.
pub struct FourCc(pub u32);

impl Display for FourCc {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        for shift in [0, 8, 16, 24] {
            f.write_char((self.0 >> shift) as u8 as char)?;
        }
        Ok(())
    }
}

cfg_if::cfg_if! {
    if #[cfg(feature = "pixel-abgr")] {
        pub const DEFAULT_PIXEL_FORMAT: PixelFormat = PixelFormat::Abgr;
    } else if #[cfg(feature = "pixel-bgra")] {
        pub const DEFAULT_PIXEL_FORMAT: PixelFormat = PixelFormat::Bgra;
    } else if #[cfg(feature = "pixel-argb")] {
        pub const DEFAULT_PIXEL_FORMAT: PixelFormat = PixelFormat::Argb;
    } else if #[cfg(feature = "pixel-rgb565")] {
        pub const DEFAULT_PIXEL_FORMAT: PixelFormat = PixelFormat::Rgb565;
    } else {
        pub const DEFAULT_PIXEL_FORMAT: PixelFormat = PixelFormat::Rgbx;
    }
}

impl PixelFormat {
    pub fn format(self) -> &'static Format {
        match self {
            PixelFormat::Abgr => RGBA8888,
            PixelFormat::Bgra => ARGB8888,
            PixelFormat::Rgbx => XBGR8888,
            PixelFormat::Argb => BGRA8888,
            PixelFormat::Rgb565 => RGB565,
        }
    }

    pub fn drm(self) -> u32 {
        self.format().drm
    }

    /// The bytes of an opaque pixel with the given color, lowest address first.
    pub fn encode(self, r: u8, g: u8, b: u8) -> ArrayVec<u8, 4> {
        let mut res = ArrayVec::new();
        match self {
            PixelFormat::Abgr => res.extend([0xff, b, g, r]),
            PixelFormat::Bgra => res.extend([b, g, r, 0xff]),
            PixelFormat::Rgbx => res.extend([r, g, b, 0xff]),
            PixelFormat::Argb => res.extend([0xff, r, g, b]),
            PixelFormat::Rgb565 => {
                let v = ((r as u16 >> 3) << 11) | ((g as u16 >> 2) << 5) | (b as u16 >> 3);
                res.extend(v.to_le_bytes());
            }
        }
        res
    }
}

/// Bits per pixel of a fourcc. Unknown codes are treated as 32 bit.
pub fn bpp(fourcc: u32) -> u32 {
    match formats().get(&fourcc) {
        Some(f) => f.bpp,
        None => {
            log::warn!("Unknown pixel format {}, assuming 32 bpp", FourCc(fourcc));
            32
        }
    }
}

pub static RGBA8888: &Format = &Format {
    name: "rgba8888",
    drm: fourcc_code('R', 'A', '2', '4'),
    bpp: 32,
};

pub static ARGB8888: &Format = &Format {
    name: "argb8888",
    drm: fourcc_code('A', 'R', '2', '4'),
    bpp: 32,
};

pub static XBGR8888: &Format = &Format {
    name: "xbgr8888",
    drm: fourcc_code('X', 'B', '2', '4'),
    bpp: 32,
};

pub static BGRA8888: &Format = &Format {
    name: "bgra8888",
    drm: fourcc_code('B', 'A', '2', '4'),
    bpp: 32,
};

pub static RGB565: &Format = &Format {
    name: "rgb565",
    drm: fourcc_code('R', 'G', '1', '6'),
    bpp: 16,
};

pub static FORMATS: &[Format] = &[*RGBA8888, *ARGB8888, *XBGR8888, *BGRA8888, *RGB565];

#[cfg(test)]
mod tests {
    use crate::format::{FourCc, PixelFormat, bpp, fourcc_code};

    #[test]
    fn byte_order_to_fourcc() {
        assert_eq!(PixelFormat::Abgr.drm(), fourcc_code('R', 'A', '2', '4'));
        assert_eq!(PixelFormat::Bgra.drm(), fourcc_code('A', 'R', '2', '4'));
        assert_eq!(PixelFormat::Rgbx.drm(), fourcc_code('X', 'B', '2', '4'));
        assert_eq!(PixelFormat::Argb.drm(), fourcc_code('B', 'A', '2', '4'));
        assert_eq!(PixelFormat::Rgb565.drm(), fourcc_code('R', 'G', '1', '6'));
        assert_eq!(PixelFormat::Rgbx.format().name, "xbgr8888");
        assert_eq!(PixelFormat::Argb.format().name, "bgra8888");
    }

    #[test]
    fn bits_per_pixel() {
        assert_eq!(bpp(PixelFormat::Rgbx.drm()), 32);
        assert_eq!(bpp(PixelFormat::Abgr.drm()), 32);
        assert_eq!(bpp(PixelFormat::Rgb565.drm()), 16);
        assert_eq!(bpp(fourcc_code('N', 'V', '1', '2')), 32);
    }

    #[test]
    fn encode_byte_order() {
        assert_eq!(&PixelFormat::Rgbx.encode(1, 2, 3)[..], [1, 2, 3, 0xff]);
        assert_eq!(&PixelFormat::Abgr.encode(1, 2, 3)[..], [0xff, 3, 2, 1]);
        assert_eq!(&PixelFormat::Bgra.encode(1, 2, 3)[..], [3, 2, 1, 0xff]);
        assert_eq!(&PixelFormat::Argb.encode(1, 2, 3)[..], [0xff, 1, 2, 3]);
        assert_eq!(&PixelFormat::Rgb565.encode(0xff, 0, 0)[..], [0x00, 0xf8]);
        assert_eq!(&PixelFormat::Rgb565.encode(0, 0xff, 0xff)[..], [0xff, 0x07]);
    }

    #[test]
    fn fourcc_display() {
        assert_eq!(FourCc(PixelFormat::Rgbx.drm()).to_string(), "XB24");
    }
}
