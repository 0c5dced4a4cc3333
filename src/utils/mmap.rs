use {
    crate::{
        utils::{errorfmt::ErrorFmt, oserror::OsError},
        video::drm::MappedMemory,
    },
    std::{ptr, slice},
    uapi::c,
};

/// A shared read/write mapping that is unmapped on drop.
pub struct Mmapped {
    ptr: *mut u8,
    len: usize,
}

pub fn mmap_shared(len: usize, fd: c::c_int, offset: c::off_t) -> Result<Mmapped, OsError> {
    let res = unsafe {
        c::mmap(
            ptr::null_mut(),
            len,
            c::PROT_READ | c::PROT_WRITE,
            c::MAP_SHARED,
            fd,
            offset,
        )
    };
    if res == c::MAP_FAILED {
        Err(OsError::default())
    } else {
        Ok(Mmapped {
            ptr: res.cast(),
            len,
        })
    }
}

impl MappedMemory for Mmapped {
    fn as_mut_slice(&mut self) -> &mut [u8] {
        unsafe { slice::from_raw_parts_mut(self.ptr, self.len) }
    }
}

impl Drop for Mmapped {
    fn drop(&mut self) {
        let res = unsafe { c::munmap(self.ptr.cast(), self.len) };
        if res != 0 {
            log::error!("Could not unmap buffer: {}", ErrorFmt(OsError::default()));
        }
    }
}
