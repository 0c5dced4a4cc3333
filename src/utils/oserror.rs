use {
    std::{
        error::Error,
        fmt::{Display, Formatter},
        sync::LazyLock,
    },
    uapi::{
        Errno,
        c::{self, c_int},
    },
};

static ERRORS: LazyLock<&'static [Option<&'static str>]> = LazyLock::new(|| {
    static MSGS: &[(c::c_int, &str)] = &[
        (c::ENOTSUP, "Not supported"),
        (c::EOVERFLOW, "Value too large for defined data type"),
        (c::ENOSYS, "Function not implemented"),
        (c::ENOSPC, "No space left on device"),
        (c::ENOTTY, "Inappropriate ioctl for device"),
        (c::ENFILE, "Too many open files in system"),
        (c::EMFILE, "Too many open files"),
        (c::EINVAL, "Invalid argument"),
        (c::ENODEV, "No such device"),
        (c::EEXIST, "File exists"),
        (c::EBUSY, "Device or resource busy"),
        (c::EFAULT, "Bad address"),
        (c::EACCES, "Permission denied"),
        (c::ENOMEM, "Cannot allocate memory"),
        (c::EAGAIN, "Resource temporarily unavailable"),
        (c::ERANGE, "Numerical result out of range"),
        (c::EBADF, "Bad file descriptor"),
        (c::E2BIG, "Argument list too long"),
        (c::ENXIO, "No such device or address"),
        (c::EIO, "Input/output error"),
        (c::EINTR, "Interrupted system call"),
        (c::ENOENT, "No such file or directory"),
        (c::EPERM, "Operation not permitted"),
    ];
    let mut res = vec![];
    for &(idx, msg) in MSGS {
        let idx = idx as usize;
        while res.len() <= idx {
            res.push(None);
        }
        res[idx] = Some(msg);
    }
    res.leak()
});

/// An errno returned by a failed system call.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct OsError(pub c::c_int);

impl From<Errno> for OsError {
    fn from(e: Errno) -> Self {
        Self(e.0)
    }
}

impl From<c::c_int> for OsError {
    fn from(v: c_int) -> Self {
        Self(v)
    }
}

impl From<std::io::Error> for OsError {
    fn from(v: std::io::Error) -> Self {
        match v.raw_os_error() {
            Some(v) => Self(v),
            None => Self(c::EINVAL),
        }
    }
}

impl Default for OsError {
    fn default() -> Self {
        Errno::default().into()
    }
}

impl Error for OsError {}

impl Display for OsError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let msg = ERRORS
            .get(self.0 as usize)
            .and_then(|v| *v)
            .unwrap_or("unknown error");
        write!(f, "{} (os error {})", msg, self.0)
    }
}

#[cfg(test)]
mod tests {
    use {super::OsError, uapi::c};

    #[test]
    fn known_errno() {
        assert_eq!(
            OsError(c::ENODEV).to_string(),
            format!("No such device (os error {})", c::ENODEV),
        );
    }

    #[test]
    fn unknown_errno() {
        assert_eq!(OsError(100_000).to_string(), "unknown error (os error 100000)");
    }
}
