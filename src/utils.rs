pub mod bitflags;
pub mod compat;
pub mod errorfmt;
pub mod mmap;
pub mod oserror;
