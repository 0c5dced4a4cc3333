#![allow(clippy::len_zero, clippy::new_without_default)]

#[macro_use]
mod macros;

pub mod backends;
pub mod cli;
pub mod config;
pub mod format;
pub mod logger;
pub mod utils;
pub mod video;
