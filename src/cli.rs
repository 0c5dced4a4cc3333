mod blank_cycle;
mod fill;
mod info;

use {
    crate::{
        backends::kms::topology::LayerMixers,
        config::{BackendConfig, DRM_MAX},
        format::{DEFAULT_PIXEL_FORMAT, PixelFormat},
    },
    ::log::Level,
    clap::{Args, Parser, Subcommand, ValueEnum},
    std::time::Duration,
};

/// Shows pictures on a monitor through kernel mode setting.
#[derive(Parser, Debug)]
struct Kmsfb {
    #[clap(flatten)]
    global: GlobalArgs,
    #[clap(subcommand)]
    command: Cmd,
}

#[derive(Args, Debug)]
pub struct GlobalArgs {
    /// The log level.
    #[clap(value_enum, long, default_value_t)]
    pub log_level: CliLogLevel,
    /// The directory containing the card nodes.
    #[clap(long, default_value = "/dev/dri")]
    pub dri_dir: String,
    /// Only card0 up to but excluding this minor are probed.
    #[clap(long, default_value_t = 64)]
    pub max_minor: u32,
    /// The byte order of the pixels in the buffers.
    #[clap(value_enum, long, default_value_t = DEFAULT_PIXEL_FORMAT)]
    pub pixel_format: PixelFormat,
    /// The number of layer mixers used if the panel does not advertise a topology.
    #[clap(value_enum, long, default_value_t = LayerMixers::Dual)]
    pub default_lms: LayerMixers,
    /// The number of displays to drive.
    #[clap(long, default_value_t = 1, value_parser = clap::value_parser!(u8).range(1..=DRM_MAX as i64))]
    pub max_displays: u8,
}

impl GlobalArgs {
    pub fn config(&self) -> BackendConfig {
        BackendConfig {
            dri_dir: self.dri_dir.as_str().into(),
            max_minor: self.max_minor,
            default_layer_mixers: self.default_lms,
            pixel_format: self.pixel_format,
            max_displays: self.max_displays as usize,
            ..Default::default()
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum Cmd {
    /// Print the device, connectors, modes, CRTCs and planes that would be used.
    Info,
    /// Show a sequence of solid colors.
    Fill(FillArgs),
    /// Blank and unblank the main display.
    BlankCycle(BlankCycleArgs),
}

#[derive(Args, Debug)]
pub struct FillArgs {
    /// A color in RRGGBB notation. Can be repeated, frames cycle through the colors.
    #[clap(long = "color", value_parser = parse_color)]
    pub colors: Vec<Rgb>,
    /// The number of frames to show.
    #[clap(long, default_value_t = 4)]
    pub frames: usize,
    /// How long each frame stays on screen, e.g. `500ms` or `1s`.
    #[clap(long, value_parser = humantime::parse_duration, default_value = "500ms")]
    pub interval: Duration,
}

#[derive(Args, Debug)]
pub struct BlankCycleArgs {
    /// How long to stay in each state.
    #[clap(long, value_parser = humantime::parse_duration, default_value = "1s")]
    pub interval: Duration,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct Rgb(pub u8, pub u8, pub u8);

fn parse_color(s: &str) -> Result<Rgb, String> {
    let s = s.strip_prefix('#').unwrap_or(s);
    if s.len() != 6 {
        return Err("expected six hex digits".to_string());
    }
    match u32::from_str_radix(s, 16) {
        Ok(v) => Ok(Rgb((v >> 16) as u8, (v >> 8) as u8, v as u8)),
        Err(e) => Err(e.to_string()),
    }
}

#[derive(ValueEnum, Debug, Copy, Clone, Hash)]
pub enum CliLogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl From<CliLogLevel> for Level {
    fn from(l: CliLogLevel) -> Self {
        match l {
            CliLogLevel::Trace => Level::Trace,
            CliLogLevel::Debug => Level::Debug,
            CliLogLevel::Info => Level::Info,
            CliLogLevel::Warn => Level::Warn,
            CliLogLevel::Error => Level::Error,
        }
    }
}

impl Default for CliLogLevel {
    fn default() -> Self {
        Self::Info
    }
}

pub fn main() {
    let cli = Kmsfb::parse();
    match cli.command {
        Cmd::Info => info::main(cli.global),
        Cmd::Fill(a) => fill::main(cli.global, a),
        Cmd::BlankCycle(a) => blank_cycle::main(cli.global, a),
    }
}
