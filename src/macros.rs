macro_rules! fatal {
    ($($tt:tt)*) => {{
        let msg = format!($($tt)*);
        if log::log_enabled!(log::Level::Error) {
            log::error!("{}", msg);
        } else {
            eprintln!("{}", msg);
        }
        std::process::exit(1);
    }};
}
