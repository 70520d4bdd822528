/// Installs the process logger once; later calls are no-ops.
///
/// `RUST_LOG` overrides `default_filter` on desktop. On Android the records
/// go to logcat, with `default_filter` read as a plain level.
#[cfg(not(target_os = "android"))]
pub fn init_logging(default_filter: &str) {
    let env = env_logger::Env::default().default_filter_or(default_filter);
    if env_logger::Builder::from_env(env)
        .format_timestamp_millis()
        .try_init()
        .is_err()
    {
        log::debug!("Logger already initialized");
    }
}

#[cfg(target_os = "android")]
pub fn init_logging(default_filter: &str) {
    let level = default_filter
        .parse::<log::LevelFilter>()
        .unwrap_or(log::LevelFilter::Info);
    android_logger::init_once(
        android_logger::Config::default()
            .with_max_level(level)
            .with_tag("cattle-registry"),
    );
}
