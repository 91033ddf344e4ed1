use std::io::Write;

/// Install the global logger. `level` (from `--log-level`/`RUST_LOG`) wins over `debug`.
pub fn init_logging(debug: bool, level: Option<&str>) {
    let default_filter = match level {
        Some(level) => level,
        None if debug => "debug",
        None => "info",
    };

    let result = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .format(|buf, record| {
            writeln!(
                buf,
                "[{}] {} [{}] {}",
                buf.timestamp_millis(),
                record.level(),
                record.target(),
                record.args()
            )
        })
        .try_init();

    if result.is_err() {
        log::debug!("Logger already initialized");
    }
}
