/// Installs the `env_logger` backend. `RUST_LOG` overrides the default
/// `info` filter; a second call is a no-op.
pub fn init_logging() {
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .try_init();
}
