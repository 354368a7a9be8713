//! logger.rs
//! Logger de la corrida (env_logger). RUST_LOG pisa los niveles por defecto.

use log::LevelFilter;

/// Clientes HTTP/SMTP son muy verbosos en info
const QUIET_MODULES: [&str; 4] = ["hyper", "hyper_util", "reqwest", "lettre"];

pub fn init_logger() {
    let mut builder = env_logger::Builder::new();
    builder.filter_level(LevelFilter::Info);
    for module in QUIET_MODULES {
        builder.filter_module(module, LevelFilter::Warn);
    }

    if let Ok(spec) = std::env::var("RUST_LOG") {
        builder.parse_filters(&spec);
    }

    builder
        .format_timestamp_secs()
        .format_module_path(false)
        .init();
}
