use std::sync::Once;

/// Logger configuration.
///
/// `env_filter` follows the `env_logger` filter syntax (e.g. "info",
/// "tessel_engine::batch=trace,wgpu=warn").
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    pub env_filter: Option<String>,
    /// Level used when neither `env_filter` nor `RUST_LOG` is set.
    pub default_level: log::LevelFilter,
    pub write_style: env_logger::WriteStyle,
}

impl LoggingConfig {
    /// Debug output for the engine, warnings only for wgpu internals.
    pub fn verbose() -> Self {
        Self {
            env_filter: Some("tessel_engine=debug,wgpu=warn".to_string()),
            ..Self::default()
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            env_filter: None,
            default_level: log::LevelFilter::Info,
            write_style: env_logger::WriteStyle::Auto,
        }
    }
}

/// Where the active filter came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum FilterSource {
    Config(String),
    Env(String),
    Level(log::LevelFilter),
}

/// Explicit config wins over `RUST_LOG`, which wins over the default level.
pub(crate) fn resolve_filter(config: &LoggingConfig, env: Option<String>) -> FilterSource {
    if let Some(filter) = &config.env_filter {
        FilterSource::Config(filter.clone())
    } else if let Some(filter) = env.filter(|f| !f.trim().is_empty()) {
        FilterSource::Env(filter)
    } else {
        FilterSource::Level(config.default_level)
    }
}

static INIT: Once = Once::new();

/// Initializes the global logger once.
///
/// Idempotent; subsequent calls are ignored. Call early in `main`.
pub fn init_logging(config: LoggingConfig) {
    INIT.call_once(|| {
        let mut builder = env_logger::Builder::new();

        match resolve_filter(&config, std::env::var("RUST_LOG").ok()) {
            FilterSource::Config(f) | FilterSource::Env(f) => {
                builder.parse_filters(&f);
            }
            FilterSource::Level(level) => {
                builder.filter_level(level);
            }
        }

        builder.write_style(config.write_style);
        builder.init();

        log::debug!("logging initialized");
    });
}
